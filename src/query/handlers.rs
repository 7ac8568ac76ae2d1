/// 조회 전용 핸들러 (카탈로그 프로젝션)
/// 상품과 입찰 원장을 조인해 목록/상세 화면용 행을 만든다.
// region:    --- Imports
use crate::bidding::commands::CommandError;
use crate::bidding::model::{Bid, Item};
use crate::store::{ItemStore, LedgerStore, SharedStore};
use serde::Serialize;
use tracing::info;

// endregion: --- Imports

// region:    --- Projections

/// 목록 화면용 행: 상품 + 최고 입찰 요약
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    #[serde(flatten)]
    pub item: Item,
    pub top_bid_amount: i64,
    pub top_bidder_name: Option<String>,
}

/// 상세 화면용 행: 상품 + 전체 입찰 이력 (금액 내림차순)
#[derive(Debug, Clone, Serialize)]
pub struct ItemDetail {
    pub item: Item,
    pub bids: Vec<Bid>,
}

// endregion: --- Projections

// region:    --- Query Handlers

/// 모든 상품 조회 (최고 입찰 요약 포함, 생성 시각 내림차순)
/// 입찰이 없는 상품은 시작 가격을 최고가로 노출한다.
pub async fn list_items(store: &SharedStore) -> Result<Vec<ItemSummary>, CommandError> {
    info!("{:<12} --> 모든 상품 조회", "Query");
    let items = store.list_items().await?;

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let top = store.top_bid_for(item.id).await?;
        let top_bid_amount = top.as_ref().map(|b| b.amount).unwrap_or(item.starting_price);
        let top_bidder_name = top.map(|b| b.bidder_name);
        rows.push(ItemSummary {
            item,
            top_bid_amount,
            top_bidder_name,
        });
    }
    Ok(rows)
}

/// 상품 상세 조회 (입찰 이력 포함)
pub async fn get_item_detail(
    store: &SharedStore,
    item_id: i64,
) -> Result<ItemDetail, CommandError> {
    info!("{:<12} --> 상품 상세 조회 id: {}", "Query", item_id);
    let item = store.get_item(item_id).await?;
    let bids = store.bids_for(item_id).await?;
    Ok(ItemDetail { item, bids })
}

/// 최고 입찰 금액 조회
pub async fn get_highest_bid(
    store: &SharedStore,
    item_id: i64,
) -> Result<Option<i64>, CommandError> {
    info!("{:<12} --> 최고 입찰가 조회 id: {}", "Query", item_id);
    store.get_item(item_id).await?;
    Ok(store.max_amount_for(item_id).await?)
}

/// 전체 입찰 조회
pub async fn list_bids(store: &SharedStore) -> Result<Vec<Bid>, CommandError> {
    info!("{:<12} --> 전체 입찰 조회", "Query");
    Ok(store.all_bids().await?)
}

// endregion: --- Query Handlers
