/// Postgres 저장소 구현체
// region:    --- Imports
use crate::bidding::model::{Bid, Item};
use crate::database::DatabaseManager;
use crate::query::queries;
use crate::store::{ItemPatch, ItemStore, LedgerStore, NewBid, NewItem, StoreError};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;
use tracing::info;

// endregion: --- Imports

// region:    --- Postgres Store

pub struct PostgresStore {
    db: Arc<DatabaseManager>,
}

impl PostgresStore {
    pub fn new(db: Arc<DatabaseManager>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ItemStore for PostgresStore {
    /// 상품 생성
    async fn create_item(&self, fields: NewItem) -> Result<Item, StoreError> {
        info!("{:<12} --> 상품 생성: {}", "Store", fields.title);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let item = sqlx::query_as::<_, Item>(queries::CREATE_ITEM)
                        .bind(&fields.title)
                        .bind(&fields.description)
                        .bind(&fields.image_url)
                        .bind(fields.starting_price)
                        .bind(Utc::now())
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok(item)
                })
            })
            .await
    }

    /// 상품 조회
    async fn get_item(&self, item_id: i64) -> Result<Item, StoreError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Item>(queries::GET_ITEM)
                        .bind(item_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(StoreError::NotFound)
                })
            })
            .await
    }

    /// 상품 수정
    async fn update_item(&self, item_id: i64, patch: ItemPatch) -> Result<Item, StoreError> {
        info!("{:<12} --> 상품 수정 id: {}", "Store", item_id);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Item>(queries::UPDATE_ITEM)
                        .bind(patch.title)
                        .bind(patch.description)
                        .bind(patch.image_url)
                        .bind(item_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(StoreError::NotFound)
                })
            })
            .await
    }

    /// 상품 삭제
    async fn delete_item(&self, item_id: i64) -> Result<(), StoreError> {
        info!("{:<12} --> 상품 삭제 id: {}", "Store", item_id);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query(queries::DELETE_ITEM)
                        .bind(item_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(StoreError::NotFound)?;
                    Ok(())
                })
            })
            .await
    }

    /// 모든 상품 조회
    async fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let items = sqlx::query_as::<_, Item>(queries::GET_ALL_ITEMS)
                        .fetch_all(&mut **tx)
                        .await?;
                    Ok(items)
                })
            })
            .await
    }

    /// 경매 종료 플래그 설정
    async fn close_item(&self, item_id: i64) -> Result<Item, StoreError> {
        info!("{:<12} --> 경매 종료 id: {}", "Store", item_id);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query_as::<_, Item>(queries::CLOSE_ITEM)
                        .bind(item_id)
                        .fetch_optional(&mut **tx)
                        .await?
                        .ok_or(StoreError::NotFound)
                })
            })
            .await
    }
}

#[async_trait]
impl LedgerStore for PostgresStore {
    /// 입찰 기록과 현재 가격 갱신을 한 트랜잭션으로 수행
    /// 조건부 갱신이 빈손으로 돌아오면 다른 입찰이 먼저 커밋된 것이므로 Conflict.
    async fn insert_bid(&self, bid: NewBid) -> Result<Bid, StoreError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let advanced = sqlx::query(queries::ADVANCE_CURRENT_PRICE)
                        .bind(bid.amount)
                        .bind(bid.item_id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    if advanced.is_none() {
                        return Err(StoreError::Conflict);
                    }

                    let stored = sqlx::query_as::<_, Bid>(queries::INSERT_BID)
                        .bind(bid.item_id)
                        .bind(&bid.bidder_id)
                        .bind(&bid.bidder_name)
                        .bind(bid.amount)
                        .bind(Utc::now())
                        .fetch_one(&mut **tx)
                        .await?;
                    Ok(stored)
                })
            })
            .await
    }

    /// 최고 입찰 금액 조회
    async fn max_amount_for(&self, item_id: i64) -> Result<Option<i64>, StoreError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let result = sqlx::query(queries::GET_HIGHEST_BID)
                        .bind(item_id)
                        .fetch_one(&mut **tx)
                        .await?;

                    Ok(result.get("highest_bid"))
                })
            })
            .await
    }

    /// 최고 입찰 조회
    async fn top_bid_for(&self, item_id: i64) -> Result<Option<Bid>, StoreError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let bid = sqlx::query_as::<_, Bid>(queries::GET_TOP_BID)
                        .bind(item_id)
                        .fetch_optional(&mut **tx)
                        .await?;
                    Ok(bid)
                })
            })
            .await
    }

    /// 상품 입찰 이력 조회
    async fn bids_for(&self, item_id: i64) -> Result<Vec<Bid>, StoreError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let bids = sqlx::query_as::<_, Bid>(queries::GET_BID_HISTORY)
                        .bind(item_id)
                        .fetch_all(&mut **tx)
                        .await?;
                    Ok(bids)
                })
            })
            .await
    }

    /// 전체 입찰 조회
    async fn all_bids(&self) -> Result<Vec<Bid>, StoreError> {
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    let bids = sqlx::query_as::<_, Bid>(queries::GET_ALL_BIDS)
                        .fetch_all(&mut **tx)
                        .await?;
                    Ok(bids)
                })
            })
            .await
    }

    /// 상품 입찰 전체 삭제
    async fn delete_bids_for(&self, item_id: i64) -> Result<(), StoreError> {
        info!("{:<12} --> 상품 입찰 전체 삭제 id: {}", "Store", item_id);
        self.db
            .transaction(|tx| {
                Box::pin(async move {
                    sqlx::query(queries::DELETE_ITEM_BIDS)
                        .bind(item_id)
                        .execute(&mut **tx)
                        .await?;
                    Ok(())
                })
            })
            .await
    }
}

// endregion: --- Postgres Store
