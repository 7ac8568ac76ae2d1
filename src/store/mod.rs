/// 상품/입찰 저장소 트레이트
/// 코어는 이 좁은 인터페이스만 바라보고, 구현체(Postgres/인메모리)는 교체 가능하다.
// region:    --- Imports
use crate::bidding::model::{Bid, Item};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

// endregion: --- Imports

pub mod memory;
pub mod postgres;

// region:    --- Store Types

/// 상품 생성 입력
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub starting_price: i64,
}

/// 상품 수정 입력 (서술 필드만 수정 가능, 가격/종료 플래그는 엔진 소유)
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

/// 입찰 기록 입력
#[derive(Debug, Clone)]
pub struct NewBid {
    pub item_id: i64,
    pub bidder_id: String,
    pub bidder_name: String,
    pub amount: i64,
}

/// 저장소 오류
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("대상을 찾을 수 없습니다.")]
    NotFound,
    #[error("동시 쓰기 충돌이 발생했습니다.")]
    Conflict,
    #[error("데이터베이스 오류: {0}")]
    Database(#[from] sqlx::Error),
}

// endregion: --- Store Types

// region:    --- Store Traits

/// 상품 저장소 트레이트
#[async_trait]
pub trait ItemStore {
    async fn create_item(&self, fields: NewItem) -> Result<Item, StoreError>;
    async fn get_item(&self, item_id: i64) -> Result<Item, StoreError>;
    async fn update_item(&self, item_id: i64, patch: ItemPatch) -> Result<Item, StoreError>;
    async fn delete_item(&self, item_id: i64) -> Result<(), StoreError>;
    /// 생성 시각 내림차순 상품 목록
    async fn list_items(&self) -> Result<Vec<Item>, StoreError>;
    /// 경매 종료 플래그 설정 (단방향, 재호출 허용)
    async fn close_item(&self, item_id: i64) -> Result<Item, StoreError>;
}

/// 입찰 원장 트레이트
#[async_trait]
pub trait LedgerStore {
    /// 입찰 기록과 상품 현재 가격 갱신을 하나의 원자적 단위로 수행한다.
    /// 금액이 더 이상 현재 가격보다 크지 않거나 경매가 종료된 경우 Conflict.
    async fn insert_bid(&self, bid: NewBid) -> Result<Bid, StoreError>;
    /// 상품의 최고 입찰 금액 (입찰이 없으면 None)
    async fn max_amount_for(&self, item_id: i64) -> Result<Option<i64>, StoreError>;
    /// 최고 입찰 한 건 (동점이면 가장 먼저 기록된 입찰)
    async fn top_bid_for(&self, item_id: i64) -> Result<Option<Bid>, StoreError>;
    /// 상품 입찰 이력, 금액 내림차순
    async fn bids_for(&self, item_id: i64) -> Result<Vec<Bid>, StoreError>;
    /// 전체 입찰 이력
    async fn all_bids(&self) -> Result<Vec<Bid>, StoreError>;
    /// 상품의 입찰 전체 삭제 (상품 삭제 시 연쇄 삭제용)
    async fn delete_bids_for(&self, item_id: i64) -> Result<(), StoreError>;
}

/// 상품 저장소와 입찰 원장을 모두 제공하는 저장소
pub trait AuctionStore: ItemStore + LedgerStore {}

impl<T: ItemStore + LedgerStore> AuctionStore for T {}

pub type SharedStore = Arc<dyn AuctionStore + Send + Sync>;

// endregion: --- Store Traits
