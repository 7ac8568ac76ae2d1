/// 입찰/상품 관련 커맨드 처리
/// 1. 입찰 (읽기-검증-기록의 낙관적 재시도 루프)
/// 2. 상품 생성/수정/삭제
// region:    --- Imports
use crate::bidding::model::{Bid, Identity, Item};
use crate::bidding::validator::{self, RejectReason};
use crate::store::{ItemPatch, ItemStore, LedgerStore, NewBid, NewItem, SharedStore, StoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Commands

/// 입찰 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlaceBidCommand {
    pub amount: i64,
}

/// 상품 생성 명령
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CreateItemCommand {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub starting_price: i64,
}

/// 상품 수정 명령 (서술 필드만)
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct UpdateItemCommand {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

// endregion: --- Commands

// region:    --- Command Error

/// 커맨드 처리 오류
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("상품을 찾을 수 없습니다.")]
    NotFound,
    #[error("{0}")]
    Rejected(#[from] RejectReason),
    #[error("해당 상품에 입찰 내역이 없습니다.")]
    NoBids,
    #[error("동시 입찰 충돌이 발생했습니다. 잠시 후 다시 시도해주세요.")]
    Conflict,
    #[error("저장소 오류가 발생했습니다.")]
    Upstream(#[source] StoreError),
}

impl CommandError {
    /// 기계 판독용 오류 코드
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::NotFound => "ITEM_NOT_FOUND",
            CommandError::Rejected(RejectReason::AuctionClosed) => "AUCTION_CLOSED",
            CommandError::Rejected(RejectReason::BidTooLow { .. }) => "BID_TOO_LOW",
            CommandError::Rejected(RejectReason::InvalidAmount) => "INVALID_AMOUNT",
            CommandError::NoBids => "NO_BIDS",
            CommandError::Conflict => "CONFLICT",
            CommandError::Upstream(_) => "UPSTREAM",
        }
    }
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => CommandError::NotFound,
            StoreError::Conflict => CommandError::Conflict,
            err @ StoreError::Database(_) => CommandError::Upstream(err),
        }
    }
}

// endregion: --- Command Error

// 최대 재시도 횟수
const MAX_RETRIES: u32 = 10;

// region:    --- Bid Engine

/// 1. 입찰
///
/// 최신 상태를 읽어 순수 검증기를 통과시킨 뒤 조건부 기록을 시도한다.
/// 기록 충돌은 같은 상품에 다른 입찰이 먼저 커밋되었다는 뜻이므로
/// 새 상태로 다시 검증한다. 실제로 추월당한 입찰은 BID_TOO_LOW로 끝난다.
pub async fn handle_place_bid(
    store: &SharedStore,
    identity: &Identity,
    item_id: i64,
    cmd: PlaceBidCommand,
) -> Result<Bid, CommandError> {
    info!(
        "{:<12} --> 입찰 요청 처리 시작: item_id={}, bidder={}, amount={}",
        "Command", item_id, identity.user_id, cmd.amount
    );
    let mut retries = 0;

    while retries < MAX_RETRIES {
        // 상품 및 현재 최고가 조회
        let item = store.get_item(item_id).await?;
        let current_top = store
            .max_amount_for(item_id)
            .await?
            .unwrap_or(item.starting_price);

        // 입찰 검증 (거절 시 아무것도 기록하지 않는다)
        validator::validate(&item, current_top, cmd.amount)?;

        // 입찰 기록 + 현재 가격 갱신 (저장소에서 원자적으로 수행)
        match store
            .insert_bid(NewBid {
                item_id,
                bidder_id: identity.user_id.clone(),
                bidder_name: identity.user_name.clone(),
                amount: cmd.amount,
            })
            .await
        {
            Ok(bid) => {
                info!(
                    "{:<12} --> 입찰 성공: item_id={}, bid_id={}, amount={}",
                    "Command", item_id, bid.id, bid.amount
                );
                return Ok(bid);
            }
            Err(StoreError::Conflict) => {
                retries += 1;
                warn!(
                    "{:<12} --> 동시 입찰 충돌: 재시도 ({}/{})",
                    "Command", retries, MAX_RETRIES
                );
                continue;
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(CommandError::Conflict)
}

// endregion: --- Bid Engine

// region:    --- Item Commands

/// 2. 상품 생성
pub async fn handle_create_item(
    store: &SharedStore,
    cmd: CreateItemCommand,
) -> Result<Item, CommandError> {
    info!("{:<12} --> 상품 생성 요청: {}", "Command", cmd.title);
    if cmd.starting_price <= 0 {
        return Err(CommandError::Rejected(RejectReason::InvalidAmount));
    }
    let item = store
        .create_item(NewItem {
            title: cmd.title,
            description: cmd.description,
            image_url: cmd.image_url,
            starting_price: cmd.starting_price,
        })
        .await?;
    Ok(item)
}

/// 3. 상품 수정
pub async fn handle_update_item(
    store: &SharedStore,
    item_id: i64,
    cmd: UpdateItemCommand,
) -> Result<Item, CommandError> {
    info!("{:<12} --> 상품 수정 요청 id: {}", "Command", item_id);
    let item = store
        .update_item(
            item_id,
            ItemPatch {
                title: cmd.title,
                description: cmd.description,
                image_url: cmd.image_url,
            },
        )
        .await?;
    Ok(item)
}

/// 4. 상품 삭제 (입찰 연쇄 삭제 포함)
///
/// 상품 행을 먼저 제거해 삭제를 확정한 뒤 원장을 비운다.
/// 삭제와 경합한 입찰은 상품 조회에서 ITEM_NOT_FOUND로 끝난다.
pub async fn handle_delete_item(store: &SharedStore, item_id: i64) -> Result<(), CommandError> {
    info!("{:<12} --> 상품 삭제 요청 id: {}", "Command", item_id);
    store.delete_item(item_id).await?;
    store.delete_bids_for(item_id).await?;
    info!("{:<12} --> 상품 및 입찰 삭제 완료 id: {}", "Command", item_id);
    Ok(())
}

// endregion: --- Item Commands
