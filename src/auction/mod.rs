/// 경매 수명주기 처리
/// 1. 경매 종료 및 낙찰자 확정
/// 2. 낙찰자 알림
// region:    --- Imports
use crate::bidding::commands::CommandError;
use crate::bidding::model::{Bid, Item};
use crate::notification::SharedNotifier;
use crate::store::{ItemStore, LedgerStore, SharedStore};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// endregion: --- Imports

// region:    --- Lifecycle

/// 낙찰자 정보
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WinnerInfo {
    pub bidder_id: String,
    pub bidder_name: String,
    pub amount: i64,
}

impl From<Bid> for WinnerInfo {
    fn from(bid: Bid) -> Self {
        Self {
            bidder_id: bid.bidder_id,
            bidder_name: bid.bidder_name,
            amount: bid.amount,
        }
    }
}

/// 경매 종료 결과
#[derive(Debug, Clone, Serialize)]
pub struct CloseOutcome {
    pub item: Item,
    pub winner: Option<WinnerInfo>,
}

/// 1. 경매 종료
///
/// 종료 플래그는 무조건 설정한다. 이미 종료된 경매를 다시 종료해도
/// 오류가 아니며 낙찰자도 달라지지 않는다. 입찰이 없으면 낙찰자 없이 종료된다.
pub async fn handle_close_auction(
    store: &SharedStore,
    item_id: i64,
) -> Result<CloseOutcome, CommandError> {
    info!("{:<12} --> 경매 종료 요청 id: {}", "Lifecycle", item_id);

    let item = store.close_item(item_id).await?;
    let winner = store.top_bid_for(item_id).await?.map(WinnerInfo::from);

    match &winner {
        Some(w) => info!(
            "{:<12} --> 경매 종료: item_id={}, 낙찰자={}, 금액={}",
            "Lifecycle", item_id, w.bidder_name, w.amount
        ),
        None => info!(
            "{:<12} --> 경매 종료: item_id={}, 입찰 없음",
            "Lifecycle", item_id
        ),
    }

    Ok(CloseOutcome { item, winner })
}

/// 2. 낙찰자 알림
///
/// 현재 최고 입찰자를 알림 콜라보레이터에 보고한다. 알림 실패는
/// 기록만 남기고 호출 결과에는 영향을 주지 않는다.
pub async fn handle_notify_winner(
    store: &SharedStore,
    notifier: &SharedNotifier,
    item_id: i64,
) -> Result<WinnerInfo, CommandError> {
    info!("{:<12} --> 낙찰자 알림 요청 id: {}", "Lifecycle", item_id);

    store.get_item(item_id).await?;
    let winner: WinnerInfo = store
        .top_bid_for(item_id)
        .await?
        .map(WinnerInfo::from)
        .ok_or(CommandError::NoBids)?;

    if let Err(e) = notifier
        .notify(&winner.bidder_name, item_id, winner.amount)
        .await
    {
        warn!("{:<12} --> 낙찰자 알림 실패: {:?}", "Lifecycle", e);
    }

    Ok(winner)
}

// endregion: --- Lifecycle
