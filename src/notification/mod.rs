/// 낙찰자 알림 콜라보레이터
/// 실제 이메일 연동 대신 로그 한 줄로 전송을 모의한다.
// region:    --- Imports
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

// endregion: --- Imports

// region:    --- Notifier

/// 알림 전송 오류
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("알림 전송 실패: {0}")]
    Failed(String),
}

/// 알림 콜라보레이터 트레이트
#[async_trait]
pub trait Notifier {
    async fn notify(&self, bidder_name: &str, item_id: i64, amount: i64)
        -> Result<(), NotifyError>;
}

pub type SharedNotifier = Arc<dyn Notifier + Send + Sync>;

/// 로그 알림 구현체
/// 실제 이메일 서비스(SendGrid 등) 연동 자리에 로그로 대체한다.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        bidder_name: &str,
        item_id: i64,
        amount: i64,
    ) -> Result<(), NotifyError> {
        info!(
            "{:<12} --> 모의 이메일: {}님 축하합니다! 상품 {}을(를) {}원에 낙찰받았습니다.",
            "Notify", bidder_name, item_id, amount
        );
        Ok(())
    }
}

// endregion: --- Notifier
