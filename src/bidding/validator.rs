/// 입찰 유효성 검증
/// 저장소에 의존하지 않는 순수 함수만 둔다.
use crate::bidding::model::Item;
use thiserror::Error;

/// 입찰 거절 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("이미 종료된 경매입니다.")]
    AuctionClosed,
    #[error("입찰 금액이 현재 최고 입찰가보다 낮거나 같습니다.")]
    BidTooLow { current_top: i64 },
    #[error("입찰 금액이 올바르지 않습니다.")]
    InvalidAmount,
}

/// 입찰 수락/거절 판정
/// current_top은 해당 상품의 최고 입찰가(입찰이 없으면 시작 가격)이다.
/// 동점 입찰은 거절한다. 금액은 현재 최고가보다 엄격하게 커야 한다.
pub fn validate(item: &Item, current_top: i64, amount: i64) -> Result<(), RejectReason> {
    if item.is_closed {
        return Err(RejectReason::AuctionClosed);
    }
    if amount <= current_top {
        return Err(RejectReason::BidTooLow { current_top });
    }
    if amount <= 0 {
        return Err(RejectReason::InvalidAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_item(current_price: i64, is_closed: bool) -> Item {
        Item {
            id: 1,
            title: "검증 테스트 상품".to_string(),
            description: "검증 테스트를 위한 상품입니다.".to_string(),
            image_url: "http://example.com/item.jpg".to_string(),
            starting_price: 10,
            current_price,
            is_closed,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn accepts_strictly_greater_amount() {
        let item = test_item(10, false);
        assert_eq!(validate(&item, 10, 11), Ok(()));
        assert_eq!(validate(&item, 10, 1_000_000), Ok(()));
    }

    #[test]
    fn rejects_tie_as_too_low() {
        let item = test_item(20, false);
        assert_eq!(
            validate(&item, 20, 20),
            Err(RejectReason::BidTooLow { current_top: 20 })
        );
    }

    #[test]
    fn rejects_lower_amount() {
        let item = test_item(20, false);
        assert_eq!(
            validate(&item, 20, 12),
            Err(RejectReason::BidTooLow { current_top: 20 })
        );
    }

    // 음수/0 입찰도 현재 최고가 이하이므로 BidTooLow로 거절된다.
    #[test]
    fn rejects_non_positive_amount_as_too_low() {
        let item = test_item(10, false);
        assert_eq!(
            validate(&item, 10, 0),
            Err(RejectReason::BidTooLow { current_top: 10 })
        );
        assert_eq!(
            validate(&item, 10, -5),
            Err(RejectReason::BidTooLow { current_top: 10 })
        );
    }

    #[test]
    fn rejects_non_positive_amount_even_with_degenerate_top() {
        let item = test_item(0, false);
        assert_eq!(validate(&item, -10, 0), Err(RejectReason::InvalidAmount));
    }

    // 종료된 경매는 금액과 무관하게 거절된다.
    #[test]
    fn rejects_closed_auction_before_anything_else() {
        let item = test_item(10, true);
        assert_eq!(validate(&item, 10, 100), Err(RejectReason::AuctionClosed));
        assert_eq!(validate(&item, 10, 5), Err(RejectReason::AuctionClosed));
    }
}
