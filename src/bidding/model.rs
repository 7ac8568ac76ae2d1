use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// 상품 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub starting_price: i64,
    pub current_price: i64,
    pub is_closed: bool,
    pub created_at: DateTime<Utc>,
}

// 입찰 모델
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bid {
    pub id: i64,
    pub item_id: i64,
    pub bidder_id: String,
    pub bidder_name: String,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
}

/// 요청자 신원
/// 검증된 게이트웨이가 전달한 값으로, 요청 본문은 신뢰하지 않는다.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub user_name: String,
    pub role: Role,
}

/// 요청자 역할
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Bidder,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
