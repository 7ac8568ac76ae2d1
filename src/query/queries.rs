/// 상품 생성 (현재 가격은 시작 가격으로 초기화)
pub const CREATE_ITEM: &str = r#"
    INSERT INTO items (title, description, image_url, starting_price, current_price, is_closed, created_at)
    VALUES ($1, $2, $3, $4, $4, FALSE, $5)
    RETURNING id, title, description, image_url, starting_price, current_price, is_closed, created_at
"#;

/// 상품 조회
pub const GET_ITEM: &str =
    "SELECT id, title, description, image_url, starting_price, current_price, is_closed, created_at FROM items WHERE id = $1";

/// 모든 상품 조회
pub const GET_ALL_ITEMS: &str =
    "SELECT id, title, description, image_url, starting_price, current_price, is_closed, created_at FROM items ORDER BY created_at DESC, id DESC";

/// 상품 수정 (서술 필드만)
pub const UPDATE_ITEM: &str = r#"
    UPDATE items
    SET title = COALESCE($1, title),
        description = COALESCE($2, description),
        image_url = COALESCE($3, image_url)
    WHERE id = $4
    RETURNING id, title, description, image_url, starting_price, current_price, is_closed, created_at
"#;

/// 상품 삭제
pub const DELETE_ITEM: &str = "DELETE FROM items WHERE id = $1 RETURNING id";

/// 경매 종료 (재호출해도 동일한 결과)
pub const CLOSE_ITEM: &str = r#"
    UPDATE items
    SET is_closed = TRUE
    WHERE id = $1
    RETURNING id, title, description, image_url, starting_price, current_price, is_closed, created_at
"#;

/// 현재 가격 조건부 갱신
/// 금액이 현재 가격보다 큰 열린 경매에만 적용된다. 실패는 동시 쓰기 충돌 신호다.
pub const ADVANCE_CURRENT_PRICE: &str = r#"
    UPDATE items
    SET current_price = $1
    WHERE id = $2 AND is_closed = FALSE AND current_price < $1
    RETURNING id
"#;

/// 입찰 기록 추가
pub const INSERT_BID: &str = r#"
    INSERT INTO bids (item_id, bidder_id, bidder_name, amount, created_at)
    VALUES ($1, $2, $3, $4, $5)
    RETURNING id, item_id, bidder_id, bidder_name, amount, created_at
"#;

/// 최고 입찰 금액 조회
pub const GET_HIGHEST_BID: &str =
    "SELECT MAX(amount) as highest_bid FROM bids WHERE item_id = $1";

/// 최고 입찰 조회 (동점이면 가장 먼저 기록된 입찰)
pub const GET_TOP_BID: &str = r#"
    SELECT id, item_id, bidder_id, bidder_name, amount, created_at
    FROM bids
    WHERE item_id = $1
    ORDER BY amount DESC, created_at ASC, id ASC
    LIMIT 1
"#;

/// 상품 입찰 이력 조회, 금액 내림차순
pub const GET_BID_HISTORY: &str = r#"
    SELECT id, item_id, bidder_id, bidder_name, amount, created_at
    FROM bids
    WHERE item_id = $1
    ORDER BY amount DESC, created_at ASC, id ASC
"#;

/// 전체 입찰 조회
pub const GET_ALL_BIDS: &str = r#"
    SELECT id, item_id, bidder_id, bidder_name, amount, created_at
    FROM bids
    ORDER BY created_at DESC, id DESC
"#;

/// 상품 입찰 전체 삭제
pub const DELETE_ITEM_BIDS: &str = "DELETE FROM bids WHERE item_id = $1";
