use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use silent_auction_service::handlers;
use silent_auction_service::notification::{LogNotifier, SharedNotifier};
use silent_auction_service::store::memory::InMemoryStore;
use std::sync::Arc;
use tokio::net::TcpListener;

/// 트레이싱 초기화
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .without_time()
        .with_target(false)
        .with_test_writer()
        .try_init();
}

/// 인메모리 저장소로 테스트 서버 기동
async fn spawn_test_server() -> String {
    init_tracing();
    let store = InMemoryStore::new_shared();
    let notifier: SharedNotifier = Arc::new(LogNotifier);
    let app = handlers::routes(store, notifier);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });
    format!("http://{}", addr)
}

/// 관리자 요청 빌더
fn as_admin(req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    req.header("x-user-id", "admin@auction.com")
        .header("x-user-name", "관리자")
        .header("x-user-role", "admin")
}

/// 입찰자 요청 빌더
fn as_bidder(req: reqwest::RequestBuilder, n: i64) -> reqwest::RequestBuilder {
    req.header("x-user-id", format!("bidder-{}@auction.com", n))
        .header("x-user-name", format!("입찰자{}", n))
}

/// 테스트용 상품 생성
async fn create_test_item(client: &Client, base: &str, title: &str, starting_price: i64) -> Value {
    let response = as_admin(client.post(format!("{}/items", base)))
        .json(&json!({
            "title": title,
            "description": format!("{} 테스트를 위한 상품입니다.", title),
            "image_url": "http://example.com/item.jpg",
            "starting_price": starting_price
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json::<Value>().await.unwrap()["item"].clone()
}

/// 헬스 체크 테스트
#[tokio::test]
async fn test_health_check() {
    let base = spawn_test_server().await;
    let body = Client::new()
        .get(format!("{}/", base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(body, "Silent Auction API is running");
}

/// 입찰 테스트
#[tokio::test]
async fn test_place_bid() {
    let base = spawn_test_server().await;
    let client = Client::new();
    let item = create_test_item(&client, &base, "입찰 테스트 아이템", 10000).await;
    let item_id = item["id"].as_i64().unwrap();

    // 시작 가격보다 높은 입찰은 수락된다.
    let response = as_bidder(
        client.post(format!("{}/items/{}/bids", base, item_id)),
        1,
    )
    .json(&json!({ "amount": 11000 }))
    .send()
    .await
    .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["bid"]["amount"], 11000);
    assert_eq!(body["current_price"], 11000);

    // 낮거나 같은 입찰은 BID_TOO_LOW로 거절된다.
    let response = as_bidder(
        client.post(format!("{}/items/{}/bids", base, item_id)),
        2,
    )
    .json(&json!({ "amount": 11000 }))
    .send()
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["code"], "BID_TOO_LOW");
    assert_eq!(body["current_top"], 11000);

    // 상세 조회에 입찰 이력이 반영된다.
    let detail = client
        .get(format!("{}/items/{}", base, item_id))
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    assert_eq!(detail["item"]["current_price"], 11000);
    assert_eq!(detail["bids"].as_array().unwrap().len(), 1);
}

/// 신원 헤더 없는 입찰 테스트
#[tokio::test]
async fn test_bid_without_identity_is_unauthorized() {
    let base = spawn_test_server().await;
    let client = Client::new();
    let item = create_test_item(&client, &base, "무인증 입찰", 1000).await;

    let response = client
        .post(format!("{}/items/{}/bids", base, item["id"].as_i64().unwrap()))
        .json(&json!({ "amount": 2000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["code"], "UNAUTHORIZED");
}

/// 관리자 권한 검사 테스트
#[tokio::test]
async fn test_admin_routes_reject_plain_bidders() {
    let base = spawn_test_server().await;
    let client = Client::new();

    let response = as_bidder(client.post(format!("{}/items", base)), 1)
        .json(&json!({
            "title": "권한 없는 상품",
            "description": "입찰자가 등록을 시도한 상품입니다.",
            "image_url": "http://example.com/item.jpg",
            "starting_price": 1000
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>().await.unwrap()["code"],
        "FORBIDDEN"
    );

    let item = create_test_item(&client, &base, "권한 검사", 1000).await;
    let response = as_bidder(
        client.post(format!(
            "{}/items/{}/close",
            base,
            item["id"].as_i64().unwrap()
        )),
        2,
    )
    .send()
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// 경매 종료 및 낙찰자 알림 테스트
#[tokio::test]
async fn test_close_and_notify_winner() {
    let base = spawn_test_server().await;
    let client = Client::new();
    let item = create_test_item(&client, &base, "경매 종료", 10000).await;
    let item_id = item["id"].as_i64().unwrap();

    as_bidder(client.post(format!("{}/items/{}/bids", base, item_id)), 1)
        .json(&json!({ "amount": 15000 }))
        .send()
        .await
        .unwrap();
    as_bidder(client.post(format!("{}/items/{}/bids", base, item_id)), 2)
        .json(&json!({ "amount": 20000 }))
        .send()
        .await
        .unwrap();

    // 경매 종료: 낙찰자는 최고 입찰자
    let response = as_admin(client.post(format!("{}/items/{}/close", base, item_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.unwrap();
    assert_eq!(body["item"]["is_closed"], true);
    assert_eq!(body["winner"]["amount"], 20000);
    assert_eq!(body["winner"]["bidder_name"], "입찰자2");

    // 종료 이후의 입찰은 AUCTION_CLOSED로 거절된다.
    let response = as_bidder(client.post(format!("{}/items/{}/bids", base, item_id)), 3)
        .json(&json!({ "amount": 30000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await.unwrap()["code"],
        "AUCTION_CLOSED"
    );

    // 재종료해도 낙찰자는 동일하다.
    let body = as_admin(client.post(format!("{}/items/{}/close", base, item_id)))
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    assert_eq!(body["winner"]["amount"], 20000);

    // 낙찰자 알림 (모의 이메일)
    let response = as_admin(client.post(format!(
        "{}/items/{}/notify-winner",
        base, item_id
    )))
    .send()
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>().await.unwrap()["winner"]["bidder_name"],
        "입찰자2"
    );
}

/// 입찰 없는 상품 알림 테스트
#[tokio::test]
async fn test_notify_winner_without_bids() {
    let base = spawn_test_server().await;
    let client = Client::new();
    let item = create_test_item(&client, &base, "입찰 없는 알림", 1000).await;

    let response = as_admin(client.post(format!(
        "{}/items/{}/notify-winner",
        base,
        item["id"].as_i64().unwrap()
    )))
    .send()
    .await
    .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>().await.unwrap()["code"], "NO_BIDS");
}

/// 상품 목록 조회 테스트
/// 입찰이 없는 상품은 시작 가격이 최고가로 노출된다.
#[tokio::test]
async fn test_list_items_with_top_bid_summary() {
    let base = spawn_test_server().await;
    let client = Client::new();
    let first = create_test_item(&client, &base, "목록 1", 1000).await;
    let second = create_test_item(&client, &base, "목록 2", 2000).await;

    as_bidder(
        client.post(format!(
            "{}/items/{}/bids",
            base,
            second["id"].as_i64().unwrap()
        )),
        5,
    )
    .json(&json!({ "amount": 2500 }))
    .send()
    .await
    .unwrap();

    let rows = client
        .get(format!("{}/items", base))
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 2);

    let unbid = rows
        .iter()
        .find(|r| r["id"] == first["id"])
        .expect("first item listed");
    assert_eq!(unbid["top_bid_amount"], 1000);
    assert!(unbid["top_bidder_name"].is_null());

    let bid_row = rows
        .iter()
        .find(|r| r["id"] == second["id"])
        .expect("second item listed");
    assert_eq!(bid_row["top_bid_amount"], 2500);
    assert_eq!(bid_row["top_bidder_name"], "입찰자5");
}

/// 상품 삭제 연쇄 테스트
#[tokio::test]
async fn test_delete_item_cascades_over_http() {
    let base = spawn_test_server().await;
    let client = Client::new();
    let item = create_test_item(&client, &base, "삭제 연쇄", 1000).await;
    let item_id = item["id"].as_i64().unwrap();

    for (n, amount) in [(1, 2000), (2, 3000), (3, 4000)] {
        as_bidder(client.post(format!("{}/items/{}/bids", base, item_id)), n)
            .json(&json!({ "amount": amount }))
            .send()
            .await
            .unwrap();
    }

    let response = as_admin(client.delete(format!("{}/items/{}", base, item_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // 목록에서 빠지고 상세 조회는 404
    let rows = client
        .get(format!("{}/items", base))
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    assert!(rows.as_array().unwrap().iter().all(|r| r["id"] != item_id));

    let response = client
        .get(format!("{}/items/{}", base, item_id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>().await.unwrap()["code"],
        "ITEM_NOT_FOUND"
    );

    // 원장에도 남지 않는다.
    let bids = client
        .get(format!("{}/bids", base))
        .send()
        .await
        .unwrap()
        .json::<Value>()
        .await
        .unwrap();
    assert!(bids
        .as_array()
        .unwrap()
        .iter()
        .all(|b| b["item_id"] != item_id));
}
