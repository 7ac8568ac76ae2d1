// region:    --- Imports
use crate::auction;
use crate::bidding::commands::{
    self, CommandError, CreateItemCommand, PlaceBidCommand, UpdateItemCommand,
};
use crate::bidding::model::{Identity, Role};
use crate::bidding::validator::RejectReason;
use crate::notification::SharedNotifier;
use crate::query;
use crate::store::SharedStore;
use axum::async_trait;
use axum::extract::{FromRequestParts, Path, State};
use axum::http::request::Parts;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

// endregion: --- Imports

pub type AppState = (SharedStore, SharedNotifier);

// region:    --- Router

/// 라우터 설정
pub fn routes(store: SharedStore, notifier: SharedNotifier) -> Router {
    // 폴링 기반 클라이언트를 위한 cors 설정
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_health))
        .route("/items", get(handle_get_items).post(handle_create_item))
        .route(
            "/items/:id",
            get(handle_get_item)
                .put(handle_update_item)
                .delete(handle_delete_item),
        )
        .route("/items/:id/bids", post(handle_bid))
        .route("/items/:id/highest-bid", get(handle_get_highest_bid))
        .route("/items/:id/close", post(handle_close_auction))
        .route("/items/:id/notify-winner", post(handle_notify_winner))
        .route("/bids", get(handle_get_bids))
        .layer(cors)
        .with_state((store, notifier))
}

// endregion: --- Router

// region:    --- Identity

/// 게이트웨이가 검증해 전달한 신원 헤더를 읽는다.
/// 요청 본문의 신원 필드는 신뢰하지 않는다.
#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = header_value(parts, "x-user-id");
        let user_name = header_value(parts, "x-user-name");

        match (user_id, user_name) {
            (Some(user_id), Some(user_name)) if !user_id.is_empty() => {
                let role = match header_value(parts, "x-user-role").as_deref() {
                    Some("admin") => Role::Admin,
                    _ => Role::Bidder,
                };
                Ok(Identity {
                    user_id,
                    user_name,
                    role,
                })
            }
            _ => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({
                    "error": "인증 정보가 없습니다.",
                    "code": "UNAUTHORIZED"
                })),
            )
                .into_response()),
        }
    }
}

fn header_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

/// 관리자 전용 요청 검사
fn require_admin(identity: &Identity) -> Result<(), Response> {
    if identity.is_admin() {
        return Ok(());
    }
    Err((
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "관리자 권한이 필요합니다.",
            "code": "FORBIDDEN"
        })),
    )
        .into_response())
}

// endregion: --- Identity

// region:    --- Error Mapping

/// 커맨드 오류를 상태 코드 + 기계 판독 코드로 변환
fn error_response(err: CommandError) -> Response {
    let status = match &err {
        CommandError::NotFound => StatusCode::NOT_FOUND,
        CommandError::Rejected(_) | CommandError::NoBids => StatusCode::BAD_REQUEST,
        CommandError::Conflict => StatusCode::CONFLICT,
        CommandError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let mut body = json!({
        "error": err.to_string(),
        "code": err.code(),
    });
    if let CommandError::Rejected(RejectReason::BidTooLow { current_top }) = &err {
        body["current_top"] = json!(current_top);
    }

    (status, Json(body)).into_response()
}

// endregion: --- Error Mapping

// region:    --- Command Handlers

/// 입찰 요청 처리
async fn handle_bid(
    State((store, _)): State<AppState>,
    Path(item_id): Path<i64>,
    identity: Identity,
    Json(cmd): Json<PlaceBidCommand>,
) -> Response {
    match commands::handle_place_bid(&store, &identity, item_id, cmd).await {
        Ok(bid) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "입찰이 성공적으로 처리되었습니다.",
                "current_price": bid.amount,
                "bid": bid
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// 상품 생성 요청 처리
async fn handle_create_item(
    State((store, _)): State<AppState>,
    identity: Identity,
    Json(cmd): Json<CreateItemCommand>,
) -> Response {
    if let Err(resp) = require_admin(&identity) {
        return resp;
    }
    match commands::handle_create_item(&store, cmd).await {
        Ok(item) => (
            StatusCode::CREATED,
            Json(json!({
                "message": "상품이 등록되었습니다.",
                "item": item
            })),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// 상품 수정 요청 처리
async fn handle_update_item(
    State((store, _)): State<AppState>,
    Path(item_id): Path<i64>,
    identity: Identity,
    Json(cmd): Json<UpdateItemCommand>,
) -> Response {
    if let Err(resp) = require_admin(&identity) {
        return resp;
    }
    match commands::handle_update_item(&store, item_id, cmd).await {
        Ok(item) => Json(json!({
            "message": "상품이 수정되었습니다.",
            "item": item
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// 상품 삭제 요청 처리 (입찰 연쇄 삭제 포함)
async fn handle_delete_item(
    State((store, _)): State<AppState>,
    Path(item_id): Path<i64>,
    identity: Identity,
) -> Response {
    if let Err(resp) = require_admin(&identity) {
        return resp;
    }
    match commands::handle_delete_item(&store, item_id).await {
        Ok(()) => Json(json!({
            "message": "상품과 관련 입찰이 삭제되었습니다."
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// 경매 종료 요청 처리
async fn handle_close_auction(
    State((store, _)): State<AppState>,
    Path(item_id): Path<i64>,
    identity: Identity,
) -> Response {
    if let Err(resp) = require_admin(&identity) {
        return resp;
    }
    match auction::handle_close_auction(&store, item_id).await {
        Ok(outcome) => Json(json!({
            "message": "경매가 종료되었습니다.",
            "item": outcome.item,
            "winner": outcome.winner
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

/// 낙찰자 알림 요청 처리
async fn handle_notify_winner(
    State((store, notifier)): State<AppState>,
    Path(item_id): Path<i64>,
    identity: Identity,
) -> Response {
    if let Err(resp) = require_admin(&identity) {
        return resp;
    }
    match auction::handle_notify_winner(&store, &notifier, item_id).await {
        Ok(winner) => Json(json!({
            "message": "낙찰자에게 알림을 전송했습니다. (모의)",
            "winner": winner
        }))
        .into_response(),
        Err(e) => error_response(e),
    }
}

// endregion: --- Command Handlers

// region:    --- Query Handlers

/// 헬스 체크
async fn handle_health() -> &'static str {
    "Silent Auction API is running"
}

/// 모든 상품 조회
async fn handle_get_items(State((store, _)): State<AppState>) -> Response {
    info!("{:<12} --> 모든 상품 조회", "HandlerQuery");
    match query::handlers::list_items(&store).await {
        Ok(items) => Json(items).into_response(),
        Err(e) => error_response(e),
    }
}

/// 상품 상세 조회
async fn handle_get_item(State((store, _)): State<AppState>, Path(item_id): Path<i64>) -> Response {
    info!("{:<12} --> 상품 상세 조회 id: {}", "HandlerQuery", item_id);
    match query::handlers::get_item_detail(&store, item_id).await {
        Ok(detail) => Json(detail).into_response(),
        Err(e) => error_response(e),
    }
}

/// 최고 입찰가 조회
async fn handle_get_highest_bid(
    State((store, _)): State<AppState>,
    Path(item_id): Path<i64>,
) -> Response {
    info!(
        "{:<12} --> 최고 입찰가 조회 id: {}",
        "HandlerQuery", item_id
    );
    match query::handlers::get_highest_bid(&store, item_id).await {
        Ok(highest) => Json(json!({ "highest_bid": highest })).into_response(),
        Err(e) => error_response(e),
    }
}

/// 전체 입찰 조회
async fn handle_get_bids(State((store, _)): State<AppState>) -> Response {
    info!("{:<12} --> 전체 입찰 조회", "HandlerQuery");
    match query::handlers::list_bids(&store).await {
        Ok(bids) => Json(bids).into_response(),
        Err(e) => error_response(e),
    }
}

// endregion: --- Query Handlers
