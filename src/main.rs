// region:    --- Imports
use silent_auction_service::database::DatabaseManager;
use silent_auction_service::handlers;
use silent_auction_service::notification::{LogNotifier, SharedNotifier};
use silent_auction_service::store::postgres::PostgresStore;
use silent_auction_service::store::SharedStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging 초기화
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    // DatabaseManager 생성
    let db_manager = Arc::new(DatabaseManager::new().await);

    // 데이터베이스 초기화
    if let Err(e) = db_manager.initialize_database().await {
        error!("{:<12} --> 데이터베이스 초기화 실패: {:?}", "Main", e);
        return Err(e.into());
    }
    info!("{:<12} --> 데이터베이스 초기화 성공", "Main");

    // 저장소 및 알림 콜라보레이터 생성
    let store: SharedStore = Arc::new(PostgresStore::new(Arc::clone(&db_manager)));
    let notifier: SharedNotifier = Arc::new(LogNotifier);

    // 라우터 설정
    let routes_all = handlers::routes(store, notifier);

    // 리스너 생성
    let addr = std::env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    // 서버 실행
    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
