//! 사용자 API 서버.
//!
//! 설정을 로드하고 사용자 저장소를 연결한 뒤, 가드가 적용된 Axum 서버를
//! 시작합니다.

use std::sync::Arc;
use std::time::Duration;

use axum::{http::StatusCode, Router};
use sqlx::postgres::PgPoolOptions;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use warden_api::repository::{InMemoryUserStore, PgUserRepository, UserLookup};
use warden_api::routes::{create_api_router, route_registry};
use warden_api::state::AppState;
use warden_core::{init_logging, AppConfig, LogConfig, ServerConfig};

/// 설정에 따라 사용자 저장소 생성.
///
/// `database.url`이 있으면 PostgreSQL, 없으면 시드 사용자로 채운 메모리 저장소.
async fn create_user_store(
    config: &AppConfig,
) -> Result<Arc<dyn UserLookup>, Box<dyn std::error::Error>> {
    match &config.database.url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
                .connect(url)
                .await
                .map_err(|e| {
                    error!(error = %e, "Failed to connect to database");
                    e
                })?;

            sqlx::query("SELECT 1").fetch_one(&pool).await?;
            info!("Connected to PostgreSQL user store");

            Ok(Arc::new(PgUserRepository::new(pool)))
        }
        None => {
            let store = InMemoryUserStore::from_seed(&config.users)?;
            warn!(
                users = store.len().await,
                "DATABASE_URL not set, using in-memory user store"
            );
            Ok(Arc::new(store))
        }
    }
}

/// 전체 라우터 생성.
fn create_router(state: Arc<AppState>, server: &ServerConfig) -> Router {
    create_api_router(state)
        .layer(TraceLayer::new_for_http())
        // 전역 타임아웃 - 408 상태 코드 반환
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(server.request_timeout_secs),
        ))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let config = AppConfig::load_default()?;

    init_logging(LogConfig::from_settings(&config.logging))?;

    info!("Starting Warden API server...");

    if config.auth.is_default_secret() {
        warn!("JWT secret not set, using default (INSECURE for development only)");
    }

    let users = create_user_store(&config).await?;
    let registry = route_registry();
    info!(routes = registry.len(), "Route metadata registered");

    let state = Arc::new(AppState::new(&config.auth, users, registry));
    info!(version = %state.version, "Application state initialized");

    let app = create_router(state, &config.server);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(%addr, "API server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");

    Ok(())
}

/// Graceful shutdown 시그널 대기.
///
/// Ctrl+C 또는 SIGTERM 시그널을 수신하면 반환합니다.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            warn!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            warn!("Received SIGTERM, initiating graceful shutdown...");
        }
    }
}
