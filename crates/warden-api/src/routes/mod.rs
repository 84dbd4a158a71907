//! API 라우트.
//!
//! 모든 REST API 엔드포인트와 각 엔드포인트의 가드 메타데이터를 정의합니다.
//! 라우터와 메타데이터는 같은 모듈에서 함께 선언하여 경로가 어긋나지 않게
//! 합니다.
//!
//! # 라우트 구조
//!
//! - `/health` - 헬스 체크 (공개)
//! - `/auth/login` - 로그인 (공개)
//! - `/public/*` - 공개/보호 혼합 예시
//! - `/users/*` - 사용자 엔드포인트
//! - `/admin/*` - 관리자 그룹 (그룹 수준 admin 요구)

pub mod admin;
pub mod auth;
pub mod health;
pub mod public;
pub mod users;

pub use admin::{admin_metadata, admin_router};
pub use auth::{auth_metadata, auth_router, LoginRequest};
pub use health::{health_check, health_metadata, HealthResponse};
pub use public::{public_metadata, public_router};
pub use users::{users_metadata, users_router};

use axum::{middleware, routing::get, Router};
use std::sync::Arc;

use crate::guards::{guard_middleware, RouteRegistry};
use crate::state::AppState;

/// 전체 라우트 메타데이터 레지스트리.
pub fn route_registry() -> RouteRegistry {
    health_metadata()
        .merge(auth_metadata())
        .merge(public_metadata())
        .merge(users_metadata())
        .merge(admin_metadata())
}

/// 전체 API 라우터 생성.
///
/// 모든 서브 라우터를 조합한 뒤 가드 미들웨어를 `route_layer`로 적용합니다.
/// 매칭되지 않는 경로는 가드를 거치지 않고 404를 반환합니다.
pub fn create_api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_router())
        .nest("/public", public_router())
        .nest("/users", users_router())
        .nest("/admin", admin_router())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard_middleware,
        ))
        .with_state(state)
}
