//! 공개/보호 혼합 endpoint.
//!
//! 같은 그룹 안에서 공개 라우트, 인증만 필요한 라우트, 역할이 필요한
//! 라우트가 섞여 있는 예시입니다.
//!
//! - GET  /public/info        공개
//! - GET  /public/protected   인증 필요
//! - GET  /public/admin-info  admin
//! - POST /public/moderate    admin 또는 moderator

use axum::{
    http::Method,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth::Role;
use crate::guards::{AuthorizedUser, CurrentUser, RouteMetadata, RouteRegistry};
use crate::state::AppState;

/// GET /public/info
pub async fn public_info() -> impl IntoResponse {
    Json(json!({
        "message": "This information is public",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// GET /public/protected
pub async fn protected_info(user: CurrentUser) -> impl IntoResponse {
    Json(json!({
        "message": "This information requires authentication",
        "user": user.username,
    }))
}

/// GET /public/admin-info
pub async fn admin_info(authorized: AuthorizedUser) -> impl IntoResponse {
    Json(json!({
        "message": "This information is for administrators only",
        "admin": authorized.user.username,
    }))
}

/// POST /public/moderate
pub async fn moderate(authorized: AuthorizedUser, Json(content): Json<Value>) -> impl IntoResponse {
    Json(json!({
        "message": "Content moderated",
        "content": content,
        "moderatedBy": authorized.user.username,
        "role": authorized.role,
    }))
}

/// 공개 그룹 라우터 생성.
pub fn public_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/info", get(public_info))
        .route("/protected", get(protected_info))
        .route("/admin-info", get(admin_info))
        .route("/moderate", post(moderate))
}

/// 공개 그룹 라우트 메타데이터.
pub fn public_metadata() -> RouteRegistry {
    RouteRegistry::new()
        .route(Method::GET, "/public/info", RouteMetadata::new().public())
        .route(Method::GET, "/public/protected", RouteMetadata::new())
        .route(
            Method::GET,
            "/public/admin-info",
            RouteMetadata::new().roles([Role::Admin]),
        )
        .route(
            Method::POST,
            "/public/moderate",
            RouteMetadata::new().roles([Role::Admin, Role::Moderator]),
        )
}
