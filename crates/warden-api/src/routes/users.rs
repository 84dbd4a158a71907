//! 사용자 endpoint.
//!
//! - GET    /users/profile          인증 필요
//! - GET    /users/admin-only       admin
//! - GET    /users/moderator-admin  admin 또는 moderator
//! - DELETE /users/{id}             admin

use axum::{
    extract::Path,
    http::Method,
    response::IntoResponse,
    routing::{delete, get},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

use crate::auth::Role;
use crate::guards::{AuthorizedUser, CurrentUser, RouteMetadata, RouteRegistry};
use crate::state::AppState;

/// GET /users/profile
pub async fn profile(user: CurrentUser) -> impl IntoResponse {
    Json(user)
}

/// GET /users/admin-only
pub async fn admin_only(authorized: AuthorizedUser) -> impl IntoResponse {
    Json(json!({
        "message": "This endpoint is only accessible to administrators",
        "user": authorized.user,
    }))
}

/// GET /users/moderator-admin
pub async fn moderator_or_admin(authorized: AuthorizedUser) -> impl IntoResponse {
    Json(json!({
        "message": "This endpoint is accessible to moderators and administrators",
        "user": authorized.user,
        "role": authorized.role,
    }))
}

/// DELETE /users/{id}
pub async fn delete_user(Path(id): Path<String>, authorized: AuthorizedUser) -> impl IntoResponse {
    Json(json!({
        "message": format!("User {id} deleted by {}", authorized.user.username),
        "deletedBy": authorized.user,
    }))
}

/// 사용자 라우터 생성.
pub fn users_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/profile", get(profile))
        .route("/admin-only", get(admin_only))
        .route("/moderator-admin", get(moderator_or_admin))
        .route("/{id}", delete(delete_user))
}

/// 사용자 라우트 메타데이터.
pub fn users_metadata() -> RouteRegistry {
    RouteRegistry::new()
        .route(Method::GET, "/users/profile", RouteMetadata::new())
        .route(
            Method::GET,
            "/users/admin-only",
            RouteMetadata::new().roles([Role::Admin]),
        )
        .route(
            Method::GET,
            "/users/moderator-admin",
            RouteMetadata::new().roles([Role::Admin, Role::Moderator]),
        )
        .route(
            Method::DELETE,
            "/users/{id}",
            RouteMetadata::new().roles([Role::Admin]),
        )
}
