//! 관리자 endpoint.
//!
//! `admin` 그룹 전체에 admin 역할이 요구되며, 개별 핸들러가 이를
//! 재정의할 수 있습니다.
//!
//! - GET /admin/dashboard  그룹 설정 상속 (admin)
//! - GET /admin/users      그룹 설정 상속 + 커스텀 403 메시지
//! - GET /admin/reports    admin 또는 moderator
//! - GET /admin/status     공개

use axum::{http::Method, response::IntoResponse, routing::get, Json, Router};
use serde_json::json;
use std::sync::Arc;

use crate::auth::Role;
use crate::guards::{
    AuthorizedUser, CustomErrorMessages, RouteMetadata, RouteRegistry,
};
use crate::state::AppState;

const GROUP: &str = "admin";

/// GET /admin/dashboard
pub async fn dashboard(authorized: AuthorizedUser) -> impl IntoResponse {
    Json(json!({
        "message": "Admin dashboard",
        "user": authorized.user.username,
    }))
}

/// GET /admin/users
pub async fn list_users(authorized: AuthorizedUser) -> impl IntoResponse {
    Json(json!({
        "message": "User list - administrators only",
        "admin": authorized.user.username,
    }))
}

/// GET /admin/reports
pub async fn reports(authorized: AuthorizedUser) -> impl IntoResponse {
    Json(json!({
        "message": "Reports - administrators and moderators",
        "user": authorized.user.username,
        "role": authorized.role,
    }))
}

/// GET /admin/status
pub async fn status() -> impl IntoResponse {
    Json(json!({ "status": "operational" }))
}

/// 관리자 라우터 생성.
pub fn admin_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/users", get(list_users))
        .route("/reports", get(reports))
        .route("/status", get(status))
}

/// 관리자 라우트 메타데이터.
pub fn admin_metadata() -> RouteRegistry {
    RouteRegistry::new()
        .group(GROUP, RouteMetadata::new().roles([Role::Admin]))
        .grouped_route(GROUP, Method::GET, "/admin/dashboard", RouteMetadata::new())
        .grouped_route(
            GROUP,
            Method::GET,
            "/admin/users",
            RouteMetadata::new().custom_errors(
                CustomErrorMessages::new()
                    .forbidden("Only administrators can access the user list")
                    .suggestion("Contact the system administrator to obtain admin permissions")
                    .suggestion("Verify that your account has the correct role assigned"),
            ),
        )
        .grouped_route(
            GROUP,
            Method::GET,
            "/admin/reports",
            RouteMetadata::new().roles([Role::Admin, Role::Moderator]),
        )
        .grouped_route(GROUP, Method::GET, "/admin/status", RouteMetadata::new().public())
}
