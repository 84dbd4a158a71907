//! 로그인 endpoint.
//!
//! POST /auth/login

use axum::{
    extract::{rejection::JsonRejection, OriginalUri, State},
    http::{Method, StatusCode},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::auth::IssuedToken;
use crate::error::{ApiErrorResponse, ApiResult};
use crate::guards::{RouteMetadata, RouteRegistry};
use crate::services::AuthServiceError;
use crate::state::AppState;

/// 로그인 요청
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    method: Method,
    OriginalUri(uri): OriginalUri,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<IssuedToken>> {
    let Json(request) = payload.map_err(|rejection| {
        (
            rejection.status(),
            Json(
                ApiErrorResponse::new("INVALID_REQUEST", rejection.body_text())
                    .with_request_info(&method, &uri),
            ),
        )
    })?;

    match state.auth_service.login(&request.email, &request.password).await {
        Ok(token) => Ok(Json(token)),
        Err(AuthServiceError::InvalidCredentials) => Err((
            StatusCode::UNAUTHORIZED,
            Json(
                ApiErrorResponse::new("INVALID_CREDENTIALS", "Invalid email or password")
                    .with_request_info(&method, &uri),
            ),
        )),
        Err(AuthServiceError::Store(e)) => {
            error!(error = %e, "Login failed: user store unavailable");
            Err((
                StatusCode::SERVICE_UNAVAILABLE,
                Json(
                    ApiErrorResponse::new("USER_STORE_UNAVAILABLE", "Please try again later")
                        .with_request_info(&method, &uri),
                ),
            ))
        }
        Err(AuthServiceError::Token(e)) => {
            error!(error = %e, "Login failed: token issuance");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(
                    ApiErrorResponse::new("TOKEN_ISSUE_FAILED", "Could not issue token")
                        .with_request_info(&method, &uri),
                ),
            ))
        }
    }
}

/// 인증 라우터 생성.
pub fn auth_router() -> Router<Arc<AppState>> {
    Router::new().route("/login", post(login))
}

/// 인증 라우트 메타데이터.
pub fn auth_metadata() -> RouteRegistry {
    RouteRegistry::new().route(Method::POST, "/auth/login", RouteMetadata::new().public())
}
