//! 헬스 체크 endpoint.
//!
//! 로드밸런서나 오케스트레이션 시스템에서 사용하는 공개 엔드포인트입니다.

use axum::{extract::State, http::Method, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::guards::{RouteMetadata, RouteRegistry};
use crate::state::AppState;

/// 헬스 체크 응답 구조체.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// 서비스 상태
    pub status: String,

    /// API 버전
    pub version: String,

    /// 서버 업타임(초)
    pub uptime_secs: i64,

    /// 등록된 라우트 메타데이터 수
    pub guarded_routes: usize,

    /// 현재 시간 (ISO 8601)
    pub timestamp: String,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        uptime_secs: state.uptime_secs(),
        guarded_routes: state.registry.len(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// 헬스 체크 라우터 생성.
pub fn health_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(health_check))
}

/// 헬스 체크 라우트 메타데이터.
pub fn health_metadata() -> RouteRegistry {
    RouteRegistry::new().route(Method::GET, "/health", RouteMetadata::new().public())
}
