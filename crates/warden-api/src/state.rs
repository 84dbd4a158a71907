//! 모든 핸들러에서 공유되는 애플리케이션 상태.
//!
//! AppState는 가드 미들웨어와 API 핸들러에서 공유되는 상태를 관리합니다.
//! Arc로 래핑되어 여러 요청 간에 안전하게 공유되며, 요청 간에 변경되는
//! 가변 상태는 없습니다.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use warden_core::AuthConfig;

use crate::auth::{TokenIssuer, TokenVerifier};
use crate::guards::{GuardPipeline, RouteRegistry};
use crate::repository::UserLookup;
use crate::services::AuthService;

/// 애플리케이션 공유 상태.
#[derive(Clone)]
pub struct AppState {
    /// 라우트 메타데이터 (서버 시작 시 고정)
    pub registry: Arc<RouteRegistry>,

    /// 인증 → 인가 가드 파이프라인
    pub pipeline: GuardPipeline,

    /// 로그인 서비스
    pub auth_service: AuthService,

    /// 서버 시작 시간
    pub started_at: DateTime<Utc>,

    /// 애플리케이션 버전
    pub version: String,
}

impl AppState {
    /// 인증 설정, 사용자 저장소, 라우트 레지스트리로 상태 생성.
    pub fn new(auth: &AuthConfig, users: Arc<dyn UserLookup>, registry: RouteRegistry) -> Self {
        let verifier = TokenVerifier::from_config(auth);
        let issuer = TokenIssuer::from_config(auth);

        Self {
            registry: Arc::new(registry),
            pipeline: GuardPipeline::new(verifier, users.clone()),
            auth_service: AuthService::new(users, issuer),
            started_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// 서버 가동 시간 (초).
    pub fn uptime_secs(&self) -> i64 {
        (Utc::now() - self.started_at).num_seconds()
    }
}
