//! 사용자 API 서버와 인증/인가 가드.
//!
//! 이 크레이트는 다음을 제공합니다:
//! - JWT 발급 및 검증
//! - 라우트 메타데이터 기반 인증/역할 가드 파이프라인
//! - 안정적인 인증 에러 응답 형식
//! - Axum 기반 REST API
//!
//! # 모듈 구성
//!
//! - [`auth`]: JWT 및 역할 정의
//! - [`guards`]: 라우트 메타데이터, 가드, 파이프라인, 미들웨어
//! - [`error`]: 거부 사유와 에러 응답 변환
//! - [`repository`]: 사용자 저장소
//! - [`services`]: 로그인 서비스
//! - [`routes`]: REST API 엔드포인트
//! - [`state`]: 애플리케이션 공유 상태 (AppState)

pub mod auth;
pub mod error;
pub mod guards;
pub mod repository;
pub mod routes;
pub mod services;
pub mod state;

pub use auth::{Claims, Role, TokenIssuer, TokenVerifier, VerifyError};
pub use error::{ApiErrorResponse, ApiResult, AuthFailure, ErrorTranslator};
pub use guards::{
    guard_middleware, AuthorizedUser, CurrentUser, Decision, GuardPipeline, RouteRegistry,
};
pub use routes::{create_api_router, route_registry};
pub use state::AppState;
