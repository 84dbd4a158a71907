//! 요청 가드.
//!
//! 요청마다 라우트 메타데이터를 조회하고, 인증 가드와 역할 가드를 고정된
//! 순서로 실행하여 핸들러 실행 여부를 결정합니다.
//!
//! # 구성 요소
//!
//! - [`RouteRegistry`]: 라우트별 공개 여부/요구 역할/커스텀 에러 메시지
//! - [`AuthDecisionGuard`]: 토큰 검증 및 호출자 기록
//! - [`RoleDecisionGuard`]: 저장소의 현재 역할 기반 인가
//! - [`GuardPipeline`]: 순서가 고정된 가드 목록과 디스패처
//! - [`guard_middleware`]: Axum 미들웨어
//!
//! # 사용 예시
//!
//! ```rust,ignore
//! let app = Router::new()
//!     .route("/users/profile", get(profile))
//!     .route_layer(middleware::from_fn_with_state(state.clone(), guard_middleware))
//!     .with_state(state);
//! ```

mod auth_guard;
mod context;
mod metadata;
mod middleware;
mod pipeline;
mod role_guard;

pub use auth_guard::{authenticate_header, AuthDecisionGuard};
pub use context::{extract_bearer, AuthorizedUser, CurrentUser, Decision, RequestContext};
pub use metadata::{
    CustomErrorMessages, ResolvedMetadata, RouteKey, RouteMetadata, RouteRegistry,
};
pub use middleware::guard_middleware;
pub use pipeline::{GuardPipeline, GuardStage};
pub use role_guard::RoleDecisionGuard;
