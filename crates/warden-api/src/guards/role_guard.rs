//! 역할 가드.
//!
//! 요구 역할이 선언된 라우트에서 토큰을 다시 검증하고, 저장소에서 읽은
//! 사용자의 현재 역할로 접근을 판정합니다. 토큰에 담긴 역할은 사용하지
//! 않으므로 역할 변경은 토큰 재발급 없이 즉시 반영됩니다.

use std::sync::Arc;

use tracing::error;

use super::auth_guard::authenticate_header;
use super::context::{Decision, RequestContext};
use crate::auth::TokenVerifier;
use crate::error::AuthFailure;
use crate::repository::UserLookup;

/// 역할 가드.
#[derive(Clone)]
pub struct RoleDecisionGuard {
    verifier: TokenVerifier,
    users: Arc<dyn UserLookup>,
}

impl RoleDecisionGuard {
    pub fn new(verifier: TokenVerifier, users: Arc<dyn UserLookup>) -> Self {
        Self { verifier, users }
    }

    /// 요청 허용 여부 판정.
    ///
    /// 사용자 조회가 유일한 대기 지점입니다.
    pub async fn check(&self, ctx: &mut RequestContext) -> Decision {
        if ctx.metadata.is_public {
            return Decision::Allowed;
        }
        let Some(required) = ctx.metadata.required_roles.clone() else {
            return Decision::Allowed;
        };

        let user = match authenticate_header(&self.verifier, ctx.authorization()) {
            Ok(user) => user,
            Err(failure) => return Decision::Denied(failure),
        };

        let record = match self.users.find_by_email(&user.username).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                return Decision::Denied(AuthFailure::UserNotFound {
                    username: user.username,
                })
            }
            Err(e) => {
                error!(username = %user.username, error = %e, "User lookup failed");
                return Decision::Denied(AuthFailure::UserLookupFailed(e.to_string()));
            }
        };

        if !record.role.is_any_of(&required) {
            return Decision::Denied(AuthFailure::InsufficientRole {
                required,
                actual: record.role,
            });
        }

        ctx.attach_authorized(user, record.role);
        Decision::Allowed
    }
}
