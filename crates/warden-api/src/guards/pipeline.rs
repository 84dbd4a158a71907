//! 가드 파이프라인.
//!
//! 가드 실행 순서를 명시적인 목록으로 보관하고, 하나의 디스패처가 순서대로
//! 실행합니다. 첫 번째 거부에서 즉시 중단하므로 뒤따르는 가드와 핸들러는
//! 실행되지 않습니다.

use std::sync::Arc;

use super::auth_guard::AuthDecisionGuard;
use super::context::{Decision, RequestContext};
use super::role_guard::RoleDecisionGuard;
use crate::auth::TokenVerifier;
use crate::repository::UserLookup;

/// 파이프라인 단계.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStage {
    /// 토큰 인증
    Authenticate,
    /// 현재 역할 기반 인가
    AuthorizeRoles,
}

impl GuardStage {
    pub fn name(&self) -> &'static str {
        match self {
            GuardStage::Authenticate => "authenticate",
            GuardStage::AuthorizeRoles => "authorize_roles",
        }
    }
}

/// 순서가 고정된 가드 파이프라인.
#[derive(Clone)]
pub struct GuardPipeline {
    stages: Vec<GuardStage>,
    auth: AuthDecisionGuard,
    roles: RoleDecisionGuard,
}

impl GuardPipeline {
    /// 기본 순서(인증 → 인가)의 파이프라인.
    pub fn new(verifier: TokenVerifier, users: Arc<dyn UserLookup>) -> Self {
        Self::with_stages(
            vec![GuardStage::Authenticate, GuardStage::AuthorizeRoles],
            verifier,
            users,
        )
    }

    /// 단계 목록을 직접 지정.
    pub fn with_stages(
        stages: Vec<GuardStage>,
        verifier: TokenVerifier,
        users: Arc<dyn UserLookup>,
    ) -> Self {
        Self {
            stages,
            auth: AuthDecisionGuard::new(verifier.clone()),
            roles: RoleDecisionGuard::new(verifier, users),
        }
    }

    pub fn stages(&self) -> &[GuardStage] {
        &self.stages
    }

    /// 모든 단계를 순서대로 실행.
    ///
    /// 거부된 경우 거부한 단계를 함께 반환합니다.
    pub async fn dispatch(&self, ctx: &mut RequestContext) -> (Decision, Option<GuardStage>) {
        for stage in &self.stages {
            let decision = match stage {
                GuardStage::Authenticate => self.auth.check(ctx),
                GuardStage::AuthorizeRoles => self.roles.check(ctx).await,
            };

            if let Decision::Denied(_) = decision {
                return (decision, Some(*stage));
            }
        }

        (Decision::Allowed, None)
    }
}
