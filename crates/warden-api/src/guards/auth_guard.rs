//! 인증 가드.
//!
//! 공개 라우트가 아니면 Bearer 토큰을 검증하고 호출자 정보를 컨텍스트에
//! 기록합니다.

use super::context::{extract_bearer, CurrentUser, Decision, RequestContext};
use crate::auth::TokenVerifier;
use crate::error::AuthFailure;

/// Authorization 헤더를 검증하여 호출자 정보 반환.
///
/// 헤더 파싱 → 토큰 검증 → 필수 클레임 확인 순서로 진행하며,
/// 실패 시 구체적인 거부 사유를 반환합니다.
pub fn authenticate_header(
    verifier: &TokenVerifier,
    header: Option<&str>,
) -> Result<CurrentUser, AuthFailure> {
    let token = extract_bearer(header)?;
    let claims = verifier.verify(token)?;
    CurrentUser::from_claims(claims)
}

/// 인증 가드.
#[derive(Clone)]
pub struct AuthDecisionGuard {
    verifier: TokenVerifier,
}

impl AuthDecisionGuard {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// 요청 허용 여부 판정.
    ///
    /// 허용된 경우에만 컨텍스트에 호출자를 기록합니다.
    pub fn check(&self, ctx: &mut RequestContext) -> Decision {
        if ctx.metadata.is_public {
            return Decision::Allowed;
        }

        match authenticate_header(&self.verifier, ctx.authorization()) {
            Ok(user) => {
                ctx.attach_user(user);
                Decision::Allowed
            }
            Err(failure) => Decision::Denied(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Claims, Role, TokenIssuer};
    use crate::guards::metadata::ResolvedMetadata;
    use axum::http::Method;
    use chrono::Utc;

    const SECRET: &str = "auth-guard-test-secret-at-least-32-chars";

    fn guard() -> AuthDecisionGuard {
        AuthDecisionGuard::new(TokenVerifier::new(SECRET))
    }

    fn protected_ctx(header: Option<String>) -> RequestContext {
        RequestContext::new(Method::GET, "/users/profile", ResolvedMetadata::default(), header)
    }

    fn bearer(token: &str) -> Option<String> {
        Some(format!("Bearer {token}"))
    }

    fn valid_token() -> String {
        TokenIssuer::new(SECRET, 60)
            .issue("user-1", "alice@example.com", Role::User)
            .unwrap()
            .access_token
    }

    #[test]
    fn test_public_route_allows_any_header() {
        let metadata = ResolvedMetadata {
            is_public: true,
            ..Default::default()
        };

        for header in [None, Some("garbage".to_string()), bearer("not.a.token")] {
            let mut ctx = RequestContext::new(Method::GET, "/public/info", metadata.clone(), header);
            assert_eq!(guard().check(&mut ctx), Decision::Allowed);
            assert!(ctx.user().is_none());
        }
    }

    #[test]
    fn test_missing_header_is_denied() {
        let mut ctx = protected_ctx(None);
        assert_eq!(
            guard().check(&mut ctx),
            Decision::Denied(AuthFailure::MissingCredential)
        );

        let mut ctx = protected_ctx(Some(format!("Token {}", valid_token())));
        assert_eq!(
            guard().check(&mut ctx),
            Decision::Denied(AuthFailure::MissingCredential)
        );
        assert!(ctx.user().is_none());
    }

    #[test]
    fn test_valid_token_attaches_user() {
        let mut ctx = protected_ctx(bearer(&valid_token()));

        assert_eq!(guard().check(&mut ctx), Decision::Allowed);
        let user = ctx.user().unwrap();
        assert_eq!(user.sub, "user-1");
        assert_eq!(user.username, "alice@example.com");
        assert_eq!(user.role, Some(Role::User));
    }

    #[test]
    fn test_specific_verifier_failures() {
        let other = TokenIssuer::new("another-secret-entirely-32-chars-long", 60)
            .issue("user-1", "alice@example.com", Role::User)
            .unwrap()
            .access_token;
        let mut ctx = protected_ctx(bearer(&other));
        assert_eq!(
            guard().check(&mut ctx),
            Decision::Denied(AuthFailure::InvalidCredential)
        );

        let mut expired = Claims::new("user-1", "alice@example.com", Role::User, 60);
        expired.exp = Utc::now().timestamp() - 60;
        let token = TokenIssuer::new(SECRET, 60).sign(&expired).unwrap();
        let mut ctx = protected_ctx(bearer(&token));
        assert_eq!(
            guard().check(&mut ctx),
            Decision::Denied(AuthFailure::ExpiredCredential)
        );

        let mut ctx = protected_ctx(bearer("definitely-not-a-jwt"));
        assert!(matches!(
            guard().check(&mut ctx),
            Decision::Denied(AuthFailure::MalformedCredential(_))
        ));
    }

    #[test]
    fn test_token_without_username_is_malformed() {
        let mut claims = Claims::new("user-1", "alice@example.com", Role::User, 60);
        claims.username = None;
        let token = TokenIssuer::new(SECRET, 60).sign(&claims).unwrap();

        let mut ctx = protected_ctx(bearer(&token));
        assert!(matches!(
            guard().check(&mut ctx),
            Decision::Denied(AuthFailure::MalformedCredential(_))
        ));
        assert!(ctx.user().is_none());
    }
}
