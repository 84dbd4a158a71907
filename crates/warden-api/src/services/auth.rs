//! 로그인 서비스.
//!
//! 이메일/비밀번호를 확인하고 Access Token을 발급합니다.

use std::sync::Arc;

use tracing::{info, warn};

use crate::auth::{IssuedToken, JwtError, TokenIssuer};
use crate::repository::{UserLookup, UserStoreError};

/// 로그인 에러
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// 사용자가 없거나 비밀번호가 다름 (구분하지 않음)
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Store(#[from] UserStoreError),

    #[error(transparent)]
    Token(#[from] JwtError),
}

/// 로그인 서비스
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserLookup>,
    issuer: TokenIssuer,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserLookup>, issuer: TokenIssuer) -> Self {
        Self { users, issuer }
    }

    /// 자격 증명 확인 후 토큰 발급.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AuthServiceError> {
        let email = email.trim().to_lowercase();

        let Some(user) = self.users.find_by_email(&email).await? else {
            warn!(email = %email, "Login failed: unknown user");
            return Err(AuthServiceError::InvalidCredentials);
        };

        // TODO: 비밀번호 해시 저장으로 전환되면 해시 검증으로 교체
        if user.password != password {
            warn!(email = %email, "Login failed: wrong password");
            return Err(AuthServiceError::InvalidCredentials);
        }

        let token = self.issuer.issue(&user.id, &user.email, user.role)?;
        info!(email = %email, role = %user.role, "User logged in");

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Role, TokenVerifier};
    use crate::repository::{InMemoryUserStore, UserRecord};

    const SECRET: &str = "auth-service-test-secret-at-least-32-chars";

    async fn service() -> AuthService {
        let store = InMemoryUserStore::new();
        store
            .insert(UserRecord::new("admin@example.com", "admin123", Role::Admin))
            .await;
        AuthService::new(Arc::new(store), TokenIssuer::new(SECRET, 60))
    }

    #[tokio::test]
    async fn test_login_issues_verifiable_token() {
        let token = service().await.login("admin@example.com", "admin123").await.unwrap();

        let claims = TokenVerifier::new(SECRET).verify(&token.access_token).unwrap();
        assert_eq!(claims.username.as_deref(), Some("admin@example.com"));
        assert_eq!(claims.role, Some(Role::Admin));
        assert_eq!(token.expires_in, 3600);
    }

    #[tokio::test]
    async fn test_login_normalizes_email() {
        let result = service().await.login("  Admin@Example.com ", "admin123").await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_login_rejects_bad_credentials() {
        let service = service().await;

        assert!(matches!(
            service.login("admin@example.com", "wrong").await,
            Err(AuthServiceError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login("nobody@example.com", "admin123").await,
            Err(AuthServiceError::InvalidCredentials)
        ));
    }
}
