//! JWT 토큰 처리.
//!
//! Access Token 발급([`TokenIssuer`])과 검증([`TokenVerifier`]) 로직.
//! 검증은 공유 시크릿(HS256)을 사용하며, 실패 원인을 서명 오류 / 만료 /
//! 활성 전 / 기타 형식 오류로 구분해 반환합니다.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use warden_core::AuthConfig;

use super::Role;

/// JWT Access Token 페이로드.
///
/// `sub`와 `username`은 검증 단계에서는 선택적이며, 가드가 둘 다 존재하는지
/// 별도로 확인합니다. 수신 토큰은 `RawClaims`를 거쳐 역직렬화됩니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawClaims")]
pub struct Claims {
    /// Subject - 사용자 ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// 사용자 이름 (이메일)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// 발급 시점의 역할. 역할 가드는 이 값을 신뢰하지 않습니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Issued At (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,
    /// Expiration (Unix timestamp)
    pub exp: i64,
    /// Not Before (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,
    /// Issuer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    /// JWT ID - 토큰 고유 식별자
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

/// 수신 토큰의 원본 페이로드.
///
/// 사용자 이름은 `username`, `userEmail`(이전 로그인 구현), `email` 중 먼저
/// 채워진 값을 사용합니다. 역할은 신뢰하지 않는 값이므로 알 수 없는 값이나
/// 문자열이 아닌 값은 토큰 전체를 거부하지 않고 `None`으로 처리합니다.
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default, rename = "userEmail")]
    user_email: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    role: Option<serde_json::Value>,
    #[serde(default)]
    iat: Option<i64>,
    exp: i64,
    #[serde(default)]
    nbf: Option<i64>,
    #[serde(default)]
    iss: Option<String>,
    #[serde(default)]
    jti: Option<String>,
}

impl From<RawClaims> for Claims {
    fn from(raw: RawClaims) -> Self {
        let username = [raw.username, raw.user_email, raw.email]
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty());
        let role = raw
            .role
            .as_ref()
            .and_then(serde_json::Value::as_str)
            .and_then(Role::parse);

        Self {
            sub: raw.sub,
            username,
            role,
            iat: raw.iat,
            exp: raw.exp,
            nbf: raw.nbf,
            iss: raw.iss,
            jti: raw.jti,
        }
    }
}

impl Claims {
    /// 새로운 Claims 생성.
    ///
    /// # Arguments
    ///
    /// * `user_id` - 사용자 ID
    /// * `username` - 사용자 이름 (이메일)
    /// * `role` - 발급 시점의 역할
    /// * `expires_in_minutes` - 만료 시간 (분)
    pub fn new(
        user_id: impl Into<String>,
        username: impl Into<String>,
        role: Role,
        expires_in_minutes: i64,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: Some(user_id.into()),
            username: Some(username.into()),
            role: Some(role),
            iat: Some(now.timestamp()),
            exp: (now + Duration::minutes(expires_in_minutes)).timestamp(),
            nbf: None,
            iss: None,
            jti: Some(uuid::Uuid::new_v4().to_string()),
        }
    }
}

/// 토큰 검증 실패 원인.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is not active yet")]
    Premature,
    #[error("malformed token: {0}")]
    Malformed(String),
}

/// 토큰 발급 에러.
#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("token encoding failed: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// 공유 시크릿 기반 토큰 검증기.
///
/// 상태가 없으므로 요청 간에 자유롭게 공유할 수 있고, 같은 토큰을 여러 번
/// 검증해도 항상 같은 결과를 반환합니다.
#[derive(Clone)]
pub struct TokenVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    /// HS256 검증기 생성 (leeway 0, nbf 검증 활성화).
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// 인증 설정에서 생성.
    pub fn from_config(config: &AuthConfig) -> Self {
        let verifier = Self::new(config.effective_secret()).with_leeway(config.leeway_secs);
        match &config.issuer {
            Some(issuer) => verifier.with_issuer(issuer),
            None => verifier,
        }
    }

    /// exp/nbf 허용 오차 설정 (초).
    #[must_use]
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.validation.leeway = leeway_secs;
        self
    }

    /// iss 클레임 검증 활성화.
    #[must_use]
    pub fn with_issuer(mut self, issuer: &str) -> Self {
        self.validation.set_issuer(&[issuer]);
        self
    }

    /// 토큰 디코딩 및 검증.
    ///
    /// # Errors
    ///
    /// - 서명 불일치 → [`VerifyError::InvalidSignature`]
    /// - exp 경과 → [`VerifyError::Expired`]
    /// - nbf 미도래 → [`VerifyError::Premature`]
    /// - 그 외 모든 디코딩 실패 → [`VerifyError::Malformed`]
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => VerifyError::InvalidSignature,
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                ErrorKind::ImmatureSignature => VerifyError::Premature,
                _ => VerifyError::Malformed(e.to_string()),
            })
    }
}

/// 발급된 Access Token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedToken {
    /// Access Token
    pub access_token: String,
    /// 토큰 타입 (항상 "Bearer")
    pub token_type: String,
    /// 만료 시간 (초)
    pub expires_in: i64,
}

/// 공유 시크릿 기반 토큰 발급기.
#[derive(Clone)]
pub struct TokenIssuer {
    key: EncodingKey,
    ttl_minutes: i64,
    issuer: Option<String>,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            key: EncodingKey::from_secret(secret.as_bytes()),
            ttl_minutes,
            issuer: None,
        }
    }

    /// 인증 설정에서 생성.
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            ..Self::new(config.effective_secret(), config.token_ttl_minutes)
        }
    }

    /// 사용자에 대한 Access Token 발급.
    pub fn issue(
        &self,
        user_id: &str,
        username: &str,
        role: Role,
    ) -> Result<IssuedToken, JwtError> {
        let mut claims = Claims::new(user_id, username, role, self.ttl_minutes);
        claims.iss = self.issuer.clone();

        Ok(IssuedToken {
            access_token: self.sign(&claims)?,
            token_type: "Bearer".to_string(),
            expires_in: self.ttl_minutes * 60,
        })
    }

    /// 임의의 Claims에 서명.
    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.key).map_err(JwtError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_SECRET: &str = "test-secret-key-for-jwt-testing-minimum-32-chars";

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(TEST_SECRET, 60)
    }

    #[test]
    fn test_issue_and_verify_token() {
        let issued = issuer().issue("user-1", "alice@example.com", Role::Moderator).unwrap();
        assert_eq!(issued.token_type, "Bearer");
        assert_eq!(issued.expires_in, 3600);

        let claims = TokenVerifier::new(TEST_SECRET).verify(&issued.access_token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("user-1"));
        assert_eq!(claims.username.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.role, Some(Role::Moderator));
        assert!(claims.jti.is_some());
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_wrong_secret_is_invalid_signature() {
        let issued = issuer().issue("user-1", "alice@example.com", Role::User).unwrap();

        let result = TokenVerifier::new("wrong-secret-key-for-testing-minimum-32-chars")
            .verify(&issued.access_token);
        assert_eq!(result, Err(VerifyError::InvalidSignature));
    }

    #[test]
    fn test_tampered_payload_is_invalid_signature() {
        let issued = issuer().issue("user-1", "alice@example.com", Role::User).unwrap();
        let forged = issuer().issue("user-1", "alice@example.com", Role::Admin).unwrap();

        // 원래 토큰의 서명에 다른 페이로드를 붙임
        let original: Vec<&str> = issued.access_token.split('.').collect();
        let other: Vec<&str> = forged.access_token.split('.').collect();
        let tampered = format!("{}.{}.{}", original[0], other[1], original[2]);

        let result = TokenVerifier::new(TEST_SECRET).verify(&tampered);
        assert_eq!(result, Err(VerifyError::InvalidSignature));
    }

    #[test]
    fn test_expired_token() {
        let now = Utc::now().timestamp();
        let mut claims = Claims::new("user-1", "alice@example.com", Role::User, 60);
        claims.iat = Some(now - 7200);
        claims.exp = now - 3600;
        let token = issuer().sign(&claims).unwrap();

        let result = TokenVerifier::new(TEST_SECRET).verify(&token);
        assert_eq!(result, Err(VerifyError::Expired));
    }

    #[test]
    fn test_leeway_accepts_recently_expired_token() {
        let now = Utc::now().timestamp();
        let mut claims = Claims::new("user-1", "alice@example.com", Role::User, 60);
        claims.exp = now - 30;
        let token = issuer().sign(&claims).unwrap();

        assert!(TokenVerifier::new(TEST_SECRET).with_leeway(120).verify(&token).is_ok());
    }

    #[test]
    fn test_premature_token() {
        let now = Utc::now().timestamp();
        let mut claims = Claims::new("user-1", "alice@example.com", Role::User, 120);
        claims.nbf = Some(now + 3600);
        let token = issuer().sign(&claims).unwrap();

        let result = TokenVerifier::new(TEST_SECRET).verify(&token);
        assert_eq!(result, Err(VerifyError::Premature));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let result = TokenVerifier::new(TEST_SECRET).verify("invalid.token.here");
        assert!(matches!(result, Err(VerifyError::Malformed(_))));

        let result = TokenVerifier::new(TEST_SECRET).verify("not-a-jwt");
        assert!(matches!(result, Err(VerifyError::Malformed(_))));
    }

    #[test]
    fn test_missing_exp_is_malformed() {
        let payload = serde_json::json!({ "sub": "user-1", "username": "alice@example.com" });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let result = TokenVerifier::new(TEST_SECRET).verify(&token);
        assert!(matches!(result, Err(VerifyError::Malformed(_))));
    }

    #[test]
    fn test_legacy_user_email_claim() {
        let exp = Utc::now().timestamp() + 3600;
        let payload = serde_json::json!({
            "sub": "12345678-1234-1234-1234-123456789012",
            "userEmail": "test@example.com",
            "role": "ADMIN",
            "exp": exp,
        });
        let token = encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap();

        let claims = TokenVerifier::new(TEST_SECRET).verify(&token).unwrap();
        assert_eq!(claims.username.as_deref(), Some("test@example.com"));
        assert_eq!(claims.role, Some(Role::Admin));
    }

    fn sign_payload(payload: &serde_json::Value) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            payload,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_username_and_email_together() {
        let payload = serde_json::json!({
            "sub": "user-1",
            "username": "alice@example.com",
            "email": "alice@example.com",
            "role": "user",
            "exp": Utc::now().timestamp() + 3600,
        });

        let claims = TokenVerifier::new(TEST_SECRET)
            .verify(&sign_payload(&payload))
            .unwrap();
        assert_eq!(claims.username.as_deref(), Some("alice@example.com"));
        assert_eq!(claims.role, Some(Role::User));
    }

    #[test]
    fn test_username_takes_precedence_over_email() {
        let payload = serde_json::json!({
            "sub": "user-1",
            "username": "",
            "userEmail": "legacy@example.com",
            "email": "other@example.com",
            "exp": Utc::now().timestamp() + 3600,
        });

        let claims = TokenVerifier::new(TEST_SECRET)
            .verify(&sign_payload(&payload))
            .unwrap();
        assert_eq!(claims.username.as_deref(), Some("legacy@example.com"));
    }

    #[test]
    fn test_unknown_role_claim_is_ignored() {
        let exp = Utc::now().timestamp() + 3600;
        for role in [
            serde_json::json!("guest"),
            serde_json::json!(3),
            serde_json::json!(["admin"]),
        ] {
            let payload = serde_json::json!({
                "sub": "user-1",
                "username": "alice@example.com",
                "role": role,
                "exp": exp,
            });

            let claims = TokenVerifier::new(TEST_SECRET)
                .verify(&sign_payload(&payload))
                .unwrap();
            assert_eq!(claims.role, None, "role {role}");
            assert_eq!(claims.sub.as_deref(), Some("user-1"));
        }
    }

    #[test]
    fn test_issuer_mismatch_is_rejected() {
        let token = TokenIssuer {
            issuer: Some("someone-else".to_string()),
            ..issuer()
        }
        .issue("user-1", "alice@example.com", Role::User)
        .unwrap();

        let result = TokenVerifier::new(TEST_SECRET)
            .with_issuer("warden")
            .verify(&token.access_token);
        assert!(matches!(result, Err(VerifyError::Malformed(_))));
    }

    #[test]
    fn test_verify_is_idempotent() {
        let issued = issuer().issue("user-1", "alice@example.com", Role::User).unwrap();
        let verifier = TokenVerifier::new(TEST_SECRET);

        let first = verifier.verify(&issued.access_token).unwrap();
        let second = verifier.verify(&issued.access_token).unwrap();
        assert_eq!(first, second);
    }
}
