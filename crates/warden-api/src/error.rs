//! API 에러 타입.
//!
//! - [`AuthFailure`]: 가드가 반환하는 인증/인가 거부 사유
//! - [`ErrorTranslator`]: 거부 사유를 외부에 노출되는 안정적인 응답 형식으로 변환
//! - [`ApiErrorResponse`]: 인증 외 엔드포인트(로그인 등)의 일반 에러 형식

use axum::{
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::auth::{format_roles, Role, VerifyError};
use crate::guards::CustomErrorMessages;

// ==================== 인증 거부 사유 ====================

/// 인증/인가 거부 사유.
///
/// 각 사유는 고유한 `type` 문자열로 외부에 노출되어, 클라이언트가
/// "토큰 없음"과 "토큰 만료", "역할 부족"을 구분할 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    #[error("No token provided or invalid format. Use: Bearer <token>")]
    MissingCredential,

    #[error("Invalid token structure: {0}")]
    MalformedCredential(String),

    #[error("Invalid token signature")]
    InvalidCredential,

    #[error("Token has expired")]
    ExpiredCredential,

    #[error("Token is not active yet")]
    PrematureCredential,

    #[error("User not found")]
    UserNotFound { username: String },

    #[error("Required roles: {}; current role: {actual}", format_roles(.required))]
    InsufficientRole { required: Vec<Role>, actual: Role },

    #[error("User lookup failed: {0}")]
    UserLookupFailed(String),
}

impl AuthFailure {
    /// 외부 노출용 에러 타입.
    pub fn error_type(&self) -> &'static str {
        match self {
            AuthFailure::MissingCredential => "MISSING_TOKEN",
            AuthFailure::MalformedCredential(_) => "MALFORMED_TOKEN",
            AuthFailure::InvalidCredential => "INVALID_TOKEN",
            AuthFailure::ExpiredCredential => "EXPIRED_TOKEN",
            AuthFailure::PrematureCredential => "PREMATURE_TOKEN",
            AuthFailure::UserNotFound { .. } => "USER_NOT_FOUND",
            AuthFailure::InsufficientRole { .. } => "INSUFFICIENT_ROLE",
            AuthFailure::UserLookupFailed(_) => "USER_LOOKUP_FAILED",
        }
    }

    /// HTTP 상태 코드: 신원 문제는 401, 역할 부족은 403.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthFailure::InsufficientRole { .. } => StatusCode::FORBIDDEN,
            AuthFailure::UserLookupFailed(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    /// 클라이언트에 전달할 진단 메시지.
    ///
    /// 저장소 내부 에러는 로그에만 남기고 응답에는 포함하지 않습니다.
    pub fn details(&self) -> String {
        match self {
            AuthFailure::UserLookupFailed(_) => "User lookup failed".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<VerifyError> for AuthFailure {
    fn from(err: VerifyError) -> Self {
        match err {
            VerifyError::InvalidSignature => AuthFailure::InvalidCredential,
            VerifyError::Expired => AuthFailure::ExpiredCredential,
            VerifyError::Premature => AuthFailure::PrematureCredential,
            VerifyError::Malformed(detail) => AuthFailure::MalformedCredential(detail),
        }
    }
}

// ==================== 응답 형식 ====================

/// 인증 에러 응답 본문.
///
/// # 예시
///
/// ```json
/// {
///   "success": false,
///   "error": {
///     "type": "EXPIRED_TOKEN",
///     "message": "Your session has expired. Please log in again.",
///     "details": "Token has expired",
///     "statusCode": 401,
///     "timestamp": "2026-01-01T00:00:00+00:00",
///     "path": "/users/profile",
///     "method": "GET"
///   },
///   "suggestions": ["Log in again to obtain a new token"]
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthErrorResponse {
    pub success: bool,
    pub error: AuthErrorBody,
    pub suggestions: Vec<String>,
}

/// 인증 에러 상세.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthErrorBody {
    #[serde(rename = "type")]
    pub error_type: String,
    pub message: String,
    pub details: String,
    pub status_code: u16,
    pub timestamp: String,
    pub path: String,
    pub method: String,
}

/// 거부 사유 → 외부 응답 변환기.
///
/// 상태가 없는 순수 매핑 테이블입니다.
pub struct ErrorTranslator;

impl ErrorTranslator {
    /// 에러 타입별 사용자 메시지.
    pub fn user_message(error_type: &str) -> &'static str {
        match error_type {
            "MISSING_TOKEN" => "Access denied. Authentication is required.",
            "MALFORMED_TOKEN" => "Authentication token is malformed.",
            "INVALID_TOKEN" => "Invalid authentication token.",
            "EXPIRED_TOKEN" => "Your session has expired. Please log in again.",
            "PREMATURE_TOKEN" => "Authentication token is not valid yet.",
            "USER_NOT_FOUND" => "The account for this token no longer exists.",
            "INSUFFICIENT_ROLE" => "You do not have the permissions required for this action.",
            "USER_LOOKUP_FAILED" => "Authorization could not be completed. Please try again later.",
            _ => "Unknown authentication error.",
        }
    }

    /// 에러 타입별 제안 목록.
    pub fn suggestions(error_type: &str) -> Vec<String> {
        let items: &[&str] = match error_type {
            "MISSING_TOKEN" => &[
                "Include the authentication token in the Authorization header",
                "Format: Authorization: Bearer <your-token>",
                "Log in first to obtain a token",
            ],
            "MALFORMED_TOKEN" => &[
                "Make sure the token was copied completely",
                "Log in again to obtain a fresh token",
            ],
            "INVALID_TOKEN" => &[
                "Verify that the token is valid",
                "Make sure the token has not been modified",
                "Log in again to obtain a fresh token",
            ],
            "EXPIRED_TOKEN" => &[
                "Log in again to obtain a new token",
                "Implement token refresh if needed",
            ],
            "PREMATURE_TOKEN" => &[
                "Check that the client and server clocks are synchronized",
                "Retry once the token becomes active",
            ],
            "USER_NOT_FOUND" => &[
                "The account may have been deleted or renamed",
                "Log in again with an existing account",
            ],
            "INSUFFICIENT_ROLE" => &[
                "Contact an administrator to obtain the required permissions",
                "Verify that your account has the correct role",
            ],
            _ => &["Contact technical support if the problem persists"],
        };
        items.iter().map(|s| (*s).to_string()).collect()
    }

    /// 거부 사유를 응답 본문으로 변환.
    ///
    /// 라우트에 커스텀 메시지가 선언되어 있으면 401/403 메시지와 제안 목록을
    /// 대체합니다.
    pub fn translate(
        failure: &AuthFailure,
        method: &Method,
        path: &str,
        custom: Option<&CustomErrorMessages>,
    ) -> AuthErrorResponse {
        let error_type = failure.error_type();
        let status = failure.status_code();

        let custom_message = custom.and_then(|c| match status {
            StatusCode::UNAUTHORIZED => c.unauthorized.clone(),
            StatusCode::FORBIDDEN => c.forbidden.clone(),
            _ => None,
        });
        let message =
            custom_message.unwrap_or_else(|| Self::user_message(error_type).to_string());

        let suggestions = match custom {
            Some(c) if !c.suggestions.is_empty() => c.suggestions.clone(),
            _ => Self::suggestions(error_type),
        };

        AuthErrorResponse {
            success: false,
            error: AuthErrorBody {
                error_type: error_type.to_string(),
                message,
                details: failure.details(),
                status_code: status.as_u16(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                path: path.to_string(),
                method: method.to_string(),
            },
            suggestions,
        }
    }

    /// 거부 사유를 HTTP 응답으로 변환.
    pub fn into_response(
        failure: &AuthFailure,
        method: &Method,
        path: &str,
        custom: Option<&CustomErrorMessages>,
    ) -> Response {
        let body = Self::translate(failure, method, path, custom);
        (failure.status_code(), Json(body)).into_response()
    }
}

// ==================== 일반 API 에러 ====================

/// 인증 외 엔드포인트의 에러 응답.
///
/// # 예시
///
/// ```json
/// {
///   "code": "INVALID_CREDENTIALS",
///   "message": "Invalid email or password",
///   "timestamp": 1738300800
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// 에러 코드 (예: "INVALID_CREDENTIALS", "NOT_FOUND")
    pub code: String,
    /// 사람이 읽을 수 있는 에러 메시지
    pub message: String,
    /// 에러 발생 타임스탬프 (Unix timestamp)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    /// HTTP 메서드 (GET, POST 등)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// 요청 경로
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ApiErrorResponse {
    /// 기본 에러 생성 (타임스탬프 포함).
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: Some(chrono::Utc::now().timestamp()),
            method: None,
            path: None,
        }
    }

    /// 요청 정보(메서드, 경로)를 추가합니다.
    #[must_use]
    pub fn with_request_info(mut self, method: &Method, uri: &Uri) -> Self {
        self.method = Some(method.to_string());
        self.path = Some(uri.path().to_string());
        self
    }
}

impl std::fmt::Display for ApiErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiErrorResponse {}

/// API 핸들러 Result 타입 별칭.
pub type ApiResult<T> = Result<T, (StatusCode, Json<ApiErrorResponse>)>;
