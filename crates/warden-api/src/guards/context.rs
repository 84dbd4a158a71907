//! 요청 단위 가드 컨텍스트.
//!
//! 가드는 [`RequestContext`]를 입력으로 받아 [`Decision`]을 반환하고,
//! 허용된 경우에만 컨텍스트에 호출자 정보를 기록합니다.

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::metadata::ResolvedMetadata;
use crate::auth::{Claims, Role};
use crate::error::{ApiErrorResponse, AuthFailure};

/// 가드 판정 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied(AuthFailure),
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }
}

/// 토큰으로 인증된 호출자.
///
/// 핸들러에서 추출기로 사용할 수 있습니다.
///
/// ```rust,ignore
/// async fn profile(user: CurrentUser) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub sub: String,
    pub username: String,
    /// 토큰의 역할. 역할 가드를 통과한 경우 저장소의 현재 역할로 교체됩니다.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip)]
    pub claims: Claims,
}

impl CurrentUser {
    /// 검증된 Claims에서 호출자 정보 생성.
    ///
    /// `sub`와 `username`이 모두 있어야 합니다.
    pub fn from_claims(claims: Claims) -> Result<Self, AuthFailure> {
        let sub = claims
            .sub
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthFailure::MalformedCredential("missing subject claim".into()))?;
        let username = claims
            .username
            .clone()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AuthFailure::MalformedCredential("missing username claim".into()))?;

        Ok(Self {
            sub,
            username,
            role: claims.role,
            claims,
        })
    }
}

/// 역할 가드를 통과한 호출자와 저장소에서 읽은 현재 역할.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizedUser {
    pub user: CurrentUser,
    pub role: Role,
}

/// 한 요청에 대한 가드 실행 컨텍스트.
///
/// 요청마다 새로 만들어지며 다른 요청과 공유되지 않습니다.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// 실제 요청 경로 (에러 응답용)
    pub path: String,
    pub metadata: ResolvedMetadata,
    authorization: Option<String>,
    user: Option<CurrentUser>,
    authorized: Option<AuthorizedUser>,
}

impl RequestContext {
    pub fn new(
        method: Method,
        path: impl Into<String>,
        metadata: ResolvedMetadata,
        authorization: Option<String>,
    ) -> Self {
        Self {
            method,
            path: path.into(),
            metadata,
            authorization,
            user: None,
            authorized: None,
        }
    }

    /// Authorization 헤더 원문.
    pub fn authorization(&self) -> Option<&str> {
        self.authorization.as_deref()
    }

    /// 인증 가드가 기록한 호출자.
    pub fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// 역할 가드가 기록한 호출자.
    pub fn authorized(&self) -> Option<&AuthorizedUser> {
        self.authorized.as_ref()
    }

    pub(crate) fn attach_user(&mut self, user: CurrentUser) {
        self.user = Some(user);
    }

    /// 역할 가드 결과 기록. 현재 역할이 토큰의 역할보다 우선합니다.
    pub(crate) fn attach_authorized(&mut self, mut user: CurrentUser, role: Role) {
        user.role = Some(role);
        self.user = Some(user.clone());
        self.authorized = Some(AuthorizedUser { user, role });
    }

    /// 컨텍스트를 해체하여 기록된 호출자 정보 반환.
    pub fn into_identity(self) -> (Option<CurrentUser>, Option<AuthorizedUser>) {
        (self.user, self.authorized)
    }
}

/// `Authorization: Bearer <token>` 헤더에서 토큰 추출.
///
/// 공백으로 구분된 정확히 두 부분이어야 하며, 첫 부분은 `Bearer`
/// (대소문자 구분), 두 번째 부분은 비어 있지 않아야 합니다.
pub fn extract_bearer(header: Option<&str>) -> Result<&str, AuthFailure> {
    let header = header.ok_or(AuthFailure::MissingCredential)?;

    let mut parts = header.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthFailure::MissingCredential),
    }
}

fn missing_identity() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ApiErrorResponse::new(
            "IDENTITY_UNAVAILABLE",
            "Route is not protected by the auth guard",
        )),
    )
        .into_response()
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(missing_identity)
    }
}

impl<S> FromRequestParts<S> for AuthorizedUser
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthorizedUser>()
            .cloned()
            .ok_or_else(missing_identity)
    }
}
