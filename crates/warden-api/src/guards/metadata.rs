//! 라우트 메타데이터 등록 및 조회.
//!
//! 라우트 소유자가 선언한 공개 여부, 요구 역할, 커스텀 에러 메시지를
//! 명시적인 레지스트리에 보관합니다. 각 플래그는 독립적으로
//! "가장 가까운 선언 우선" 규칙으로 해석됩니다: 핸들러 수준 선언이 있으면
//! 그것을, 없으면 소속 그룹의 선언을, 둘 다 없으면 기본값을 사용합니다.

use std::collections::HashMap;

use axum::http::Method;
use serde::{Deserialize, Serialize};

use crate::auth::Role;

/// 라우트 식별자: (HTTP 메서드, 매칭된 경로 템플릿).
///
/// 경로는 실제 요청 경로가 아니라 라우터에 등록된 템플릿(`/users/{id}`)입니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: Method,
    pub path: String,
}

impl RouteKey {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }
}

impl std::fmt::Display for RouteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// 라우트별 인증 에러 메시지 재정의.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomErrorMessages {
    /// 401 응답의 사용자 메시지
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unauthorized: Option<String>,
    /// 403 응답의 사용자 메시지
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forbidden: Option<String>,
    /// 기본 제안 목록을 대체할 제안
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl CustomErrorMessages {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn unauthorized(mut self, message: impl Into<String>) -> Self {
        self.unauthorized = Some(message.into());
        self
    }

    #[must_use]
    pub fn forbidden(mut self, message: impl Into<String>) -> Self {
        self.forbidden = Some(message.into());
        self
    }

    #[must_use]
    pub fn suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

/// 한 수준(그룹 또는 핸들러)에서 선언된 어노테이션.
///
/// `None`은 "이 수준에서 선언하지 않음"을 의미하며, 상위 수준으로 위임됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteMetadata {
    pub public: Option<bool>,
    pub roles: Option<Vec<Role>>,
    pub custom_errors: Option<CustomErrorMessages>,
}

impl RouteMetadata {
    /// 아무것도 선언하지 않은 메타데이터.
    pub fn new() -> Self {
        Self::default()
    }

    /// 공개 라우트로 선언 (인증/역할 검사 생략).
    #[must_use]
    pub fn public(mut self) -> Self {
        self.public = Some(true);
        self
    }

    /// 그룹의 공개 선언을 명시적으로 해제.
    #[must_use]
    pub fn protected(mut self) -> Self {
        self.public = Some(false);
        self
    }

    /// 요구 역할 선언 (하나라도 일치하면 통과).
    #[must_use]
    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = Some(roles.into_iter().collect());
        self
    }

    #[must_use]
    pub fn custom_errors(mut self, messages: CustomErrorMessages) -> Self {
        self.custom_errors = Some(messages);
        self
    }
}

/// 해석이 끝난 라우트 메타데이터.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedMetadata {
    pub is_public: bool,
    /// `None`이면 역할 제한 없음 (인증만 요구)
    pub required_roles: Option<Vec<Role>>,
    pub custom_errors: Option<CustomErrorMessages>,
}

#[derive(Debug, Clone)]
struct RouteEntry {
    group: Option<String>,
    metadata: RouteMetadata,
}

/// 라우트 메타데이터 레지스트리.
///
/// 서버 시작 시 한 번 구성되고 이후에는 읽기 전용으로 공유됩니다.
///
/// # 사용 예시
///
/// ```rust,ignore
/// let registry = RouteRegistry::new()
///     .group("admin", RouteMetadata::new().roles([Role::Admin]))
///     .grouped_route("admin", Method::GET, "/admin/status", RouteMetadata::new().public());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteRegistry {
    groups: HashMap<String, RouteMetadata>,
    routes: HashMap<RouteKey, RouteEntry>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 그룹 수준 메타데이터 등록.
    #[must_use]
    pub fn group(mut self, name: impl Into<String>, metadata: RouteMetadata) -> Self {
        self.groups.insert(name.into(), metadata);
        self
    }

    /// 그룹에 속하지 않은 라우트 등록.
    #[must_use]
    pub fn route(mut self, method: Method, path: &str, metadata: RouteMetadata) -> Self {
        self.routes.insert(
            RouteKey::new(method, path),
            RouteEntry {
                group: None,
                metadata,
            },
        );
        self
    }

    /// 그룹에 속한 라우트 등록.
    #[must_use]
    pub fn grouped_route(
        mut self,
        group: &str,
        method: Method,
        path: &str,
        metadata: RouteMetadata,
    ) -> Self {
        self.routes.insert(
            RouteKey::new(method, path),
            RouteEntry {
                group: Some(group.to_string()),
                metadata,
            },
        );
        self
    }

    /// 다른 레지스트리의 내용을 병합 (같은 키는 `other`가 우선).
    #[must_use]
    pub fn merge(mut self, other: RouteRegistry) -> Self {
        self.groups.extend(other.groups);
        self.routes.extend(other.routes);
        self
    }

    /// 등록된 라우트 수.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// 키에 해당하는 라우트 항목 조회.
    ///
    /// 라우터는 GET 핸들러로 HEAD 요청도 처리하므로 HEAD는 GET 선언을 따릅니다.
    fn entry(&self, key: &RouteKey) -> Option<&RouteEntry> {
        self.routes.get(key).or_else(|| {
            if key.method == Method::HEAD {
                self.routes
                    .get(&RouteKey::new(Method::GET, key.path.as_str()))
            } else {
                None
            }
        })
    }

    /// 라우트 메타데이터 해석.
    ///
    /// 등록되지 않은 라우트는 기본값(비공개, 역할 제한 없음)으로 해석됩니다.
    /// 빈 역할 목록은 역할 제한 없음과 같습니다.
    pub fn resolve(&self, key: &RouteKey) -> ResolvedMetadata {
        let Some(entry) = self.entry(key) else {
            return ResolvedMetadata::default();
        };

        let group = entry.group.as_ref().and_then(|name| self.groups.get(name));
        let handler = &entry.metadata;

        let is_public = handler
            .public
            .or_else(|| group.and_then(|g| g.public))
            .unwrap_or(false);

        let required_roles = handler
            .roles
            .clone()
            .or_else(|| group.and_then(|g| g.roles.clone()))
            .filter(|roles| !roles.is_empty());

        let custom_errors = handler
            .custom_errors
            .clone()
            .or_else(|| group.and_then(|g| g.custom_errors.clone()));

        ResolvedMetadata {
            is_public,
            required_roles,
            custom_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin_registry() -> RouteRegistry {
        RouteRegistry::new()
            .group(
                "admin",
                RouteMetadata::new()
                    .roles([Role::Admin])
                    .custom_errors(CustomErrorMessages::new().forbidden("Admins only")),
            )
            .grouped_route("admin", Method::GET, "/admin/dashboard", RouteMetadata::new())
            .grouped_route(
                "admin",
                Method::GET,
                "/admin/reports",
                RouteMetadata::new().roles([Role::Admin, Role::Moderator]),
            )
            .grouped_route(
                "admin",
                Method::GET,
                "/admin/status",
                RouteMetadata::new().public(),
            )
            .route(Method::GET, "/public/info", RouteMetadata::new().public())
    }

    #[test]
    fn test_group_metadata_is_inherited() {
        let resolved = admin_registry().resolve(&RouteKey::new(Method::GET, "/admin/dashboard"));

        assert!(!resolved.is_public);
        assert_eq!(resolved.required_roles, Some(vec![Role::Admin]));
        assert_eq!(
            resolved.custom_errors.and_then(|c| c.forbidden).as_deref(),
            Some("Admins only")
        );
    }

    #[test]
    fn test_handler_roles_override_group_roles() {
        let resolved = admin_registry().resolve(&RouteKey::new(Method::GET, "/admin/reports"));

        assert_eq!(
            resolved.required_roles,
            Some(vec![Role::Admin, Role::Moderator])
        );
        // 역할만 재정의했으므로 커스텀 메시지는 그룹에서 상속
        assert!(resolved.custom_errors.is_some());
    }

    #[test]
    fn test_handler_public_overrides_group_roles() {
        let resolved = admin_registry().resolve(&RouteKey::new(Method::GET, "/admin/status"));

        assert!(resolved.is_public);
        // 역할 선언은 남아 있지만 공개 플래그가 먼저 적용됨
        assert_eq!(resolved.required_roles, Some(vec![Role::Admin]));
    }

    #[test]
    fn test_unknown_route_resolves_to_defaults() {
        let registry = admin_registry();

        assert_eq!(
            registry.resolve(&RouteKey::new(Method::GET, "/nowhere")),
            ResolvedMetadata::default()
        );
        // 메서드가 다르면 다른 라우트
        assert_eq!(
            registry.resolve(&RouteKey::new(Method::POST, "/public/info")),
            ResolvedMetadata::default()
        );
    }

    #[test]
    fn test_head_follows_get_declaration() {
        let registry = admin_registry();

        let status = registry.resolve(&RouteKey::new(Method::HEAD, "/admin/status"));
        assert!(status.is_public);

        let dashboard = registry.resolve(&RouteKey::new(Method::HEAD, "/admin/dashboard"));
        assert_eq!(dashboard.required_roles, Some(vec![Role::Admin]));

        // GET 이외의 메서드는 대체하지 않음
        assert_eq!(
            registry.resolve(&RouteKey::new(Method::OPTIONS, "/admin/status")),
            ResolvedMetadata::default()
        );
    }

    #[test]
    fn test_explicit_protected_overrides_public_group() {
        let registry = RouteRegistry::new()
            .group("docs", RouteMetadata::new().public())
            .grouped_route("docs", Method::GET, "/docs", RouteMetadata::new())
            .grouped_route("docs", Method::GET, "/docs/drafts", RouteMetadata::new().protected());

        assert!(registry.resolve(&RouteKey::new(Method::GET, "/docs")).is_public);
        assert!(!registry.resolve(&RouteKey::new(Method::GET, "/docs/drafts")).is_public);
    }

    #[test]
    fn test_empty_roles_mean_no_restriction() {
        let registry =
            RouteRegistry::new().route(Method::GET, "/open", RouteMetadata::new().roles(Vec::new()));

        let resolved = registry.resolve(&RouteKey::new(Method::GET, "/open"));
        assert_eq!(resolved.required_roles, None);
    }

    #[test]
    fn test_merge_registries() {
        let merged = RouteRegistry::new()
            .route(Method::GET, "/a", RouteMetadata::new())
            .merge(RouteRegistry::new().route(Method::GET, "/b", RouteMetadata::new().public()));

        assert_eq!(merged.len(), 2);
        assert!(merged.resolve(&RouteKey::new(Method::GET, "/b")).is_public);
    }
}
