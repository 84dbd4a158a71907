//! 사용자 역할 정의.
//!
//! 역할은 닫힌 열거형이며, 라우트의 요구 역할과 사용자 레코드의 현재 역할을
//! 비교하는 데 사용됩니다. 역할 간 상하 관계는 없습니다 (관리자도 요구 목록에
//! 포함되어야 통과합니다).

use serde::{Deserialize, Serialize};

/// 사용자 역할.
///
/// JSON/DB에는 소문자(`user`, `moderator`, `admin`)로 저장되며,
/// 역직렬화 시 대문자 표기(`ADMIN`)도 허용합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// 일반 사용자 (기본값)
    #[default]
    #[serde(alias = "USER", alias = "User")]
    User,
    /// 모더레이터
    #[serde(alias = "MODERATOR", alias = "Moderator")]
    Moderator,
    /// 관리자
    #[serde(alias = "ADMIN", alias = "Admin")]
    Admin,
}

impl Role {
    /// 모든 역할 (선언 순서).
    pub const ALL: [Role; 3] = [Role::User, Role::Moderator, Role::Admin];

    /// 문자열에서 역할 파싱 (대소문자 무시, 앞뒤 공백 무시).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "user" => Some(Role::User),
            "moderator" => Some(Role::Moderator),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// 저장/전송용 소문자 이름.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Moderator => "moderator",
            Role::Admin => "admin",
        }
    }

    /// 요구 역할 목록 중 하나라도 일치하는지 확인 (OR 정책).
    pub fn is_any_of(&self, required: &[Role]) -> bool {
        required.contains(self)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 알 수 없는 역할 이름.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}' (expected one of: user, moderator, admin)")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| UnknownRole(s.to_string()))
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// 역할 목록을 `admin, moderator` 형태로 표시.
pub fn format_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
