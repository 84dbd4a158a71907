//! Users Repository
//!
//! 사용자 레코드 조회를 담당합니다. 역할 가드는 [`UserLookup`] trait을 통해
//! 매 요청마다 현재 역할을 읽으며, 구현체로 PostgreSQL 저장소와
//! 메모리 저장소(개발/테스트용)를 제공합니다.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use tokio::sync::RwLock;
use warden_core::SeedUser;

use crate::auth::Role;

// ================================================================================================
// Types
// ================================================================================================

/// 사용자 레코드
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[sqlx(default)]
    pub name: Option<String>,
    #[sqlx(default)]
    pub avatar_url: Option<String>,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// 새 레코드 생성 (ID는 UUID v4).
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.into(),
            password: password.into(),
            name: None,
            avatar_url: None,
            role,
            created_at: now,
            updated_at: now,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// 사용자 저장소 에러
#[derive(Debug, thiserror::Error)]
pub enum UserStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("invalid seed user '{email}': {reason}")]
    InvalidSeed { email: String, reason: String },
}

/// 이메일로 사용자 조회.
///
/// 역할 가드가 의존하는 유일한 저장소 기능입니다. 캐시 없이 매번 저장소를
/// 조회해야 역할 변경이 즉시 반영됩니다.
#[async_trait]
pub trait UserLookup: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError>;
}

// ================================================================================================
// PostgreSQL Repository
// ================================================================================================

const USER_COLUMNS: &str = r#"
    id, email, password, name,
    "avatarUrl" AS avatar_url,
    role::text AS role,
    "createdAt" AT TIME ZONE 'UTC' AS created_at,
    "updatedAt" AT TIME ZONE 'UTC' AS updated_at
"#;

/// PostgreSQL `"User"` 테이블 저장소
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 이메일로 사용자 조회
    pub async fn fetch_by_email(&self, email: &str) -> Result<Option<UserRecord>, sqlx::Error> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            r#"SELECT {USER_COLUMNS} FROM "User" WHERE email = $1"#
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

#[async_trait]
impl UserLookup for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError> {
        Ok(self.fetch_by_email(email).await?)
    }
}

// ================================================================================================
// In-memory Store
// ================================================================================================

/// 메모리 사용자 저장소.
///
/// 데이터베이스 없이 실행할 때와 테스트에서 사용합니다. 이메일을 키로 사용합니다.
#[derive(Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 설정의 시드 사용자로 저장소 생성 (이메일은 소문자로 정규화).
    pub fn from_seed(seed: &[SeedUser]) -> Result<Self, UserStoreError> {
        let mut users = HashMap::with_capacity(seed.len());
        for entry in seed {
            let role = match entry.role.as_deref() {
                Some(raw) => raw.parse::<Role>().map_err(|e| UserStoreError::InvalidSeed {
                    email: entry.email.clone(),
                    reason: e.to_string(),
                })?,
                None => Role::default(),
            };

            let email = entry.email.trim().to_lowercase();
            let mut record = UserRecord::new(email, &entry.password, role);
            record.name = entry.name.clone();
            users.insert(record.email.clone(), record);
        }

        Ok(Self {
            users: RwLock::new(users),
        })
    }

    /// 사용자 추가 (같은 이메일이면 교체).
    pub async fn insert(&self, record: UserRecord) {
        self.users.write().await.insert(record.email.clone(), record);
    }

    /// 사용자 역할 변경. 사용자가 없으면 false.
    pub async fn set_role(&self, email: &str, role: Role) -> bool {
        let mut users = self.users.write().await;
        match users.get_mut(email) {
            Some(record) => {
                record.role = role;
                record.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// 사용자 삭제. 사용자가 없으면 false.
    pub async fn remove(&self, email: &str) -> bool {
        self.users.write().await.remove(email).is_some()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserLookup for InMemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, UserStoreError> {
        Ok(self.users.read().await.get(email).cloned())
    }
}
