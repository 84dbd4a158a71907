//! 설정 관리.
//!
//! 기본값 → 설정 파일(선택) → 환경 변수 순서로 덮어쓰며 로드합니다.
//! 환경 변수는 `WARDEN` 접두사와 `__` 구분자를 사용합니다
//! (예: `WARDEN__AUTH__JWT_SECRET`, `WARDEN__SERVER__PORT`).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// 개발 환경용 기본 JWT 시크릿. 운영 환경에서는 반드시 교체해야 합니다.
pub const DEV_JWT_SECRET: &str = "dev-secret-key-change-in-production";

/// 애플리케이션 설정.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// 서버 설정
    #[serde(default)]
    pub server: ServerConfig,
    /// 인증 설정
    #[serde(default)]
    pub auth: AuthConfig,
    /// 데이터베이스 설정
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
    /// 인메모리 사용자 저장소 초기 데이터 (DB 미설정 시 사용)
    #[serde(default)]
    pub users: Vec<SeedUser>,
}

/// 서버 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 바인딩할 호스트
    pub host: String,
    /// 리스닝할 포트
    pub port: u16,
    /// 요청 타임아웃 (초)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl ServerConfig {
    /// `host:port` 형식의 바인딩 주소.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 인증 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// 토큰 서명/검증에 사용하는 공유 시크릿
    #[serde(default)]
    pub jwt_secret: String,
    /// Access Token 만료 시간 (분)
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: i64,
    /// exp/nbf 검증 시 허용 오차 (초)
    #[serde(default)]
    pub leeway_secs: u64,
    /// 토큰 발급자 (설정 시 iss 클레임 검증)
    #[serde(default)]
    pub issuer: Option<String>,
}

fn default_token_ttl() -> i64 {
    60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_minutes: default_token_ttl(),
            leeway_secs: 0,
            issuer: None,
        }
    }
}

impl AuthConfig {
    /// 시크릿이 비어 있으면 개발용 기본값을 반환합니다.
    pub fn effective_secret(&self) -> &str {
        if self.jwt_secret.trim().is_empty() {
            DEV_JWT_SECRET
        } else {
            &self.jwt_secret
        }
    }

    /// 개발용 기본 시크릿을 사용 중인지 확인.
    pub fn is_default_secret(&self) -> bool {
        self.effective_secret() == DEV_JWT_SECRET
    }
}

/// 데이터베이스 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL 연결 URL. 없으면 인메모리 저장소를 사용합니다.
    #[serde(default)]
    pub url: Option<String>,
    /// 최대 연결 수
    pub max_connections: u32,
    /// 연결 타임아웃 (초)
    pub connect_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warden_api=info,tower_http=debug".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// 초기 사용자 레코드.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SeedUser {
    pub email: String,
    pub password: String,
    /// 역할 이름 (user, moderator, admin). 생략 시 user
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    ///
    /// 파일이 없어도 에러가 아닙니다 (기본값 + 환경 변수만 사용).
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(
                config::Environment::with_prefix("WARDEN")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load("config/default.toml")
    }

    /// 값 범위 검증.
    pub fn validate(&self) -> CoreResult<()> {
        if self.auth.token_ttl_minutes <= 0 {
            return Err(CoreError::InvalidConfig(format!(
                "auth.token_ttl_minutes must be positive (got {})",
                self.auth.token_ttl_minutes
            )));
        }
        if self.database.max_connections == 0 {
            return Err(CoreError::InvalidConfig(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.users.iter().any(|u| u.email.trim().is_empty()) {
            return Err(CoreError::InvalidConfig(
                "users[].email must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
