//! 공통 에러 타입.

use thiserror::Error;

/// 설정/부트스트랩 단계의 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// 설정 로드/역직렬화 실패
    #[error("설정 에러: {0}")]
    Config(#[from] config::ConfigError),

    /// 설정 값이 허용 범위를 벗어남
    #[error("잘못된 설정: {0}")]
    InvalidConfig(String),

    /// 로깅 초기화 실패
    #[error("로깅 초기화 실패: {0}")]
    Logging(String),
}

/// warden-core 작업을 위한 Result 타입.
pub type CoreResult<T> = Result<T, CoreError>;
