//! 비즈니스 서비스 모듈.

pub mod auth;

pub use auth::{AuthService, AuthServiceError};
