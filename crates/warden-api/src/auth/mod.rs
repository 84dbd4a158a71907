//! 인증 기본 요소.
//!
//! JWT 발급/검증과 사용자 역할 정의를 제공합니다. 요청 단위의 허용/거부
//! 판단은 [`crate::guards`]가 담당합니다.
//!
//! # 구성 요소
//!
//! - [`Claims`]: JWT 페이로드 구조체
//! - [`TokenVerifier`]: 공유 시크릿 기반 토큰 검증기
//! - [`TokenIssuer`]: 로그인 시 Access Token 발급
//! - [`Role`]: 사용자 역할 (User, Moderator, Admin)

mod jwt;
mod roles;

pub use jwt::{Claims, IssuedToken, JwtError, TokenIssuer, TokenVerifier, VerifyError};
pub use roles::{format_roles, Role, UnknownRole};
