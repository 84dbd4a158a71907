//! Repository pattern for user persistence.
//!
//! 사용자 저장소 접근 로직을 가드와 라우트 핸들러에서 분리하여 관리합니다.

pub mod users;

pub use users::{InMemoryUserStore, PgUserRepository, UserLookup, UserRecord, UserStoreError};
