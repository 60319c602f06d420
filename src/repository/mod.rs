//! Member persistence: basic lookups in [`members`] and the dynamic search in
//! [`search`].

pub mod members;
pub mod search;

use sea_orm::DatabaseConnection;

pub use search::{MemberSearch, search_condition};

/// Repository over the `member` and `team` tables.
///
/// Cloning is cheap; the connection is a shared pool handle.
#[derive(Clone, Debug)]
pub struct MemberRepository {
    db: DatabaseConnection,
}

impl MemberRepository {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    #[must_use]
    pub const fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}
