//! Member/team search over Sea-ORM.
//!
//! Optional filters (username, team name, age range) are turned into a
//! `member LEFT JOIN team` query that is served in three shapes: a full
//! list, a page with a counted total, and a page whose count query is
//! skipped when the content already determines the total.

pub mod config;
pub mod entity;
pub mod error;
pub mod migration;
pub mod models;
pub mod openapi;
pub mod pagination;
pub mod queries;
pub mod repository;
pub mod routes;
pub mod seed;

use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;

pub use error::ApiError;
pub use models::{MemberSearchCondition, MemberTeamDto};
pub use pagination::{Page, Pageable};
pub use repository::{MemberRepository, MemberSearch};

/// Connects to `database_url` and brings the schema up to date.
///
/// # Errors
///
/// Connection or migration failures.
pub async fn setup_database(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

/// The HTTP application.
pub fn app(db: DatabaseConnection) -> axum::Router {
    routes::router(db)
}
