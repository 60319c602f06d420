//! Sea-ORM entities for the two-table schema: `team` and `member`.

pub mod member;
pub mod team;
