//! Postgres access for the marketplace hub.

pub mod models;
pub mod queries;
mod source;

pub use source::PgMediaSource;

const UNIQUE_VIOLATION: &str = "23505";

/// True when `err` is a Postgres unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db| db.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}
