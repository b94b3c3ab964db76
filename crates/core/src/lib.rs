//! Shared domain logic for the marketplace hub: Knowledge Hub URL state,
//! filter translation, pagination, trending derivation, polls, moderation
//! and comparison selections.

pub mod compare;
pub mod config;
pub mod coordinator;
pub mod facets;
pub mod filters;
pub mod moderation;
pub mod pagination;
pub mod polls;
pub mod sequence;
pub mod trending;
pub mod types;
pub mod url_state;

#[cfg(test)]
mod coordinator_tests;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

impl CoreError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        CoreError::Invalid {
            field,
            message: message.into(),
        }
    }
}
