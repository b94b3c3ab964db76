//! GraphQL product catalog: products, facets, courses, events and
//! bookmarks.

mod client;
pub mod documents;
mod error;
pub mod schema;

pub use client::CatalogClient;
pub use error::CatalogError;
