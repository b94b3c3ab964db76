use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("catalog returned HTTP {0}")]
    Status(u16),
    #[error("catalog query failed: {}", .0.join("; "))]
    GraphQl(Vec<String>),
    #[error("catalog response has no data")]
    MissingData,
    #[error("catalog response did not match the query: {0}")]
    Decode(#[from] serde_json::Error),
}
