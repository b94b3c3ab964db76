use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("hub returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("redirect without a usable location: {0}")]
    BadRedirect(String),

    #[error("hub redirected twice for one request")]
    RedirectLoop,

    #[error("invalid hub url: {0}")]
    Url(#[from] url::ParseError),

    #[error("compare store: {0}")]
    Io(#[from] std::io::Error),

    #[error("compare store is not valid json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no data directory available for this user")]
    NoDataDir,
}

impl ClientError {
    /// Text shown to the user in place of the list.
    pub fn display_message(&self) -> String {
        match self {
            ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
            _ => "Failed to load media. Please try again.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_is_shown() {
        let err = ClientError::Api {
            status: 500,
            message: "Unexpected error".to_string(),
        };
        assert_eq!(err.display_message(), "Unexpected error");
        assert_eq!(err.to_string(), "hub returned 500: Unexpected error");
    }

    #[test]
    fn test_other_errors_use_generic_message() {
        let err = ClientError::RedirectLoop;
        assert_eq!(err.display_message(), "Failed to load media. Please try again.");
    }
}
