use async_trait::async_trait;
use reqwest::{header::LOCATION, redirect, StatusCode};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use hub_core::coordinator::{FetchOutcome, HubPage};
use hub_core::url_state::HubQuery;

use crate::error::ClientError;

const KNOWLEDGE_HUB_PATH: &str = "/v1/knowledge-hub";

/// Where a session gets its pages from.
#[async_trait]
pub trait HubBackend: Send + Sync {
    async fn fetch(&self, query: &HubQuery) -> Result<FetchOutcome, ClientError>;
}

/// Talks to the hub service over HTTP. Redirects are returned to the caller
/// rather than followed, so the session can rewrite its own query.
pub struct HttpBackend {
    client: reqwest::Client,
    base: Url,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(api_url: &str, token: Option<String>) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .redirect(redirect::Policy::none())
            .build()?;
        Ok(Self {
            client,
            base: Url::parse(api_url)?,
            token,
        })
    }

    pub fn page_url(&self, query: &HubQuery) -> Result<Url, ClientError> {
        let mut url = self.base.join(KNOWLEDGE_HUB_PATH)?;
        url.set_query(Some(&query.to_query_string()));
        Ok(url)
    }
}

#[async_trait]
impl HubBackend for HttpBackend {
    async fn fetch(&self, query: &HubQuery) -> Result<FetchOutcome, ClientError> {
        let url = self.page_url(query)?;
        debug!(url = %url, "fetching knowledge hub page");

        let mut request = self.client.get(url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let resp = request.send().await?;
        let status = resp.status();

        if status.is_redirection() {
            let location = resp
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .ok_or_else(|| ClientError::BadRedirect(status.to_string()))?;
            let query = redirect_query(&self.base, location, query.per_page)?;
            return Ok(FetchOutcome::Redirect { query });
        }

        if status.is_success() {
            let page: HubPage = resp.json().await?;
            return Ok(FetchOutcome::Page(page));
        }

        let body = resp.text().await.unwrap_or_default();
        Err(api_error(status, &body))
    }
}

/// Resolve a `Location` header against the service root and read the
/// query it carries.
fn redirect_query(base: &Url, location: &str, per_page: u32) -> Result<HubQuery, ClientError> {
    let target = base
        .join(location)
        .map_err(|_| ClientError::BadRedirect(location.to_string()))?;
    let raw = target
        .query()
        .ok_or_else(|| ClientError::BadRedirect(location.to_string()))?;
    Ok(HubQuery::parse(raw, per_page))
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn api_error(status: StatusCode, body: &str) -> ClientError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_default();
    ClientError::Api {
        status: status.as_u16(),
        message,
    }
}
