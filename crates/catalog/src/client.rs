use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use hub_core::facets::FacetDef;

use crate::documents;
use crate::error::CatalogError;
use crate::schema::{
    Course, CourseData, CourseSummary, CoursesData, Event, FacetsData, Favorite, PagedList,
    Product, ProductData, ProductsData, ToggleFavoriteData,
};

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorItem>,
}

#[derive(Debug, Deserialize)]
struct GraphQlErrorItem {
    message: String,
}

/// Client for the GraphQL product catalog.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    endpoint: String,
}

impl CatalogClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn products(&self) -> Result<PagedList<Product>, CatalogError> {
        let data: ProductsData<Product> = self.execute(documents::GET_PRODUCTS, json!({}), None).await?;
        Ok(data.products)
    }

    pub async fn product(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        let data: ProductData = self
            .execute(documents::GET_PRODUCT, json!({ "id": id }), None)
            .await?;
        Ok(data.product)
    }

    pub async fn facets(&self) -> Result<Vec<FacetDef>, CatalogError> {
        let data: FacetsData = self.execute(documents::GET_FACETS, json!({}), None).await?;
        Ok(data.facets.items.into_iter().map(FacetDef::from).collect())
    }

    pub async fn courses(&self) -> Result<PagedList<CourseSummary>, CatalogError> {
        let data: CoursesData = self.execute(documents::GET_ALL_COURSES, json!({}), None).await?;
        Ok(data.courses)
    }

    pub async fn course(&self, id: &str) -> Result<Option<Course>, CatalogError> {
        let data: CourseData = self
            .execute(documents::GET_COURSE, json!({ "id": id }), None)
            .await?;
        Ok(data.course)
    }

    pub async fn events(&self) -> Result<PagedList<Event>, CatalogError> {
        let data: ProductsData<Event> = self.execute(documents::GET_ALL_EVENTS, json!({}), None).await?;
        Ok(data.products)
    }

    /// Toggle a bookmark for the customer identified by `bearer`.
    pub async fn toggle_favorite(
        &self,
        product_id: &str,
        bearer: &str,
    ) -> Result<PagedList<Favorite>, CatalogError> {
        let data: ToggleFavoriteData = self
            .execute(
                documents::TOGGLE_FAVORITE,
                json!({ "productId": product_id }),
                Some(bearer),
            )
            .await?;
        Ok(data.toggle_favorite)
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: Value,
        bearer: Option<&str>,
    ) -> Result<T, CatalogError> {
        let mut request = self.http.post(&self.endpoint).json(&GraphQlRequest { query, variables });
        if let Some(token) = bearer {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), endpoint = %self.endpoint, "catalog request rejected");
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body: GraphQlResponse = resp.json().await?;
        debug!(errors = body.errors.len(), "catalog response received");
        decode(body)
    }
}

fn decode<T: DeserializeOwned>(body: GraphQlResponse) -> Result<T, CatalogError> {
    if !body.errors.is_empty() {
        return Err(CatalogError::GraphQl(
            body.errors.into_iter().map(|e| e.message).collect(),
        ));
    }
    match body.data {
        Some(Value::Null) | None => Err(CatalogError::MissingData),
        Some(data) => Ok(serde_json::from_value(data)?),
    }
}
