//! Response shapes for the catalog documents.
//!
//! Custom fields whose type varies per catalog deployment stay as raw JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use hub_core::facets::{FacetDef, FacetValueDef};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PagedList<T> {
    pub total_items: u64,
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetRef {
    pub id: String,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetValue {
    pub id: String,
    pub name: String,
    pub code: String,
    pub facet: FacetRef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductRef {
    pub id: String,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct ProductCustomFields {
    #[serde(rename = "formUrl")]
    pub form_url: Option<String>,
    #[serde(rename = "EmpowermentandLeadership")]
    pub empowerment_and_leadership: Option<Value>,
    pub industry: Option<Value>,
    pub business_stage: Option<Value>,
    pub processing_time: Option<Value>,
    pub registration_validity: Option<Value>,
    pub cost: Option<Value>,
    pub steps: Option<Value>,
    pub key_terms_of_service: Option<Value>,
    pub required_documents: Option<Value>,
    #[serde(default)]
    pub related_services: Option<Vec<ProductRef>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(default)]
    pub facet_values: Vec<FacetValue>,
    #[serde(default)]
    pub custom_fields: ProductCustomFields,
}

impl Product {
    /// Value names attached to this product under facet `code`.
    pub fn facet_names(&self, code: &str) -> Vec<&str> {
        self.facet_values
            .iter()
            .filter(|v| v.facet.code == code)
            .map(|v| v.name.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetValueItem {
    pub id: String,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Facet {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub values: Vec<FacetValueItem>,
}

impl From<Facet> for FacetDef {
    fn from(facet: Facet) -> Self {
        FacetDef {
            code: facet.code,
            name: facet.name,
            values: facet
                .values
                .into_iter()
                .map(|v| FacetValueDef {
                    code: v.code,
                    name: v.name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub partner: Option<String>,
    pub rating: Option<f64>,
    pub review_count: Option<i64>,
    #[serde(rename = "Cost")]
    pub cost: Option<Value>,
    pub duration: Option<Value>,
    pub logo_url: Option<String>,
    pub business_stage: Option<Value>,
    pub pricing_model: Option<Value>,
    pub service_category: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(flatten)]
    pub summary: CourseSummary,
    pub topic_title: Option<String>,
    pub skills_gained: Option<Value>,
    pub prerequisite: Option<Value>,
    pub course_timeline: Option<Value>,
    pub upon_completion: Option<Value>,
    pub start_date: Option<String>,
    pub key_highlights: Option<Value>,
    pub learning_objectives: Option<Value>,
    pub learning_outcomes: Option<Value>,
    pub resources: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Asset {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventCustomFields {
    pub event_registration_validity: Option<Value>,
    pub event_type: Option<Value>,
    pub event_start_date: Option<String>,
    pub event_time: Option<String>,
    pub event_end_date: Option<String>,
    pub registration_open_date: Option<String>,
    pub registration_close_date: Option<String>,
    pub virtual_event_link: Option<String>,
    pub event_tags: Option<Value>,
    pub event_category: Option<Value>,
    pub capacity: Option<Value>,
    pub event_objectives: Option<Value>,
    pub event_agenda: Option<Value>,
    #[serde(rename = "eventFAQ")]
    pub event_faq: Option<Value>,
    pub event_speakers: Option<Value>,
    pub event_tickets: Option<Value>,
    pub certificate_available: Option<Value>,
    pub resource_link: Option<String>,
    pub organiser: Option<Value>,
    pub event_location: Option<Value>,
    pub event_requirements: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub facet_values: Vec<FacetValue>,
    #[serde(default)]
    pub custom_fields: EventCustomFields,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: String,
    pub created_at: String,
    pub product: ProductRef,
}

/// Envelopes keyed by the root field of each document.
#[derive(Debug, Deserialize)]
pub(crate) struct ProductsData<T> {
    pub products: PagedList<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FacetsData {
    pub facets: FacetItems,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FacetItems {
    pub items: Vec<Facet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductData {
    pub product: Option<Product>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CoursesData {
    pub courses: PagedList<CourseSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CourseData {
    pub course: Option<Course>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToggleFavoriteData {
    pub toggle_favorite: PagedList<Favorite>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_deserializes_with_custom_fields() {
        let product: Product = serde_json::from_value(json!({
            "id": "12",
            "name": "Trade licence",
            "slug": "trade-licence",
            "description": "<p>Apply</p>",
            "facetValues": [
                {"id": "1", "name": "Licensing", "code": "licensing",
                 "facet": {"id": "f1", "name": "Service Category", "code": "service-category"}},
                {"id": "2", "name": "Government", "code": "gov",
                 "facet": {"id": "f2", "name": "Provided By", "code": "provided-by"}}
            ],
            "customFields": {
                "formUrl": "https://forms/1",
                "Cost": 250,
                "RequiredDocuments": ["Passport", "Lease"],
                "RelatedServices": [{"id": "9", "name": "Visa", "slug": "visa"}]
            }
        }))
        .unwrap();

        assert_eq!(product.facet_names("service-category"), vec!["Licensing"]);
        assert_eq!(product.custom_fields.form_url.as_deref(), Some("https://forms/1"));
        assert_eq!(product.custom_fields.cost, Some(json!(250)));
        assert_eq!(
            product.custom_fields.required_documents,
            Some(json!(["Passport", "Lease"]))
        );
        assert_eq!(product.custom_fields.related_services.unwrap()[0].slug, "visa");
    }

    #[test]
    fn test_facet_converts_to_definition() {
        let facet: Facet = serde_json::from_value(json!({
            "id": "f1", "name": "Business Stage", "code": "business-stage",
            "values": [{"id": "v1", "name": "Growth", "code": "growth"}]
        }))
        .unwrap();
        let def = FacetDef::from(facet);
        assert_eq!(def.code, "business-stage");
        assert_eq!(def.values[0].name, "Growth");
    }

    #[test]
    fn test_course_flattens_summary() {
        let course: Course = serde_json::from_value(json!({
            "id": "c1", "name": "Bookkeeping", "description": null,
            "partner": "Academy", "rating": 4.5, "reviewCount": 12,
            "Cost": "Free", "topicTitle": "Finance", "startDate": "2025-01-10"
        }))
        .unwrap();
        assert_eq!(course.summary.rating, Some(4.5));
        assert_eq!(course.summary.cost, Some(json!("Free")));
        assert_eq!(course.topic_title.as_deref(), Some("Finance"));
    }

    #[test]
    fn test_event_custom_fields() {
        let event: Event = serde_json::from_value(json!({
            "id": "e1", "name": "Founders meetup", "slug": "founders",
            "assets": [{"name": "banner.png"}],
            "customFields": {"eventStartDate": "2025-06-01", "eventFAQ": [{"q": "Cost?"}]}
        }))
        .unwrap();
        assert_eq!(event.custom_fields.event_start_date.as_deref(), Some("2025-06-01"));
        assert!(event.custom_fields.event_faq.is_some());
        assert!(event.facet_values.is_empty());
    }
}
