//! Marketplace filter configuration built from catalog facets.

use serde::{Deserialize, Serialize};

use crate::types::MarketplaceKind;
use crate::CoreError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterOption {
    pub id: String,
    pub name: String,
}

impl FilterOption {
    /// Option whose id is the slugged name ("Quick Reads" -> "quick-reads").
    pub fn from_name(name: &str) -> Self {
        Self {
            id: slug(name),
            name: name.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FilterGroup {
    pub id: String,
    pub title: String,
    pub options: Vec<FilterOption>,
}

impl FilterGroup {
    pub fn from_labels(id: &str, title: &str, labels: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            options: labels.iter().map(|l| FilterOption::from_name(l)).collect(),
        }
    }
}

/// A backend facet with its values, as returned by the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetDef {
    pub code: String,
    pub name: String,
    pub values: Vec<FacetValueDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FacetValueDef {
    pub code: String,
    pub name: String,
}

const BUSINESS_STAGE_ORDER: [&str; 6] = [
    "Ideation",
    "Launch",
    "Growth",
    "Expansion",
    "Optimisation",
    "Transformation",
];

/// Facet codes rendered as filters for each marketplace.
pub fn facet_codes(kind: MarketplaceKind) -> &'static [&'static str] {
    match kind {
        MarketplaceKind::Financial | MarketplaceKind::BusinessServices => &[
            "service-category",
            "service-type",
            "entity-type",
            "provided-by",
        ],
        MarketplaceKind::Courses => &[
            "service-category",
            "delivery-mode",
            "duration",
            "business-stage",
            "provided-by",
        ],
        MarketplaceKind::Events => &[
            "time-range",
            "event-type",
            "delivery-mode",
            "cost-type",
            "duration-band",
            "language",
            "capability",
            "business-stage",
            "industry",
            "organizer",
        ],
        MarketplaceKind::KnowledgeHub | MarketplaceKind::NonFinancial => &[
            "service-category",
            "business-stage",
            "provided-by",
            "pricing-model",
        ],
    }
}

/// Turn catalog facets into sidebar groups for a marketplace.
///
/// Business-stage options follow the lifecycle order; names outside it sort
/// after, alphabetically.
pub fn groups_from_facets(kind: MarketplaceKind, facets: &[FacetDef]) -> Vec<FilterGroup> {
    let codes = facet_codes(kind);
    facets
        .iter()
        .filter(|facet| codes.contains(&facet.code.as_str()))
        .map(|facet| {
            let mut options: Vec<FilterOption> = facet
                .values
                .iter()
                .map(|v| FilterOption {
                    id: v.code.clone(),
                    name: v.name.clone(),
                })
                .collect();

            if facet.code == "business-stage" {
                options.sort_by(|a, b| {
                    let rank = |name: &str| BUSINESS_STAGE_ORDER.iter().position(|s| *s == name);
                    match (rank(&a.name), rank(&b.name)) {
                        (Some(x), Some(y)) => x.cmp(&y),
                        (Some(_), None) => std::cmp::Ordering::Less,
                        (None, Some(_)) => std::cmp::Ordering::Greater,
                        (None, None) => a.name.cmp(&b.name),
                    }
                });
            }

            FilterGroup {
                id: facet.code.clone(),
                title: facet.name.clone(),
                options,
            }
        })
        .collect()
}

/// Resolve the sidebar for a marketplace given the outcome of the facet
/// query. Marketplaces that require backend facets fail instead of using
/// the static fallback.
pub fn resolve_groups<E: std::fmt::Display>(
    kind: MarketplaceKind,
    facets: Result<Vec<FacetDef>, E>,
    fallback: impl FnOnce() -> Vec<FilterGroup>,
) -> Result<Vec<FilterGroup>, CoreError> {
    match facets {
        Ok(facets) => {
            let groups = groups_from_facets(kind, &facets);
            if kind == MarketplaceKind::Events && groups.is_empty() {
                return Err(CoreError::invalid(
                    "facets",
                    "event filters could not be loaded from backend",
                ));
            }
            Ok(groups)
        }
        Err(err) if kind.requires_backend_facets() => Err(CoreError::invalid(
            "facets",
            format!("failed to load {kind} filters: {err}"),
        )),
        Err(err) => {
            tracing::warn!(marketplace = %kind, error = %err, "facet query failed, using fallback filters");
            Ok(fallback())
        }
    }
}

/// Static sidebars for marketplaces that tolerate a facet outage.
pub fn fallback_groups(kind: MarketplaceKind) -> Vec<FilterGroup> {
    match kind {
        MarketplaceKind::NonFinancial | MarketplaceKind::BusinessServices => vec![
            FilterGroup::from_labels(
                "category",
                "Service Category",
                &[
                    "Consultancy",
                    "Technology",
                    "Research",
                    "Export",
                ],
            ),
            FilterGroup::from_labels(
                "serviceType",
                "Service Type",
                &["Advisory", "Implementation", "Information", "Program"],
            ),
            FilterGroup::from_labels(
                "deliveryMode",
                "Delivery Mode",
                &["Online", "In-person", "Hybrid"],
            ),
        ],
        MarketplaceKind::KnowledgeHub => crate::filters::knowledge_hub_config(&[]),
        // no static config; these marketplaces require backend facets
        MarketplaceKind::Financial | MarketplaceKind::Courses | MarketplaceKind::Events => {
            Vec::new()
        }
    }
}

pub fn slug(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .to_lowercase()
}
