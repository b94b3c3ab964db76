use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use hub_core::polls::{PollMetadata, PollOption};
use hub_core::types::{Author, MediaItem, Provider};

pub const DEFAULT_PROVIDER_NAME: &str = "Knowledge Hub";

/// Card columns of `v_media_public`. Full bodies are only read for the
/// description fallback.
#[derive(Debug, Clone, FromRow)]
pub struct MediaRow {
    pub id: String,
    pub title: String,
    pub summary: Option<String>,
    pub body_html: Option<String>,
    pub article_body_html: Option<String>,
    #[sqlx(rename = "type")]
    pub media_type: String,
    pub domain: Option<String>,
    pub business_stage: Option<String>,
    pub format: Option<String>,
    pub popularity: Option<String>,
    pub provider_name: Option<String>,
    pub provider_logo_url: Option<String>,
    pub authors: Option<Json<serde_json::Value>>,
    pub thumbnail_url: Option<String>,
    pub image_url: Option<String>,
    pub report_document_url: Option<String>,
    pub tool_document_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl MediaRow {
    pub fn into_media_item(self) -> MediaItem {
        let description = non_blank(self.summary.as_deref())
            .map(str::to_string)
            .unwrap_or_else(|| {
                let html = non_blank(self.body_html.as_deref())
                    .or_else(|| non_blank(self.article_body_html.as_deref()))
                    .unwrap_or_default();
                strip_html(html)
            });

        let authors = self
            .authors
            .and_then(|Json(value)| serde_json::from_value::<Vec<Author>>(value).ok())
            .unwrap_or_default();

        MediaItem {
            id: self.id,
            title: self.title,
            description,
            media_type: self.media_type,
            domain: non_empty(self.domain),
            business_stage: non_empty(self.business_stage),
            format: non_empty(self.format),
            popularity: non_empty(self.popularity),
            provider: Provider {
                name: non_empty(self.provider_name)
                    .unwrap_or_else(|| DEFAULT_PROVIDER_NAME.to_string()),
                logo_url: non_empty(self.provider_logo_url),
            },
            authors,
            image_url: non_empty(self.thumbnail_url).or_else(|| non_empty(self.image_url)),
            download_url: non_empty(self.report_document_url)
                .or_else(|| non_empty(self.tool_document_url)),
            tags: self.tags.unwrap_or_default(),
            published_at: self.published_at,
            updated_at: self.updated_at,
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Drop tags, collapse whitespace, trim.
pub fn strip_html(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => {
                in_tag = true;
                text.push(' ');
            }
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Debug, Clone, FromRow)]
pub struct ViewCount {
    pub media_id: String,
    pub views: i64,
}

/// The parts of a community post that polls care about.
#[derive(Debug, Clone, FromRow)]
pub struct PollPost {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub metadata: Option<Json<serde_json::Value>>,
}

impl PollPost {
    pub fn poll_metadata(&self) -> PollMetadata {
        self.metadata
            .as_ref()
            .and_then(|Json(value)| serde_json::from_value(value.clone()).ok())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PollOptionRow {
    pub id: String,
    pub post_id: String,
    pub option_text: String,
    pub vote_count: i32,
    pub created_at: DateTime<Utc>,
}

impl From<PollOptionRow> for PollOption {
    fn from(row: PollOptionRow) -> Self {
        PollOption {
            id: row.id,
            option_text: row.option_text,
            vote_count: i64::from(row.vote_count),
        }
    }
}

/// Signed-in user resolved from a session token hash.
#[derive(Debug, Clone, FromRow)]
pub struct SessionUser {
    pub user_id: String,
    pub email: String,
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> MediaRow {
        MediaRow {
            id: "m1".to_string(),
            title: "Cash flow basics".to_string(),
            summary: None,
            body_html: None,
            article_body_html: None,
            media_type: "Article".to_string(),
            domain: Some("Finance".to_string()),
            business_stage: None,
            format: Some(String::new()),
            popularity: None,
            provider_name: None,
            provider_logo_url: None,
            authors: None,
            thumbnail_url: None,
            image_url: None,
            report_document_url: None,
            tool_document_url: None,
            tags: None,
            published_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <b>world</b></p>\n<p>again</p>"),
            "Hello world again"
        );
        assert_eq!(strip_html("plain   text"), "plain text");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_summary_wins_over_body() {
        let mut r = row();
        r.summary = Some("  Short summary ".to_string());
        r.body_html = Some("<p>Body</p>".to_string());
        assert_eq!(r.into_media_item().description, "Short summary");
    }

    #[test]
    fn test_description_falls_back_to_bodies() {
        let mut r = row();
        r.summary = Some("   ".to_string());
        r.article_body_html = Some("<h1>Article</h1> body".to_string());
        assert_eq!(r.into_media_item().description, "Article body");
    }

    #[test]
    fn test_defaults_and_fallbacks() {
        let mut r = row();
        r.image_url = Some("https://cdn/img.png".to_string());
        r.tool_document_url = Some("https://cdn/tool.xlsx".to_string());
        let item = r.into_media_item();

        assert_eq!(item.provider.name, "Knowledge Hub");
        assert_eq!(item.image_url.as_deref(), Some("https://cdn/img.png"));
        assert_eq!(item.download_url.as_deref(), Some("https://cdn/tool.xlsx"));
        assert_eq!(item.format, None);
        assert!(item.tags.is_empty());
        assert!(item.authors.is_empty());
    }

    #[test]
    fn test_thumbnail_preferred_and_authors_parsed() {
        let mut r = row();
        r.thumbnail_url = Some("thumb".to_string());
        r.image_url = Some("full".to_string());
        r.authors = Some(Json(serde_json::json!([
            {"name": "Ada", "photo_url": "a.png"},
            {"name": "Lin", "title": "Analyst"}
        ])));
        let item = r.into_media_item();
        assert_eq!(item.image_url.as_deref(), Some("thumb"));
        assert_eq!(item.authors.len(), 2);
        assert_eq!(item.authors[0].photo_url.as_deref(), Some("a.png"));
    }

    #[test]
    fn test_malformed_authors_are_ignored() {
        let mut r = row();
        r.authors = Some(Json(serde_json::json!({"unexpected": true})));
        assert!(r.into_media_item().authors.is_empty());
    }

    #[test]
    fn test_poll_metadata_parsing() {
        let post = PollPost {
            id: "p1".to_string(),
            created_at: Utc::now(),
            metadata: Some(Json(serde_json::json!({"poll_duration_days": 3, "other": 1}))),
        };
        assert_eq!(post.poll_metadata().poll_duration_days, Some(3));

        let empty = PollPost {
            id: "p2".to_string(),
            created_at: Utc::now(),
            metadata: None,
        };
        assert_eq!(empty.poll_metadata(), PollMetadata::default());
    }
}
