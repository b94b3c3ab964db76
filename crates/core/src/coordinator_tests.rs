//! Tests for the Knowledge Hub coordinator against an in-memory source

#[cfg(test)]
mod tests {
    use super::super::coordinator::*;
    use super::super::types::{MediaItem, Provider};
    use super::super::url_state::HubQuery;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Debug, thiserror::Error)]
    #[error("source offline")]
    struct Offline;

    struct FakeSource {
        rows: Vec<MediaItem>,
        views: Option<HashMap<String, u64>>,
        fail_page: bool,
        requested: Mutex<Vec<HubQuery>>,
    }

    impl FakeSource {
        fn with_rows(count: usize) -> Self {
            let now = Utc::now();
            Self {
                rows: (0..count).map(|i| media(&format!("m{i}"), now)).collect(),
                views: Some(HashMap::new()),
                fail_page: false,
                requested: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MediaSource for FakeSource {
        type Error = Offline;

        async fn fetch_page(&self, query: &HubQuery) -> Result<MediaPage, Offline> {
            self.requested.lock().unwrap().push(query.clone());
            if self.fail_page {
                return Err(Offline);
            }
            let (from, to) = query.row_range();
            let items = self
                .rows
                .iter()
                .skip(from as usize)
                .take((to - from + 1) as usize)
                .cloned()
                .collect();
            Ok(MediaPage {
                items,
                total_count: self.rows.len() as u64,
            })
        }

        async fn view_counts(
            &self,
            ids: &[String],
            _since: DateTime<Utc>,
        ) -> Result<HashMap<String, u64>, Offline> {
            let views = self.views.as_ref().ok_or(Offline)?;
            Ok(ids
                .iter()
                .filter_map(|id| views.get(id).map(|v| (id.clone(), *v)))
                .collect())
        }
    }

    fn media(id: &str, now: DateTime<Utc>) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: String::new(),
            media_type: "Report".to_string(),
            domain: None,
            business_stage: None,
            format: None,
            popularity: None,
            provider: Provider {
                name: "Knowledge Hub".to_string(),
                logo_url: None,
            },
            authors: Vec::new(),
            image_url: None,
            download_url: None,
            tags: Vec::new(),
            published_at: Some(now - Duration::days(120)),
            updated_at: None,
        }
    }

    fn rt() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    #[test]
    fn test_returns_requested_page_with_exact_count() {
        rt().block_on(async {
            let hub = KnowledgeHub::new(FakeSource::with_rows(20));
            let query = HubQuery::parse("page=2&perPage=9", 9);

            match hub.fetch(&query, Utc::now()).await.unwrap() {
                FetchOutcome::Page(page) => {
                    assert_eq!(page.items.len(), 9);
                    assert_eq!(page.items[0].id, "m9");
                    assert_eq!(page.total_count, 20);
                    assert_eq!(page.total_pages, 3);
                    assert_eq!(page.page, 2);
                }
                other => panic!("expected a page, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_out_of_range_page_redirects_once_to_last_page() {
        rt().block_on(async {
            let hub = KnowledgeHub::new(FakeSource::with_rows(20));
            let query = HubQuery::parse("q=tax&page=8&perPage=9", 9);

            let redirect = match hub.fetch(&query, Utc::now()).await.unwrap() {
                FetchOutcome::Redirect { query } => query,
                other => panic!("expected a redirect, got {other:?}"),
            };
            assert_eq!(redirect.page, 3);
            assert_eq!(redirect.search, "tax");

            let second = hub.fetch(&redirect, Utc::now()).await.unwrap();
            assert!(matches!(second, FetchOutcome::Page(ref p) if p.page == 3 && p.items.len() == 2));
        });
    }

    #[test]
    fn test_empty_result_never_redirects() {
        rt().block_on(async {
            let hub = KnowledgeHub::new(FakeSource::with_rows(0));
            let query = HubQuery::parse("page=40", 9);

            match hub.fetch(&query, Utc::now()).await.unwrap() {
                FetchOutcome::Page(page) => {
                    assert!(page.items.is_empty());
                    assert_eq!(page.total_count, 0);
                    assert_eq!(page.page, 40);
                }
                other => panic!("expected an empty page, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_trending_filters_page_and_overrides_count() {
        rt().block_on(async {
            let mut source = FakeSource::with_rows(12);
            source.views = Some(HashMap::from([
                ("m0".to_string(), 1),
                ("m5".to_string(), 3),
                ("m6".to_string(), 8),
                ("m9".to_string(), 20),
            ]));
            let hub = KnowledgeHub::new(source);
            let query = HubQuery::parse("popularity=Trending&perPage=12", 9);

            match hub.fetch(&query, Utc::now()).await.unwrap() {
                FetchOutcome::Page(page) => {
                    // sorted [1, 3, 8, 20], threshold sorted[2] = 8
                    let ids: Vec<&str> = page.items.iter().map(|m| m.id.as_str()).collect();
                    assert_eq!(ids, vec!["m6", "m9"]);
                    assert_eq!(page.total_count, 2);
                    assert!(page.items.iter().all(|m| m.popularity.as_deref() == Some("Trending")));
                }
                other => panic!("expected a page, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_trending_survives_view_count_failure() {
        rt().block_on(async {
            let mut source = FakeSource::with_rows(4);
            source.views = None;
            source.rows[2].popularity = Some("Trending".to_string());
            let hub = KnowledgeHub::new(source);
            let query = HubQuery::parse("popularity=Trending", 9);

            match hub.fetch(&query, Utc::now()).await.unwrap() {
                FetchOutcome::Page(page) => {
                    assert_eq!(page.items.len(), 1);
                    assert_eq!(page.items[0].id, "m2");
                    assert_eq!(page.total_count, 1);
                }
                other => panic!("expected a page, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_non_trending_popularity_keeps_server_count() {
        rt().block_on(async {
            let hub = KnowledgeHub::new(FakeSource::with_rows(15));
            let query = HubQuery::parse("popularity=Most%20Downloaded", 9);

            match hub.fetch(&query, Utc::now()).await.unwrap() {
                FetchOutcome::Page(page) => assert_eq!(page.total_count, 15),
                other => panic!("expected a page, got {other:?}"),
            }
        });
    }

    #[test]
    fn test_source_error_propagates() {
        rt().block_on(async {
            let mut source = FakeSource::with_rows(3);
            source.fail_page = true;
            let hub = KnowledgeHub::new(source);

            let result = hub.fetch(&HubQuery::default(), Utc::now()).await;
            assert!(result.is_err());
            assert_eq!(hub.source().requested.lock().unwrap().len(), 1);
        });
    }
}
