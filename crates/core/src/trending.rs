//! Trending relabelling for a fetched page of Knowledge Hub items.
//!
//! The threshold is the 75th percentile of the page's non-zero view counts,
//! so the label depends on which page was fetched.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;

use crate::types::{MediaItem, Popularity};

/// Trailing window of `media_views` rows that count towards trending.
pub const VIEW_WINDOW_DAYS: i64 = 7;
/// Items published within this many days may be labelled Latest.
pub const RECENT_DAYS: i64 = 30;

pub fn views_since(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(VIEW_WINDOW_DAYS)
}

/// `sorted[floor(0.75 * (n - 1))]` over the non-zero counts, 0 when none.
pub fn p75_threshold<I>(counts: I) -> u64
where
    I: IntoIterator<Item = u64>,
{
    let mut non_zero: Vec<u64> = counts.into_iter().filter(|c| *c > 0).collect();
    if non_zero.is_empty() {
        return 0;
    }
    non_zero.sort_unstable();
    let idx = (0.75 * (non_zero.len() - 1) as f64).floor() as usize;
    non_zero[idx]
}

/// Relabel items in place from their view counts.
///
/// At or above the threshold with at least one view: Trending. Below it,
/// with some views and published within [`RECENT_DAYS`]: Latest. Everything
/// else keeps its stored label.
pub fn relabel(items: &mut [MediaItem], views: &HashMap<String, u64>, now: DateTime<Utc>) {
    let threshold = p75_threshold(items.iter().map(|m| views.get(&m.id).copied().unwrap_or(0)));
    let recent_cutoff = now - Duration::days(RECENT_DAYS);

    for item in items.iter_mut() {
        let count = views.get(&item.id).copied().unwrap_or(0);
        if count == 0 {
            continue;
        }
        if count >= threshold {
            item.popularity = Some(Popularity::Trending.label().to_string());
        } else if item.published_at.is_some_and(|p| p >= recent_cutoff) {
            item.popularity = Some(Popularity::Latest.label().to_string());
        }
    }
}

/// Relabel, then keep only Trending items.
pub fn derive_trending(
    mut items: Vec<MediaItem>,
    views: &HashMap<String, u64>,
    now: DateTime<Utc>,
) -> Vec<MediaItem> {
    relabel(&mut items, views, now);
    items
        .into_iter()
        .filter(|m| m.has_popularity(Popularity::Trending))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Provider;

    fn item(id: &str, published_days_ago: i64, now: DateTime<Utc>) -> MediaItem {
        MediaItem {
            id: id.to_string(),
            title: format!("Item {id}"),
            description: String::new(),
            media_type: "Article".to_string(),
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
            published_at: Some(now - Duration::days(published_days_ago)),
            updated_at: None,
        }
    }

    #[test]
    fn test_p75_uses_floor_index() {
        assert_eq!(p75_threshold([1, 2, 9]), 2);
        assert_eq!(p75_threshold([9, 1, 2, 0, 0]), 2);
        assert_eq!(p75_threshold([4]), 4);
        assert_eq!(p75_threshold([1, 2, 3, 4, 5]), 4);
    }

    #[test]
    fn test_p75_of_nothing_is_zero() {
        assert_eq!(p75_threshold(Vec::<u64>::new()), 0);
        assert_eq!(p75_threshold([0, 0]), 0);
    }

    #[test]
    fn test_page_of_twelve_with_three_viewed_items() {
        let now = Utc::now();
        let items: Vec<MediaItem> = (0..12).map(|i| item(&format!("m{i}"), 90, now)).collect();
        let views = HashMap::from([
            ("m1".to_string(), 1),
            ("m4".to_string(), 2),
            ("m7".to_string(), 9),
        ]);

        let trending = derive_trending(items, &views, now);
        let ids: Vec<&str> = trending.iter().map(|m| m.id.as_str()).collect();
        // threshold is sorted[floor(0.75 * 2)] = sorted[1] = 2
        assert_eq!(ids, vec!["m4", "m7"]);
    }

    #[test]
    fn test_recent_items_below_threshold_become_latest() {
        let now = Utc::now();
        let mut items = vec![
            item("new", 3, now),
            item("old", 200, now),
            item("hot", 3, now),
            item("hotter", 3, now),
        ];
        // sorted [1, 1, 40, 50], threshold sorted[2] = 40
        let views = HashMap::from([
            ("new".to_string(), 1),
            ("old".to_string(), 1),
            ("hot".to_string(), 40),
            ("hotter".to_string(), 50),
        ]);

        relabel(&mut items, &views, now);
        assert_eq!(items[0].popularity.as_deref(), Some("Latest"));
        assert_eq!(items[1].popularity, None);
        assert_eq!(items[2].popularity.as_deref(), Some("Trending"));
    }

    #[test]
    fn test_unviewed_items_keep_stored_label() {
        let now = Utc::now();
        let mut items = vec![item("a", 1, now)];
        items[0].popularity = Some("Editor's Pick".to_string());
        relabel(&mut items, &HashMap::new(), now);
        assert_eq!(items[0].popularity.as_deref(), Some("Editor's Pick"));
    }

    #[test]
    fn test_stored_trending_label_survives_without_views() {
        let now = Utc::now();
        let mut stored = item("a", 1, now);
        stored.popularity = Some("trending".to_string());
        let result = derive_trending(vec![stored], &HashMap::new(), now);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_views_since_is_seven_days_back() {
        let now = Utc::now();
        assert_eq!(now - views_since(now), Duration::days(7));
    }
}
