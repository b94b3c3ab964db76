use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::warn;

use hub_core::compare::{AddOutcome, ComparisonBook, ComparisonSet};
use hub_core::types::MarketplaceKind;

use crate::error::ClientError;

const COMPARE_FILE: &str = "compare.json";

/// Comparison selections persisted as one JSON object keyed by marketplace.
pub struct CompareStore {
    path: PathBuf,
}

impl CompareStore {
    /// Store under the user's data directory.
    pub fn open_default() -> Result<Self, ClientError> {
        let dirs = ProjectDirs::from("", "marketplace-hub", "hub").ok_or(ClientError::NoDataDir)?;
        Ok(Self::at(dirs.data_dir().join(COMPARE_FILE)))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing files read as empty. Unreadable contents are logged and
    /// treated as empty so a bad file never blocks browsing.
    pub async fn load(&self) -> Result<ComparisonBook, ClientError> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(ComparisonBook::default()),
            Err(err) => return Err(err.into()),
        };

        let stored: BTreeMap<String, Vec<String>> = match serde_json::from_slice(&raw) {
            Ok(stored) => stored,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "ignoring unreadable compare store");
                return Ok(ComparisonBook::default());
            }
        };

        let mut book = ComparisonBook::default();
        for (kind, ids) in stored {
            match kind.parse::<MarketplaceKind>() {
                Ok(kind) => book.set(kind, ComparisonSet::from_stored(ids)),
                Err(_) => warn!(marketplace = %kind, "dropping compare ids for unknown marketplace"),
            }
        }
        Ok(book)
    }

    pub async fn save(&self, book: &ComparisonBook) -> Result<(), ClientError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(book)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    pub async fn list(&self, kind: MarketplaceKind) -> Result<ComparisonSet, ClientError> {
        Ok(self.load().await?.get(kind))
    }

    pub async fn add(&self, kind: MarketplaceKind, id: &str) -> Result<AddOutcome, ClientError> {
        let mut book = self.load().await?;
        let outcome = book.update(kind, |set| set.add(id));
        if outcome == AddOutcome::Added {
            self.save(&book).await?;
        }
        Ok(outcome)
    }

    pub async fn remove(&self, kind: MarketplaceKind, id: &str) -> Result<bool, ClientError> {
        let mut book = self.load().await?;
        let removed = book.update(kind, |set| set.remove(id));
        if removed {
            self.save(&book).await?;
        }
        Ok(removed)
    }

    pub async fn clear(&self, kind: MarketplaceKind) -> Result<(), ClientError> {
        let mut book = self.load().await?;
        book.update(kind, |set| set.clear());
        self.save(&book).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rt() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn scratch(name: &str) -> CompareStore {
        let dir = std::env::temp_dir().join(format!("hub-compare-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        CompareStore::at(dir.join(COMPARE_FILE))
    }

    #[test]
    fn test_missing_file_is_empty() {
        rt().block_on(async {
            let store = scratch("missing");
            let set = store.list(MarketplaceKind::Courses).await.unwrap();
            assert!(set.is_empty());
        });
    }

    #[test]
    fn test_add_caps_at_three_per_marketplace() {
        rt().block_on(async {
            let store = scratch("cap");
            let kind = MarketplaceKind::Financial;

            for id in ["f1", "f2", "f3"] {
                assert_eq!(store.add(kind, id).await.unwrap(), AddOutcome::Added);
            }
            assert_eq!(store.add(kind, "f4").await.unwrap(), AddOutcome::Full);
            assert_eq!(store.add(kind, "f2").await.unwrap(), AddOutcome::AlreadyPresent);
            assert_eq!(
                store.add(MarketplaceKind::Courses, "c1").await.unwrap(),
                AddOutcome::Added
            );

            let set = store.list(kind).await.unwrap();
            assert_eq!(set.ids(), ["f1", "f2", "f3"]);
            assert_eq!(store.list(MarketplaceKind::Courses).await.unwrap().ids(), ["c1"]);
        });
    }

    #[test]
    fn test_remove_and_clear() {
        rt().block_on(async {
            let store = scratch("remove");
            let kind = MarketplaceKind::Events;
            store.add(kind, "e1").await.unwrap();
            store.add(kind, "e2").await.unwrap();

            assert!(store.remove(kind, "e1").await.unwrap());
            assert!(!store.remove(kind, "e1").await.unwrap());
            assert_eq!(store.list(kind).await.unwrap().ids(), ["e2"]);

            store.clear(kind).await.unwrap();
            assert!(store.list(kind).await.unwrap().is_empty());
        });
    }

    #[test]
    fn test_load_cleans_stored_ids() {
        rt().block_on(async {
            let store = scratch("clean");
            std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            std::fs::write(
                store.path(),
                r#"{"courses":["c1","c1","","c2","c3","c4"],"gallery":["g1"]}"#,
            )
            .unwrap();

            let book = store.load().await.unwrap();
            assert_eq!(book.get(MarketplaceKind::Courses).ids(), ["c1", "c2", "c3"]);
            assert_eq!(
                serde_json::to_string(&book).unwrap(),
                r#"{"courses":["c1","c2","c3"]}"#
            );
        });
    }

    #[test]
    fn test_corrupt_file_reads_as_empty() {
        rt().block_on(async {
            let store = scratch("corrupt");
            std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
            std::fs::write(store.path(), "not json").unwrap();

            let book = store.load().await.unwrap();
            assert_eq!(book, ComparisonBook::default());
        });
    }
}
