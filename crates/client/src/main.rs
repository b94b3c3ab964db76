use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use hub_core::compare::AddOutcome;
use hub_core::filters::FilterCategory;
use hub_core::types::{MarketplaceKind, MediaItem};
use hub_core::url_state::{HubQuery, DEFAULT_PER_PAGE};

mod backend;
mod compare_store;
mod debounce;
mod error;
mod session;

use backend::HttpBackend;
use compare_store::CompareStore;
use debounce::{SearchDebouncer, SEARCH_DEBOUNCE};
use session::{Applied, HubSession, SessionState};

#[derive(Debug, Parser)]
#[command(name = "hub")]
#[command(about = "Marketplace Hub client", version)]
struct Args {
    #[arg(long, env = "HUB_API_URL", default_value = "http://localhost:3000")]
    api_url: String,
    #[arg(long, env = "HUB_TOKEN")]
    token: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch one Knowledge Hub page and print it as JSON.
    Browse {
        /// Starting query string, e.g. "type=Video&page=2".
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long)]
        search: Option<String>,
        /// Sidebar label to toggle, as category=label. Repeatable.
        #[arg(long = "toggle", value_parser = parse_toggle)]
        toggles: Vec<(FilterCategory, String)>,
        #[arg(long)]
        clear_filters: bool,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,
    },
    /// Read search text from stdin, one line per keystroke burst, and print
    /// each page once the input settles.
    Watch {
        #[arg(long, default_value = "")]
        query: String,
        #[arg(long, default_value_t = DEFAULT_PER_PAGE)]
        per_page: u32,
    },
    /// Manage comparison selections.
    Compare {
        #[command(subcommand)]
        action: CompareAction,
    },
}

#[derive(Debug, Subcommand)]
enum CompareAction {
    List {
        #[arg(value_parser = parse_marketplace)]
        marketplace: MarketplaceKind,
    },
    Add {
        #[arg(value_parser = parse_marketplace)]
        marketplace: MarketplaceKind,
        id: String,
    },
    Remove {
        #[arg(value_parser = parse_marketplace)]
        marketplace: MarketplaceKind,
        id: String,
    },
    Clear {
        #[arg(value_parser = parse_marketplace)]
        marketplace: MarketplaceKind,
    },
}

fn parse_toggle(raw: &str) -> Result<(FilterCategory, String), String> {
    let (category, label) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected category=label, got {raw:?}"))?;
    let category = FilterCategory::from_id(category.trim())
        .ok_or_else(|| format!("unknown filter category {category:?}"))?;
    let label = label.trim();
    if label.is_empty() {
        return Err("filter label is empty".to_string());
    }
    Ok((category, label.to_string()))
}

fn parse_marketplace(raw: &str) -> Result<MarketplaceKind, String> {
    raw.parse::<MarketplaceKind>().map_err(|err| err.to_string())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageView<'a> {
    query: String,
    total_count: u64,
    total_pages: u32,
    items: &'a [MediaItem],
}

fn print_page(state: &SessionState) -> anyhow::Result<()> {
    let view = PageView {
        query: state.query.to_query_string(),
        total_count: state.total_count,
        total_pages: state.total_pages,
        items: &state.items,
    };
    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();

    match args.command {
        Command::Browse {
            query,
            search,
            toggles,
            clear_filters,
            page,
            per_page,
        } => {
            let backend = HttpBackend::new(&args.api_url, args.token)?;
            let session = HubSession::new(backend, HubQuery::parse(&query, per_page));
            if clear_filters {
                session.clear_filters();
            }
            for (category, label) in &toggles {
                session.toggle_filter(*category, label);
            }
            if let Some(text) = search {
                session.set_search(&text);
            }
            if let Some(page) = page {
                session.go_to_page(page);
            }
            info!(query = %session.query().to_query_string(), "browsing knowledge hub");
            session.refresh().await?;
            print_page(&session.snapshot())
        }
        Command::Watch { query, per_page } => {
            let backend = HttpBackend::new(&args.api_url, args.token)?;
            let session = Arc::new(HubSession::new(backend, HubQuery::parse(&query, per_page)));
            watch(session).await
        }
        Command::Compare { action } => compare(CompareStore::open_default()?, action).await,
    }
}

/// Each settled search starts its own fetch; only the newest one prints.
async fn watch(session: Arc<HubSession<HttpBackend>>) -> anyhow::Result<()> {
    let (debouncer, mut settled) = SearchDebouncer::spawn(SEARCH_DEBOUNCE);

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            debouncer.input(line);
        }
    });

    let mut fetches = Vec::new();
    while let Some(text) = settled.recv().await {
        if !session.set_search(&text) {
            continue;
        }
        let session = Arc::clone(&session);
        fetches.push(tokio::spawn(async move {
            match session.refresh().await {
                Ok(Applied::Page) => {
                    if let Err(err) = print_page(&session.snapshot()) {
                        warn!(error = %err, "failed to print page");
                    }
                }
                Ok(Applied::Stale) => {}
                Err(err) => eprintln!("{}", err.display_message()),
            }
        }));
    }

    for fetch in fetches {
        fetch.await?;
    }
    Ok(())
}

async fn compare(store: CompareStore, action: CompareAction) -> anyhow::Result<()> {
    debug!(path = %store.path().display(), "using compare store");
    match action {
        CompareAction::List { marketplace } => {
            let set = store.list(marketplace).await?;
            println!("{}", serde_json::to_string(&set)?);
        }
        CompareAction::Add { marketplace, id } => match store.add(marketplace, &id).await? {
            AddOutcome::Added => println!("added {id} to {marketplace} comparison"),
            AddOutcome::AlreadyPresent => println!("{id} is already being compared"),
            AddOutcome::Full => anyhow::bail!("comparison for {marketplace} is full"),
        },
        CompareAction::Remove { marketplace, id } => {
            if !store.remove(marketplace, &id).await? {
                println!("{id} was not being compared");
            }
        }
        CompareAction::Clear { marketplace } => store.clear(marketplace).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_browse_with_all_options() {
        let args = Args::try_parse_from([
            "hub",
            "--api-url", "https://hub.example.com",
            "--token", "tok_123",
            "browse",
            "--query", "type=Video",
            "--search", "tax",
            "--toggle", "mediaType=News",
            "--toggle", "category=Finance",
            "--page", "2",
            "--per-page", "12",
        ]).unwrap();

        assert_eq!(args.api_url, "https://hub.example.com");
        assert_eq!(args.token.as_deref(), Some("tok_123"));
        match args.command {
            Command::Browse { query, search, toggles, clear_filters, page, per_page } => {
                assert_eq!(query, "type=Video");
                assert_eq!(search.as_deref(), Some("tax"));
                assert_eq!(
                    toggles,
                    vec![
                        (FilterCategory::MediaType, "News".to_string()),
                        (FilterCategory::Domain, "Finance".to_string()),
                    ]
                );
                assert!(!clear_filters);
                assert_eq!(page, Some(2));
                assert_eq!(per_page, 12);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_browse_defaults() {
        let args = Args::try_parse_from(["hub", "browse"]).unwrap();

        assert_eq!(args.api_url, "http://localhost:3000");
        match args.command {
            Command::Browse { query, toggles, per_page, page, .. } => {
                assert!(query.is_empty());
                assert!(toggles.is_empty());
                assert_eq!(per_page, DEFAULT_PER_PAGE);
                assert_eq!(page, None);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_bad_toggle_fails() {
        let result = Args::try_parse_from(["hub", "browse", "--toggle", "colour=Blue"]);
        assert!(result.is_err());

        let result = Args::try_parse_from(["hub", "browse", "--toggle", "format"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_compare_add() {
        let args = Args::try_parse_from(["hub", "compare", "add", "financial", "prod_1"]).unwrap();
        match args.command {
            Command::Compare {
                action: CompareAction::Add { marketplace, id },
            } => {
                assert_eq!(marketplace, MarketplaceKind::Financial);
                assert_eq!(id, "prod_1");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_compare_unknown_marketplace_fails() {
        let result = Args::try_parse_from(["hub", "compare", "list", "gallery"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_subcommand_fails() {
        let result = Args::try_parse_from(["hub"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_toggle_trims() {
        assert_eq!(
            parse_toggle("popularity = Trending").unwrap(),
            (FilterCategory::Popularity, "Trending".to_string())
        );
        assert!(parse_toggle("format=  ").is_err());
    }
}
