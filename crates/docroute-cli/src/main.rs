//! DocRoute CLI
//!
//! Command-line interface for resolving document routes and maintaining the
//! persisted URL entries of a content tree

mod config;

use anyhow::Context;
use clap::{Parser, Subcommand};
use docroute_core::ContentKey;
use docroute_core::memory::ContentFixture;
use docroute_observability::{Metrics, init_logging};
use docroute_routing::{DocumentUrlService, RouteResolver, UrlSegmentProviderCollection};
use docroute_store_sqlite::SqliteUrlStore;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::config::CliConfig;

#[derive(Parser)]
#[command(name = "docroute")]
#[command(about = "DocRoute - document route resolution and URL maintenance", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (YAML or TOML)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "DOCROUTE_CONFIG",
        default_value = "~/.docroute/config.yaml",
        global = true
    )]
    config: String,

    /// Content tree fixture (overrides `content.fixture`)
    #[arg(long, value_name = "FILE", global = true)]
    fixture: Option<String>,

    /// Print Prometheus metrics after the command
    #[arg(long, global = true)]
    print_metrics: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a document's route from the content tree
    Resolve {
        /// Document key
        key: ContentKey,

        /// Culture, invariant when omitted
        #[arg(long)]
        culture: Option<String>,

        /// Resolve the draft version
        #[arg(long)]
        draft: bool,
    },
    /// Rebuild all persisted URL entries
    Rebuild {
        /// Rebuild even if the stored entries are up to date
        #[arg(long)]
        force: bool,
    },
    /// Report whether the persisted URL entries need a rebuild
    Check,
    /// Get a document's URL, stored or live
    Get {
        /// Document key
        key: ContentKey,

        #[arg(long)]
        culture: Option<String>,

        #[arg(long)]
        draft: bool,
    },
    /// Delete persisted URL entries of a document
    Delete {
        /// Document key
        key: ContentKey,

        #[arg(long)]
        culture: Option<String>,

        #[arg(long)]
        draft: bool,

        /// Delete every entry of the document
        #[arg(long, conflicts_with_all = ["culture", "draft"])]
        all: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = CliConfig::load(&cli.config).await?;
    config.merge_env();
    if let Some(fixture) = cli.fixture {
        config.content.fixture = Some(fixture);
    }

    init_logging(&config.logging).context("Failed to initialize logging")?;

    let metrics = Arc::new(Metrics::new()?);
    let service = build_service(&config, metrics.clone()).await?;

    match cli.command {
        Commands::Resolve {
            key,
            culture,
            draft,
        } => {
            let route = service
                .resolver()
                .resolve_route(key, draft, culture.as_deref(), None)
                .await?;
            match route {
                Some(route) => {
                    println!("{}", route.path);
                    if let Some(ancestor) = route.ancestor_key {
                        println!("domain root: {}", ancestor);
                    }
                }
                None => println!("unroutable"),
            }
        }
        Commands::Rebuild { force } => {
            if !force && !service.should_rebuild_urls().await? {
                info!("URL entries are up to date");
                println!("up to date");
            } else {
                let (cancel_tx, cancel_rx) = watch::channel(false);
                tokio::spawn(async move {
                    if tokio::signal::ctrl_c().await.is_ok() {
                        warn!("Interrupt received, stopping rebuild after current document");
                        let _ = cancel_tx.send(true);
                    }
                });

                let stats = service.rebuild_all_urls_with_cancel(cancel_rx).await?;
                println!("{}", serde_json::to_string_pretty(&stats)?);

                if !stats.failures.is_empty() {
                    anyhow::bail!("{} URL entries failed to rebuild", stats.failures.len());
                }
            }
        }
        Commands::Check => {
            if service.should_rebuild_urls().await? {
                println!("rebuild required");
            } else {
                println!("up to date");
            }
        }
        Commands::Get {
            key,
            culture,
            draft,
        } => match service.get_url(key, culture.as_deref(), None, draft).await? {
            Some(path) => println!("{}", path),
            None => println!("unroutable"),
        },
        Commands::Delete {
            key,
            culture,
            draft,
            all,
        } => {
            if all {
                let removed = service.delete_urls(key).await?;
                println!("deleted {} entries", removed);
            } else {
                let removed = service
                    .delete_url(key, culture.as_deref(), None, draft)
                    .await?;
                println!("deleted {} entries", u8::from(removed));
            }
        }
    }

    if cli.print_metrics {
        print!("{}", metrics.encode_text()?);
    }

    Ok(())
}

/// Wire the content fixture, SQLite store and routing configuration together
async fn build_service(config: &CliConfig, metrics: Arc<Metrics>) -> anyhow::Result<DocumentUrlService> {
    let fixture_path = config
        .content
        .fixture
        .as_deref()
        .context("No content fixture configured (content.fixture, DOCROUTE_FIXTURE or --fixture)")?;
    let fixture_path = shellexpand::tilde(fixture_path).to_string();

    let fixture = ContentFixture::from_file(&fixture_path)
        .with_context(|| format!("Failed to load content fixture {}", fixture_path))?;
    let (tree, domains) = fixture.into_collaborators();
    let tree = Arc::new(tree);
    info!("Loaded {} content nodes from {}", tree.len(), fixture_path);

    let store_path = shellexpand::tilde(&config.store.path).to_string();
    let store = Arc::new(SqliteUrlStore::new(store_path).await?);

    let resolver = RouteResolver::new(
        tree.clone(),
        tree.clone(),
        Arc::new(domains),
        UrlSegmentProviderCollection::with_slug_config(config.slug.clone()),
        config.routing.clone(),
    )
    .with_metrics(metrics.clone());

    Ok(DocumentUrlService::new(Arc::new(resolver), store)
        .with_tree_lock(tree.tree_lock())
        .with_metrics(metrics))
}
