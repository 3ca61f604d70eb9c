//! Docs-Harvest main entry point
//!
//! This is the command-line interface for the Docs-Harvest documentation crawler.

use anyhow::Context;
use clap::Parser;
use docs_harvest::config::{load_config_with_hash, Config, CrawlTarget};
use docs_harvest::crawler::CrawlCoordinator;
use docs_harvest::loader::loader_factory;
use docs_harvest::output::FsDocumentStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Docs-Harvest: a breadth-first documentation crawler
///
/// Docs-Harvest crawls product documentation sites level by level, extracts
/// the main content of every page, and writes one Markdown document per page
/// into a folder per product.
#[derive(Parser, Debug)]
#[command(name = "docs-harvest")]
#[command(version)]
#[command(about = "A breadth-first documentation crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long)]
    dry_run: bool,

    /// Only crawl the named product (repeatable)
    #[arg(long = "product", value_name = "NAME")]
    products: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration before logging: the log file lives in the output folder
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    let targets = select_targets(&config, &cli.products)?;

    if cli.dry_run {
        setup_logging(cli.verbose, cli.quiet, None)?;
        handle_dry_run(&config, &targets);
        return Ok(());
    }

    let base_folder = config.output.base_folder().to_path_buf();
    std::fs::create_dir_all(&base_folder).with_context(|| {
        format!("Failed to create output folder {}", base_folder.display())
    })?;

    setup_logging(
        cli.verbose,
        cli.quiet,
        Some((&base_folder, config.output.log_file.as_str())),
    )?;

    tracing::info!("Configuration loaded from {} (hash: {})", cli.config.display(), config_hash);

    handle_crawl(config, targets).await;

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
///
/// Console output always; when `log_file` is given the same events are also
/// appended, without colors, to that file.
fn setup_logging(verbose: u8, quiet: bool, log_file: Option<(&Path, &str)>) -> anyhow::Result<()> {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docs_harvest=info,warn"),
            1 => EnvFilter::new("docs_harvest=debug,info"),
            2 => EnvFilter::new("docs_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false);

    let file_layer = log_file.map(|(dir, name)| {
        fmt::layer()
            .with_writer(RollingFileAppender::new(Rotation::NEVER, dir, name))
            .with_ansi(false)
            .with_target(true)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

/// Every configured target, or only those named with `--product`
fn select_targets(config: &Config, products: &[String]) -> anyhow::Result<Vec<CrawlTarget>> {
    let targets = config.targets();
    if products.is_empty() {
        return Ok(targets);
    }

    for name in products {
        if !targets.iter().any(|t| &t.product == name) {
            anyhow::bail!("Product '{}' is not configured", name);
        }
    }

    Ok(targets
        .into_iter()
        .filter(|t| products.contains(&t.product))
        .collect())
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, targets: &[CrawlTarget]) {
    println!("=== Docs-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Loader: {:?}", config.crawler.loader);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages per product: {}", config.crawler.max_pages_per_product);
    println!("  Page load timeout: {}ms", config.crawler.page_load_timeout_ms);
    println!("  Render wait: {}ms", config.crawler.render_wait_ms);
    println!("  Element timeout: {}ms", config.crawler.element_timeout_ms);
    println!(
        "  Settle: legacy {}ms, trailhead {}ms",
        config.crawler.legacy_settle_ms, config.crawler.trailhead_settle_ms
    );

    println!("\nOutput:");
    println!("  Base folder: {}", config.output.base_folder().display());
    println!("  404 log: {}", config.output.skipped_404_path().display());
    println!("  Summary: {}", config.output.summary_path().display());
    println!("  Link graph: {}", config.output.graph_path().display());

    println!("\nAllowed Domains ({}):", config.filter.allowed_domains.len());
    for domain in &config.filter.allowed_domains {
        println!("  - {}", domain);
    }

    println!("\nProducts ({}):", targets.len());
    for target in targets {
        println!(
            "  - {} -> {} ({} seeds)",
            target.product,
            config.output.product_folder(&target.product).display(),
            target.seed_urls.len()
        );
        println!("    prefixes: {}", config.prefixes_for(&target.product).join(", "));
        for seed in &target.seed_urls {
            println!("    * {}", seed);
        }
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would start crawling with {} seed URLs",
        targets.iter().map(|t| t.seed_urls.len()).sum::<usize>()
    );
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, targets: Vec<CrawlTarget>) {
    let seed_count: usize = targets.iter().map(|t| t.seed_urls.len()).sum();
    tracing::info!(
        "Products: {}, total seed URLs: {}, loader: {:?}",
        targets.len(),
        seed_count,
        config.crawler.loader
    );

    let loaders = loader_factory(&config.crawler);
    let coordinator = CrawlCoordinator::new(config, loaders, Arc::new(FsDocumentStore));
    let metrics = coordinator.run(targets).await;

    let pages: u64 = metrics.values().map(|m| m.links_processed).sum();
    tracing::info!(
        "Crawl completed: {} pages saved, {} URLs claimed",
        pages,
        coordinator.registry().len()
    );
}
