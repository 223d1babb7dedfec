use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pdf_fts::context::{AppContext, StoreMode};
use pdf_fts::extract::PdfExtractor;
use pdf_fts::index::{IndexSynchronizer, ScanPipeline, stats};
use pdf_fts::output;
use pdf_fts::query::QueryEngine;
use pdf_fts::utils::{AppConfig, get_config_path};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pdf-fts")]
#[command(version, about = "Incremental full-text search over PDF collections")]
struct Cli {
    /// Enable diagnostic logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan folders and index new or changed PDFs
    Scan {
        /// Folders to scan
        #[arg(default_value = ".")]
        folders: Vec<PathBuf>,

        /// Re-extract every document, ignoring stored fingerprints
        #[arg(short, long)]
        force: bool,
    },
    /// Search indexed pages (FTS5 query syntax)
    Search {
        /// Query words, joined by spaces
        #[arg(required = true)]
        query: Vec<String>,

        /// Maximum number of pages to show
        #[arg(short, long, default_value_t = 5)]
        limit: usize,
    },
    /// Interactive search as you type
    #[cfg(feature = "tui")]
    Live,
    /// Drop and repopulate the full-text index from stored pages
    RebuildFts,
    /// Show database statistics and index consistency
    Stats,
    /// Show the effective configuration
    Config {
        /// Write the current settings to the config file
        #[arg(long)]
        init: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = is_interactive(&cli.command);
    init_logging(cli.verbose, interactive)?;

    let config = AppConfig::load().context("Failed to load configuration")?;
    let cwd = std::env::current_dir().context("Failed to read current directory")?;

    match cli.command {
        Commands::Scan { folders, force } => {
            let mut ctx = AppContext::open(config, &cwd, StoreMode::OpenOrCreate)
                .context("Failed to open database")?;
            let extractor = PdfExtractor::new();
            ScanPipeline::new(&mut ctx, &extractor).run(&folders, force);
        }
        Commands::Search { query, limit } => {
            let ctx = AppContext::open(config, &cwd, StoreMode::MustExist)?;
            let query = query.join(" ");
            let engine = QueryEngine::new(
                &ctx.store,
                &ctx.config.search_snippet,
                &ctx.config.live_snippet,
            );
            let hits = engine.search(&query, limit)?;
            output::print_search_results(&query, &hits, &ctx.config.search_snippet)?;
        }
        #[cfg(feature = "tui")]
        Commands::Live => {
            let ctx = AppContext::open(config, &cwd, StoreMode::MustExist)?;
            pdf_fts::tui::run(ctx)?;
        }
        Commands::RebuildFts => {
            let mut ctx = AppContext::open(config, &cwd, StoreMode::MustExist)?;
            println!("Rebuilding FTS index...");
            let entries = IndexSynchronizer::new(&mut ctx.store)
                .rebuild()
                .context("Failed to rebuild FTS index")?;
            println!("FTS index rebuilt successfully ({} entries).", entries);
        }
        Commands::Stats => {
            let mut ctx = AppContext::open(config, &cwd, StoreMode::MustExist)?;
            stats::show_stats(&mut ctx)?;
        }
        Commands::Config { init } => {
            if init {
                let path = config.save().context("Failed to write configuration")?;
                println!("Wrote configuration to {}", path.display());
            } else {
                match get_config_path() {
                    Some(path) if path.exists() => println!("# {}", path.display()),
                    Some(path) => println!("# {} (not present, using defaults)", path.display()),
                    None => println!("# no config directory available, using defaults"),
                }
                println!("{}", serde_json::to_string_pretty(&config)?);
            }
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn is_interactive(command: &Commands) -> bool {
    matches!(command, Commands::Live)
}

#[cfg(not(feature = "tui"))]
fn is_interactive(_command: &Commands) -> bool {
    false
}

/// `RUST_LOG` wins; otherwise `--verbose` enables debug output for this crate.
/// While the TUI owns the terminal, logs go to a file (verbose) or nowhere.
fn init_logging(verbose: bool, interactive: bool) -> Result<()> {
    let default = if verbose { "warn,pdf_fts=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if !interactive {
        builder.with_writer(std::io::stderr).init();
    } else if verbose {
        let file = std::fs::File::create("pdf-fts-debug.log")
            .context("Failed to create pdf-fts-debug.log")?;
        builder
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(file))
            .init();
    } else {
        builder.with_writer(std::io::sink).init();
    }
    Ok(())
}
