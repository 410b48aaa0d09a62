//! bulksel CLI application entry point
//!
//! # Usage
//!
//! ```bash
//! # Load scraped leads
//! bulksel import leads.csv
//!
//! # Page through one run's new leads
//! bulksel list --run run-42 --status new --pages 2
//!
//! # Convert everything in a run except two leads
//! bulksel convert --run run-42 --all --except L000000000003 L000000000009
//!
//! # Preview the payload for an explicit selection
//! bulksel convert --ids L000000000001 L000000000002 --dry-run
//! ```
//!
//! # Configuration
//!
//! Configuration is stored in the user's config directory
//! (`~/.config/bulksel/config.toml` on Linux) and can be overridden with
//! `BULKSEL_*` environment variables. Logging goes to stderr and honours
//! `RUST_LOG`.

use bulksel::{
    BulkselError,
    cli::{Cli, Commands, ConfigCommands},
    commands::{self, convert::ConvertOptions, convert::Selection},
    config::AppConfig,
    store::LeadStore,
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

type Result<T> = std::result::Result<T, BulkselError>;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "bulksel=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn handle_config_command(
    mut config: AppConfig,
    command: &ConfigCommands,
    quiet: bool,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            if !quiet {
                println!("# {}", AppConfig::config_path()?.display());
            }
            let rendered = toml::to_string_pretty(&config)
                .map_err(|e| BulkselError::InvalidInput(format!("Failed to render config: {e}")))?;
            print!("{rendered}");
        }
        ConfigCommands::SetDb { path } => {
            config.set_database(path.clone())?;
            if !quiet {
                println!("Lead store set to {}", path.display());
            }
        }
        ConfigCommands::SetPageSize { page_size } => {
            config.set_page_size(*page_size)?;
            if !quiet {
                println!("Page size set to {page_size}");
            }
        }
    }
    Ok(())
}

fn open_store(cli_db: Option<&Path>, config: &AppConfig) -> Result<LeadStore> {
    let db_path = match cli_db {
        Some(path) => path.to_path_buf(),
        None => config.database_path()?,
    };
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    Ok(LeadStore::open(&db_path)?)
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose);

    let config = AppConfig::load()?;
    let quiet = cli.quiet || config.quiet;
    let db = cli.db.as_deref();

    match cli.command {
        Commands::Config { command } => handle_config_command(config, &command, quiet)?,
        Commands::Import { file } => {
            let store = open_store(db, &config)?;
            commands::import(&store, &file, quiet)?;
        }
        Commands::List {
            filter,
            pages,
            page_size,
        } => {
            let store = open_store(db, &config)?;
            commands::list(
                &store,
                filter.to_filter(),
                pages.max(1),
                page_size.unwrap_or(config.page_size),
                quiet,
            )?;
        }
        Commands::Convert {
            filter,
            selection,
            except,
            page_size,
            dry_run,
            yes,
        } => {
            let store = open_store(db, &config)?;
            let selection = if selection.all {
                Selection::All { except }
            } else if selection.page {
                Selection::Page { except }
            } else {
                Selection::Ids(selection.ids)
            };
            let options = ConvertOptions {
                page_size: page_size.unwrap_or(config.page_size),
                dry_run,
                confirm: config.confirm_bulk && !yes,
                quiet,
            };
            commands::convert(&store, filter.to_filter(), &selection, options)?;
        }
        Commands::Contacts => {
            let store = open_store(db, &config)?;
            commands::contacts(&store, quiet)?;
        }
    }

    Ok(())
}
