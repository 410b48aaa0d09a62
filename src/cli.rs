//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for bulksel using the `clap` crate.
//!
//! # Commands
//!
//! - **import**: Load leads from a CSV file
//! - **list**: Page through leads matching a filter
//! - **convert**: Select leads and bulk-convert them into contacts
//! - **contacts**: List converted contacts
//! - **config**: Show or change configuration
//!
//! # Examples
//!
//! ```bash
//! bulksel import leads.csv
//! bulksel list --run run-42 --pages 3
//! bulksel convert --run run-42 --all --except L000000000007
//! bulksel convert --ids L000000000001 L000000000002 --dry-run
//! ```

use crate::store::{LeadFilter, LeadStatus};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Top-level CLI
#[derive(Parser, Debug)]
#[command(name = "bulksel", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Lead store path (overrides config)
    #[arg(long = "db", value_name = "PATH", global = true)]
    pub db: Option<PathBuf>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Parse arguments from the process command line
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Shared filter arguments
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Only leads from this scraping run
    #[arg(short = 'r', long = "run", value_name = "RUN_ID")]
    pub run_id: Option<String>,

    /// Only leads with this status (new, contacted, converted, discarded)
    #[arg(short = 's', long = "status", value_name = "STATUS")]
    pub status: Option<LeadStatus>,

    /// Case-insensitive regex over name, email and company
    #[arg(short = 'S', long = "search", value_name = "PATTERN")]
    pub search: Option<String>,
}

impl FilterArgs {
    /// Build the store filter these arguments describe
    #[must_use]
    pub fn to_filter(&self) -> LeadFilter {
        LeadFilter {
            run_id: self.run_id.clone(),
            status: self.status,
            search: self.search.clone(),
        }
    }
}

/// How the convert command builds its selection
#[derive(Args, Debug, Clone, Default)]
#[group(required = true, multiple = false)]
pub struct SelectionArgs {
    /// Select every lead matching the filter
    #[arg(long = "all")]
    pub all: bool,

    /// Select the first page of matching leads
    #[arg(long = "page")]
    pub page: bool,

    /// Select these lead ids
    #[arg(long = "ids", value_name = "ID", num_args = 1..)]
    pub ids: Vec<String>,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Import leads from a CSV file (header: name,email,company,run_id)
    #[command(visible_alias = "i")]
    Import {
        /// CSV file to read
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// List leads matching a filter
    #[command(visible_alias = "ls")]
    List {
        #[command(flatten)]
        filter: FilterArgs,

        /// Number of pages to load
        #[arg(short = 'p', long = "pages", value_name = "N", default_value_t = 1)]
        pages: usize,

        /// Rows per page (overrides config)
        #[arg(long = "page-size", value_name = "N")]
        page_size: Option<usize>,
    },

    /// Convert selected leads into contacts
    #[command(visible_alias = "c")]
    Convert {
        #[command(flatten)]
        filter: FilterArgs,

        #[command(flatten)]
        selection: SelectionArgs,

        /// With --all or --page: leave these lead ids out
        #[arg(short = 'x', long = "except", value_name = "ID", num_args = 1..)]
        except: Vec<String>,

        /// Rows per page (overrides config)
        #[arg(long = "page-size", value_name = "N")]
        page_size: Option<usize>,

        /// Show what would be submitted without converting
        #[arg(short = 'n', long = "dry-run")]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// List converted contacts
    Contacts,

    /// Manage configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Set the lead store path
    SetDb {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },

    /// Set the default page size
    SetPageSize {
        #[arg(value_name = "N")]
        page_size: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_list_with_filter() {
        let cli = Cli::try_parse_from([
            "bulksel", "list", "--run", "r1", "--status", "new", "--pages", "3",
        ])
        .unwrap();
        match cli.command {
            Commands::List { filter, pages, .. } => {
                assert_eq!(pages, 3);
                let f = filter.to_filter();
                assert_eq!(f.run_id.as_deref(), Some("r1"));
                assert_eq!(f.status, Some(LeadStatus::New));
                assert!(f.search.is_none());
            }
            other => panic!("Expected List, got {other:?}"),
        }
    }

    #[test]
    fn test_convert_requires_selection() {
        assert!(Cli::try_parse_from(["bulksel", "convert", "--run", "r1"]).is_err());
    }

    #[test]
    fn test_convert_selection_modes_are_exclusive() {
        assert!(Cli::try_parse_from(["bulksel", "convert", "--all", "--ids", "a"]).is_err());
    }

    #[test]
    fn test_convert_all_except() {
        let cli = Cli::try_parse_from([
            "bulksel", "-q", "convert", "--all", "--except", "a", "b", "--yes",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Commands::Convert {
                selection,
                except,
                yes,
                ..
            } => {
                assert!(selection.all);
                assert_eq!(except, vec!["a", "b"]);
                assert!(yes);
            }
            other => panic!("Expected Convert, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_status_rejected() {
        assert!(Cli::try_parse_from(["bulksel", "list", "--status", "lost"]).is_err());
    }
}
