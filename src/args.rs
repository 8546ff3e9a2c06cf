use clap::{Parser, Subcommand, ValueEnum};
use sitenav::BackendKind;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sitenav")]
#[command(about = "Searches an intranet's sibling pages and drives its accordion menus")]
#[command(version)]
pub struct Args {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Page to search (repeatable; replaces the configured list)
    #[arg(short, long = "page", global = true)]
    pub pages: Vec<String>,

    /// Fetch backend
    #[arg(short, long, value_enum, global = true)]
    pub backend: Option<BackendArg>,

    /// Per-page fetch timeout in seconds
    #[arg(short, long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one search across all pages and print the results
    Search {
        query: String,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Read input events from stdin, one per line. A leading `!` submits.
    Session,
    /// List the accordion groups in a local HTML file
    Groups { file: PathBuf },
    /// Print the footer year
    Year,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum BackendArg {
    Http,
    Webdriver,
}

/// Convert from CLI argument backend to the configured backend
pub fn convert_backend(arg: BackendArg) -> BackendKind {
    match arg {
        BackendArg::Http => BackendKind::Http,
        BackendArg::Webdriver => BackendKind::WebDriver,
    }
}
