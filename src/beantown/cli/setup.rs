use clap::{Parser, Subcommand};

/// Returns the version string, including git hash and commit date for non-release builds.
/// Format: "0.3.2" for releases, "0.3.2@abc1234 2024-01-15 14:30" for dev builds
fn get_version() -> &'static str {
    const VERSION: &str = env!("CARGO_PKG_VERSION");
    const GIT_HASH: &str = env!("GIT_HASH");
    const GIT_COMMIT_DATE: &str = env!("GIT_COMMIT_DATE");
    const IS_RELEASE: &str = env!("IS_RELEASE");

    use std::sync::OnceLock;
    static VERSION_STRING: OnceLock<String> = OnceLock::new();

    VERSION_STRING.get_or_init(|| {
        if IS_RELEASE == "true" || GIT_HASH.is_empty() {
            VERSION.to_string()
        } else {
            format!("{}@{} {}", VERSION, GIT_HASH, GIT_COMMIT_DATE)
        }
    })
}

#[derive(Parser, Debug)]
#[command(name = "beantown", bin_name = "beantown", version = get_version())]
#[command(about = "Browse the jelly bean catalog from a local, self-refreshing cache", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbose output (debug logging on stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List jelly beans, fetching pages as needed
    #[command(alias = "ls")]
    List {
        /// Beans per remote page (defaults to the configured page size)
        #[arg(short = 's', long)]
        page_size: Option<u32>,

        /// Stop after this many beans
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show one cached jelly bean
    #[command(alias = "v")]
    Show {
        /// Bean id
        id: i64,
    },

    /// Drop the cache and fetch the first page again
    Refresh {
        /// Beans per remote page (defaults to the configured page size)
        #[arg(short = 's', long)]
        page_size: Option<u32>,
    },

    /// Show cache age and contents
    Status,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g., page-size)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}
