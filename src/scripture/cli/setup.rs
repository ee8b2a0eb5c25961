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
#[command(name = "scripture", bin_name = "scripture", version = get_version())]
#[command(about = "Read and search scripture from the command line", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Translation id or abbreviation (defaults to the configured one)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub translation: Option<String>,

    /// Verbose output (debug logs on stderr)
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List translations
    Translations {
        /// Ask the remote service for every translation it offers
        #[arg(long)]
        remote: bool,
    },

    /// List languages and their translations
    Languages,

    /// List the books of a translation
    Books,

    /// List the chapters of a book
    Chapters {
        /// Book id or name (e.g. JHN, John, 1 Corinthians)
        book: String,
    },

    /// Read a chapter
    Read {
        /// Chapter id (e.g. JHN.3)
        chapter: String,

        /// Print one numbered verse per line
        #[arg(long)]
        verses: bool,
    },

    /// Show one verse
    Verse {
        /// Verse id (e.g. JHN.3.16)
        id: String,
    },

    /// Search the text of a translation
    Search {
        /// Words to search for
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        #[arg(long, default_value_t = 10)]
        limit: u32,

        #[arg(long, default_value_t = 0)]
        offset: u32,
    },

    /// Show a passage (e.g. JHN.3.16-JHN.3.18)
    Passage { id: String },

    /// Show a random verse
    Random,

    /// Get or set configuration
    Config {
        /// Configuration key (e.g. api-key, default-translation)
        key: Option<String>,

        /// Value to set (omit to show current value)
        value: Option<String>,
    },
}
