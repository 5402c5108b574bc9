//! Command-line interface argument parsing.

use clap::Parser;
use std::path::PathBuf;

/// stale-iam - report unused AWS IAM users across account profiles
///
/// Reads a list of named profiles from a YAML configuration document,
/// lists every IAM user in each profile, and prints the users whose last
/// console sign-in (or creation, for users who never signed in) is older
/// than the configured threshold.
///
/// Examples:
///   stale-iam
///   stale-iam --config accounts.yaml --max-age-days 90
///   stale-iam --profile dev --profile prod --keep-going
///   stale-iam --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration document
    #[arg(
        short,
        long,
        default_value = "config.yaml",
        value_name = "FILE",
        env = "STALE_IAM_CONFIG"
    )]
    pub config: PathBuf,

    /// Profile to report on (repeatable)
    ///
    /// Overrides the document's profile list. Profiles are looked up in
    /// the shared AWS config (~/.aws/config).
    #[arg(short, long, value_name = "NAME")]
    pub profile: Vec<String>,

    /// Staleness threshold in days
    ///
    /// Overrides the document's max_age_days section (default 30).
    #[arg(long, value_name = "DAYS")]
    pub max_age_days: Option<i64>,

    /// Timezone the reference time is taken in
    ///
    /// IANA name, e.g. America/Denver. Overrides the document's
    /// timezone section.
    #[arg(long, value_name = "TZ")]
    pub timezone: Option<String>,

    /// Continue with the remaining profiles when one fails
    ///
    /// By default the first profile failure aborts the run. With this
    /// flag the failure is reported and the run exits 2 at the end.
    #[arg(long)]
    pub keep_going: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a starter config.yaml and exit
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(days) = self.max_age_days {
            if days < 1 {
                return Err("--max-age-days must be at least 1".to_string());
            }
        }

        if self.profile.iter().any(|p| p.trim().is_empty()) {
            return Err("--profile values must not be empty".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
