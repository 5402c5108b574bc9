//! stale-iam - report unused AWS IAM users across account profiles.
//!
//! Loads a profile list from a YAML configuration document, lists every
//! IAM user per profile (following pagination), and prints the users
//! whose last sign-in (or creation, when they never signed in) is older
//! than the configured threshold.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (configuration, credentials, listing failure)
//!   2 - One or more profiles failed under --keep-going

mod analysis;
mod cli;
mod config;
mod iam;
mod models;
mod pagination;
mod report;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cli::Args;
use models::Settings;
use tracing::{debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config(&args);
    }

    init_logging(&args);

    info!("stale-iam v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_report(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a starter configuration document.
fn handle_init_config(args: &Args) -> Result<()> {
    let path = &args.config;

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            path.display()
        );
        std::process::exit(1);
    }

    std::fs::write(path, config::default_document())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Created {} with default settings.", path.display());
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the report across all profiles. Returns the exit code (0 or 2).
async fn run_report(args: Args) -> Result<i32> {
    // The document is optional when --profile overrides the profile list.
    let document = if args.config.exists() || args.profile.is_empty() {
        config::load_document(&args.config)?
    } else {
        Vec::new()
    };

    let settings = config::resolve_settings(&document, &args)?;

    info!(
        "Reporting on {} profile(s), threshold {} days, timezone {}",
        settings.profiles.len(),
        settings.max_age.num_days(),
        settings.timezone
    );

    // One reference clock for the whole run.
    let now = Utc::now().with_timezone(&settings.timezone);
    debug!("Reference time: {}", now);

    let mut failed = 0usize;
    for profile in &settings.profiles {
        match report_profile(profile, &settings, now).await {
            Ok(unused) => {
                info!("{}: {} unused user(s)", profile, unused);
            }
            Err(e) if args.keep_going => {
                failed += 1;
                error!("Skipping profile {}: {:#}", profile, e);
                eprintln!("Error in profile {}: {:#}", profile, e);
            }
            Err(e) => {
                return Err(e.context(format!("Failed while processing profile {:?}", profile)));
            }
        }
    }

    Ok(if failed > 0 { 2 } else { 0 })
}

/// Process a single profile: list, filter, print. Returns the number of
/// unused users reported.
async fn report_profile(profile: &str, settings: &Settings, now: DateTime<Tz>) -> Result<usize> {
    info!("Processing profile {}", profile);

    let client = iam::client_for_profile(profile).await;
    let users = iam::collect_users(&client).await?;
    debug!("{}: collected {} user(s)", profile, users.len());

    let unused = analysis::filter_unused(&users, settings.max_age, now);
    print!("{}", report::render_profile_section(profile, &unused));

    Ok(unused.len())
}
