//! Configuration document handling.
//!
//! The configuration is a YAML document shaped as a sequence of single-key
//! sections:
//!
//! ```yaml
//! - profiles:
//!     - dev
//!     - prod
//! - max_age_days: 30
//! - timezone: America/Denver
//! ```
//!
//! `profiles` is required; the other sections are optional and can also be
//! overridden from the command line.

use crate::cli::Args;
use crate::models::Settings;
use chrono::Duration;
use chrono_tz::Tz;
use serde_yaml::Value;
use std::path::Path;
use thiserror::Error;

/// Section key holding the profile list.
pub const PROFILES_KEY: &str = "profiles";
/// Section key for the staleness threshold, in days.
pub const MAX_AGE_KEY: &str = "max_age_days";
/// Section key for the reference timezone.
pub const TIMEZONE_KEY: &str = "timezone";

const DEFAULT_MAX_AGE_DAYS: i64 = 30;
const DEFAULT_TIMEZONE: &str = "America/Denver";

/// Configuration failures. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("no section named {key:?} in the configuration document")]
    SectionNotFound { key: String },

    #[error("invalid {field} value: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Load the configuration document from a file path.
pub fn load_document(path: &Path) -> Result<Vec<Value>, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;

    serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Return the value of the first section carrying `key`.
///
/// Fails hard when no section has the key; callers that can live without
/// the section use [`optional_section`] instead.
pub fn extract_named_section<'a>(document: &'a [Value], key: &str) -> Result<&'a Value, ConfigError> {
    optional_section(document, key).ok_or_else(|| ConfigError::SectionNotFound {
        key: key.to_string(),
    })
}

/// Like [`extract_named_section`], but absence is not an error.
pub fn optional_section<'a>(document: &'a [Value], key: &str) -> Option<&'a Value> {
    document.iter().find_map(|section| section.get(key))
}

/// Resolve run settings from the document, then apply CLI overrides.
pub fn resolve_settings(document: &[Value], args: &Args) -> Result<Settings, ConfigError> {
    let profiles = if args.profile.is_empty() {
        parse_profiles(extract_named_section(document, PROFILES_KEY)?)?
    } else {
        args.profile.clone()
    };

    let mut max_age_days = DEFAULT_MAX_AGE_DAYS;
    if let Some(value) = optional_section(document, MAX_AGE_KEY) {
        max_age_days = value.as_i64().ok_or_else(|| ConfigError::Invalid {
            field: "max_age_days",
            reason: format!("expected an integer, got {:?}", value),
        })?;
    }
    if let Some(days) = args.max_age_days {
        max_age_days = days;
    }
    if max_age_days < 1 {
        return Err(ConfigError::Invalid {
            field: "max_age_days",
            reason: format!("must be at least 1, got {}", max_age_days),
        });
    }

    let mut timezone = DEFAULT_TIMEZONE.to_string();
    if let Some(value) = optional_section(document, TIMEZONE_KEY) {
        timezone = value
            .as_str()
            .ok_or_else(|| ConfigError::Invalid {
                field: "timezone",
                reason: format!("expected a string, got {:?}", value),
            })?
            .to_string();
    }
    if let Some(ref tz) = args.timezone {
        timezone = tz.clone();
    }
    let timezone = timezone
        .parse::<Tz>()
        .map_err(|e| ConfigError::Invalid {
            field: "timezone",
            reason: e.to_string(),
        })?;

    Ok(Settings {
        profiles,
        max_age: Duration::days(max_age_days),
        timezone,
    })
}

fn parse_profiles(value: &Value) -> Result<Vec<String>, ConfigError> {
    let profiles: Vec<String> =
        serde_yaml::from_value(value.clone()).map_err(|e| ConfigError::Invalid {
            field: "profiles",
            reason: e.to_string(),
        })?;

    if profiles.is_empty() {
        return Err(ConfigError::Invalid {
            field: "profiles",
            reason: "the profile list is empty".to_string(),
        });
    }

    Ok(profiles)
}

/// Generate a starter configuration document for `--init-config`.
pub fn default_document() -> String {
    format!(
        "\
# Profiles to audit, as named in ~/.aws/config.
- {PROFILES_KEY}:
    - default

# Optional. A user is reported once its last activity is older than this.
- {MAX_AGE_KEY}: {DEFAULT_MAX_AGE_DAYS}

# Optional. Timezone the reference time is taken in.
- {TIMEZONE_KEY}: {DEFAULT_TIMEZONE}
"
    )
}
