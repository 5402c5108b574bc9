//! Core data types for the stale-user report.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// One IAM user as collected from the listing.
///
/// `password_last_used` is absent for users who have never signed in to the
/// console since creation; that is an expected state, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// The IAM user name.
    pub user_name: String,
    /// When the user was created.
    pub create_date: DateTime<Utc>,
    /// Last console sign-in, if the user has ever signed in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_last_used: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// The timestamp staleness is measured against: last sign-in if present,
    /// otherwise the creation date.
    pub fn effective_last_activity(&self) -> DateTime<Utc> {
        self.password_last_used.unwrap_or(self.create_date)
    }
}

/// Resolved run settings: the configuration document merged with CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Named AWS profiles to report on, in order.
    pub profiles: Vec<String>,
    /// A user is unused once its last activity is older than this.
    pub max_age: Duration,
    /// Timezone the reference "now" is taken in.
    pub timezone: Tz,
}
