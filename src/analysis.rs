//! Staleness filtering.

use crate::models::UserRecord;
use chrono::{DateTime, Duration, TimeZone};

/// Return the users whose last activity is strictly older than `max_age`
/// at the reference time `now`.
///
/// Last activity is the last console sign-in when the user has one, the
/// creation date otherwise; both paths measure against the same `max_age`.
/// `now` is injected so callers (and tests) control the reference clock
/// and timezone.
pub fn filter_unused<'a, Tz: TimeZone>(
    users: &'a [UserRecord],
    max_age: Duration,
    now: DateTime<Tz>,
) -> Vec<&'a UserRecord> {
    users
        .iter()
        .filter(|user| {
            now.clone()
                .signed_duration_since(user.effective_last_activity())
                > max_age
        })
        .collect()
}
