//! AWS boundary: per-profile IAM clients and the user listing.
//!
//! Each profile gets its own client built from the shared AWS config
//! (~/.aws/config, ~/.aws/credentials). `ListUsers` pages are adapted into
//! the [`pagination`](crate::pagination) envelope so the accumulator stays
//! independent of the SDK.

use crate::models::UserRecord;
use crate::pagination::{self, Page};
use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_iam::primitives::DateTime as SmithyDateTime;
use aws_sdk_iam::types::User;
use aws_sdk_iam::Client;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// Name of the record-list field in a `ListUsers` response.
pub const USERS_FIELD: &str = "Users";

/// Build an IAM client for one named profile.
pub async fn client_for_profile(profile: &str) -> Client {
    let config = aws_config::defaults(BehaviorVersion::latest())
        .profile_name(profile)
        .load()
        .await;

    Client::new(&config)
}

/// Collect the profile's full user inventory, following pagination.
pub async fn collect_users(client: &Client) -> Result<Vec<UserRecord>> {
    let mut listing = pagination::accumulate(|marker| fetch_users_page(client.clone(), marker))
        .await
        .context("failed to drain the IAM user listing")?;

    listing
        .remove(USERS_FIELD)
        .with_context(|| format!("IAM listing carried no {:?} field", USERS_FIELD))
}

/// Fetch one `ListUsers` page and strip it down to the page envelope plus
/// the `Users` record-list field.
async fn fetch_users_page(client: Client, marker: Option<String>) -> Result<Page<UserRecord>> {
    let response = client
        .list_users()
        .set_marker(marker)
        .send()
        .await
        .context("IAM ListUsers call failed")?;

    let users = response
        .users()
        .iter()
        .map(record_from_user)
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Fetched ListUsers page: {} users, truncated: {}",
        users.len(),
        response.is_truncated()
    );

    Ok(Page {
        is_truncated: response.is_truncated(),
        marker: response.marker().map(String::from),
        fields: BTreeMap::from([(USERS_FIELD.to_string(), users)]),
    })
}

fn record_from_user(user: &User) -> Result<UserRecord> {
    Ok(UserRecord {
        user_name: user.user_name().to_string(),
        create_date: to_utc(user.create_date())?,
        password_last_used: user.password_last_used().map(to_utc).transpose()?,
    })
}

fn to_utc(ts: &SmithyDateTime) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(ts.secs(), ts.subsec_nanos())
        .with_context(|| format!("timestamp out of range: {:?}", ts))
}
