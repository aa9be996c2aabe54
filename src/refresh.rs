//! Background profile refresh on a fixed interval.
//!
//! A refresh that lands while the user is editing replaces the cached
//! profile regardless of local edits; the later completion wins.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api::ProfileApi;
use crate::auth::CredentialProvider;
use crate::cache::ProfileCache;
use crate::error::ApiError;

/// Shown instead of an error when a background refresh has no valid session.
pub const SIGNED_OUT_MESSAGE: &str = "Sign in to view your health profile.";

/// Outcome of a single refresh attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated,
    NoProfile,
    SignedOut,
    Failed(String),
}

/// Fetch once and update the cache.
pub async fn refresh_once(
    api: &dyn ProfileApi,
    credentials: &dyn CredentialProvider,
    cache: &ProfileCache,
) -> RefreshOutcome {
    let Some(token) = credentials.token() else {
        cache.report_failure(SIGNED_OUT_MESSAGE);
        return RefreshOutcome::SignedOut;
    };

    match api.fetch_profile(&token).await {
        Ok(profile) => {
            cache.store(profile).await;
            RefreshOutcome::Updated
        }
        Err(ApiError::Unauthenticated) => {
            debug!("Background refresh rejected credentials");
            cache.report_failure(SIGNED_OUT_MESSAGE);
            RefreshOutcome::SignedOut
        }
        Err(e) if e.is_not_found() => RefreshOutcome::NoProfile,
        Err(e) => {
            warn!(error = %e, "Background profile refresh failed");
            let message = e.user_message();
            cache.report_failure(message.clone());
            RefreshOutcome::Failed(message)
        }
    }
}

/// Spawn a task that refreshes the cache every `interval` until aborted.
pub fn spawn_refresh_task(
    api: Arc<dyn ProfileApi>,
    credentials: Arc<dyn CredentialProvider>,
    cache: Arc<ProfileCache>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(interval);
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            tick.tick().await;
            let outcome = refresh_once(api.as_ref(), credentials.as_ref(), &cache).await;
            debug!(?outcome, "Profile refresh tick");
        }
    })
}
