//! Startup selection of the persistence backend.
//!
//! The remote store is attempted once. When it is not configured, or its
//! initialisation fails, the local fallback is used for the remainder of the
//! process; there is no retry and no later promotion back to remote.

use crate::submission::{
    adapters::{
        active::ActiveStore,
        cosmos::{CosmosSettings, CosmosSubmissionStore},
        local::LocalFileStore,
    },
    ports::{StoreKind, SubmissionStore, SubmissionStoreError, SubmissionStoreResult},
};
use mockable::Clock;
use std::fmt;
use std::sync::Arc;

/// Why the local fallback was selected.
#[derive(Debug, Clone)]
pub enum FallbackReason {
    /// Endpoint or key was not configured.
    NotConfigured,
    /// The remote store could not be initialised.
    Unavailable(SubmissionStoreError),
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConfigured => f.write_str("remote store endpoint or key not set"),
            Self::Unavailable(err) => write!(f, "remote store initialisation failed: {err}"),
        }
    }
}

/// Outcome of backend selection.
#[derive(Debug)]
pub struct StoreSelection<C>
where
    C: Clock + Send + Sync,
{
    store: ActiveStore<C>,
    fallback_reason: Option<FallbackReason>,
}

impl<C> StoreSelection<C>
where
    C: Clock + Send + Sync,
{
    /// Returns the kind of the selected backend.
    #[must_use]
    pub fn kind(&self) -> StoreKind {
        self.store.kind()
    }

    /// Returns why the fallback was chosen, or `None` when remote is active.
    #[must_use]
    pub const fn fallback_reason(&self) -> Option<&FallbackReason> {
        self.fallback_reason.as_ref()
    }

    /// Consumes the selection, yielding the backend.
    #[must_use]
    pub fn into_store(self) -> ActiveStore<C> {
        self.store
    }
}

/// Attempts to connect to the remote store when settings are present.
///
/// Returns `None` when no remote store is configured. The connection result
/// is returned as-is so the caller decides how to act on a failure.
pub async fn connect_remote<C>(
    settings: Option<&CosmosSettings>,
    clock: Arc<C>,
) -> Option<SubmissionStoreResult<CosmosSubmissionStore<C>>>
where
    C: Clock + Send + Sync,
{
    let configured = settings?;
    Some(CosmosSubmissionStore::connect(configured, clock).await)
}

/// Chooses the backend for the process lifetime.
///
/// A connected remote store wins; otherwise `local` is selected and the
/// reason is recorded.
#[must_use]
pub fn select_store<C>(
    remote: Option<SubmissionStoreResult<CosmosSubmissionStore<C>>>,
    local: LocalFileStore,
) -> StoreSelection<C>
where
    C: Clock + Send + Sync,
{
    match remote {
        Some(Ok(store)) => StoreSelection {
            store: ActiveStore::Remote(store),
            fallback_reason: None,
        },
        Some(Err(err)) => StoreSelection {
            store: ActiveStore::LocalFallback(local),
            fallback_reason: Some(FallbackReason::Unavailable(err)),
        },
        None => StoreSelection {
            store: ActiveStore::LocalFallback(local),
            fallback_reason: Some(FallbackReason::NotConfigured),
        },
    }
}
