//! Backend chosen once at startup.

use async_trait::async_trait;
use mockable::Clock;

use super::{cosmos::CosmosSubmissionStore, local::LocalFileStore};
use crate::submission::{
    domain::Submission,
    ports::{StoreKind, SubmissionStore, SubmissionStoreResult},
};

/// The persistence backend in use for the lifetime of the process.
#[derive(Debug)]
pub enum ActiveStore<C>
where
    C: Clock + Send + Sync,
{
    /// The remote document store connected at startup.
    Remote(CosmosSubmissionStore<C>),
    /// Local JSON files, used when the remote store is unavailable.
    LocalFallback(LocalFileStore),
}

#[async_trait]
impl<C> SubmissionStore for ActiveStore<C>
where
    C: Clock + Send + Sync,
{
    fn kind(&self) -> StoreKind {
        match self {
            Self::Remote(store) => store.kind(),
            Self::LocalFallback(store) => store.kind(),
        }
    }

    async fn save(&self, submission: &Submission) -> SubmissionStoreResult<()> {
        match self {
            Self::Remote(store) => store.save(submission).await,
            Self::LocalFallback(store) => store.save(submission).await,
        }
    }
}
