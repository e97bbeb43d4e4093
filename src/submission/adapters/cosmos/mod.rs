//! Remote submission store backed by Azure Cosmos DB.
//!
//! Talks to the SQL API over REST. [`CosmosSubmissionStore::connect`]
//! idempotently creates the database and the container (partitioned on
//! `/partitionKey`) before returning a store; every
//! [`SubmissionStore::save`] is a create-only document insert.

mod auth;

pub use auth::{MasterKey, MasterKeyError, http_date};

use async_trait::async_trait;
use mockable::Clock;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use url::Url;

use crate::submission::{
    domain::{PARTITION_KEY, Submission},
    ports::{StoreKind, SubmissionStore, SubmissionStoreError, SubmissionStoreResult},
};

/// REST API version sent in `x-ms-version`.
pub const API_VERSION: &str = "2018-12-31";

/// Database used when none is configured.
pub const DEFAULT_DATABASE_ID: &str = "SchoolDB";

/// Container used when none is configured.
pub const DEFAULT_CONTAINER_ID: &str = "Contacts";

/// Connection settings for the remote store.
#[derive(Clone, PartialEq, Eq)]
pub struct CosmosSettings {
    endpoint: String,
    key: String,
    database_id: String,
    container_id: String,
}

impl CosmosSettings {
    /// Creates settings with the default database and container names.
    #[must_use]
    pub fn new(endpoint: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            key: key.into(),
            database_id: DEFAULT_DATABASE_ID.to_owned(),
            container_id: DEFAULT_CONTAINER_ID.to_owned(),
        }
    }

    /// Overrides the database name.
    #[must_use]
    pub fn with_database_id(mut self, database_id: impl Into<String>) -> Self {
        self.database_id = database_id.into();
        self
    }

    /// Overrides the container name.
    #[must_use]
    pub fn with_container_id(mut self, container_id: impl Into<String>) -> Self {
        self.container_id = container_id.into();
        self
    }

    /// Returns the account endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns the database name.
    #[must_use]
    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    /// Returns the container name.
    #[must_use]
    pub fn container_id(&self) -> &str {
        &self.container_id
    }
}

impl fmt::Debug for CosmosSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosmosSettings")
            .field("endpoint", &self.endpoint)
            .field("key", &"<redacted>")
            .field("database_id", &self.database_id)
            .field("container_id", &self.container_id)
            .finish()
    }
}

/// Configuration problems detected before any request is sent.
#[derive(Debug, Clone, Error)]
pub enum CosmosConfigError {
    /// The endpoint is not an absolute base URL.
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint {
        /// Endpoint as configured.
        endpoint: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The account key could not be decoded.
    #[error(transparent)]
    InvalidKey(#[from] MasterKeyError),
}

/// Submission store writing documents to a Cosmos DB container.
#[derive(Debug)]
pub struct CosmosSubmissionStore<C>
where
    C: Clock + Send + Sync,
{
    client: Client,
    endpoint: Url,
    key: MasterKey,
    database_id: String,
    container_id: String,
    clock: Arc<C>,
}

impl<C> CosmosSubmissionStore<C>
where
    C: Clock + Send + Sync,
{
    /// Establishes a session and ensures the database and container exist.
    ///
    /// Both creation calls treat `409 Conflict` as "already exists".
    ///
    /// # Errors
    ///
    /// Returns [`SubmissionStoreError::Unavailable`] when the settings are
    /// invalid or the service is unreachable, and
    /// [`SubmissionStoreError::Rejected`] when it answers with any other
    /// failure status.
    pub async fn connect(
        settings: &CosmosSettings,
        clock: Arc<C>,
    ) -> SubmissionStoreResult<Self> {
        let endpoint =
            parse_endpoint(&settings.endpoint).map_err(SubmissionStoreError::unavailable)?;
        let key = MasterKey::from_base64(&settings.key)
            .map_err(|err| SubmissionStoreError::unavailable(CosmosConfigError::from(err)))?;

        let store = Self {
            client: Client::new(),
            endpoint,
            key,
            database_id: settings.database_id.clone(),
            container_id: settings.container_id.clone(),
            clock,
        };

        store.create_database_if_not_exists().await?;
        store.create_container_if_not_exists().await?;

        info!(
            endpoint = %store.endpoint,
            database = %store.database_id,
            container = %store.container_id,
            "Cosmos DB initialized"
        );
        Ok(store)
    }

    async fn create_database_if_not_exists(&self) -> SubmissionStoreResult<()> {
        let request = ResourceRequest {
            segments: vec!["dbs"],
            resource_type: "dbs",
            resource_link: String::new(),
            partition_key: None,
        };
        self.post(request, &json!({ "id": self.database_id }))
            .await
            .map(|_| ())
    }

    async fn create_container_if_not_exists(&self) -> SubmissionStoreResult<()> {
        let request = ResourceRequest {
            segments: vec!["dbs", &self.database_id, "colls"],
            resource_type: "colls",
            resource_link: format!("dbs/{}", self.database_id),
            partition_key: None,
        };
        let body = json!({
            "id": self.container_id,
            "partitionKey": { "paths": ["/partitionKey"], "kind": "Hash" },
        });
        self.post(request, &body).await.map(|_| ())
    }

    /// Sends a signed `POST`; success statuses and `409 Conflict` are
    /// returned, anything else becomes an error.
    async fn post(
        &self,
        request: ResourceRequest<'_>,
        body: &impl Serialize,
    ) -> SubmissionStoreResult<StatusCode> {
        let url = self.resource_url(&request.segments)?;
        let date = http_date(self.clock.utc());
        let authorization =
            self.key
                .authorization("post", request.resource_type, &request.resource_link, &date);

        let mut builder = self
            .client
            .post(url)
            .header("authorization", authorization)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION)
            .json(body);
        if let Some(partition_key) = request.partition_key {
            builder = builder.header(
                "x-ms-documentdb-partitionkey",
                json!([partition_key]).to_string(),
            );
        }

        let response = builder.send().await.map_err(SubmissionStoreError::unavailable)?;
        let status = response.status();
        if status.is_success() || status == StatusCode::CONFLICT {
            return Ok(status);
        }

        let message = response.text().await.unwrap_or_default();
        Err(SubmissionStoreError::Rejected {
            status: status.as_u16(),
            message,
        })
    }

    fn resource_url(&self, segments: &[&str]) -> SubmissionStoreResult<Url> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                SubmissionStoreError::unavailable(CosmosConfigError::InvalidEndpoint {
                    endpoint: self.endpoint.to_string(),
                    reason: "endpoint cannot be a base URL".to_owned(),
                })
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait]
impl<C> SubmissionStore for CosmosSubmissionStore<C>
where
    C: Clock + Send + Sync,
{
    fn kind(&self) -> StoreKind {
        StoreKind::Remote
    }

    async fn save(&self, submission: &Submission) -> SubmissionStoreResult<()> {
        let request = ResourceRequest {
            segments: vec!["dbs", &self.database_id, "colls", &self.container_id, "docs"],
            resource_type: "docs",
            resource_link: format!("dbs/{}/colls/{}", self.database_id, self.container_id),
            partition_key: Some(PARTITION_KEY),
        };
        let status = self.post(request, submission).await?;
        if status == StatusCode::CONFLICT {
            return Err(SubmissionStoreError::Duplicate(submission.id()));
        }

        info!(submission_id = %submission.id(), "saved contact submission to Cosmos DB");
        Ok(())
    }
}

/// Addressing and signing inputs for one REST call.
struct ResourceRequest<'a> {
    segments: Vec<&'a str>,
    resource_type: &'static str,
    resource_link: String,
    partition_key: Option<&'static str>,
}

fn parse_endpoint(raw: &str) -> Result<Url, CosmosConfigError> {
    let endpoint = Url::parse(raw.trim()).map_err(|err| CosmosConfigError::InvalidEndpoint {
        endpoint: raw.to_owned(),
        reason: err.to_string(),
    })?;
    if endpoint.cannot_be_a_base() {
        return Err(CosmosConfigError::InvalidEndpoint {
            endpoint: raw.to_owned(),
            reason: "endpoint cannot be a base URL".to_owned(),
        });
    }
    Ok(endpoint)
}
