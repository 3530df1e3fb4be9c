//! Data-fetch gateway.
//!
//! Wraps a [`DataSource`] with a per-resource request ledger. Each resource
//! is in exactly one [`RequestStatus`], so "loading" and "failed" can never
//! be reported at the same time.

use crate::error::FetchError;
use crate::mock_service::DataSource;
use crate::types::{Dataset, Resource};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Bookkeeping state of one resource
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RequestStatus {
    /// No request outstanding and the last one succeeded (or none was made)
    #[default]
    Idle,
    /// A request is outstanding
    Loading,
    /// The last request failed with this message
    Failed(String),
}

/// Uniform async front for a data source
///
/// Concurrent requests for one resource are not coalesced: each runs to
/// completion and the one that finishes last decides the ledger entry.
#[derive(Clone)]
pub struct DataGateway {
    source: Arc<dyn DataSource>,
    ledger: Arc<Mutex<HashMap<Resource, RequestStatus>>>,
}

impl DataGateway {
    /// Gateway over `source`
    #[must_use]
    pub fn new(source: Arc<dyn DataSource>) -> Self {
        Self {
            source,
            ledger: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn ledger(&self) -> MutexGuard<'_, HashMap<Resource, RequestStatus>> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, resource: Resource, status: RequestStatus) {
        self.ledger().insert(resource, status);
    }

    /// Fetch `resource` from the source
    ///
    /// Marks the resource loading, awaits the source and records the
    /// outcome before returning it.
    ///
    /// # Errors
    ///
    /// Returns the source's [`FetchError`], or one describing a dataset that
    /// belongs to a different resource.
    #[tracing::instrument(skip_all, fields(resource = %resource))]
    pub async fn request(&self, resource: Resource) -> Result<Dataset, FetchError> {
        self.record(resource, RequestStatus::Loading);
        tracing::debug!("Fetch started");

        let result = self.source.fetch(resource).await.and_then(|dataset| {
            if dataset.resource() == resource {
                Ok(dataset)
            } else {
                Err(FetchError::new(
                    resource,
                    format!("source returned {} data", dataset.resource()),
                ))
            }
        });

        match &result {
            Ok(dataset) => {
                self.record(resource, RequestStatus::Idle);
                metrics::counter!("dashboard.fetch.total", "resource" => resource.as_str(), "outcome" => "ok")
                    .increment(1);
                tracing::debug!(records = dataset.len(), "Fetch succeeded");
            },
            Err(error) => {
                self.record(resource, RequestStatus::Failed(error.message.clone()));
                metrics::counter!("dashboard.fetch.total", "resource" => resource.as_str(), "outcome" => "error")
                    .increment(1);
                tracing::warn!(error = %error.message, "Fetch failed");
            },
        }

        result
    }

    /// Current ledger entry of `resource`
    #[must_use]
    pub fn status(&self, resource: Resource) -> RequestStatus {
        self.ledger().get(&resource).cloned().unwrap_or_default()
    }

    /// Whether a request for `resource` is outstanding
    #[must_use]
    pub fn is_loading(&self, resource: Resource) -> bool {
        self.status(resource) == RequestStatus::Loading
    }

    /// Message of the last failed request for `resource`, if it failed
    #[must_use]
    pub fn error(&self, resource: Resource) -> Option<String> {
        match self.status(resource) {
            RequestStatus::Failed(message) => Some(message),
            RequestStatus::Idle | RequestStatus::Loading => None,
        }
    }
}

impl std::fmt::Debug for DataGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataGateway")
            .field("ledger", &*self.ledger())
            .finish_non_exhaustive()
    }
}
