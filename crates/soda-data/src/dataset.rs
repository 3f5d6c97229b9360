//! Dataset facade: resource-level operations composed from the SoQL builder
//! and the HTTP client.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use soda_client::{Error, ErrorKind, Response, Result, SodaClient};
use tracing::instrument;

use crate::payload::Payload;
use crate::query::SoqlQuery;

/// The API version a dataset is served by, derived from response headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiVersion {
    /// No version marker headers seen yet.
    Unknown,
    /// Legacy SODA 1.x backend.
    Legacy,
    /// SODA 2.0 backend.
    Soda2,
    /// SODA 2.x on the new backend, per the dataset metadata.
    Soda2NewBackend,
}

impl ApiVersion {
    /// The numeric version the original API documentation uses.
    pub fn as_number(self) -> f64 {
        match self {
            ApiVersion::Unknown => 0.0,
            ApiVersion::Legacy => 1.0,
            ApiVersion::Soda2 => 2.0,
            ApiVersion::Soda2NewBackend => 2.1,
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_number())
    }
}

/// A filter argument for [`Dataset::get_data`].
///
/// Accepts the three shapes the API supports: a raw pre-formed query string,
/// a set of simple `column=value` pairs, or a [`SoqlQuery`].
#[derive(Debug, Clone, Default)]
pub enum Filter {
    /// No filtering; the default SoQL query is sent.
    #[default]
    None,
    /// A raw query string, appended to the URL verbatim.
    Raw(String),
    /// Simple equality filters, percent-encoded as `column=value` pairs.
    Fields(Vec<(String, String)>),
    /// A structured SoQL query.
    Query(SoqlQuery),
}

impl From<SoqlQuery> for Filter {
    fn from(query: SoqlQuery) -> Self {
        Filter::Query(query)
    }
}

impl From<String> for Filter {
    fn from(raw: String) -> Self {
        if raw.trim().is_empty() {
            Filter::None
        } else {
            Filter::Raw(raw)
        }
    }
}

impl From<&str> for Filter {
    fn from(raw: &str) -> Self {
        Filter::from(raw.to_string())
    }
}

impl From<Vec<(String, String)>> for Filter {
    fn from(fields: Vec<(String, String)>) -> Self {
        Filter::Fields(fields)
    }
}

impl From<HashMap<String, String>> for Filter {
    fn from(fields: HashMap<String, String>) -> Self {
        Filter::Fields(fields.into_iter().collect())
    }
}

/// A handle to one Socrata dataset.
///
/// Construction validates the 4x4 resource ID before any network activity.
/// The API version and metadata document are fetched lazily on first use and
/// cached behind mutexes, so sharing a `Dataset` across tasks cannot trigger
/// more than one concurrent cache fill per clone chain.
///
/// # Example
///
/// ```rust,ignore
/// use soda_client::{Authentication, SodaClient};
/// use soda_data::{Dataset, SoqlQuery};
///
/// let client = SodaClient::new(Authentication::new("opendata.socrata.com", "token"))?;
/// let dataset = Dataset::new(client, "pkfj-5jsd")?;
///
/// let query = SoqlQuery::new().where_clause("state = 'AR'").limit(10)?;
/// let rows: Vec<serde_json::Value> = dataset.get_data(query).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    client: SodaClient,
    resource_id: String,
    api_version: Arc<Mutex<Option<ApiVersion>>>,
    metadata: Arc<Mutex<Option<serde_json::Value>>>,
    last_modified: Arc<Mutex<Option<DateTime<FixedOffset>>>>,
}

impl Dataset {
    /// Create a handle to the dataset identified by `resource_id`.
    ///
    /// The ID must match the `[a-z0-9]{4}-[a-z0-9]{4}` pattern; anything else
    /// is rejected with a validation error before any request is made.
    pub fn new(client: SodaClient, resource_id: impl Into<String>) -> Result<Self> {
        let resource_id = resource_id.into();
        validate_resource_id(&resource_id)?;

        Ok(Self {
            client,
            resource_id,
            api_version: Arc::new(Mutex::new(None)),
            metadata: Arc::new(Mutex::new(None)),
            last_modified: Arc::new(Mutex::new(None)),
        })
    }

    /// The validated 4x4 resource ID.
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// The owning client.
    pub fn client(&self) -> &SodaClient {
        &self.client
    }

    /// Fetch rows from the dataset.
    ///
    /// `filter` may be a [`SoqlQuery`], a raw query string, or a set of
    /// `column=value` pairs (see [`Filter`]). As a side effect, the cached
    /// API version is derived from the response headers if not yet known.
    #[instrument(skip(self, filter), fields(resource_id = %self.resource_id))]
    pub async fn get_data<T, F>(&self, filter: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Into<Filter>,
    {
        let mut request = self.client.get(self.client.resource_url(&self.resource_id));

        match filter.into() {
            Filter::None => {
                request = request.raw_query(SoqlQuery::new().to_query_string());
            }
            Filter::Raw(raw) => {
                request = request.raw_query(raw);
            }
            Filter::Fields(fields) => {
                for (column, value) in fields {
                    request = request.query(column, value);
                }
            }
            Filter::Query(query) => {
                request = request.raw_query(query.to_query_string());
            }
        }

        let response = self.client.execute(request).await?;
        self.record_response(&response).await?;

        response.into_json()
    }

    /// Fetch rows from the dataset.
    #[deprecated(since = "0.1.0", note = "use `get_data` instead")]
    pub async fn get_dataset<T, F>(&self, filter: F) -> Result<T>
    where
        T: DeserializeOwned,
        F: Into<Filter>,
    {
        self.get_data(filter).await
    }

    /// Fetch an individual row by its row identifier.
    #[instrument(skip(self), fields(resource_id = %self.resource_id))]
    pub async fn get_row<T: DeserializeOwned>(&self, row_id: &str) -> Result<T> {
        let url = self.client.row_url(&self.resource_id, row_id);
        let response = self.client.execute(self.client.get(url)).await?;
        self.record_response(&response).await?;

        response.into_json()
    }

    /// Delete an individual row by its row identifier. For deleting more than
    /// a single row, use an [`upsert`](Self::upsert) instead.
    ///
    /// A successful response body is ignored; a failed one still goes through
    /// the usual error classification.
    #[instrument(skip(self), fields(resource_id = %self.resource_id))]
    pub async fn delete_row(&self, row_id: &str) -> Result<()> {
        let url = self.client.row_url(&self.resource_id, row_id);
        let response = self.client.execute(self.client.delete(url)).await?;
        self.record_response(&response).await?;

        if response.is_success() {
            return Ok(());
        }

        let status = response.status();
        match response.into_json_value() {
            Err(err) => Err(err),
            // Non-2xx with an unclassifiable JSON body; keep the status.
            Ok(body) => Err(Error::new(ErrorKind::Http {
                status,
                body: body.to_string(),
            })),
        }
    }

    /// Create, update, and delete rows in a single operation, keyed by row
    /// identifiers. The payload is normalized to JSON before transmission.
    #[instrument(skip(self, payload), fields(resource_id = %self.resource_id))]
    pub async fn upsert(&self, payload: impl Into<Payload>) -> Result<serde_json::Value> {
        let body = payload.into().into_json_text()?;
        let url = self.client.resource_url(&self.resource_id);
        let response = self.client.execute(self.client.post(url).json_text(body)).await?;

        response.into_json()
    }

    /// Replace the entire dataset with the given payload.
    #[instrument(skip(self, payload), fields(resource_id = %self.resource_id))]
    pub async fn replace(&self, payload: impl Into<Payload>) -> Result<serde_json::Value> {
        let body = payload.into().into_json_text()?;
        let url = self.client.resource_url(&self.resource_id);
        let response = self.client.execute(self.client.put(url).json_text(body)).await?;

        response.into_json()
    }

    /// Get the dataset's metadata document (schema, license, timestamps).
    ///
    /// The document is fetched once and cached; pass `force_fetch` to refresh
    /// a stale copy.
    #[instrument(skip(self), fields(resource_id = %self.resource_id))]
    pub async fn get_metadata(&self, force_fetch: bool) -> Result<serde_json::Value> {
        if !force_fetch {
            let cached = lock(&self.metadata).clone();
            if let Some(metadata) = cached {
                return Ok(metadata);
            }
        }

        let url = self.client.view_url(&self.resource_id);
        let metadata: serde_json::Value = self.client.get_json(&url).await?;
        *lock(&self.metadata) = Some(metadata.clone());

        Ok(metadata)
    }

    /// Get the API version this dataset is served by.
    ///
    /// If not yet known, a `$limit=0` query is issued purely for its response
    /// headers; the result is cached.
    pub async fn api_version(&self) -> Result<ApiVersion> {
        if let Some(version) = *lock(&self.api_version) {
            return Ok(version);
        }

        // Header probe: zero rows, the builder's positive-limit rule does not
        // apply to this internal query.
        let _: serde_json::Value = self.get_data(Filter::Raw("$limit=0".to_string())).await?;

        Ok(lock(&self.api_version).unwrap_or(ApiVersion::Unknown))
    }

    /// The last-modified timestamp seen on the most recent response, if any.
    pub fn last_modified(&self) -> Option<DateTime<FixedOffset>> {
        *lock(&self.last_modified)
    }

    /// Record version markers and timestamps carried in response headers.
    async fn record_response(&self, response: &Response) -> Result<()> {
        if let Some(timestamp) = response.last_modified() {
            *lock(&self.last_modified) = Some(timestamp);
        }

        if lock(&self.api_version).is_some() {
            return Ok(());
        }

        let version = self.parse_api_version(response).await?;
        if version != ApiVersion::Unknown {
            let mut guard = lock(&self.api_version);
            if guard.is_none() {
                *guard = Some(version);
            }
        }

        Ok(())
    }

    /// Derive the API version from response headers.
    ///
    /// The legacy marker wins; the truth-last-modified marker means 2.x, and
    /// the metadata `newBackend` flag refines that to 2.1.
    async fn parse_api_version(&self, response: &Response) -> Result<ApiVersion> {
        if response.legacy_types() {
            return Ok(ApiVersion::Legacy);
        }

        if response.truth_last_modified().is_some() {
            let metadata = self.get_metadata(false).await?;
            let new_backend = metadata
                .get("newBackend")
                .and_then(|v| v.as_bool())
                .unwrap_or(false);

            return Ok(if new_backend {
                ApiVersion::Soda2NewBackend
            } else {
                ApiVersion::Soda2
            });
        }

        Ok(ApiVersion::Unknown)
    }
}

/// Lock a cache cell, recovering the value from a poisoned lock.
fn lock<T>(cell: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    cell.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Validate a 4x4 resource ID: `[a-z0-9]{4}-[a-z0-9]{4}`.
fn validate_resource_id(resource_id: &str) -> Result<()> {
    let bytes = resource_id.as_bytes();
    let well_formed = bytes.len() == 9
        && bytes[4] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || b.is_ascii_lowercase() || b.is_ascii_digit());

    if well_formed {
        Ok(())
    } else {
        Err(Error::new(ErrorKind::InvalidResourceId(
            resource_id.to_string(),
        )))
    }
}
