//! # soda-data
//!
//! Dataset-level operations for the Socrata Open Data API (SODA), built on
//! top of the `soda-client` transport layer.
//!
//! This crate provides:
//! - [`SoqlQuery`]: a builder for SoQL filtering, sorting, and paging clauses
//! - [`Dataset`]: a per-resource facade for reading and writing rows
//! - [`CsvConverter`]: tabular-to-JSON conversion for upload payloads
//!
//! ## Example
//!
//! ```rust,ignore
//! use soda_client::{Authentication, SodaClient};
//! use soda_data::{Dataset, OrderDirection, SoqlQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), soda_client::Error> {
//!     let auth = Authentication::new("opendata.socrata.com", "app-token");
//!     let client = SodaClient::new(auth)?;
//!     let dataset = Dataset::new(client, "pkfj-5jsd")?;
//!
//!     let query = SoqlQuery::new()
//!         .where_clause("state = 'AR'")
//!         .order("date_posted", OrderDirection::Descending)
//!         .limit(100)?;
//!
//!     let rows: Vec<serde_json::Value> = dataset.get_data(query).await?;
//!     println!("{} rows", rows.len());
//!     Ok(())
//! }
//! ```

mod converter;
mod dataset;
mod payload;
mod query;

pub use converter::{Converter, CsvConverter};
pub use dataset::{ApiVersion, Dataset, Filter};
pub use payload::Payload;
pub use query::{OrderDirection, SoqlQuery, MAX_LIMIT};

// The error types callers match on live in the transport crate.
pub use soda_client::{Error, ErrorKind, Result, UNKNOWN_ERROR_CODE};
