//! # socrata-soda
//!
//! A client library for the Socrata Open Data API (SODA).
//!
//! This library provides query building, dataset reads and writes, and
//! tabular data conversion for Socrata-hosted open data portals.
//!
//! ## Security
//!
//! Credentials are handled carefully:
//! - Passwords and tokens are redacted in Debug output
//! - Tracing/logging skips credential parameters
//!
//! ## Crates
//!
//! - **soda-client** - Core HTTP client: connection configuration, request
//!   building, response decoding and error classification
//! - **soda-data** - Dataset operations: SoQL queries, row-level CRUD,
//!   metadata, CSV conversion
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use socrata_soda::{Authentication, Dataset, SodaClient, SoqlQuery};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let auth = Authentication::new("opendata.socrata.com", "app-token");
//!     let client = SodaClient::new(auth)?;
//!
//!     let dataset = Dataset::new(client, "pkfj-5jsd")?;
//!
//!     let query = SoqlQuery::new()
//!         .where_clause("state = 'AR'")
//!         .limit(10)?;
//!
//!     let rows: Vec<serde_json::Value> = dataset.get_data(query).await?;
//!     for row in rows {
//!         println!("{row}");
//!     }
//!
//!     Ok(())
//! }
//! ```

// Re-export both crates for convenient access
pub use soda_client as client;
pub use soda_data as data;

// Re-export commonly used types at the top level
pub use soda_client::{Authentication, ClientConfig, Error, ErrorKind, Result, SodaClient};
pub use soda_data::{ApiVersion, CsvConverter, Dataset, Filter, OrderDirection, Payload, SoqlQuery};
