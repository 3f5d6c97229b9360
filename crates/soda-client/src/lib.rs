//! # soda-client
//!
//! Core HTTP client infrastructure for the Socrata Open Data API (SODA).
//!
//! This crate provides the transport layer:
//! - Connection configuration (domain, app token, credentials)
//! - Request building with the standard SODA headers
//! - Response decoding with the three-way failure classification
//!   (transport errors, non-JSON HTTP errors, in-band SODA error envelopes)
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              soda-data                      │
//! │  (Dataset facade, SoqlQuery, converters)    │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │              SodaClient                     │
//! │  - Holds Authentication                     │
//! │  - Builds resource/view/row endpoint URLs   │
//! │  - Pre-loads standard headers               │
//! └─────────────────────────────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────────┐
//! │             SodaHttpClient                  │
//! │  - Raw HTTP (reqwest), timeouts             │
//! │  - One request per call, no retries         │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use soda_client::{Authentication, SodaClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), soda_client::Error> {
//!     let auth = Authentication::new("opendata.socrata.com", "app-token");
//!     let client = SodaClient::new(auth)?;
//!
//!     let metadata: serde_json::Value = client
//!         .get_json(&client.view_url("pkfj-5jsd"))
//!         .await?;
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod config;
mod error;
mod request;
mod response;
mod soda_client;

pub use auth::Authentication;
pub use client::SodaHttpClient;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use error::{Error, ErrorKind, Result, UNKNOWN_ERROR_CODE};
pub use request::{RequestBody, RequestBuilder, RequestMethod};
pub use response::{Response, LEGACY_TYPES_HEADER, TRUTH_LAST_MODIFIED_HEADER};
pub use soda_client::SodaClient;

/// User-Agent string for the client
pub const USER_AGENT: &str = concat!("socrata-soda/", env!("CARGO_PKG_VERSION"));
