//! High-level SODA client: authentication headers plus endpoint URL building.

use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::auth::Authentication;
use crate::client::SodaHttpClient;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::request::{RequestBuilder, RequestMethod};
use crate::response::Response;

/// High-level SODA API client.
///
/// Combines connection configuration ([`Authentication`]) with the HTTP
/// executor and pre-loads every request with the standard SODA headers:
/// `Accept`/`Content-Type: application/json`, `X-App-Token`, Basic-Auth when
/// complete credentials are present, and `Authorization: OAuth {token}` when
/// an OAuth token is set.
///
/// Dataset-level operations live in the `soda-data` crate, which composes
/// this client with resource identifiers and the SoQL query builder.
#[derive(Debug, Clone)]
pub struct SodaClient {
    http: SodaHttpClient,
    auth: Authentication,
}

impl SodaClient {
    /// Create a new client with default HTTP configuration.
    pub fn new(auth: Authentication) -> Result<Self> {
        Self::with_config(auth, ClientConfig::default())
    }

    /// Create a new client with custom HTTP configuration.
    pub fn with_config(auth: Authentication, config: ClientConfig) -> Result<Self> {
        let http = SodaHttpClient::new(config)?;
        Ok(Self { http, auth })
    }

    /// The connection configuration.
    pub fn auth(&self) -> &Authentication {
        &self.auth
    }

    /// Build the data endpoint URL for a resource:
    /// `{scheme}://{domain}/resource/{id}.json`.
    pub fn resource_url(&self, resource_id: &str) -> String {
        self.api_url("resource", resource_id)
    }

    /// Build the metadata endpoint URL for a resource:
    /// `{scheme}://{domain}/views/{id}.json`.
    pub fn view_url(&self, resource_id: &str) -> String {
        self.api_url("views", resource_id)
    }

    /// Build the per-row endpoint URL:
    /// `{scheme}://{domain}/resource/{id}/{row}.json`.
    pub fn row_url(&self, resource_id: &str, row_id: &str) -> String {
        self.api_url("resource", &format!("{resource_id}/{row_id}"))
    }

    fn api_url(&self, location: &str, identifier: &str) -> String {
        format!(
            "{}://{}/{}/{}.json",
            self.auth.scheme(),
            self.auth.domain(),
            location,
            identifier
        )
    }

    /// Create a GET request builder with the standard SODA headers.
    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(RequestMethod::Get, url)
    }

    /// Create a POST request builder with the standard SODA headers.
    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(RequestMethod::Post, url)
    }

    /// Create a PUT request builder with the standard SODA headers.
    pub fn put(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(RequestMethod::Put, url)
    }

    /// Create a DELETE request builder with the standard SODA headers.
    pub fn delete(&self, url: impl Into<String>) -> RequestBuilder {
        self.request(RequestMethod::Delete, url)
    }

    fn request(&self, method: RequestMethod, url: impl Into<String>) -> RequestBuilder {
        let mut request = RequestBuilder::new(method, url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json");

        if !self.auth.app_token().is_empty() {
            request = request.header("X-App-Token", self.auth.app_token());
        }

        if let Some(token) = self.auth.oauth_token() {
            request = request.header("Authorization", format!("OAuth {token}"));
        }

        if let Some((email, password)) = self.auth.basic_credentials() {
            request = request.basic_auth(email, password);
        }

        request
    }

    /// Execute a request and return the raw response.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response> {
        self.http.execute(request).await
    }

    /// Execute a GET request and decode the JSON body.
    #[instrument(skip(self))]
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.execute(self.get(url)).await?;
        response.into_json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_auth() -> Authentication {
        Authentication::new("opendata.socrata.com", "khpKCi1wMz2bwXyMIHfb6ux73")
    }

    #[test]
    fn test_url_building() {
        let client = SodaClient::new(test_auth()).unwrap();

        assert_eq!(
            client.resource_url("pkfj-5jsd"),
            "https://opendata.socrata.com/resource/pkfj-5jsd.json"
        );
        assert_eq!(
            client.view_url("pkfj-5jsd"),
            "https://opendata.socrata.com/views/pkfj-5jsd.json"
        );
        assert_eq!(
            client.row_url("pkfj-5jsd", "42"),
            "https://opendata.socrata.com/resource/pkfj-5jsd/42.json"
        );
    }

    #[test]
    fn test_url_building_with_insecure_http() {
        let auth = Authentication::new("127.0.0.1:8080", "token").insecure_http();
        let client = SodaClient::new(auth).unwrap();

        assert_eq!(
            client.resource_url("pkfj-5jsd"),
            "http://127.0.0.1:8080/resource/pkfj-5jsd.json"
        );
    }

    #[test]
    fn test_empty_app_token_omits_header() {
        let client = SodaClient::new(Authentication::new("example.com", "")).unwrap();
        let request = client.get("https://example.com/resource/abcd-1234.json");

        assert!(!request.headers.contains_key("X-App-Token"));
        assert_eq!(
            request.headers.get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[test]
    fn test_oauth_token_header() {
        let auth = test_auth().with_oauth_token("oauth-abc");
        let client = SodaClient::new(auth).unwrap();
        let request = client.get("https://example.com/resource/abcd-1234.json");

        assert_eq!(
            request.headers.get("Authorization"),
            Some(&"OAuth oauth-abc".to_string())
        );
    }

    #[tokio::test]
    async fn test_get_json_sends_standard_headers() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/views/pkfj-5jsd.json"))
            .and(header("Accept", "application/json"))
            .and(header("X-App-Token", "khpKCi1wMz2bwXyMIHfb6ux73"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pkfj-5jsd",
                "newBackend": false
            })))
            .mount(&mock_server)
            .await;

        let domain = mock_server.uri();
        let auth = Authentication::new(&domain, "khpKCi1wMz2bwXyMIHfb6ux73").insecure_http();
        let client = SodaClient::new(auth).unwrap();

        let metadata: serde_json::Value = client
            .get_json(&client.view_url("pkfj-5jsd"))
            .await
            .unwrap();

        assert_eq!(metadata["id"], "pkfj-5jsd");
    }
}
