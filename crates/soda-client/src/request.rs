//! HTTP request building.

use std::collections::HashMap;

/// HTTP request method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl RequestMethod {
    /// Convert to reqwest::Method.
    pub fn to_reqwest(&self) -> reqwest::Method {
        match self {
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Builder for HTTP requests against a SODA endpoint.
#[derive(Debug)]
pub struct RequestBuilder {
    pub(crate) method: RequestMethod,
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    /// Key/value query parameters, percent-encoded at execution time.
    pub(crate) query_params: Vec<(String, String)>,
    /// A pre-encoded query string (e.g. serialized SoqlQuery output),
    /// appended verbatim. Mutually exclusive with `query_params`.
    pub(crate) raw_query: Option<String>,
    pub(crate) body: Option<RequestBody>,
    pub(crate) basic_auth: Option<(String, String)>,
}

/// Request body content.
#[derive(Debug)]
pub enum RequestBody {
    Json(serde_json::Value),
    Text(String),
}

impl RequestBuilder {
    /// Create a new request builder.
    pub fn new(method: RequestMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            query_params: Vec::new(),
            raw_query: None,
            body: None,
            basic_auth: None,
        }
    }

    /// Add a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add a query parameter. The key and value are percent-encoded when the
    /// request is executed. Mutually exclusive with
    /// [`raw_query`](Self::raw_query); mixing the two is a programming error.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        debug_assert!(
            self.raw_query.is_none(),
            "query parameters cannot be combined with a raw query"
        );
        self.query_params.push((name.into(), value.into()));
        self
    }

    /// Set a pre-encoded query string to be appended verbatim.
    ///
    /// Used for serialized `SoqlQuery` output whose clause values are already
    /// percent-encoded; re-encoding would corrupt them. Mutually exclusive
    /// with [`query`](Self::query); mixing the two is a programming error.
    pub fn raw_query(mut self, query: impl Into<String>) -> Self {
        let query = query.into();
        if !query.is_empty() {
            debug_assert!(
                self.query_params.is_empty(),
                "a raw query cannot be combined with query parameters"
            );
            self.raw_query = Some(query);
        }
        self
    }

    /// Set Basic-Auth credentials.
    pub fn basic_auth(mut self, user: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((user.into(), password.into()));
        self
    }

    /// Set a JSON body from a structured value.
    pub fn json_value(mut self, body: serde_json::Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self
    }

    /// Set an already-serialized JSON string body.
    pub fn json_text(mut self, body: impl Into<String>) -> Self {
        self.body = Some(RequestBody::Text(body.into()));
        self.headers
            .insert("Content-Type".to_string(), "application/json".to_string());
        self
    }

    /// Render the full URL including any query string.
    pub(crate) fn full_url(&self) -> String {
        if let Some(ref raw) = self.raw_query {
            return format!("{}?{}", self.url, raw);
        }

        if self.query_params.is_empty() {
            return self.url.clone();
        }

        let encoded: Vec<String> = self
            .query_params
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    urlencoding::encode(k),
                    urlencoding::encode(v)
                )
            })
            .collect();

        format!("{}?{}", self.url, encoded.join("&"))
    }
}
