//! Error types for soda-client.

/// Result type alias for soda-client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for soda-client operations.
///
/// Errors fall into four tiers, distinguishable through [`ErrorKind`]:
///
/// 1. **Validation**: raised before any network activity
///    ([`ErrorKind::InvalidResourceId`], [`ErrorKind::InvalidArgument`],
///    [`ErrorKind::InvalidPayload`], [`ErrorKind::Config`]).
/// 2. **Transport**: the HTTP stack could not complete the call
///    ([`ErrorKind::Timeout`], [`ErrorKind::Connection`], [`ErrorKind::Transport`]).
/// 3. **HTTP**: the call completed but the body is not valid JSON
///    ([`ErrorKind::Http`]), typically a 5xx HTML page or proxy error.
/// 4. **Domain**: a well-formed SODA error envelope ([`ErrorKind::Soda`]),
///    the normal channel for semantic failures such as `authentication_required`
///    or `row.missing`.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional source error.
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Create a new error with the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind, source: None }
    }

    /// Create a new error with the given kind and source.
    pub fn with_source(
        kind: ErrorKind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            source: Some(Box::new(source)),
        }
    }

    /// Returns true if this error was raised before any network activity.
    pub fn is_validation(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::InvalidResourceId(_)
                | ErrorKind::InvalidArgument(_)
                | ErrorKind::InvalidPayload(_)
                | ErrorKind::Config(_)
        )
    }

    /// Returns true if the underlying HTTP call could not be completed.
    pub fn is_transport(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Timeout | ErrorKind::Connection(_) | ErrorKind::Transport(_)
        )
    }

    /// Returns true if the call completed with a non-JSON body.
    pub fn is_http(&self) -> bool {
        matches!(self.kind, ErrorKind::Http { .. })
    }

    /// Returns true if this is an in-band SODA API error.
    pub fn is_soda(&self) -> bool {
        matches!(self.kind, ErrorKind::Soda { .. })
    }

    /// Returns the SODA machine-readable error code, if this is a domain error.
    pub fn soda_code(&self) -> Option<&str> {
        match &self.kind {
            ErrorKind::Soda { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns the HTTP status code, if this is an HTTP error.
    pub fn http_status(&self) -> Option<u16> {
        match &self.kind {
            ErrorKind::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// The kind of error that occurred.
#[derive(Debug, thiserror::Error)]
pub enum ErrorKind {
    /// A resource ID does not match the `xxxx-xxxx` pattern.
    #[error("Invalid resource ID: {0}")]
    InvalidResourceId(String),

    /// An argument was rejected before any network activity.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An upload payload could not be normalized to JSON.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request timeout.
    #[error("Request timeout")]
    Timeout,

    /// Connection error (DNS, connection refused).
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other failure of the underlying HTTP stack.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The call completed but returned a body that is not valid JSON.
    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    /// SODA API error envelope (a JSON body with a truthy `error` field).
    #[error("SODA API error: {code} - {message}")]
    Soda {
        code: String,
        message: String,
        data: serde_json::Value,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// I/O error (e.g. reading a converter input file).
    #[error("I/O error: {0}")]
    Io(String),
}

/// Sentinel error code used when a SODA error envelope carries no `code` field.
pub const UNKNOWN_ERROR_CODE: &str = "error.unknown";

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            ErrorKind::Timeout
        } else if err.is_connect() {
            ErrorKind::Connection(err.to_string())
        } else {
            ErrorKind::Transport(err.to_string())
        };

        Error::with_source(kind, err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::with_source(ErrorKind::Json(err.to_string()), err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::with_source(ErrorKind::Io(err.to_string()), err)
    }
}
