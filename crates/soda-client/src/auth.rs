//! Connection configuration: domain, app token, and credentials.
//!
//! ## Security
//!
//! Passwords and tokens are redacted in Debug output.

use tracing::warn;

/// Connection configuration for a Socrata domain.
///
/// Holds the bare host of the data portal, the application token used to
/// bypass throttling, and optional credentials for authenticated actions.
/// Immutable after construction.
///
/// Basic authentication (email + password) and an OAuth 2.0 access token are
/// mutually independent: when an OAuth token is set it is sent as an
/// `Authorization: OAuth {token}` header and basic credentials should be left
/// unset. An app token is still required to bypass throttling in either case.
///
/// # Example
///
/// ```rust
/// use soda_client::Authentication;
///
/// let auth = Authentication::new("https://opendata.socrata.com/", "app-token")
///     .with_credentials("user@example.com", "hunter2");
///
/// assert_eq!(auth.domain(), "opendata.socrata.com");
/// ```
#[derive(Clone)]
pub struct Authentication {
    domain: String,
    app_token: String,
    email: Option<String>,
    password: Option<String>,
    oauth_token: Option<String>,
    scheme: String,
}

impl std::fmt::Debug for Authentication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authentication")
            .field("domain", &self.domain)
            .field("app_token", &"[REDACTED]")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("oauth_token", &self.oauth_token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl Authentication {
    /// Create connection configuration for a domain and app token.
    ///
    /// The domain is normalized to a bare host: an `http://` or `https://`
    /// prefix and any trailing slashes are stripped. Requests default to
    /// HTTPS regardless of the scheme given here; see
    /// [`insecure_http`](Self::insecure_http).
    pub fn new(domain: impl AsRef<str>, app_token: impl Into<String>) -> Self {
        let domain = domain.as_ref();
        let domain = domain
            .strip_prefix("https://")
            .or_else(|| domain.strip_prefix("http://"))
            .unwrap_or(domain)
            .trim_end_matches('/')
            .to_string();

        Self {
            domain,
            app_token: app_token.into(),
            email: None,
            password: None,
            oauth_token: None,
            scheme: "https".to_string(),
        }
    }

    /// Attach Basic-Auth credentials for authenticated actions.
    pub fn with_credentials(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.email = Some(email.into());
        self.password = Some(password.into());
        self
    }

    /// Attach an OAuth 2.0 access token.
    ///
    /// This does not perform any OAuth flow; the token is sent as-is in an
    /// `Authorization: OAuth {token}` header.
    pub fn with_oauth_token(mut self, token: impl Into<String>) -> Self {
        self.oauth_token = Some(token.into());
        self
    }

    /// Use plain HTTP instead of HTTPS.
    ///
    /// Only useful for talking to a local mock server in tests.
    pub fn insecure_http(mut self) -> Self {
        self.scheme = "http".to_string();
        self
    }

    /// The bare host of the API endpoint, without a protocol.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// The app token sent as `X-App-Token`. Empty string disables the header.
    pub fn app_token(&self) -> &str {
        &self.app_token
    }

    /// The URL scheme requests are made with (`https` unless overridden).
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// The OAuth 2.0 access token, if one is set and non-blank.
    pub fn oauth_token(&self) -> Option<&str> {
        self.oauth_token.as_deref().filter(|t| !is_blank(t))
    }

    /// Basic-Auth credentials, only when both email and password are present
    /// and non-blank.
    ///
    /// Supplying exactly one of the two is a caller configuration mistake; it
    /// is logged as a warning and no credentials are attached.
    pub fn basic_credentials(&self) -> Option<(&str, &str)> {
        let email = self.email.as_deref().filter(|e| !is_blank(e));
        let password = self.password.as_deref().filter(|p| !is_blank(p));

        match (email, password) {
            (Some(email), Some(password)) => Some((email, password)),
            (None, None) => None,
            _ => {
                warn!(
                    domain = %self.domain,
                    "only one of email/password is set; requests will be unauthenticated"
                );
                None
            }
        }
    }
}

/// True if the string is empty or contains only whitespace.
pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_normalization() {
        let cases = [
            ("opendata.socrata.com", "opendata.socrata.com"),
            ("http://opendata.socrata.com", "opendata.socrata.com"),
            ("https://opendata.socrata.com", "opendata.socrata.com"),
            ("https://opendata.socrata.com/", "opendata.socrata.com"),
            ("opendata.socrata.com//", "opendata.socrata.com"),
        ];

        for (input, expected) in cases {
            let auth = Authentication::new(input, "token");
            assert_eq!(auth.domain(), expected, "input: {input}");
        }
    }

    #[test]
    fn test_basic_credentials_require_both() {
        let auth = Authentication::new("example.com", "token");
        assert_eq!(auth.basic_credentials(), None);

        let auth = Authentication::new("example.com", "token")
            .with_credentials("user@example.com", "secret");
        assert_eq!(auth.basic_credentials(), Some(("user@example.com", "secret")));

        // Blank password is treated as missing.
        let auth = Authentication::new("example.com", "token")
            .with_credentials("user@example.com", "  ");
        assert_eq!(auth.basic_credentials(), None);
    }

    #[test]
    fn test_oauth_token_blank_is_none() {
        let auth = Authentication::new("example.com", "token").with_oauth_token("");
        assert_eq!(auth.oauth_token(), None);

        let auth = Authentication::new("example.com", "token").with_oauth_token("abc123");
        assert_eq!(auth.oauth_token(), Some("abc123"));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let auth = Authentication::new("example.com", "secret-token")
            .with_credentials("user@example.com", "hunter2")
            .with_oauth_token("oauth-secret");

        let debug = format!("{auth:?}");
        assert!(!debug.contains("secret-token"));
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("oauth-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   "));
        assert!(is_blank("\t\n"));
        assert!(!is_blank("x"));
    }
}
