//! Authenticated session construction.
//!
//! A [`SessionConfig`] is built once per run and is immutable afterwards:
//! the authentication cookie, a generated secondary session token, and the
//! browser header bundle. [`SessionConfig::build_client`] turns it into the
//! reusable `reqwest::Client`; the client's connection pool is the only
//! mutable state and it lives for the duration of the run.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use rand::Rng;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::config::HttpConfig;

/// Cookie scope for the target site.
pub const COOKIE_DOMAIN: &str = ".linkedin.com";
/// Origin used to seed the cookie jar.
const SITE_ORIGIN: &str = "https://www.linkedin.com";

/// Range of the generated secondary session token (13 decimal digits).
const SESSION_TOKEN_MIN: u64 = 1_000_000_000_000;
const SESSION_TOKEN_MAX: u64 = 9_999_999_999_999;

/// Immutable per-run session state. Holds the credential, so its `Debug`
/// output redacts the cookie value.
#[derive(Clone)]
pub struct SessionConfig {
    auth_cookie: String,
    session_token: String,
    http: HttpConfig,
}

impl SessionConfig {
    /// Build the session state. The secondary token is drawn from `rng`
    /// once; no network calls happen here.
    pub fn new(auth_cookie: impl Into<String>, http: HttpConfig, rng: &mut impl Rng) -> Self {
        let token = rng.gen_range(SESSION_TOKEN_MIN..=SESSION_TOKEN_MAX);
        Self {
            auth_cookie: auth_cookie.into(),
            session_token: format!("ajax:{}", token),
            http,
        }
    }

    /// The generated secondary session token (`ajax:<digits>`).
    pub fn session_token(&self) -> &str {
        &self.session_token
    }

    /// Truncated cookie prefix, safe to log. The full value is a credential
    /// and must never appear in diagnostics.
    pub fn redacted_cookie(&self) -> String {
        let prefix: String = self.auth_cookie.chars().take(8).collect();
        format!("{}…", prefix)
    }

    /// Construct the HTTP client presenting as an authenticated desktop
    /// browser: both cookies scoped to [`COOKIE_DOMAIN`], the fixed header
    /// bundle as client defaults, redirects followed, per-request timeout.
    pub fn build_client(&self) -> Result<reqwest::Client> {
        let origin = SITE_ORIGIN
            .parse::<reqwest::Url>()
            .context("invalid site origin")?;

        let jar = Arc::new(Jar::default());
        jar.add_cookie_str(
            &format!(
                "li_at={}; Domain={}; Path=/",
                self.auth_cookie, COOKIE_DOMAIN
            ),
            &origin,
        );
        jar.add_cookie_str(
            &format!(
                "JSESSIONID=\"{}\"; Domain={}; Path=/",
                self.session_token, COOKIE_DOMAIN
            ),
            &origin,
        );

        debug!(
            "Session configured (li_at={}, JSESSIONID={})",
            self.redacted_cookie(),
            self.session_token
        );

        reqwest::Client::builder()
            .user_agent(&self.http.user_agent)
            .default_headers(Self::browser_headers())
            .cookie_provider(jar)
            .timeout(Duration::from_secs(self.http.request_timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(self.http.max_redirects))
            .gzip(true)
            .build()
            .context("failed to build HTTP client")
    }

    /// Fixed header bundle mimicking a desktop browser navigation.
    fn browser_headers() -> HeaderMap {
        // Header names must be lowercase here: HeaderMap::insert on a
        // static str asserts lowercase at runtime.
        let mut headers = HeaderMap::new();
        headers.insert(
            "accept",
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
            ),
        );
        headers.insert("accept-language", HeaderValue::from_static("en-US,en;q=0.9"));
        headers.insert("dnt", HeaderValue::from_static("1"));
        headers.insert("connection", HeaderValue::from_static("keep-alive"));
        headers.insert("upgrade-insecure-requests", HeaderValue::from_static("1"));
        headers.insert("sec-fetch-dest", HeaderValue::from_static("document"));
        headers.insert("sec-fetch-mode", HeaderValue::from_static("navigate"));
        headers.insert("sec-fetch-site", HeaderValue::from_static("none"));
        headers.insert("cache-control", HeaderValue::from_static("max-age=0"));
        headers
    }
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("auth_cookie", &self.redacted_cookie())
            .field("session_token", &self.session_token)
            .field("http", &self.http)
            .finish()
    }
}
