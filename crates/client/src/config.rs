//! Client configuration (API location, vendor identity, timeouts).

use std::time::Duration;

use reqwest::Url;
use storefront_core::VendorId;

use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

pub const API_URL_ENV: &str = "STOREFRONT_API_URL";
pub const VENDOR_ID_ENV: &str = "STOREFRONT_VENDOR_ID";
pub const TIMEOUT_ENV: &str = "STOREFRONT_HTTP_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base of the REST surface, e.g. `http://localhost:8080/api` (no trailing slash).
    api_url: String,
    /// Vendor the session acts for.
    pub vendor_id: VendorId,
    /// `None` means requests may hang indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            vendor_id: VendorId::placeholder(),
            request_timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(api_url: &str) -> Result<Self, ClientError> {
        let trimmed = api_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed)
            .map_err(|e| ClientError::Config(format!("invalid API URL {trimmed:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "API URL must be http(s), got {:?}",
                parsed.scheme()
            )));
        }
        Ok(Self {
            api_url: trimmed.to_string(),
            ..Self::default()
        })
    }

    /// Load from `STOREFRONT_API_URL`, `STOREFRONT_VENDOR_ID` and
    /// `STOREFRONT_HTTP_TIMEOUT_SECS`, falling back to the local defaults.
    pub fn from_env() -> Result<Self, ClientError> {
        let api_url = std::env::var(API_URL_ENV).unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let mut config = Self::new(&api_url)?;

        if let Ok(vendor) = std::env::var(VENDOR_ID_ENV) {
            config.vendor_id = VendorId::new(vendor)?;
        }

        if let Ok(secs) = std::env::var(TIMEOUT_ENV) {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| ClientError::Config(format!("{TIMEOUT_ENV}: {e}")))?;
            config.request_timeout = Some(Duration::from_secs(secs));
        }

        Ok(config)
    }

    pub fn with_vendor(mut self, vendor_id: VendorId) -> Self {
        self.vendor_id = vendor_id;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Full URL of an API path such as `products/42`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// Scheme, host and port of the API, without its path.
    pub fn origin(&self) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| ClientError::Config(format!("invalid API URL: {e}")))?;
        url.set_path("/");
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }

    /// Resolve an image reference from the API (often `/uploads/<file>`) to an
    /// absolute URL. Already-absolute references are returned unchanged.
    pub fn absolute_asset_url(&self, reference: &str) -> String {
        let reference = reference.trim();
        if reference.is_empty() || is_absolute(reference) {
            return reference.to_string();
        }
        match self.origin().and_then(|origin| {
            origin
                .join(reference)
                .map_err(|e| ClientError::Config(e.to_string()))
        }) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!("could not resolve asset URL {:?}: {}", reference, e);
                reference.to_string()
            }
        }
    }
}

fn is_absolute(reference: &str) -> bool {
    ["http://", "https://", "blob:", "data:"]
        .iter()
        .any(|prefix| reference.starts_with(prefix))
}
