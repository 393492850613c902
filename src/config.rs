//! Runtime configuration read from the Lambda environment.

use anyhow::{Context, Result, bail};
use http::Uri;

use crate::proxy::{CUSTOM_HOST_VARIABLE, DEFAULT_SERVER_ADDRESS, RequestAccessor};

/// Environment variable with the base path to strip from incoming paths
pub const STRIP_BASE_PATH_VARIABLE: &str = "STRIP_BASE_PATH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Scheme and host prepended to every generated request path
    pub server_address: String,
    /// Base path removed before routing, empty when nothing is stripped
    pub strip_base_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: DEFAULT_SERVER_ADDRESS.to_string(),
            strip_base_path: String::new(),
        }
    }
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if `GO_API_HOST` is set to something that is not an
    /// absolute URL with a scheme.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns an error if the custom host is not an absolute URL with a scheme.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_address = lookup(CUSTOM_HOST_VARIABLE)
            .map(|host| {
                validate_host(&host)
                    .with_context(|| format!("Invalid {CUSTOM_HOST_VARIABLE} value: {host}"))
            })
            .transpose()?
            .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string());

        let strip_base_path = lookup(STRIP_BASE_PATH_VARIABLE).unwrap_or_default();

        Ok(Self {
            server_address,
            strip_base_path,
        })
    }

    /// Builds the request accessor described by this configuration.
    #[must_use]
    pub fn request_accessor(&self) -> RequestAccessor {
        RequestAccessor::new(self.server_address.clone()).with_base_path(&self.strip_base_path)
    }
}

fn validate_host(host: &str) -> Result<String> {
    let host = host.trim().trim_end_matches('/');
    let uri: Uri = host.parse().context("Failed to parse host as a URI")?;

    if uri.scheme().is_none() || uri.authority().is_none() {
        bail!("Host must include a scheme, e.g. https://my-custom.host.com");
    }

    Ok(host.to_string())
}
