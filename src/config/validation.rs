//! Configuration validation.
//!
//! # Responsibilities
//! - Split the `--backends` list
//! - Turn each entry into an absolute `http` URL
//! - Reject empty lists and malformed addresses before anything binds

use thiserror::Error;
use url::Url;

/// Startup configuration errors. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No backend was given.
    #[error("Please provide one or more backends to load balance")]
    EmptyBackendList,

    /// An entry could not be parsed as a URL with a host.
    #[error("Invalid backend address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The transport only speaks plain HTTP.
    #[error("Unsupported scheme '{scheme}' in backend address '{address}'")]
    UnsupportedScheme { address: String, scheme: String },
}

/// Split a comma separated backend list. Surrounding whitespace is ignored.
pub fn split_backend_list(list: &str) -> Vec<String> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    list.split(',').map(|s| s.trim().to_string()).collect()
}

/// Parse one backend address.
///
/// `host:port` without a scheme is read as `http://host:port`.
pub fn parse_backend_address(address: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidAddress {
        address: address.to_string(),
        reason,
    };

    if address.is_empty() {
        return Err(invalid("empty entry".to_string()));
    }

    let candidate = if address.contains("://") {
        address.to_string()
    } else {
        format!("http://{}", address)
    };

    let url = Url::parse(&candidate).map_err(|e| invalid(e.to_string()))?;

    if url.scheme() != "http" {
        return Err(ConfigError::UnsupportedScheme {
            address: address.to_string(),
            scheme: url.scheme().to_string(),
        });
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(invalid("missing host".to_string()));
    }

    Ok(url)
}

/// Validate the whole list. Returns the first error encountered.
pub fn validate_backends(addresses: &[String]) -> Result<Vec<Url>, ConfigError> {
    if addresses.is_empty() {
        return Err(ConfigError::EmptyBackendList);
    }
    addresses.iter().map(|a| parse_backend_address(a)).collect()
}
