//! Forwarding adapter bound to one backend.
//!
//! # Responsibilities
//! - Rewrite the inbound URI onto the backend (base path joined, queries merged)
//! - Strip hop-by-hop headers in both directions
//! - Append the client address to `X-Forwarded-For`
//! - Relay the upstream response without buffering the body

use axum::body::Body;
use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use axum::http::uri::{Authority, PathAndQuery, Scheme};
use axum::http::{Request, Response, Uri, Version};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::net::SocketAddr;
use std::str::FromStr;
use thiserror::Error;
use url::Url;

use crate::config::ConfigError;

/// Shared HTTP client used for forwarding and probing.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Build the shared upstream client.
pub fn upstream_client() -> UpstreamClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Headers that apply to a single connection and are never forwarded.
const HOP_BY_HOP: [HeaderName; 8] = [
    header::CONNECTION,
    HeaderName::from_static("proxy-connection"),
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::UPGRADE,
];

/// Errors raised while forwarding to an already selected backend.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// The rewritten URI could not be built.
    #[error("failed to build upstream uri: {0}")]
    Uri(#[from] axum::http::Error),

    /// Connecting to or talking with the backend failed.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),
}

/// Sends requests to a single backend.
#[derive(Debug, Clone)]
pub struct Forwarder {
    authority: Authority,
    base_path: String,
    base_query: Option<String>,
    client: UpstreamClient,
}

impl Forwarder {
    /// Bind a forwarder to `target`.
    pub fn new(target: &Url, client: UpstreamClient) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidAddress {
            address: target.to_string(),
            reason,
        };

        let host = target
            .host_str()
            .ok_or_else(|| invalid("missing host".to_string()))?;
        let port = target
            .port_or_known_default()
            .ok_or_else(|| invalid("missing port".to_string()))?;
        let authority = Authority::from_str(&format!("{}:{}", host, port))
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            authority,
            base_path: target.path().to_string(),
            base_query: target.query().map(str::to_string),
            client,
        })
    }

    /// The `host:port` this forwarder talks to.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Map an inbound URI onto the backend.
    pub fn upstream_uri(&self, inbound: &Uri) -> Result<Uri, ForwardError> {
        let path = join_paths(&self.base_path, inbound.path());
        let query = match (self.base_query.as_deref(), inbound.query()) {
            (Some(base), Some(req)) if !base.is_empty() => Some(format!("{}&{}", base, req)),
            (Some(base), None) if !base.is_empty() => Some(base.to_string()),
            (_, req) => req.map(str::to_string),
        };
        let path_and_query = match query {
            Some(q) => format!("{}?{}", path, q),
            None => path,
        };

        let uri = Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(PathAndQuery::from_str(&path_and_query).map_err(axum::http::Error::from)?)
            .build()?;
        Ok(uri)
    }

    /// Forward `request` and return the backend's response.
    pub async fn send(
        &self,
        request: Request<Body>,
        peer: Option<SocketAddr>,
    ) -> Result<Response<Body>, ForwardError> {
        let (mut parts, body) = request.into_parts();

        parts.uri = self.upstream_uri(&parts.uri)?;
        // The pooled client negotiates its own protocol with the backend.
        parts.version = Version::HTTP_11;
        strip_hop_by_hop(&mut parts.headers);
        if let Some(peer) = peer {
            append_forwarded_for(&mut parts.headers, peer);
        }

        let response = self
            .client
            .request(Request::from_parts(parts, body))
            .await?;

        let (mut parts, body) = response.into_parts();
        strip_hop_by_hop(&mut parts.headers);
        Ok(Response::from_parts(parts, Body::new(body)))
    }
}

fn join_paths(base: &str, path: &str) -> String {
    match (base.ends_with('/'), path.starts_with('/')) {
        (true, true) => format!("{}{}", base, &path[1..]),
        (false, false) => format!("{}/{}", base, path),
        _ => format!("{}{}", base, path),
    }
}

/// Remove hop-by-hop headers, including any listed in `Connection`.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .filter_map(|name| HeaderName::from_str(name.trim()).ok())
        .collect();

    for name in listed.iter().chain(HOP_BY_HOP.iter()) {
        headers.remove(name);
    }
    // Framing is re-derived by the transport on each side.
    headers.remove(header::TRANSFER_ENCODING);
}

fn append_forwarded_for(headers: &mut HeaderMap, peer: SocketAddr) {
    let ip = peer.ip().to_string();
    let value = match headers.get(X_FORWARDED_FOR).and_then(|v| v.to_str().ok()) {
        Some(prior) => format!("{}, {}", prior, ip),
        None => ip,
    };
    if let Ok(value) = HeaderValue::from_str(&value) {
        headers.insert(X_FORWARDED_FOR, value);
    }
}
