//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → dispatch: pool picks an alive backend
//!     → forward.rs (rewrite URI, strip hop-by-hop, send)
//!     → relay upstream response to client
//! ```

pub mod forward;
pub mod request;
pub mod server;

pub use forward::{upstream_client, ForwardError, Forwarder, UpstreamClient};
pub use request::X_REQUEST_ID;
pub use server::{build_router, AppState, HttpServer};
