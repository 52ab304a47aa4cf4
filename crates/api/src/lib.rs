//! Authenticated REST client core for the Beanstalk API.
//!
//! [`Client`] owns the connection settings and an injected [`Transport`];
//! everything resource-specific lives in [`resources`] as free functions
//! over a shared client.

pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod resources;
pub mod transport;

pub use client::Client;
pub use config::{
    ClientConfig, DEFAULT_BASE_URL, DEFAULT_CONTENT_TYPE, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT,
};
pub use error::{ApiError, Result};
pub use request::{Method, Request, Response};
pub use transport::{ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse};
