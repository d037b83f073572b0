//! Adapters for external services

pub mod stardog_http;

pub use stardog_http::StardogHttpClient;
