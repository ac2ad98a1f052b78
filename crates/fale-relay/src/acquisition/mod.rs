//! Upstream acquisition: fetching the pages the relay rewrites.

pub mod http_client;

pub use http_client::{FetchResult, HttpClient};
