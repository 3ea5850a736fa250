//! Infrastructure: configuration, HTTP transport, logging, HTML parsing,
//! and snapshot persistence.

pub mod config;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod snapshot;

pub use config::AppConfig;
pub use http_client::{HttpClient, HttpClientConfig};
pub use snapshot::SnapshotStore;
