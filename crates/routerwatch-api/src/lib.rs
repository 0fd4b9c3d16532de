// routerwatch-api: Async Rust client for router monitoring graph endpoints

pub mod client;
pub mod error;
pub mod models;
pub mod template;
pub mod transport;

pub use client::GraphClient;
pub use error::Error;
pub use models::{GraphPayload, RawTimestamp};
pub use template::{DEFAULT_PLACEHOLDER, UrlTemplate};
pub use transport::{TlsMode, TransportConfig};
