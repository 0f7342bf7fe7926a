// nios-api: Async Rust client for the Infoblox NIOS WAPI.

pub mod client;
pub mod error;
pub mod query;
pub mod response;
pub mod transport;
pub mod types;

pub use client::WapiClient;
pub use error::Error;
pub use query::QueryParams;
pub use response::{GetResponse, ListResponse, ListResult};
pub use transport::{TlsMode, TransportConfig};
