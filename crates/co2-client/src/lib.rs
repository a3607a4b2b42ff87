mod client;
pub mod codec;
mod data_api;
mod error;
mod memory;
mod query;

pub use bson::{Bson, Document};
pub use client::CollectionClient;
pub use data_api::{DataApiClient, DataApiConfig};
pub use error::ClientError;
pub use memory::MemoryClient;
pub use query::FindQuery;
