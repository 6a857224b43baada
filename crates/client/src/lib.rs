//! `storefront-client`
//!
//! **Responsibility:** everything the vendor workflows need from the outside
//! world, expressed as injectable capabilities.
//!
//! This crate provides:
//! - Capability traits (reference data, image upload, product repository,
//!   notifications)
//! - `HttpBackend`: the REST implementation over `reqwest`
//! - `StaticReferenceData`: the built-in category/tag vocabularies
//! - `InMemoryBackend`: a fake backend with failure injection for tests/dev
//!
//! Every call is a single attempt; there are no retries.

pub mod config;
pub mod error;
pub mod http;
pub mod memory;
pub mod reference;
pub mod source;

pub use config::ClientConfig;
pub use error::ClientError;
pub use http::HttpBackend;
pub use memory::{InMemoryBackend, Operation};
pub use reference::StaticReferenceData;
pub use source::{
    Backend, ImageFile, ImageUploader, NotificationSource, ProductRepository, ReferenceDataSource,
};
