//! `storefront-core`: marketplace catalog building blocks.
//!
//! This crate contains **pure domain** primitives shared by the backend client
//! and the vendor workflows (no IO, no HTTP).

pub mod catalog;
pub mod entity;
pub mod error;
pub mod id;
pub mod price;

pub use catalog::{Category, NewProduct, Notification, Product, ProductStatus, Tag, UploadedImage};
pub use entity::{Entity, find_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{CategoryId, NotificationId, ProductId, TagId, VendorId};
pub use price::{Price, format_amount, parse_stock_quantity};
