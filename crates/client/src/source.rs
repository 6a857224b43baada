//! Backend capabilities consumed by the vendor workflows.
//!
//! Each trait is one external collaborator. Workflows hold them as
//! `Arc<dyn Trait>` so the HTTP backend, the static vocabularies and the
//! in-memory fake can be mixed freely.

use async_trait::async_trait;
use storefront_core::{Category, NewProduct, Notification, Product, ProductId, Tag, VendorId};

use crate::error::ClientError;

/// A local file picked by the vendor, not yet stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// File extension derived from the name, lowercased.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Category and tag vocabularies.
#[async_trait]
pub trait ReferenceDataSource: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, ClientError>;
    async fn list_tags(&self) -> Result<Vec<Tag>, ClientError>;
}

/// Stores an image and hands back an absolute URL for it.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload_image(&self, file: &ImageFile) -> Result<String, ClientError>;
}

/// Authoritative product storage.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError>;
    async fn create_product(&self, product: &NewProduct) -> Result<Product, ClientError>;
    async fn update_product(&self, id: &ProductId, product: &NewProduct) -> Result<(), ClientError>;
    async fn delete_product(&self, id: &ProductId) -> Result<(), ClientError>;
    /// Flag an existing product as a draft.
    async fn mark_draft(&self, id: &ProductId) -> Result<(), ClientError>;
    /// Hand an existing product to marketplace verification.
    async fn submit_for_verification(&self, id: &ProductId) -> Result<(), ClientError>;
}

/// Per-vendor notification feed.
#[async_trait]
pub trait NotificationSource: Send + Sync {
    async fn list_notifications(&self, vendor_id: &VendorId) -> Result<Vec<Notification>, ClientError>;
}

/// A backend providing every capability.
pub trait Backend: ReferenceDataSource + ImageUploader + ProductRepository + NotificationSource {}

impl<T> Backend for T where T: ReferenceDataSource + ImageUploader + ProductRepository + NotificationSource {}
