//! Catalog read models and write payloads (match the API's JSON shapes).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::id::{CategoryId, NotificationId, ProductId, TagId, VendorId};
use crate::price::Price;

/// Product category (reference data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Product tag (reference data).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}

/// A persisted product as returned by `GET /products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub is_draft: bool,
    /// `None` while verification is pending.
    #[serde(default)]
    pub is_verified: Option<bool>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub tag_ids: Vec<TagId>,
    #[serde(default)]
    pub stock_quantity: Option<u32>,
    #[serde(default)]
    pub shipping_info: Option<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub materials: Option<String>,
    #[serde(default)]
    pub return_policy: Option<String>,
}

impl Product {
    pub fn status(&self) -> ProductStatus {
        ProductStatus::from_flags(self.is_draft, self.is_verified)
    }

    /// The category reference, whether embedded or given as a bare id.
    pub fn category_ref(&self) -> Option<&CategoryId> {
        self.category
            .as_ref()
            .map(|c| &c.id)
            .or(self.category_id.as_ref())
    }

    /// Tag references, preferring embedded tags over bare ids.
    pub fn tag_refs(&self) -> Vec<TagId> {
        if self.tags.is_empty() {
            self.tag_ids.clone()
        } else {
            self.tags.iter().map(|t| t.id.clone()).collect()
        }
    }
}

/// Body of `POST /products` and `PUT /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProduct {
    pub vendor_id: VendorId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: String,
    pub is_draft: bool,
    pub category_id: Option<CategoryId>,
    pub tag_ids: Vec<TagId>,
}

/// Response of `POST /upload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedImage {
    pub image_url: String,
}

/// Vendor notification (read-only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    #[serde(default)]
    pub vendor_id: Option<VendorId>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub message: String,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Listing lifecycle as seen by the vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Draft,
    Pending,
    Verified,
    Rejected,
}

impl ProductStatus {
    pub fn from_flags(is_draft: bool, is_verified: Option<bool>) -> Self {
        match (is_draft, is_verified) {
            (true, _) => ProductStatus::Draft,
            (false, None) => ProductStatus::Pending,
            (false, Some(true)) => ProductStatus::Verified,
            (false, Some(false)) => ProductStatus::Rejected,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "Draft",
            ProductStatus::Pending => "Verification Pending",
            ProductStatus::Verified => "Verified & Approved",
            ProductStatus::Rejected => "Verification Failed",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "This product has not been submitted yet.",
            ProductStatus::Pending => "Your product is under review.",
            ProductStatus::Verified => "Your product has been verified as Made in Cameroon.",
            ProductStatus::Rejected => "Your product does not meet our Made in Cameroon criteria.",
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for Tag {
    type Id = TagId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for Notification {
    type Id = NotificationId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
