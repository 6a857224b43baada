use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;
use storefront_core::{
    Category, NewProduct, Notification, NotificationId, Product, ProductId, Tag, VendorId,
    find_by_id,
};
use uuid::Uuid;

use crate::error::ClientError;
use crate::reference::StaticReferenceData;
use crate::source::{ImageFile, ImageUploader, NotificationSource, ProductRepository, ReferenceDataSource};

/// Backend operations that can be made to fail on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    ListCategories,
    ListTags,
    ListProducts,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    MarkDraft,
    SubmitForVerification,
    UploadImage,
    ListNotifications,
}

#[derive(Debug, Default)]
struct State {
    categories: Vec<Category>,
    tags: Vec<Tag>,
    products: Vec<Product>,
    notifications: Vec<Notification>,
    created: Vec<NewProduct>,
    updated: Vec<(ProductId, NewProduct)>,
    uploads: Vec<String>,
}

/// In-memory backend.
///
/// Intended for tests/dev. Every call succeeds unless its `Operation` has been
/// switched to failing with [`InMemoryBackend::fail`].
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    state: RwLock<State>,
    failing: RwLock<HashSet<Operation>>,
}

fn poisoned() -> ClientError {
    ClientError::Unavailable("lock poisoned".to_string())
}

impl InMemoryBackend {
    /// Empty backend with the marketplace vocabularies.
    pub fn new() -> Self {
        let reference = StaticReferenceData::marketplace();
        Self::with_reference(reference.categories().to_vec(), reference.tags().to_vec())
    }

    pub fn with_reference(categories: Vec<Category>, tags: Vec<Tag>) -> Self {
        Self {
            state: RwLock::new(State {
                categories,
                tags,
                ..State::default()
            }),
            failing: RwLock::new(HashSet::new()),
        }
    }

    pub fn fail(&self, op: Operation) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(op);
        }
    }

    pub fn recover(&self, op: Operation) {
        if let Ok(mut failing) = self.failing.write() {
            failing.remove(&op);
        }
    }

    pub fn seed_product(&self, product: Product) {
        if let Ok(mut state) = self.state.write() {
            state.products.push(product);
        }
    }

    pub fn seed_notification(&self, notification: Notification) {
        if let Ok(mut state) = self.state.write() {
            state.notifications.push(notification);
        }
    }

    /// Payloads received by `create_product`, in call order.
    pub fn created_payloads(&self) -> Vec<NewProduct> {
        self.state.read().map(|s| s.created.clone()).unwrap_or_default()
    }

    /// Payloads received by `update_product`, in call order.
    pub fn updated_payloads(&self) -> Vec<(ProductId, NewProduct)> {
        self.state.read().map(|s| s.updated.clone()).unwrap_or_default()
    }

    /// Names of uploaded files, in call order.
    pub fn uploaded_files(&self) -> Vec<String> {
        self.state.read().map(|s| s.uploads.clone()).unwrap_or_default()
    }

    pub fn products(&self) -> Vec<Product> {
        self.state.read().map(|s| s.products.clone()).unwrap_or_default()
    }

    fn check(&self, op: Operation) -> Result<(), ClientError> {
        let failing = self.failing.read().map_err(|_| poisoned())?;
        if failing.contains(&op) {
            tracing::debug!("in-memory backend failing {:?} on request", op);
            return Err(ClientError::Unavailable(format!("{op:?} is failing")));
        }
        Ok(())
    }

    fn build_product(state: &State, id: ProductId, payload: &NewProduct) -> Product {
        let category = payload
            .category_id
            .as_ref()
            .and_then(|cid| find_by_id(&state.categories, cid))
            .cloned();
        let tags = payload
            .tag_ids
            .iter()
            .filter_map(|tid| find_by_id(&state.tags, tid).cloned())
            .collect();
        let now = Utc::now();
        Product {
            id,
            vendor_id: Some(payload.vendor_id.clone()),
            name: payload.name.clone(),
            description: payload.description.clone(),
            price: payload.price.amount(),
            image_url: payload.image_url.clone(),
            is_draft: payload.is_draft,
            is_verified: None,
            created_at: now,
            updated_at: Some(now),
            category,
            category_id: payload.category_id.clone(),
            tags,
            tag_ids: payload.tag_ids.clone(),
            stock_quantity: None,
            shipping_info: None,
            dimensions: None,
            weight: None,
            materials: None,
            return_policy: None,
        }
    }

    fn with_product<F>(&self, id: &ProductId, f: F) -> Result<(), ClientError>
    where
        F: FnOnce(&mut Product),
    {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let product = state
            .products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))?;
        f(product);
        Ok(())
    }
}

fn new_product_id() -> Result<ProductId, ClientError> {
    Ok(ProductId::new(Uuid::now_v7().to_string())?)
}

#[async_trait]
impl ReferenceDataSource for InMemoryBackend {
    async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        self.check(Operation::ListCategories)?;
        Ok(self.state.read().map_err(|_| poisoned())?.categories.clone())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        self.check(Operation::ListTags)?;
        Ok(self.state.read().map_err(|_| poisoned())?.tags.clone())
    }
}

#[async_trait]
impl ImageUploader for InMemoryBackend {
    async fn upload_image(&self, file: &ImageFile) -> Result<String, ClientError> {
        self.check(Operation::UploadImage)?;
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state.uploads.push(file.file_name.clone());
        let ext = file.extension().unwrap_or_else(|| "bin".to_string());
        Ok(format!("http://memory.local/uploads/{}.{}", state.uploads.len(), ext))
    }
}

#[async_trait]
impl ProductRepository for InMemoryBackend {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        self.check(Operation::ListProducts)?;
        Ok(self.state.read().map_err(|_| poisoned())?.products.clone())
    }

    async fn create_product(&self, payload: &NewProduct) -> Result<Product, ClientError> {
        self.check(Operation::CreateProduct)?;
        let id = new_product_id()?;
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let product = Self::build_product(&state, id, payload);
        state.created.push(payload.clone());
        state.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(&self, id: &ProductId, payload: &NewProduct) -> Result<(), ClientError> {
        self.check(Operation::UpdateProduct)?;
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let position = state
            .products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))?;
        let mut updated = Self::build_product(&state, id.clone(), payload);
        updated.created_at = state.products[position].created_at;
        state.products[position] = updated;
        state.updated.push((id.clone(), payload.clone()));
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ClientError> {
        self.check(Operation::DeleteProduct)?;
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let before = state.products.len();
        state.products.retain(|p| &p.id != id);
        if state.products.len() == before {
            return Err(ClientError::NotFound(format!("product {id}")));
        }
        state.notifications.retain(|n| n.product_id.as_ref() != Some(id));
        Ok(())
    }

    async fn mark_draft(&self, id: &ProductId) -> Result<(), ClientError> {
        self.check(Operation::MarkDraft)?;
        self.with_product(id, |p| p.is_draft = true)
    }

    async fn submit_for_verification(&self, id: &ProductId) -> Result<(), ClientError> {
        self.check(Operation::SubmitForVerification)?;
        let mut vendor = None;
        self.with_product(id, |p| {
            p.is_draft = false;
            p.is_verified = None;
            vendor = p.vendor_id.clone();
        })?;

        let notification = Notification {
            id: NotificationId::new(Uuid::now_v7().to_string())?,
            vendor_id: vendor,
            product_id: Some(id.clone()),
            message: "Your product has been submitted for verification.".to_string(),
            is_read: false,
            created_at: Utc::now(),
        };
        self.seed_notification(notification);
        Ok(())
    }
}

#[async_trait]
impl NotificationSource for InMemoryBackend {
    async fn list_notifications(&self, vendor_id: &VendorId) -> Result<Vec<Notification>, ClientError> {
        self.check(Operation::ListNotifications)?;
        let state = self.state.read().map_err(|_| poisoned())?;
        let mut items: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|n| n.vendor_id.as_ref().is_none_or(|v| v == vendor_id))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }
}
