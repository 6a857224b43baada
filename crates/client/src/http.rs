//! REST implementation of the backend capabilities.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use storefront_core::{
    Category, NewProduct, Notification, Product, ProductId, Tag, UploadedImage, VendorId,
};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::source::{ImageFile, ImageUploader, NotificationSource, ProductRepository, ReferenceDataSource};

/// Client for the marketplace REST API.
///
/// Cheap to clone; the underlying `reqwest::Client` shares its connection pool.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Check connectivity by hitting the health endpoint at the API origin.
    pub async fn check_connectivity(&self) -> bool {
        let url = match self.config.origin().and_then(|origin| {
            origin
                .join("health")
                .map_err(|e| ClientError::Config(e.to_string()))
        }) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("cannot build health URL: {}", e);
                return false;
            }
        };
        match self.client.get(url).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                tracing::debug!("health check failed: {}", e);
                false
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let url = self.config.endpoint(path);
        tracing::debug!("GET {}", url);
        let resp = self.client.get(&url).send().await?;
        let resp = ensure_success(resp).await?;
        resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
    }
}

/// Turn a non-2xx response into `ClientError::Api` carrying the body text.
async fn ensure_success(resp: Response) -> Result<Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Api(status.as_u16(), body))
}

/// Like `ensure_success`, but a 404 becomes `NotFound` for the given product.
async fn ensure_product_found(resp: Response, id: &ProductId) -> Result<Response, ClientError> {
    if resp.status() == StatusCode::NOT_FOUND {
        return Err(ClientError::NotFound(format!("product {id}")));
    }
    ensure_success(resp).await
}

#[async_trait]
impl ReferenceDataSource for HttpBackend {
    async fn list_categories(&self) -> Result<Vec<Category>, ClientError> {
        self.get_json("categories").await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, ClientError> {
        self.get_json("tags").await
    }
}

#[async_trait]
impl ImageUploader for HttpBackend {
    async fn upload_image(&self, file: &ImageFile) -> Result<String, ClientError> {
        let part = reqwest::multipart::Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ClientError::InvalidRequest(format!("bad content type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let url = self.config.endpoint("upload");
        tracing::debug!("POST {} ({} bytes)", url, file.bytes.len());
        let resp = self.client.post(&url).multipart(form).send().await?;
        let resp = ensure_success(resp).await?;

        let uploaded: UploadedImage = resp
            .json()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        if uploaded.image_url.trim().is_empty() {
            return Err(ClientError::Parse("upload response has an empty image_url".to_string()));
        }
        Ok(self.config.absolute_asset_url(&uploaded.image_url))
    }
}

#[async_trait]
impl ProductRepository for HttpBackend {
    async fn list_products(&self) -> Result<Vec<Product>, ClientError> {
        self.get_json("products").await
    }

    async fn create_product(&self, product: &NewProduct) -> Result<Product, ClientError> {
        let url = self.config.endpoint("products");
        tracing::debug!("POST {}", url);
        let resp = self.client.post(&url).json(product).send().await?;
        let resp = ensure_success(resp).await?;
        resp.json().await.map_err(|e| ClientError::Parse(e.to_string()))
    }

    async fn update_product(&self, id: &ProductId, product: &NewProduct) -> Result<(), ClientError> {
        let url = self.config.endpoint(&format!("products/{id}"));
        tracing::debug!("PUT {}", url);
        let resp = self.client.put(&url).json(product).send().await?;
        ensure_product_found(resp, id).await?;
        Ok(())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<(), ClientError> {
        let url = self.config.endpoint(&format!("products/{id}"));
        tracing::debug!("DELETE {}", url);
        let resp = self.client.delete(&url).send().await?;
        ensure_product_found(resp, id).await?;
        Ok(())
    }

    async fn mark_draft(&self, id: &ProductId) -> Result<(), ClientError> {
        let url = self.config.endpoint(&format!("products/{id}/draft"));
        tracing::debug!("POST {}", url);
        let resp = self.client.post(&url).send().await?;
        ensure_product_found(resp, id).await?;
        Ok(())
    }

    async fn submit_for_verification(&self, id: &ProductId) -> Result<(), ClientError> {
        let url = self.config.endpoint(&format!("products/{id}/submit"));
        tracing::debug!("POST {}", url);
        let resp = self.client.post(&url).send().await?;
        ensure_product_found(resp, id).await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationSource for HttpBackend {
    async fn list_notifications(&self, vendor_id: &VendorId) -> Result<Vec<Notification>, ClientError> {
        self.get_json(&format!("vendors/{vendor_id}/notifications")).await
    }
}
