use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::{Value, json};
use storefront_client::{
    ClientConfig, ClientError, HttpBackend, ImageFile, ImageUploader, NotificationSource,
    ProductRepository, ReferenceDataSource,
};
use storefront_core::{CategoryId, NewProduct, Price, ProductId, TagId, VendorId};

#[derive(Clone, Default)]
struct Recorded {
    requests: Arc<Mutex<Vec<(String, Value)>>>,
}

impl Recorded {
    fn push(&self, route: &str, body: Value) {
        self.requests.lock().unwrap().push((route.to_string(), body));
    }

    fn take(&self) -> Vec<(String, Value)> {
        std::mem::take(&mut *self.requests.lock().unwrap())
    }
}

struct TestServer {
    base_url: String,
    recorded: Recorded,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        let recorded = Recorded::default();
        let api = Router::new()
            .route("/categories", get(list_categories))
            .route("/tags", get(|| async { Json(json!([{"id": "t1", "name": "Handmade"}])) }))
            .route("/products", get(list_products).post(create_product))
            .route("/products/:id", delete(delete_product).put(update_product))
            .route("/products/:id/draft", post(mark_draft))
            .route("/products/:id/submit", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .route("/upload", post(upload))
            .route("/vendors/:id/notifications", get(list_notifications));
        let app = Router::new()
            .route("/health", get(|| async { Json("Backend is running!") }))
            .nest("/api", api)
            .with_state(recorded.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url,
            recorded,
            handle,
        }
    }

    fn backend(&self) -> HttpBackend {
        let config = ClientConfig::new(&format!("{}/api", self.base_url)).unwrap();
        HttpBackend::new(config).unwrap()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn product_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "vendor_id": VendorId::PLACEHOLDER,
        "name": name,
        "description": "Woven",
        "price": 5000.0,
        "image_url": "/uploads/basket.jpg",
        "is_draft": false,
        "is_verified": null,
        "created_at": "2025-04-26T10:23:00Z",
        "updated_at": "2025-04-26T10:23:00Z"
    })
}

async fn list_categories() -> Json<Value> {
    Json(json!([
        {"id": "c1", "name": "Handcrafts", "created_at": "2025-01-01T00:00:00Z"},
        {"id": "c2", "name": "Agriculture", "created_at": "2025-01-01T00:00:00Z"}
    ]))
}

async fn list_products() -> Json<Value> {
    Json(json!([product_json("p1", "Basket"), product_json("p2", "Mask")]))
}

async fn create_product(State(rec): State<Recorded>, Json(body): Json<Value>) -> impl IntoResponse {
    rec.push("create", body.clone());
    let mut created = product_json("p-new", body["name"].as_str().unwrap_or_default());
    created["image_url"] = body["image_url"].clone();
    (StatusCode::CREATED, Json(created))
}

async fn update_product(
    State(rec): State<Recorded>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    if id != "p1" {
        return (StatusCode::NOT_FOUND, Json(json!("Product not found")));
    }
    rec.push(&format!("update:{id}"), body);
    (StatusCode::OK, Json(json!("Product updated successfully")))
}

async fn delete_product(State(rec): State<Recorded>, Path(id): Path<String>) -> impl IntoResponse {
    if id != "p1" {
        return (StatusCode::NOT_FOUND, Json(json!("Product not found")));
    }
    rec.push(&format!("delete:{id}"), Value::Null);
    (StatusCode::OK, Json(json!("Product deleted successfully")))
}

async fn mark_draft(State(rec): State<Recorded>, Path(id): Path<String>) -> impl IntoResponse {
    rec.push(&format!("draft:{id}"), Value::Null);
    Json(json!("Draft saved successfully"))
}

async fn upload(State(rec): State<Recorded>, mut multipart: Multipart) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.unwrap() {
        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.unwrap();
        if content_type.starts_with("image/") {
            rec.push(
                "upload",
                json!({"file_name": file_name, "content_type": content_type, "len": bytes.len()}),
            );
            return (
                StatusCode::OK,
                Json(json!({"success": true, "image_url": "/uploads/abc.png"})),
            );
        }
    }
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"success": false, "error": "No image file found in the request"})),
    )
}

async fn list_notifications(Path(vendor): Path<String>) -> Json<Value> {
    Json(json!([{
        "id": "n1",
        "vendor_id": vendor,
        "product_id": "p1",
        "message": "Your product has been verified and is now live!",
        "is_read": false,
        "created_at": "2025-04-27T08:00:00Z"
    }]))
}

fn payload() -> NewProduct {
    NewProduct {
        vendor_id: VendorId::placeholder(),
        name: "Basket".to_string(),
        description: "Woven".to_string(),
        price: Price::parse("5000").unwrap(),
        image_url: "http://localhost:8080/uploads/abc.png".to_string(),
        is_draft: false,
        category_id: Some(CategoryId::new("c1").unwrap()),
        tag_ids: vec![TagId::new("t1").unwrap()],
    }
}

#[tokio::test]
async fn reference_data_is_decoded() {
    let srv = TestServer::spawn().await;
    let backend = srv.backend();

    let categories = backend.list_categories().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].name, "Agriculture");

    let tags = backend.list_tags().await.unwrap();
    assert_eq!(tags[0].id.as_str(), "t1");
}

#[tokio::test]
async fn products_are_listed() {
    let srv = TestServer::spawn().await;
    let products = srv.backend().list_products().await.unwrap();
    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Basket", "Mask"]);
}

#[tokio::test]
async fn create_sends_numeric_price_and_identifier_references() {
    let srv = TestServer::spawn().await;
    let created = srv.backend().create_product(&payload()).await.unwrap();
    assert_eq!(created.id.as_str(), "p-new");

    let requests = srv.recorded.take();
    assert_eq!(requests.len(), 1);
    let (route, body) = &requests[0];
    assert_eq!(route, "create");
    assert_eq!(body["price"].as_f64(), Some(5000.0));
    assert!(body["price"].is_number());
    assert_eq!(body["category_id"], "c1");
    assert_eq!(body["tag_ids"], json!(["t1"]));
    assert_eq!(body["vendor_id"], VendorId::PLACEHOLDER);
    assert_eq!(body["is_draft"], false);
}

#[tokio::test]
async fn update_uses_put() {
    let srv = TestServer::spawn().await;
    let backend = srv.backend();
    backend
        .update_product(&ProductId::new("p1").unwrap(), &payload())
        .await
        .unwrap();
    let requests = srv.recorded.take();
    assert_eq!(requests[0].0, "update:p1");

    let err = backend
        .update_product(&ProductId::new("zzz").unwrap(), &payload())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn delete_maps_missing_products_to_not_found() {
    let srv = TestServer::spawn().await;
    let backend = srv.backend();

    backend.delete_product(&ProductId::new("p1").unwrap()).await.unwrap();
    let err = backend
        .delete_product(&ProductId::new("p9").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)));
}

#[tokio::test]
async fn server_errors_carry_status() {
    let srv = TestServer::spawn().await;
    let err = srv
        .backend()
        .submit_for_verification(&ProductId::new("p1").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api(500, _)));
}

#[tokio::test]
async fn mark_draft_hits_draft_route() {
    let srv = TestServer::spawn().await;
    srv.backend()
        .mark_draft(&ProductId::new("p1").unwrap())
        .await
        .unwrap();
    assert_eq!(srv.recorded.take()[0].0, "draft:p1");
}

#[tokio::test]
async fn upload_returns_absolute_url() {
    let srv = TestServer::spawn().await;
    let file = ImageFile::new("basket.png", "image/png", vec![137, 80, 78, 71]);
    let url = srv.backend().upload_image(&file).await.unwrap();
    assert_eq!(url, format!("{}/uploads/abc.png", srv.base_url));

    let requests = srv.recorded.take();
    assert_eq!(requests[0].1["file_name"], "basket.png");
    assert_eq!(requests[0].1["content_type"], "image/png");
    assert_eq!(requests[0].1["len"], 4);
}

#[tokio::test]
async fn non_image_upload_is_rejected() {
    let srv = TestServer::spawn().await;
    let file = ImageFile::new("notes.txt", "text/plain", b"hello".to_vec());
    let err = srv.backend().upload_image(&file).await.unwrap_err();
    assert!(matches!(err, ClientError::Api(400, _)));
}

#[tokio::test]
async fn notifications_are_scoped_to_vendor() {
    let srv = TestServer::spawn().await;
    let vendor = VendorId::new("v-42").unwrap();
    let feed = srv.backend().list_notifications(&vendor).await.unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].vendor_id.as_ref(), Some(&vendor));
    assert!(!feed[0].is_read);
}

#[tokio::test]
async fn connectivity_reflects_health_endpoint() {
    let srv = TestServer::spawn().await;
    assert!(srv.backend().check_connectivity().await);

    let unreachable = HttpBackend::new(ClientConfig::new("http://127.0.0.1:9/api").unwrap()).unwrap();
    assert!(!unreachable.check_connectivity().await);
}
