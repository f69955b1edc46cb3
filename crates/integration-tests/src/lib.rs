//! Integration tests for StorePilot.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p storepilot-integration-tests
//! ```
//!
//! No external services are needed: [`FakeApi`] serves an in-process copy
//! of the catalog and account endpoints on a random local port.
//!
//! # Test Categories
//!
//! - `cart_persistence` - shop state over an on-disk store
//! - `catalog_api` - API client against the fake server
//! - `accounts` - login, signup and profile flows
//! - `properties` - property tests for cart and wishlist invariants

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use url::Url;

use storepilot_core::{Price, ProductId, ProductSnapshot};
use storepilot_storefront::api::ApiClient;
use storepilot_storefront::config::StorefrontConfig;

/// Email of the account the fake API knows about.
pub const KNOWN_EMAIL: &str = "john@mail.com";
/// Password of that account.
pub const KNOWN_PASSWORD: &str = "changeme1";
/// Access token the fake API issues and accepts.
pub const ACCESS_TOKEN: &str = "fake-access-token";

/// A minimal product snapshot for tests.
#[must_use]
pub fn product(id: i64, dollars: i64) -> ProductSnapshot {
    ProductSnapshot::new(
        ProductId::new(id),
        format!("Product {id}"),
        Price::from_dollars(dollars),
    )
}

/// Shared state of the fake API server.
#[derive(Default)]
struct FakeState {
    requests: AtomicUsize,
    users: std::sync::Mutex<Vec<Value>>,
}

/// In-process fake of the remote storefront API.
pub struct FakeApi {
    /// Base URL, ending in `/api/v1/`.
    pub base_url: Url,
    state: Arc<FakeState>,
}

impl FakeApi {
    /// Start the server on a random port.
    pub async fn start() -> Self {
        let state = Arc::new(FakeState {
            requests: AtomicUsize::new(0),
            users: std::sync::Mutex::new(vec![user_json(1, "John", KNOWN_EMAIL)]),
        });

        let app = Router::new()
            .route("/api/v1/products", get(list_products))
            .route("/api/v1/products/{id}", get(get_product))
            .route("/api/v1/products/{id}/related", get(related_products))
            .route("/api/v1/categories", get(list_categories))
            .route("/api/v1/categories/{id}/products", get(category_products))
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/auth/profile", get(profile))
            .route("/api/v1/users/", post(create_user))
            .route("/api/v1/users/{id}", put(update_user))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: Url::parse(&format!("http://{addr}/api/v1/")).unwrap(),
            state,
        }
    }

    /// A client pointed at this server.
    #[must_use]
    pub fn client(&self) -> ApiClient {
        ApiClient::new(self.base_url.clone(), Duration::from_secs(5)).unwrap()
    }

    /// Configuration pointed at this server with data under `data_dir`.
    #[must_use]
    pub fn config(&self, data_dir: &std::path::Path) -> StorefrontConfig {
        let base = self.base_url.to_string();
        let dir = data_dir.to_string_lossy().into_owned();
        StorefrontConfig::from_lookup(|key| match key {
            "STOREPILOT_API_BASE_URL" => Some(base.clone()),
            "STOREPILOT_DATA_DIR" => Some(dir.clone()),
            _ => None,
        })
        .unwrap()
    }

    /// Number of requests served so far.
    #[must_use]
    pub fn requests(&self) -> usize {
        self.state.requests.load(Ordering::SeqCst)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

const CATALOG_SIZE: i64 = 30;

fn category_json(id: i64) -> Value {
    let name = if id == 1 { "Clothes" } else { "Shoes" };
    json!({
        "id": id,
        "name": name,
        "slug": name.to_lowercase(),
        "image": if id == 1 { json!("https://i.imgur.com/QkIa5tT.jpeg") } else { json!("null") },
    })
}

/// Products 1..=30; odd IDs are clothes at `id * 10` dollars, even IDs shoes.
fn product_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Product {id}"),
        "slug": format!("product-{id}"),
        "price": id * 10,
        "description": "A fine product",
        "category": category_json(if id % 2 == 1 { 1 } else { 2 }),
        "images": [format!("https://i.imgur.com/{id}.jpeg")],
        "creationAt": "2024-01-01T00:00:00.000Z",
    })
}

fn user_json(id: i64, name: &str, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "password": "hidden",
        "name": name,
        "role": "customer",
        "avatar": "https://i.imgur.com/LDOO4Qs.jpg",
    })
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "Could not find any entity", "statusCode": 404})),
    )
        .into_response()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Unauthorized", "statusCode": 401})),
    )
        .into_response()
}

// =============================================================================
// Handlers
// =============================================================================

async fn list_products(
    State(state): State<Arc<FakeState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Vec<Value>> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let offset: i64 = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit: i64 = params
        .get("limit")
        .and_then(|v| v.parse().ok())
        .unwrap_or(CATALOG_SIZE);
    Json(
        (1..=CATALOG_SIZE)
            .skip(usize::try_from(offset).unwrap_or(0))
            .take(usize::try_from(limit).unwrap_or(0))
            .map(product_json)
            .collect(),
    )
}

async fn get_product(State(state): State<Arc<FakeState>>, Path(id): Path<i64>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if (1..=CATALOG_SIZE).contains(&id) {
        Json(product_json(id)).into_response()
    } else {
        not_found()
    }
}

async fn related_products(State(state): State<Arc<FakeState>>, Path(id): Path<i64>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if !(1..=CATALOG_SIZE).contains(&id) {
        return not_found();
    }
    let related: Vec<Value> = (1..=CATALOG_SIZE)
        .filter(|other| other % 2 == id % 2)
        .take(4)
        .map(product_json)
        .collect();
    Json(related).into_response()
}

async fn list_categories(State(state): State<Arc<FakeState>>) -> Json<Vec<Value>> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    Json(vec![category_json(1), category_json(2)])
}

async fn category_products(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
) -> Json<Vec<Value>> {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let parity = if id == 1 { 1 } else { 0 };
    Json(
        (1..=CATALOG_SIZE)
            .filter(|p| p % 2 == parity)
            .map(product_json)
            .collect(),
    )
}

async fn login(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if body["email"] == KNOWN_EMAIL && body["password"] == KNOWN_PASSWORD {
        (
            StatusCode::CREATED,
            Json(json!({"access_token": ACCESS_TOKEN, "refresh_token": "fake-refresh-token"})),
        )
            .into_response()
    } else {
        unauthorized()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {ACCESS_TOKEN}"))
}

async fn profile(State(state): State<Arc<FakeState>>, headers: HeaderMap) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    let users = state.users.lock().unwrap();
    users
        .first()
        .map_or_else(not_found, |user| Json(user.clone()).into_response())
}

async fn create_user(State(state): State<Arc<FakeState>>, Json(body): Json<Value>) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    let mut users = state.users.lock().unwrap();
    if users.iter().any(|u| u["email"] == body["email"]) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "message": "SQLITE_CONSTRAINT: UNIQUE constraint failed: user.email (email must be unique)",
                "statusCode": 400,
            })),
        )
            .into_response();
    }
    let id = i64::try_from(users.len()).unwrap() + 1;
    let mut user = user_json(
        id,
        body["name"].as_str().unwrap_or_default(),
        body["email"].as_str().unwrap_or_default(),
    );
    user["avatar"] = body["avatar"].clone();
    users.push(user.clone());
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn update_user(
    State(state): State<Arc<FakeState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    state.requests.fetch_add(1, Ordering::SeqCst);
    if !authorized(&headers) {
        return unauthorized();
    }
    let mut users = state.users.lock().unwrap();
    let Some(user) = users.iter_mut().find(|u| u["id"] == id) else {
        return not_found();
    };
    user["name"] = body["name"].clone();
    user["email"] = body["email"].clone();
    Json(user.clone()).into_response()
}
