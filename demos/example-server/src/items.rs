use httprouter::interceptor::LoggingInterceptor;
use httprouter::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct NewItem {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Page {
    pub limit: Option<usize>,
}

/// Requires `x-api-key` to match `API_KEY` when that variable is set
pub struct RequireApiKey(Option<String>);

impl RequireApiKey {
    pub fn from_env() -> Self {
        Self(std::env::var("API_KEY").ok())
    }
}

#[async_trait]
impl Guard for RequireApiKey {
    async fn can_activate(&self, parts: &httprouter::axum::http::request::Parts) -> GuardResult {
        let Some(expected) = &self.0 else {
            return Ok(());
        };
        match parts.headers.get("x-api-key") {
            Some(value) if value.as_bytes() == expected.as_bytes() => Ok(()),
            Some(_) => Err(GuardError::Forbidden("invalid api key".into())),
            None => Err(GuardError::Unauthorized("missing api key".into())),
        }
    }
}

#[router(
    prefix = "/items",
    tags = ["items"],
    responses = { 404: "Item not found" },
    interceptors = [LoggingInterceptor::labeled("items")],
)]
pub struct ItemRouter {
    name: String,
    #[default]
    items: RwLock<BTreeMap<u64, Item>>,
    #[default]
    next_id: AtomicU64,
}

#[routes]
impl ItemRouter {
    /// List items, oldest first
    #[get("/")]
    async fn list_items(&self, #[query] page: Page) -> Json<Vec<Item>> {
        let items = self.items.read().await;
        let limit = page.limit.unwrap_or(usize::MAX);
        Json(items.values().take(limit).cloned().collect())
    }

    #[get("/{id}")]
    async fn get_item(&self, #[param] id: u64) -> Response {
        match self.items.read().await.get(&id) {
            Some(item) => Json(item.clone()).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    /// Create an item
    #[post("/", status_code = 201, headers = { "x-catalog": "v1" })]
    async fn create_item(&self, #[body] new_item: NewItem) -> Json<Item> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let item = Item { id, name: new_item.name };
        self.items.write().await.insert(id, item.clone());
        Json(item)
    }

    #[delete("/{id}", status_code = 204)]
    async fn delete_item(&self, #[param] id: u64) -> StatusCode {
        match self.items.write().await.remove(&id) {
            Some(_) => StatusCode::NO_CONTENT,
            None => StatusCode::NOT_FOUND,
        }
    }

    #[lifespan]
    async fn lifespan(&self, running: Running) {
        tracing::info!("Opening {}", self.name);
        running.await;
        let count = self.items.read().await.len();
        tracing::info!("Closing {} with {} items", self.name, count);
    }
}
