use std::sync::Arc;

use ampere_server::app::create_router;
use ampere_server::configs::{Database, SchemaManager, Storage};
use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use serde::Serialize;
use tower::ServiceExt;

pub struct MockApp {
    pub storage: Arc<Storage>,
    pub router: Router,
}

impl MockApp {
    pub async fn new() -> Self {
        let storage = Arc::new(Storage::new(Database {
            migration_path: None,
            clean_start: true,
            url: String::from("sqlite::memory:"),
        }, SchemaManager::default()).await.unwrap());

        let router = create_router(storage.clone());

        Self { storage, router }
    }

    pub async fn post_json<T: Serialize>(&self, uri: &str, body: &T) -> Response<Body> {
        let request = Request::builder()
            .uri(uri)
            .method(Method::POST)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn read_text(response: Response<Body>) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    String::from_utf8(body.to_vec()).unwrap()
}
