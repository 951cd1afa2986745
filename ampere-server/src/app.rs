use std::sync::Arc;

use axum::Router;
use axum::routing::post;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::configs::{SchemaManager, Settings, Storage};
use crate::handles::*;

pub async fn create_app(settings: &Arc<Settings>) -> Result<Router, sqlx::Error> {
    let storage = Arc::new(Storage::new(settings.database.clone(), SchemaManager::default()).await?);

    Ok(create_router(storage))
}

pub fn create_router(storage: Arc<Storage>) -> Router {
    let bills = Router::new()
        .route("/:device", post(store_bill))
        .route("/:device/monthly", post(get_monthly_bill))
        .with_state(BillState {
            storage: storage.clone(),
        });

    Router::new()
        .nest("/bill", bills)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
