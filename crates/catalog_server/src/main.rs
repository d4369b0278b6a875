use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::{CatalogItem, ItemId},
    error::{ApiError, ErrorCode},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app_state;
mod config;

use app_state::AppState;
use config::{load_catalog, load_settings};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = load_settings();
    let catalog = load_catalog(&settings.catalog_path).map_err(|error| {
        error!(
            catalog_path = %settings.catalog_path.display(),
            %error,
            "failed to load catalog; verify the file exists and holds a JSON item list"
        );
        error
    })?;
    info!(items = catalog.len(), "catalog loaded");

    let app = build_router(Arc::new(AppState::new(catalog)));

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "catalog server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/items", get(list_items))
        .route("/items/:item_id", get(get_item))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_items(State(state): State<Arc<AppState>>) -> Json<Vec<CatalogItem>> {
    Json(state.catalog.as_ref().clone())
}

async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(item_id): Path<i64>,
) -> Result<Json<CatalogItem>, (StatusCode, Json<ApiError>)> {
    state
        .catalog
        .iter()
        .find(|item| item.id == ItemId(item_id))
        .cloned()
        .map(Json)
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiError::new(
                    ErrorCode::NotFound,
                    format!("item {item_id} not found"),
                )),
            )
        })
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
