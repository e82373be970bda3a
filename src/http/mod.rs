//! HTTP transport - axum routes over the fleet services.
//!
//! Requires the `http` feature.
//!
//! ## Routes (under `Settings::api_prefix`)
//!
//! - `POST /models`, `GET /models` - create / list truck models (also with
//!   a trailing slash, as `/trucks/`)
//! - `GET|PUT|DELETE /models/:id`
//! - `POST /trucks`, `GET /trucks` - create / list trucks (`board_number`,
//!   `model_name` filters)
//! - `GET /trucks/models` - model catalogue from the trucks resource
//! - `GET|PUT|DELETE /trucks/:id`
//!
//! `GET /health` sits outside the prefix. Every body goes through the
//! envelope builder.
//!
//! ## Example
//!
//! ```ignore
//! use fleet_monitor::{http, InMemoryStore, Settings};
//!
//! let state = http::AppState::new(Settings::from_env()?, InMemoryStore::new());
//! http::serve(state).await?;
//! ```

mod error;
mod models;
mod query;
mod trucks;

use std::sync::Arc;

use axum::extract::{OriginalUri, State};
use axum::http::header::HOST;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tracing::info;

use crate::config::Settings;
use crate::envelope::{self, RequestContext};
use crate::service::{ServiceError, TruckModelService, TruckService};
use crate::store::EntityStore;

/// Shared handler state: settings and the two services over one store.
pub struct AppState<S> {
    pub settings: Arc<Settings>,
    pub models: TruckModelService<S>,
    pub trucks: TruckService<S>,
}

impl<S: Clone> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            settings: Arc::clone(&self.settings),
            models: self.models.clone(),
            trucks: self.trucks.clone(),
        }
    }
}

impl<S: EntityStore + Clone> AppState<S> {
    pub fn new(settings: Settings, store: S) -> Self {
        Self {
            settings: Arc::new(settings),
            models: TruckModelService::new(store.clone()),
            trucks: TruckService::new(store),
        }
    }

    /// Render a service failure through the error envelope.
    pub(crate) fn fail(&self, err: ServiceError) -> envelope::ApiResponse {
        error::render(err, &self.settings)
    }
}

/// Build the axum `Router` for the given state.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: EntityStore + Clone + 'static,
{
    let api: Router<AppState<S>> = Router::new()
        .route(
            "/models",
            get(models::list::<S>).post(models::create::<S>),
        )
        .route(
            "/models/",
            get(models::list::<S>).post(models::create::<S>),
        )
        .route(
            "/models/:id",
            get(models::get_one::<S>)
                .put(models::update::<S>)
                .delete(models::delete::<S>),
        )
        .route("/trucks", get(trucks::list::<S>).post(trucks::create::<S>))
        .route("/trucks/", get(trucks::list::<S>).post(trucks::create::<S>))
        .route("/trucks/models", get(models::list::<S>))
        .route(
            "/trucks/:id",
            get(trucks::get_one::<S>)
                .put(trucks::update::<S>)
                .delete(trucks::delete::<S>),
        );

    let prefix = state.settings.api_prefix.clone();
    let app = if prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&prefix, api)
    };

    app.route("/health", get(health::<S>))
        .fallback(not_found)
        .with_state(state)
}

/// Bind `settings.bind_addr` and serve until ctrl-c.
pub async fn serve<S>(state: AppState<S>) -> Result<(), std::io::Error>
where
    S: EntityStore + Clone + 'static,
{
    let addr = state.settings.bind_addr.clone();
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "fleet monitor listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}

/// `GET /health` - returns `{ "status": "ok", "name": ..., "version": ... }`.
async fn health<S: EntityStore + Clone + 'static>(
    State(state): State<AppState<S>>,
) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "name": state.settings.project_name,
        "version": state.settings.version,
    }))
}

async fn not_found(OriginalUri(uri): OriginalUri) -> envelope::ApiResponse {
    envelope::error(
        "NotFound",
        &format!("no route for {}", uri.path()),
        None,
        404,
        Vec::new(),
    )
}

/// Listing request as seen by the client, for navigation links.
pub(crate) fn request_context(uri: &axum::http::Uri, headers: &HeaderMap) -> RequestContext {
    let host = headers
        .get(HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");
    let scheme = uri.scheme_str().unwrap_or("http");
    let url = match uri.query() {
        Some(query) => format!("{}://{}{}?{}", scheme, host, uri.path(), query),
        None => format!("{}://{}{}", scheme, host, uri.path()),
    };
    RequestContext::parse(&url)
}
