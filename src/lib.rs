pub mod config;
pub mod controllers;
pub mod db;
pub mod models;
pub mod routers;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::db::Catalog;
use crate::routers::{root_routes, song_routes};

/// Builds the full application router over the given catalog state.
pub fn app(catalog: Catalog) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(root_routes())
        .merge(song_routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}
