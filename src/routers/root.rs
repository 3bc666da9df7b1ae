use axum::{Router, routing::get};

use crate::controllers::root::{health_check, root};
use crate::db::Catalog;

pub fn root_routes() -> Router<Catalog> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
}
