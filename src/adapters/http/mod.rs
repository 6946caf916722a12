pub mod error;
pub mod routes;
pub mod state;

use axum::{extract::DefaultBodyLimit, routing::post, Router};
use tower_http::trace::TraceLayer;

use crate::adapters::http::state::HttpState;
use crate::adapters::imaging::decoder::MAX_IMAGE_SIZE;

/// Margen para las cabeceras y delimitadores multipart alrededor de la imagen.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(state: HttpState) -> Router {
    Router::new()
        .route("/predict", post(routes::predict))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + MULTIPART_OVERHEAD))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
