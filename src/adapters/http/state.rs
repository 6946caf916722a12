use std::sync::Arc;
use crate::application::services::DetectionService;

/// Estado compartido para los manejadores HTTP de Axum.
/// El detector se construye una vez antes de servir y aquí solo se lee.
#[derive(Clone)]
pub struct HttpState {
    pub detection: Arc<DetectionService>,
}
