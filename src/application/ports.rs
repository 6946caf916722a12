use image::RgbImage;

use crate::domain::{detection::Detection, errors::DomainResult};

/// Capacidad de detección: imagen RGB -> lista de (etiqueta, confianza, caja).
/// Se comparte como `Arc<dyn DetectorPort>` entre peticiones, así que debe ser
/// invocable desde varios hilos a la vez.
pub trait DetectorPort: Send + Sync {
    fn detect(&self, image: &RgbImage) -> DomainResult<Vec<Detection>>;
    fn labels(&self) -> &[String];
}

/// Fuente de frames del runner local. `Ok(None)` indica fin de la fuente.
pub trait FrameSourcePort {
    fn next_frame(&mut self) -> DomainResult<Option<RgbImage>>;
}

/// Destino de cada frame procesado (anotar, guardar, mostrar...).
pub trait FrameSinkPort {
    fn present(&mut self, frame: &RgbImage, detections: &[Detection]) -> DomainResult<()>;
}
