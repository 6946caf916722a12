use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::onnx::{
    labels::{coco_labels, load_labels},
    model_catalog::OnnxModelCatalog,
    yolo_engine::OnnxYoloEngine,
};
use crate::domain::model::InferenceConfig;

/// Logs con `RUST_LOG` (info por defecto).
pub fn init_tracing() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();
}

/// Valida y carga el modelo una única vez. Cualquier fallo aquí es fatal para el proceso.
pub fn load_detector(cfg: &InferenceConfig) -> Result<Arc<OnnxYoloEngine>> {
    OnnxModelCatalog::validate_model(&cfg.model)
        .with_context(|| format!("modelo {} no utilizable", cfg.model.onnx_path))?;

    let labels = match &cfg.labels_path {
        Some(path) => load_labels(path)?,
        None => coco_labels(),
    };

    info!("Cargando modelo {} desde {}", cfg.model.name, cfg.model.onnx_path);
    let engine = OnnxYoloEngine::load(&cfg.model, cfg.params.clone(), labels, cfg.intra_threads)?;
    Ok(Arc::new(engine))
}
