use std::path::Path;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::ModelId;

/// Comprobación previa del fichero de pesos, para fallar con un mensaje claro
/// antes de que ONNX Runtime intente abrirlo.
pub struct OnnxModelCatalog;

impl OnnxModelCatalog {
    pub fn validate_model(model: &ModelId) -> DomainResult<()> {
        if model.onnx_path.trim().is_empty() {
            return Err(DomainError::InvalidInput("onnx_path empty".into()));
        }
        let path = Path::new(&model.onnx_path);
        if !path.exists() {
            return Err(DomainError::NotFound(format!("model file not found: {}", model.onnx_path)));
        }
        if path.extension().and_then(|e| e.to_str()) != Some("onnx") {
            return Err(DomainError::InvalidInput(format!("not an .onnx file: {}", model.onnx_path)));
        }
        Ok(())
    }
}
