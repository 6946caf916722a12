use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelId {
    pub name: String,       // logical name, e.g. "yolov8n"
    pub onnx_path: String,  // filesystem path
}

impl ModelId {
    /// El nombre lógico sale del fichero: `models/yolov8n.onnx` -> `yolov8n`.
    pub fn from_path(onnx_path: impl Into<String>) -> Self {
        let onnx_path = onnx_path.into();
        let name = std::path::Path::new(&onnx_path)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "yolo".to_string());
        Self { name, onnx_path }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YoloParams {
    pub input_size: u32,        // 640 typical
    pub conf_threshold: f32,    // 0..1
    pub iou_threshold: f32,     // 0..1
    pub max_detections: usize,  // e.g. 300
}

impl Default for YoloParams {
    fn default() -> Self {
        Self {
            input_size: 640,
            conf_threshold: 0.25,
            iou_threshold: 0.7,
            max_detections: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub model: ModelId,
    pub params: YoloParams,
    pub labels_path: Option<String>,
    pub intra_threads: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_name_comes_from_file_stem() {
        let m = ModelId::from_path("models/yolov8n.onnx");
        assert_eq!(m.name, "yolov8n");
        assert_eq!(m.onnx_path, "models/yolov8n.onnx");
    }
}
