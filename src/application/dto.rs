use serde::{Deserialize, Serialize};

use crate::domain::detection::Detection;

/// Forma pública de una detección en `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionDto {
    pub label: String,
    pub confidence: f32,
    pub bbox: [f32; 4],
}

impl From<Detection> for DetectionDto {
    fn from(d: Detection) -> Self {
        Self {
            bbox: d.bbox(),
            confidence: d.score,
            label: d.label,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResponse {
    pub detections: Vec<DetectionDto>,
}

impl From<Vec<Detection>> for DetectionResponse {
    fn from(detections: Vec<Detection>) -> Self {
        Self {
            detections: detections.into_iter().map(DetectionDto::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
