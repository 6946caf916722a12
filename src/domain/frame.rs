use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use super::detection::Detection;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameMeta {
    pub index: u64,
    pub width: u32,
    pub height: u32,
    pub infer_ms: f32,
    pub detections: Vec<Detection>,
}

/// Resumen legible para logs: "2 person, 1 dog". Orden alfabético para que sea estable.
pub fn summarize_detections(detections: &[Detection]) -> String {
    let mut counts = BTreeMap::new();
    for det in detections {
        *counts.entry(det.label.as_str()).or_insert(0) += 1;
    }
    counts.iter()
        .map(|(label, count)| format!("{} {}", count, label))
        .collect::<Vec<_>>()
        .join(", ")
}
