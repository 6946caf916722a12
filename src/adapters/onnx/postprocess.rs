use ndarray::{s, ArrayView2};

use crate::adapters::onnx::labels::label_for;
use crate::domain::detection::Detection;
use crate::domain::model::YoloParams;

/// Tamaño de la imagen original, para reescalar cajas desde el espacio de entrada del modelo.
#[derive(Debug, Clone, Copy)]
pub struct SourceDims {
    pub width: u32,
    pub height: u32,
}

/// Geometría del letterbox: la imagen se escala conservando el aspecto y se
/// centra en un lienzo cuadrado de `input_size`, con relleno gris.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub new_width: u32,
    pub new_height: u32,
    pub pad_x: u32,
    pub pad_y: u32,
}

impl Letterbox {
    pub fn fit(dims: SourceDims, input_size: u32) -> Self {
        let imgsz = input_size as f32;
        let scale = (imgsz / dims.width.max(1) as f32).min(imgsz / dims.height.max(1) as f32);
        let new_width = ((dims.width as f32 * scale).round() as u32).clamp(1, input_size);
        let new_height = ((dims.height as f32 * scale).round() as u32).clamp(1, input_size);
        Self {
            scale,
            new_width,
            new_height,
            pad_x: (input_size - new_width) / 2,
            pad_y: (input_size - new_height) / 2,
        }
    }

    /// Coordenada en el lienzo de entrada -> coordenada en la imagen original.
    fn unmap(&self, x: f32, y: f32) -> (f32, f32) {
        ((x - self.pad_x as f32) / self.scale, (y - self.pad_y as f32) / self.scale)
    }
}

/// Decodifica la salida `[4 + nc, N]` de YOLOv8/YOLO11 (ya sin el eje de batch).
/// Filas 0..4 son `cx, cy, w, h` en píxeles de entrada; el resto son scores por clase.
pub fn decode_predictions(
    view: ArrayView2<'_, f32>,
    dims: SourceDims,
    params: &YoloParams,
    labels: &[String],
) -> Vec<Detection> {
    if view.shape()[0] <= 4 {
        return Vec::new();
    }

    let num_candidates = view.shape()[1];
    let letterbox = Letterbox::fit(dims, params.input_size);
    let max_x = dims.width as f32;
    let max_y = dims.height as f32;

    let mut candidates = Vec::new();

    for i in 0..num_candidates {
        let scores = view.slice(s![4.., i]);
        let Some((class_id, &max_score)) = scores
            .indexed_iter()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
        else {
            continue;
        };

        if max_score.is_nan() || max_score <= params.conf_threshold {
            continue;
        }

        let cx = view[[0, i]];
        let cy = view[[1, i]];
        let w = view[[2, i]];
        let h = view[[3, i]];

        let (x1, y1) = letterbox.unmap(cx - w / 2.0, cy - h / 2.0);
        let (x2, y2) = letterbox.unmap(cx + w / 2.0, cy + h / 2.0);

        let det = Detection {
            x1: x1.clamp(0.0, max_x),
            y1: y1.clamp(0.0, max_y),
            x2: x2.clamp(0.0, max_x),
            y2: y2.clamp(0.0, max_y),
            score: max_score.clamp(0.0, 1.0),
            class_id,
            label: label_for(labels, class_id),
        };

        // Cajas que quedan sin área tras el recorte no se reportan.
        if det.is_well_formed() {
            candidates.push(det);
        }
    }

    let mut kept = non_max_suppression(candidates, params.iou_threshold);
    kept.truncate(params.max_detections);
    kept
}

/// NMS por clase: ordena por score y descarta cualquier caja de la misma clase
/// cuyo IoU con una ya aceptada supere `iou_threshold`. Devuelve en orden de score.
pub fn non_max_suppression(mut detections: Vec<Detection>, iou_threshold: f32) -> Vec<Detection> {
    detections.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut keep: Vec<Detection> = Vec::with_capacity(detections.len());
    for det in detections {
        let suppressed = keep
            .iter()
            .any(|k| k.class_id == det.class_id && k.iou(&det) > iou_threshold);
        if !suppressed {
            keep.push(det);
        }
    }
    keep
}
