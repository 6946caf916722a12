use anyhow::{anyhow, Result};
use image::{imageops::FilterType, RgbImage};
use ndarray::{ArrayViewD, Axis, Ix2, IxDyn};
use ort::execution_providers::CUDAExecutionProvider;
use ort::session::Session;
use ort::value::Value;
use std::fs;
use std::sync::Mutex;
use tracing::info;

use crate::adapters::onnx::postprocess::{decode_predictions, Letterbox, SourceDims};
use crate::application::ports::DetectorPort;
use crate::domain::detection::Detection;
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::model::{ModelId, YoloParams};

/// Detector YOLO (v8/11) sobre ONNX Runtime.
///
/// `Session::run` necesita acceso exclusivo, así que la sesión va detrás de un
/// `Mutex`: el motor se comparte por `Arc` y las inferencias concurrentes se
/// serializan aquí.
pub struct OnnxYoloEngine {
    session: Mutex<Session>,
    params: YoloParams,
    labels: Vec<String>,
}

impl OnnxYoloEngine {
    pub fn load(model: &ModelId, params: YoloParams, labels: Vec<String>, intra_threads: usize) -> Result<Self> {
        let mut builder = Session::builder()?.with_intra_threads(intra_threads.max(1))?;

        // CUDA es opcional: si está disponible se registra, si no continuamos en CPU.
        let cuda = CUDAExecutionProvider::default().build();
        if let Ok(builder_with_cuda) = builder.clone().with_execution_providers([cuda]) {
            builder = builder_with_cuda;
        }

        let model_bytes = fs::read(&model.onnx_path)
            .map_err(|e| anyhow!("no se pudo leer el modelo {}: {e}", model.onnx_path))?;
        let session = builder.commit_from_memory(&model_bytes)?;

        info!(
            "Modelo {} cargado ({} clases, entrada {}x{})",
            model.name,
            labels.len(),
            params.input_size,
            params.input_size
        );

        Ok(Self { session: Mutex::new(session), params, labels })
    }

    fn infer(&self, rgb: &RgbImage) -> Result<Vec<Detection>> {
        let imgsz = self.params.input_size as usize;
        let input = to_input_tensor(rgb, self.params.input_size);

        let input_shape = vec![1, 3, imgsz as i64, imgsz as i64];
        let input_tensor = Value::from_array((input_shape, input))?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("sesión ONNX envenenada"))?;
        let outputs = session.run(ort::inputs![input_tensor])?;
        let (shape_out, data_out) = outputs[0].try_extract_tensor::<f32>()?;

        let dims: Vec<usize> = shape_out.iter().map(|&x| x as usize).collect();
        let array_view = ArrayViewD::from_shape(IxDyn(&dims), data_out)?;
        let view = array_view
            .index_axis(Axis(0), 0)
            .into_dimensionality::<Ix2>()?;

        let source = SourceDims { width: rgb.width(), height: rgb.height() };
        Ok(decode_predictions(view, source, &self.params, &self.labels))
    }
}

impl DetectorPort for OnnxYoloEngine {
    fn detect(&self, image: &RgbImage) -> DomainResult<Vec<Detection>> {
        self.infer(image)
            .map_err(|e| DomainError::InferenceFailed(e.to_string()))
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// Gris de relleno del letterbox, el mismo que usan los modelos de Ultralytics.
const PAD_VALUE: f32 = 114.0 / 255.0;

/// Letterbox a `imgsz x imgsz` y tensor NCHW en [0, 1].
pub fn to_input_tensor(rgb: &RgbImage, imgsz: u32) -> Vec<f32> {
    let lb = Letterbox::fit(SourceDims { width: rgb.width(), height: rgb.height() }, imgsz);
    let resized = image::imageops::resize(rgb, lb.new_width, lb.new_height, FilterType::Triangle);
    let plane = (imgsz * imgsz) as usize;

    let mut input = vec![PAD_VALUE; 3 * plane];
    for (x, y, pixel) in resized.enumerate_pixels() {
        let idx = ((y + lb.pad_y) * imgsz + x + lb.pad_x) as usize;
        input[idx] = pixel[0] as f32 / 255.0;
        input[plane + idx] = pixel[1] as f32 / 255.0;
        input[2 * plane + idx] = pixel[2] as f32 / 255.0;
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::onnx::labels::coco_labels;

    #[test]
    fn input_tensor_is_planar_and_normalized() {
        let img = RgbImage::from_pixel(4, 4, image::Rgb([255, 0, 51]));
        let t = to_input_tensor(&img, 2);
        assert_eq!(t.len(), 3 * 2 * 2);
        assert!(t[0..4].iter().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(t[4..8].iter().all(|&v| v.abs() < 1e-6));
        assert!(t[8..12].iter().all(|&v| (v - 0.2).abs() < 1e-6));
    }

    #[test]
    fn wide_image_is_padded_top_and_bottom() {
        // 4x2 en un lienzo de 4: filas 0 y 3 son relleno, 1 y 2 la imagen.
        let img = RgbImage::from_pixel(4, 2, image::Rgb([255, 255, 255]));
        let t = to_input_tensor(&img, 4);
        let row = |r: usize| &t[r * 4..r * 4 + 4];
        assert!(row(0).iter().all(|&v| (v - PAD_VALUE).abs() < 1e-6));
        assert!(row(1).iter().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(row(2).iter().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(row(3).iter().all(|&v| (v - PAD_VALUE).abs() < 1e-6));
    }

    #[test]
    fn missing_model_file_fails_to_load() {
        let model = ModelId::from_path("/nonexistent/yolov8n.onnx");
        assert!(OnnxYoloEngine::load(&model, YoloParams::default(), coco_labels(), 1).is_err());
    }
}
