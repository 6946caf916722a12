//! Helpers compartidos por los tests de integración.
#![allow(dead_code)]

use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::Router;
use image::{ImageFormat, RgbImage};
use yolo_predict::{
    adapters::http::{router, state::HttpState},
    application::{ports::DetectorPort, services::DetectionService},
    domain::{
        detection::Detection,
        errors::{DomainError, DomainResult},
    },
};

pub const BOUNDARY: &str = "yolo-predict-test-boundary";

/// Detector de pruebas: devuelve siempre la misma lista (o falla) y cuenta llamadas.
pub struct ScriptedDetector {
    detections: Vec<Detection>,
    fail: bool,
    calls: Arc<AtomicUsize>,
    labels: Vec<String>,
}

impl ScriptedDetector {
    pub fn returning(detections: Vec<Detection>) -> Self {
        Self {
            detections,
            fail: false,
            calls: Arc::new(AtomicUsize::new(0)),
            labels: vec!["person".into(), "bicycle".into(), "dog".into()],
        }
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::returning(Vec::new()) }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl DetectorPort for ScriptedDetector {
    fn detect(&self, _image: &RgbImage) -> DomainResult<Vec<Detection>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DomainError::InferenceFailed("backend caído".into()));
        }
        Ok(self.detections.clone())
    }

    fn labels(&self) -> &[String] {
        &self.labels
    }
}

pub fn det(label: &str, class_id: usize, score: f32, bbox: [f32; 4]) -> Detection {
    Detection {
        x1: bbox[0],
        y1: bbox[1],
        x2: bbox[2],
        y2: bbox[3],
        score,
        class_id,
        label: label.to_string(),
    }
}

pub fn app_with(detector: ScriptedDetector) -> Router {
    let detection = Arc::new(DetectionService::new(Arc::new(detector)));
    router(HttpState { detection })
}

pub fn png_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(w, h, image::Rgb([120, 80, 40]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn jpeg_bytes(w: u32, h: u32) -> Vec<u8> {
    let img = RgbImage::from_pixel(w, h, image::Rgb([30, 60, 90]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

/// Cuerpo `multipart/form-data` con los campos `(nombre, bytes)` dados, como fichero.
pub fn multipart_body(fields: &[(&str, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, bytes) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload.bin\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
