use std::path::PathBuf;

use image::RgbImage;
use tracing::debug;

use crate::adapters::imaging::annotate::annotate;
use crate::application::ports::FrameSinkPort;
use crate::domain::detection::Detection;
use crate::domain::errors::{DomainError, DomainResult};

/// Dibuja las cajas y guarda el frame en `path` (formato según extensión).
/// En modo cámara cada frame sobrescribe al anterior.
pub struct FileSink {
    path: PathBuf,
    thickness: u32,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), thickness: 2 }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl FrameSinkPort for FileSink {
    fn present(&mut self, frame: &RgbImage, detections: &[Detection]) -> DomainResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| DomainError::OperationFailed(format!("{}: {e}", parent.display())))?;
        }

        let annotated = annotate(frame, detections, self.thickness);
        annotated
            .save(&self.path)
            .map_err(|e| DomainError::OperationFailed(format!("{}: {e}", self.path.display())))?;

        debug!("Frame anotado guardado en {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_annotated_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/annotated.png");
        let mut sink = FileSink::new(&path);

        let det = Detection {
            x1: 1.0, y1: 1.0, x2: 6.0, y2: 6.0,
            score: 0.8, class_id: 0, label: "person".into(),
        };
        sink.present(&RgbImage::new(10, 10), &[det]).unwrap();

        let saved = image::open(&path).unwrap().to_rgb8();
        assert_eq!(saved.dimensions(), (10, 10));
        assert_ne!(saved.get_pixel(1, 1).0, [0, 0, 0]);
    }

    #[test]
    fn unknown_extension_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("annotated.nope"));
        assert!(sink.present(&RgbImage::new(2, 2), &[]).is_err());
    }
}
