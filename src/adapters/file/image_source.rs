use image::RgbImage;
use tracing::info;

use crate::application::ports::FrameSourcePort;
use crate::domain::errors::{DomainError, DomainResult};

/// Fuente de un único frame leído de disco.
pub struct ImageFileSource {
    path: String,
    consumed: bool,
}

impl ImageFileSource {
    /// Comprueba que el fichero existe; la decodificación ocurre en el primer `next_frame`.
    pub fn open(path: &str) -> DomainResult<Self> {
        if !std::path::Path::new(path).is_file() {
            return Err(DomainError::SourceUnavailable(format!("no existe la imagen {path}")));
        }
        info!("Fuente de imagen: {}", path);
        Ok(Self { path: path.to_string(), consumed: false })
    }
}

impl FrameSourcePort for ImageFileSource {
    fn next_frame(&mut self) -> DomainResult<Option<RgbImage>> {
        if self.consumed {
            return Ok(None);
        }
        self.consumed = true;

        let img = image::open(&self.path)
            .map_err(|e| DomainError::SourceUnavailable(format!("{}: {e}", self.path)))?;
        Ok(Some(img.to_rgb8()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn yields_the_image_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        RgbImage::new(4, 3).save(&path).unwrap();

        let mut src = ImageFileSource::open(path.to_str().unwrap()).unwrap();
        let frame = src.next_frame().unwrap().unwrap();
        assert_eq!(frame.dimensions(), (4, 3));
        assert!(src.next_frame().unwrap().is_none());
    }

    #[test]
    fn missing_file_is_unavailable() {
        assert!(matches!(
            ImageFileSource::open("/nonexistent/frame.png"),
            Err(DomainError::SourceUnavailable(_))
        ));
    }

    #[test]
    fn garbage_file_fails_on_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        std::fs::write(&path, b"not a png").unwrap();

        let mut src = ImageFileSource::open(path.to_str().unwrap()).unwrap();
        assert!(matches!(src.next_frame(), Err(DomainError::SourceUnavailable(_))));
    }
}
