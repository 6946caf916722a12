use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraId { pub path: String }

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraMode {
    pub format: String,
    pub size: FrameSize,
    pub fps: u32,
}

impl Default for CameraMode {
    fn default() -> Self {
        Self {
            format: "MJPG".to_string(),
            size: FrameSize { width: 640, height: 480 },
            fps: 30,
        }
    }
}

/// De dónde saca frames el runner local.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceSpec {
    Camera(CameraId),
    File(String),
}

impl SourceSpec {
    /// `camera:N` y `/dev/videoN` son cámaras; cualquier otra cosa es una ruta de imagen.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some(idx) = raw.strip_prefix("camera:") {
            return SourceSpec::Camera(CameraId { path: format!("/dev/video{}", idx.trim()) });
        }
        if raw.starts_with("/dev/video") {
            return SourceSpec::Camera(CameraId { path: raw.to_string() });
        }
        SourceSpec::File(raw.to_string())
    }

    pub fn is_live(&self) -> bool {
        matches!(self, SourceSpec::Camera(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_shorthand_maps_to_device_node() {
        assert_eq!(
            SourceSpec::parse("camera:2"),
            SourceSpec::Camera(CameraId { path: "/dev/video2".into() })
        );
    }

    #[test]
    fn device_path_is_a_camera() {
        let s = SourceSpec::parse("/dev/video0");
        assert!(s.is_live());
    }

    #[test]
    fn anything_else_is_a_file() {
        let s = SourceSpec::parse("images/street.jpg");
        assert_eq!(s, SourceSpec::File("images/street.jpg".into()));
        assert!(!s.is_live());
    }
}
