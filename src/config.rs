//! Configuración por variables de entorno.
//!
//! Ninguno de los dos binarios acepta flags: todo sale del entorno, con valores
//! por defecto razonables. `from_lookup` existe para poder probar el parseo sin
//! tocar el entorno del proceso.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::model::{InferenceConfig, ModelId, YoloParams};
use crate::domain::source::{CameraMode, FrameSize, SourceSpec};

pub const DEFAULT_MODEL_PATH: &str = "models/yolov8n.onnx";
pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_SOURCE: &str = "camera:0";
pub const DEFAULT_OUTPUT: &str = "annotated.jpg";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}={value:?} no es válido: {reason}")]
    Invalid { key: String, value: String, reason: String },
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key: key.to_string(),
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn unit_interval<F>(lookup: &F, key: &str, default: f32) -> Result<f32, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let v = parse_or(lookup, key, default)?;
    if !(0.0..=1.0).contains(&v) {
        return Err(ConfigError::Invalid {
            key: key.to_string(),
            value: v.to_string(),
            reason: "debe estar en [0, 1]".to_string(),
        });
    }
    Ok(v)
}

fn inference_from<F>(lookup: &F) -> Result<InferenceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let defaults = YoloParams::default();
    let input_size: u32 = parse_or(lookup, "YOLO_INPUT_SIZE", defaults.input_size)?;
    if input_size == 0 || input_size % 32 != 0 {
        return Err(ConfigError::Invalid {
            key: "YOLO_INPUT_SIZE".to_string(),
            value: input_size.to_string(),
            reason: "debe ser múltiplo de 32".to_string(),
        });
    }

    let params = YoloParams {
        input_size,
        conf_threshold: unit_interval(lookup, "YOLO_CONF_THRESHOLD", defaults.conf_threshold)?,
        iou_threshold: unit_interval(lookup, "YOLO_IOU_THRESHOLD", defaults.iou_threshold)?,
        max_detections: parse_or(lookup, "YOLO_MAX_DETECTIONS", defaults.max_detections)?,
    };

    let model_path = lookup("YOLO_MODEL_PATH").unwrap_or_else(|| DEFAULT_MODEL_PATH.to_string());

    Ok(InferenceConfig {
        model: ModelId::from_path(model_path),
        params,
        labels_path: lookup("YOLO_LABELS_PATH").filter(|p| !p.trim().is_empty()),
        intra_threads: parse_or(lookup, "YOLO_INTRA_THREADS", 4usize)?,
    })
}

/// Configuración del servicio HTTP.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub inference: InferenceConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            port: parse_or(&lookup, "PREDICT_PORT", DEFAULT_PORT)?,
            inference: inference_from(&lookup)?,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Configuración del runner local.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub source: SourceSpec,
    pub output: PathBuf,
    pub max_frames: Option<u64>,
    pub camera_mode: CameraMode,
    pub inference: InferenceConfig,
}

impl RunnerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source = SourceSpec::parse(&lookup("RUNNER_SOURCE").unwrap_or_else(|| DEFAULT_SOURCE.to_string()));

        // Una imagen se procesa una vez; una cámara corre hasta que falle salvo que se limite.
        let max_frames = match lookup("RUNNER_MAX_FRAMES") {
            Some(_) => {
                let n: u64 = parse_or(&lookup, "RUNNER_MAX_FRAMES", 1)?;
                if n == 0 {
                    return Err(ConfigError::Invalid {
                        key: "RUNNER_MAX_FRAMES".to_string(),
                        value: n.to_string(),
                        reason: "debe ser al menos 1".to_string(),
                    });
                }
                Some(n)
            }
            None if source.is_live() => None,
            None => Some(1),
        };

        let defaults = CameraMode::default();
        let camera_mode = CameraMode {
            format: lookup("RUNNER_CAMERA_FOURCC").unwrap_or(defaults.format),
            size: FrameSize {
                width: parse_or(&lookup, "RUNNER_CAMERA_WIDTH", defaults.size.width)?,
                height: parse_or(&lookup, "RUNNER_CAMERA_HEIGHT", defaults.size.height)?,
            },
            fps: parse_or(&lookup, "RUNNER_CAMERA_FPS", defaults.fps)?,
        };

        Ok(Self {
            source,
            output: PathBuf::from(lookup("RUNNER_OUTPUT").unwrap_or_else(|| DEFAULT_OUTPUT.to_string())),
            max_frames,
            camera_mode,
            inference: inference_from(&lookup)?,
        })
    }
}
