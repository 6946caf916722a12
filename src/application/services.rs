use std::sync::Arc;
use std::time::Instant;

use image::RgbImage;
use tracing::{debug, info, warn};

use crate::{
    application::ports::{DetectorPort, FrameSinkPort, FrameSourcePort},
    domain::{
        detection::Detection,
        errors::{DomainError, DomainResult},
        frame::{summarize_detections, FrameMeta},
    },
};

/// Caso de uso del servicio HTTP: imagen decodificada -> detecciones.
/// El detector se carga una vez al arrancar y solo se lee después.
#[derive(Clone)]
pub struct DetectionService {
    detector: Arc<dyn DetectorPort>,
}

impl DetectionService {
    pub fn new(detector: Arc<dyn DetectorPort>) -> Self {
        Self { detector }
    }

    pub fn labels(&self) -> &[String] {
        self.detector.labels()
    }

    /// La inferencia es CPU pura, así que sale del runtime async con `spawn_blocking`.
    pub async fn detect(&self, image: RgbImage) -> DomainResult<Vec<Detection>> {
        let detector = self.detector.clone();
        let started = Instant::now();

        let detections = tokio::task::spawn_blocking(move || detector.detect(&image))
            .await
            .map_err(|e| DomainError::InferenceFailed(format!("tarea de inferencia abortada: {e}")))??;

        debug!(
            "{} detecciones en {:.1} ms",
            detections.len(),
            started.elapsed().as_secs_f32() * 1000.0
        );
        Ok(detections)
    }
}

/// Resultado de una ejecución del runner local.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub frames: u64,
    pub last: Option<FrameMeta>,
}

/// Orquestador del runner local: fuente -> detector -> sink, un frame cada vez.
pub struct RunnerService {
    detector: Arc<dyn DetectorPort>,
}

impl RunnerService {
    pub fn new(detector: Arc<dyn DetectorPort>) -> Self {
        Self { detector }
    }

    /// Procesa frames hasta que la fuente se agota o se alcanza `max_frames`.
    /// Un fallo de la fuente corta la ejecución; no hay reintentos.
    pub fn run(
        &self,
        source: &mut dyn FrameSourcePort,
        sink: &mut dyn FrameSinkPort,
        max_frames: Option<u64>,
    ) -> DomainResult<RunReport> {
        let mut report = RunReport::default();

        loop {
            if max_frames.is_some_and(|max| report.frames >= max) {
                break;
            }

            let Some(frame) = source.next_frame()? else {
                break;
            };

            let t_infer_start = Instant::now();
            let detections = self.detector.detect(&frame)?;
            let infer_ms = t_infer_start.elapsed().as_secs_f32() * 1000.0;

            if detections.is_empty() {
                info!("Frame {}: sin detecciones ({:.1} ms)", report.frames, infer_ms);
            } else {
                info!(
                    "Frame {}: {} ({:.1} ms)",
                    report.frames,
                    summarize_detections(&detections),
                    infer_ms
                );
            }

            if let Err(e) = sink.present(&frame, &detections) {
                warn!("No se pudo entregar el frame {}: {}", report.frames, e);
                return Err(e);
            }

            report.last = Some(FrameMeta {
                index: report.frames,
                width: frame.width(),
                height: frame.height(),
                infer_ms,
                detections,
            });
            report.frames += 1;
        }

        if report.frames == 0 {
            return Err(DomainError::SourceUnavailable("la fuente no produjo ningún frame".into()));
        }
        Ok(report)
    }
}
