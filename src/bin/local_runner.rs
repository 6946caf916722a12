use std::process::ExitCode;

use anyhow::Result;
use tracing::{error, info};

use yolo_predict::{
    adapters::{
        file::{file_sink::FileSink, image_source::ImageFileSource},
        v4l2::capture::V4l2Capture,
    },
    application::{ports::FrameSourcePort, services::RunnerService},
    bootstrap::{init_tracing, load_detector},
    config::RunnerConfig,
    domain::{frame::summarize_detections, source::SourceSpec},
};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let config = RunnerConfig::from_env()?;
    let detector = load_detector(&config.inference)?;

    let mut source: Box<dyn FrameSourcePort> = match &config.source {
        SourceSpec::Camera(camera) => Box::new(V4l2Capture::open(camera, &config.camera_mode)?),
        SourceSpec::File(path) => Box::new(ImageFileSource::open(path)?),
    };
    let mut sink = FileSink::new(&config.output);

    let runner = RunnerService::new(detector);
    let report = runner.run(source.as_mut(), &mut sink, config.max_frames)?;

    let summary = report
        .last
        .as_ref()
        .map(|meta| summarize_detections(&meta.detections))
        .unwrap_or_default();
    info!(
        "✅ {} frame(s) procesados, último: [{}] -> {}",
        report.frames,
        summary,
        sink.path().display()
    );
    Ok(())
}
