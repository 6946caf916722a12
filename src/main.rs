use std::sync::Arc;

use yolo_predict::{
    adapters::http::{router, state::HttpState},
    application::services::DetectionService,
    bootstrap::{init_tracing, load_detector},
    config::ServiceConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ServiceConfig::from_env()?;

    // El modelo se carga antes de aceptar conexiones y no se recarga nunca.
    tracing::info!("🔧 Inicializando detector...");
    let detector = load_detector(&config.inference)?;

    let detection = Arc::new(DetectionService::new(detector));
    tracing::info!("{} clases disponibles", detection.labels().len());

    let app = router(HttpState { detection });

    let addr = config.bind_addr();
    tracing::info!("🚀 Servicio de detección en http://{}/predict", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
