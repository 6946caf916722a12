use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use tracing::{debug, error, warn};

use crate::adapters::http::{error::ApiError, state::HttpState};
use crate::adapters::imaging::decoder::decode_image_bytes;
use crate::application::dto::DetectionResponse;

/// Campo multipart obligatorio con la imagen.
pub const IMAGE_FIELD: &str = "image";

/// POST /predict - detecta objetos en la imagen subida en el campo `image`.
///
/// - 400 `No image provided`: no hay campo `image` (o la petición no es multipart).
/// - 400 `Invalid image`: el campo existe pero no se puede decodificar.
/// - 200 `{"detections": [...]}`: lista vacía si no hay objetos.
pub async fn predict(
    State(st): State<HttpState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DetectionResponse>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        warn!("Petición /predict sin cuerpo multipart: {}", e);
        ApiError::NoImage
    })?;

    let bytes = read_image_field(&mut multipart).await?;

    let image = decode_image_bytes(&bytes).map_err(|e| {
        warn!("Imagen rechazada ({} bytes): {}", bytes.len(), e);
        ApiError::InvalidImage
    })?;
    debug!("Imagen decodificada: {}x{}", image.width(), image.height());

    let detections = st.detection.detect(image).await.map_err(|e| {
        error!("Fallo del detector: {}", e);
        ApiError::DetectionFailed
    })?;

    Ok(Json(DetectionResponse::from(detections)))
}

/// Recorre los campos hasta encontrar `image`; el resto se ignora.
async fn read_image_field(multipart: &mut Multipart) -> Result<Bytes, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                warn!("Petición /predict sin campo '{}'", IMAGE_FIELD);
                return Err(ApiError::NoImage);
            }
            Err(e) => return Err(multipart_error(e)),
        };

        if field.name() == Some(IMAGE_FIELD) {
            return field.bytes().await.map_err(|e| {
                warn!("No se pudo leer el campo '{}': {}", IMAGE_FIELD, e);
                ApiError::InvalidImage
            });
        }
    }
}

/// Una imagen que supera el límite de subida es una imagen inválida, no un cuerpo mal formado.
fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("Imagen por encima del límite de subida: {}", e);
        ApiError::InvalidImage
    } else {
        warn!("Cuerpo multipart inválido: {}", e);
        ApiError::MalformedUpload
    }
}
