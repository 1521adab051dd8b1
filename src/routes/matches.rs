use actix_web::{error::ResponseError, http::StatusCode, web, HttpResponse, Responder};
use thiserror::Error;
use tracing::Instrument;
use validator::Validate;

use crate::core::decoder::{decode, DecodeError, DecodedImage};
use crate::core::{FaceMatcher, MatchError};
use crate::models::{ErrorResponse, FaceMatchRequest, HealthResponse};

pub const SERVICE_NAME: &str = "BANKI Face Matching";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: FaceMatcher,
}

/// Request-level failures, rendered as `ErrorResponse`
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    InvalidImage(#[from] DecodeError),

    #[error("{0}")]
    DependencyUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl From<MatchError> for ServiceError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::DependencyUnavailable(_) => ServiceError::DependencyUnavailable(err.to_string()),
            MatchError::MatchFailure(_) => ServiceError::Internal(err.to_string()),
        }
    }
}

impl ServiceError {
    fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_failed",
            ServiceError::InvalidImage(_) => "invalid_image",
            ServiceError::DependencyUnavailable(_) => "dependency_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) | ServiceError::InvalidImage(_) => StatusCode::BAD_REQUEST,
            ServiceError::DependencyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Configure all face-match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/match", web::post().to(match_faces));
}

/// Health check endpoint
///
/// Does not touch the embedding extractor.
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        service: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Face match endpoint
///
/// POST /match
///
/// Request body:
/// ```json
/// {
///   "id_image": "data:image/jpeg;base64,...",
///   "selfie": "data:image/jpeg;base64,..."
/// }
/// ```
///
/// "No face" results are returned with 200 and `error` set.
async fn match_faces(
    state: web::Data<AppState>,
    req: web::Json<FaceMatchRequest>,
) -> Result<HttpResponse, ServiceError> {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for match request: {}", errors);
        return Err(ServiceError::Validation(errors.to_string()));
    }

    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("face_match", %request_id);

    async move {
        tracing::info!("Processing face match request...");

        let FaceMatchRequest { id_image, selfie } = req.into_inner();
        let (id_image, selfie) = decode_pair(id_image, selfie).await?;

        let outcome = state.matcher.evaluate(&id_image, &selfie).await.map_err(|e| {
            tracing::error!("Face matching error: {}", e);
            ServiceError::from(e)
        })?;

        Ok::<_, ServiceError>(HttpResponse::Ok().json(outcome))
    }
    .instrument(span)
    .await
}

/// Decode both payloads on the blocking pool
async fn decode_pair(
    id_image: String,
    selfie: String,
) -> Result<(DecodedImage, DecodedImage), ServiceError> {
    let decoded = web::block(move || -> Result<_, DecodeError> {
        Ok((decode(&id_image)?, decode(&selfie)?))
    })
    .await
    .map_err(|e| ServiceError::Internal(format!("Face matching failed: {}", e)))?;

    decoded.map_err(|e| {
        tracing::info!("Rejecting request with undecodable image: {}", e);
        ServiceError::InvalidImage(e)
    })
}
