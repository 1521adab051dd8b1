use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::ExtractorSettings;
use crate::core::decoder::DecodedImage;
use crate::core::embedding::{EmbeddingExtractor, ExtractorError, FaceEmbedding, LazyExtractor};

/// Errors that can occur when talking to the embedding backend
#[derive(Debug, Error)]
pub enum RemoteExtractorError {
    #[error("Embedding backend unreachable: {0}")]
    Unreachable(String),

    #[error("Embedding backend overloaded or starting up: {0}")]
    ServiceUnavailable(StatusCode),

    #[error("Embedding backend returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl From<reqwest::Error> for RemoteExtractorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() || err.is_builder() {
            RemoteExtractorError::Unreachable(err.to_string())
        } else if err.is_decode() {
            RemoteExtractorError::InvalidResponse(err.to_string())
        } else {
            RemoteExtractorError::ApiError(err.to_string())
        }
    }
}

impl From<RemoteExtractorError> for ExtractorError {
    fn from(err: RemoteExtractorError) -> Self {
        match err {
            RemoteExtractorError::Unreachable(_)
            | RemoteExtractorError::ServiceUnavailable(_)
            | RemoteExtractorError::Client(_) => ExtractorError::Unavailable(err.to_string()),
            RemoteExtractorError::ApiError(_) | RemoteExtractorError::InvalidResponse(_) => {
                ExtractorError::Failed(err.to_string())
            }
        }
    }
}

/// Raw pixel grid sent to the backend
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    width: u32,
    height: u32,
    /// base64 of the row-major RGB8 bytes
    pixels: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    #[serde(default)]
    faces: Vec<DetectedFace>,
}

#[derive(Debug, Deserialize)]
struct DetectedFace {
    embedding: Vec<f64>,
}

/// HTTP-backed embedding extractor
///
/// Sends each decoded image to `POST {endpoint}/embed` and reads back one
/// embedding per detected face, keeping the backend's detection order.
pub struct RemoteExtractor {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl RemoteExtractor {
    /// Create a new client for the backend at `base_url`
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self, RemoteExtractorError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(RemoteExtractorError::Client)?;

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn embed(&self, image: &DecodedImage) -> Result<Vec<FaceEmbedding>, RemoteExtractorError> {
        let url = format!("{}/embed", self.base_url.trim_end_matches('/'));
        let pixels = STANDARD.encode(image.as_raw());
        let body = EmbedRequest {
            width: image.width(),
            height: image.height(),
            pixels: &pixels,
        };

        tracing::debug!(
            "Requesting embeddings for {}x{} image from: {}",
            body.width,
            body.height,
            url
        );

        let mut request = self.client.post(&url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::SERVICE_UNAVAILABLE {
            return Err(RemoteExtractorError::ServiceUnavailable(status));
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RemoteExtractorError::ApiError(format!(
                "Failed to extract embeddings: {} {}",
                status,
                detail.trim()
            )));
        }

        let parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| RemoteExtractorError::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .faces
            .into_iter()
            .map(|face| FaceEmbedding::new(face.embedding))
            .collect())
    }
}

#[async_trait]
impl EmbeddingExtractor for RemoteExtractor {
    async fn detect_and_embed(
        &self,
        image: &DecodedImage,
    ) -> Result<Vec<FaceEmbedding>, ExtractorError> {
        Ok(self.embed(image).await?)
    }
}

/// Build a lazily connected remote extractor from settings
///
/// Nothing is contacted here. A missing or malformed endpoint surfaces as
/// `ExtractorError::Unavailable` on the first match request.
pub fn lazy_remote_extractor(settings: &ExtractorSettings) -> LazyExtractor {
    let endpoint = settings.endpoint().map(str::to_string);
    let api_key = settings.api_key.clone();
    let timeout = settings.timeout();

    LazyExtractor::new(move || {
        let endpoint = endpoint.clone().ok_or_else(|| {
            ExtractorError::Unavailable(
                "no embedding extractor endpoint configured (set FACEMATCH__EXTRACTOR__ENDPOINT)"
                    .to_string(),
            )
        })?;

        match Url::parse(&endpoint) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            _ => {
                return Err(ExtractorError::Unavailable(format!(
                    "invalid embedding extractor endpoint: {} (expected an http(s) URL)",
                    endpoint
                )));
            }
        }

        tracing::info!("Connecting to embedding extractor at {}", endpoint);
        let extractor = RemoteExtractor::new(endpoint, api_key.clone(), timeout)?;
        Ok(Arc::new(extractor) as Arc<dyn EmbeddingExtractor>)
    })
}
