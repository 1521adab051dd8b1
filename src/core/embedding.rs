use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::core::decoder::DecodedImage;

/// Errors reported by an embedding extractor
#[derive(Debug, Clone, Error)]
pub enum ExtractorError {
    /// The extractor is not installed, not configured or not reachable
    #[error("Embedding extractor unavailable: {0}")]
    Unavailable(String),

    #[error("Embedding extraction failed: {0}")]
    Failed(String),
}

/// Embedding vector for one detected face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceEmbedding(pub Vec<f64>);

impl FaceEmbedding {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Euclidean distance between two embeddings
///
/// Returns `None` when the vectors have different lengths.
#[inline]
pub fn euclidean_distance(a: &FaceEmbedding, b: &FaceEmbedding) -> Option<f64> {
    if a.len() != b.len() {
        return None;
    }

    let sum: f64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y).powi(2))
        .sum();

    Some(sum.sqrt())
}

/// Face detector + embedder used by the match engine
///
/// `detect_and_embed` returns one embedding per detected face, in the
/// extractor's own detection order. An empty vector means no face was found.
#[async_trait]
pub trait EmbeddingExtractor: Send + Sync {
    async fn detect_and_embed(
        &self,
        image: &DecodedImage,
    ) -> Result<Vec<FaceEmbedding>, ExtractorError>;

    /// Distance in embedding space (smaller = more similar)
    fn distance(&self, a: &FaceEmbedding, b: &FaceEmbedding) -> Result<f64, ExtractorError> {
        euclidean_distance(a, b).ok_or_else(|| {
            ExtractorError::Failed(format!(
                "embedding length mismatch: {} vs {}",
                a.len(),
                b.len()
            ))
        })
    }
}

/// Loader producing the concrete extractor on first use
pub type ExtractorLoader =
    Box<dyn Fn() -> Result<Arc<dyn EmbeddingExtractor>, ExtractorError> + Send + Sync>;

/// Extractor resolved lazily on the first request
///
/// The service starts even when no extractor is available; requests then
/// fail with `ExtractorError::Unavailable`. A failed load is not remembered,
/// so the next request tries again.
pub struct LazyExtractor {
    loader: ExtractorLoader,
    inner: OnceCell<Arc<dyn EmbeddingExtractor>>,
}

impl LazyExtractor {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<Arc<dyn EmbeddingExtractor>, ExtractorError> + Send + Sync + 'static,
    {
        Self {
            loader: Box::new(loader),
            inner: OnceCell::new(),
        }
    }

    /// Whether the extractor has been loaded already
    pub fn is_loaded(&self) -> bool {
        self.inner.initialized()
    }

    async fn get(&self) -> Result<&Arc<dyn EmbeddingExtractor>, ExtractorError> {
        self.inner
            .get_or_try_init(|| async {
                let extractor = (self.loader)()?;
                tracing::info!("Embedding extractor loaded");
                Ok::<_, ExtractorError>(extractor)
            })
            .await
    }
}

#[async_trait]
impl EmbeddingExtractor for LazyExtractor {
    async fn detect_and_embed(
        &self,
        image: &DecodedImage,
    ) -> Result<Vec<FaceEmbedding>, ExtractorError> {
        self.get().await?.detect_and_embed(image).await
    }

    fn distance(&self, a: &FaceEmbedding, b: &FaceEmbedding) -> Result<f64, ExtractorError> {
        match self.inner.get() {
            Some(extractor) => extractor.distance(a, b),
            None => Err(ExtractorError::Unavailable(
                "extractor has not been loaded".to_string(),
            )),
        }
    }
}
