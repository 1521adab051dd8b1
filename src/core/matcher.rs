use std::sync::Arc;
use thiserror::Error;

use crate::core::decoder::DecodedImage;
use crate::core::embedding::{EmbeddingExtractor, ExtractorError};
use crate::core::scoring::{round_score, score_distance, MatchThresholds};
use crate::models::MatchOutcome;

/// Errors that abort a comparison
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("{0}")]
    DependencyUnavailable(String),

    #[error("Face matching failed: {0}")]
    MatchFailure(String),
}

impl From<ExtractorError> for MatchError {
    fn from(err: ExtractorError) -> Self {
        match err {
            ExtractorError::Unavailable(msg) => MatchError::DependencyUnavailable(msg),
            ExtractorError::Failed(msg) => MatchError::MatchFailure(msg),
        }
    }
}

/// Match decision engine
///
/// # Pipeline
/// 1. Extract embeddings from the ID image, then from the selfie
/// 2. Short-circuit when either image has no face (ID checked first)
/// 3. Distance between the first face of each image
/// 4. Similarity score and double-threshold decision
#[derive(Clone)]
pub struct FaceMatcher {
    extractor: Arc<dyn EmbeddingExtractor>,
    thresholds: MatchThresholds,
}

impl FaceMatcher {
    pub fn new(extractor: Arc<dyn EmbeddingExtractor>, thresholds: MatchThresholds) -> Self {
        Self {
            extractor,
            thresholds,
        }
    }

    pub fn with_default_thresholds(extractor: Arc<dyn EmbeddingExtractor>) -> Self {
        Self::new(extractor, MatchThresholds::default())
    }

    pub fn thresholds(&self) -> &MatchThresholds {
        &self.thresholds
    }

    /// Compare the face on an ID document with the face on a selfie
    ///
    /// Only the first face the extractor reports for each image is used;
    /// further faces are ignored.
    pub async fn evaluate(
        &self,
        id_image: &DecodedImage,
        selfie_image: &DecodedImage,
    ) -> Result<MatchOutcome, MatchError> {
        let id_faces = self.extractor.detect_and_embed(id_image).await?;
        let selfie_faces = self.extractor.detect_and_embed(selfie_image).await?;

        tracing::debug!(
            "Detected {} face(s) in ID image, {} in selfie",
            id_faces.len(),
            selfie_faces.len()
        );

        let Some(id_face) = id_faces.first() else {
            return Ok(MatchOutcome::no_face_in_id());
        };
        let Some(selfie_face) = selfie_faces.first() else {
            return Ok(MatchOutcome::no_face_in_selfie());
        };

        let distance = self.extractor.distance(id_face, selfie_face)?;
        if distance.is_nan() || distance < 0.0 {
            return Err(MatchError::MatchFailure(format!(
                "extractor returned invalid distance {}",
                distance
            )));
        }

        let verdict = score_distance(distance, &self.thresholds);

        tracing::info!(
            "Face match result: distance={:.3}, score={:.3}, match={}",
            verdict.distance,
            verdict.similarity,
            verdict.is_match
        );

        Ok(MatchOutcome::compared(
            verdict.is_match,
            round_score(verdict.similarity),
        ))
    }
}
