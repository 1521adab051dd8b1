// Core algorithm exports
pub mod decoder;
pub mod embedding;
pub mod matcher;
pub mod scoring;

pub use decoder::{decode, DecodeError, DecodedImage};
pub use embedding::{euclidean_distance, EmbeddingExtractor, ExtractorError, FaceEmbedding, LazyExtractor};
pub use matcher::{FaceMatcher, MatchError};
pub use scoring::{round_score, score_distance, similarity_from_distance, MatchThresholds, Verdict};
