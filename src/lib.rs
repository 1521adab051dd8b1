//! Face Match - ID document vs. selfie face comparison service
//!
//! This library decodes the two submitted images, extracts face embeddings
//! through a pluggable extractor and applies a distance-based match policy.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{decode, EmbeddingExtractor, FaceMatcher, LazyExtractor, MatchThresholds};
pub use crate::models::{FaceMatchRequest, MatchErrorKind, MatchOutcome};
