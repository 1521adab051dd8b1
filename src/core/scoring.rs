use serde::{Deserialize, Serialize};

/// Thresholds for the match decision
///
/// Both limits must hold for a match. With the defaults the similarity floor
/// (0.45, i.e. distance 0.55) is the stricter one; the distance cap is kept as
/// a second guard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchThresholds {
    pub max_distance: f64,
    pub min_similarity: f64,
}

impl Default for MatchThresholds {
    fn default() -> Self {
        Self {
            max_distance: 0.6,
            min_similarity: 0.45,
        }
    }
}

/// Result of scoring a single distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub distance: f64,
    pub similarity: f64,
    pub is_match: bool,
}

/// Convert an embedding distance to a similarity score in [0, 1]
///
/// score = max(0, 1 - distance)
#[inline]
pub fn similarity_from_distance(distance: f64) -> f64 {
    (1.0 - distance).max(0.0)
}

/// Round a score to 4 decimal places
#[inline]
pub fn round_score(score: f64) -> f64 {
    (score * 10_000.0).round() / 10_000.0
}

/// Slack for f64 error in `1 - distance` (1.0 - 0.55 is 0.44999999999999996)
const SIMILARITY_EPSILON: f64 = 1e-9;

/// Apply the double-threshold policy to a distance
pub fn score_distance(distance: f64, thresholds: &MatchThresholds) -> Verdict {
    let similarity = similarity_from_distance(distance);
    let is_match = distance <= thresholds.max_distance
        && similarity >= thresholds.min_similarity - SIMILARITY_EPSILON;

    Verdict {
        distance,
        similarity,
        is_match,
    }
}
