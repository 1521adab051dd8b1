use serde::{Deserialize, Serialize};

pub const MESSAGE_NO_FACE_IN_ID: &str = "No face detected in ID document image";
pub const MESSAGE_NO_FACE_IN_SELFIE: &str = "No face detected in selfie";
pub const MESSAGE_COMPLETED: &str = "Face comparison completed successfully";

/// Reason a comparison could not be carried out on the faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchErrorKind {
    NoFaceInId,
    NoFaceInSelfie,
}

/// Result of comparing an ID document photo with a selfie
///
/// `error` is `None` when both images contained a face; `score` is 0.0
/// whenever a face is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchOutcome {
    #[serde(rename = "match")]
    pub is_match: bool,
    pub score: f64,
    pub message: String,
    pub error: Option<MatchErrorKind>,
}

impl MatchOutcome {
    pub fn no_face_in_id() -> Self {
        Self {
            is_match: false,
            score: 0.0,
            message: MESSAGE_NO_FACE_IN_ID.to_string(),
            error: Some(MatchErrorKind::NoFaceInId),
        }
    }

    pub fn no_face_in_selfie() -> Self {
        Self {
            is_match: false,
            score: 0.0,
            message: MESSAGE_NO_FACE_IN_SELFIE.to_string(),
            error: Some(MatchErrorKind::NoFaceInSelfie),
        }
    }

    pub fn compared(is_match: bool, score: f64) -> Self {
        Self {
            is_match,
            score,
            message: MESSAGE_COMPLETED.to_string(),
            error: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_wire_format() {
        let json = serde_json::to_value(MatchOutcome::compared(true, 0.8123)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "match": true,
                "score": 0.8123,
                "message": "Face comparison completed successfully",
                "error": null,
            })
        );
    }

    #[test]
    fn test_no_face_wire_format() {
        let json = serde_json::to_value(MatchOutcome::no_face_in_selfie()).unwrap();
        assert_eq!(json["match"], false);
        assert_eq!(json["score"], 0.0);
        assert_eq!(json["error"], "no_face_in_selfie");

        let json = serde_json::to_value(MatchOutcome::no_face_in_id()).unwrap();
        assert_eq!(json["error"], "no_face_in_id");
    }
}
