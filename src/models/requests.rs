use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to compare an ID document photo with a selfie
///
/// Both images are base64 strings, optionally prefixed with a data URL
/// header (`data:image/png;base64,...`).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FaceMatchRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "idImageBase64")]
    pub id_image: String,
    #[validate(length(min = 1))]
    #[serde(alias = "selfieBase64")]
    pub selfie: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case_fields() {
        let req: FaceMatchRequest =
            serde_json::from_str(r#"{"id_image": "abc", "selfie": "def"}"#).unwrap();
        assert_eq!(req.id_image, "abc");
        assert_eq!(req.selfie, "def");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_camel_case_aliases() {
        let req: FaceMatchRequest =
            serde_json::from_str(r#"{"idImageBase64": "abc", "selfieBase64": "def"}"#).unwrap();
        assert_eq!(req.id_image, "abc");
        assert_eq!(req.selfie, "def");
    }

    #[test]
    fn test_unlisted_alias_is_rejected() {
        let parsed =
            serde_json::from_str::<FaceMatchRequest>(r#"{"idImage": "abc", "selfie": "def"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_empty_field_fails_validation() {
        let req = FaceMatchRequest {
            id_image: String::new(),
            selfie: "def".to_string(),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_missing_field_fails_to_parse() {
        let parsed = serde_json::from_str::<FaceMatchRequest>(r#"{"id_image": "abc"}"#);
        assert!(parsed.is_err());
    }
}
