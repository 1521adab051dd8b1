// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{MatchErrorKind, MatchOutcome};
pub use requests::FaceMatchRequest;
pub use responses::{ErrorResponse, HealthResponse};
