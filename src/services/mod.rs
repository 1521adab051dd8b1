// Service exports
pub mod remote;

pub use remote::{RemoteExtractor, RemoteExtractorError};
