use crate::domain::audio::AssemblyError;
use crate::domain::speech::SynthesisFailure;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum MeditationServiceError {
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("failed to generate meditation script: {0}")]
    Generation(String),
    #[error(transparent)]
    Synthesis(#[from] SynthesisFailure),
    #[error(transparent)]
    Assembly(#[from] AssemblyError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<MeditationServiceError> for AppError {
    fn from(err: MeditationServiceError) -> Self {
        match err {
            MeditationServiceError::Invalid(msg) => AppError::BadRequest(msg),
            MeditationServiceError::Generation(_) | MeditationServiceError::Synthesis(_) => {
                AppError::ExternalService(err.to_string())
            }
            MeditationServiceError::Assembly(e) => AppError::Internal(e.to_string()),
            MeditationServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
