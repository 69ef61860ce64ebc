pub mod dto;
pub mod error;
pub mod prompt;
pub mod segmenter;
pub mod service;

pub use dto::{GenerateMeditationRequest, GenerateMeditationResponse, MeditationPrompt, MeditationResult};
pub use error::MeditationServiceError;
pub use segmenter::{Segmentation, SegmentationStrategy, Segmenter};
pub use service::{MeditationService, MeditationServiceApi};
