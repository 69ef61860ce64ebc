pub mod synthesizer;

pub use synthesizer::{SpeechSynthesizer, SynthesisFailure};
