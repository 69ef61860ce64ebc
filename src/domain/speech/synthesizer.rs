use crate::domain::audio::{clip::AudioClip, codec};
use crate::infrastructure::repositories::TtsRepository;
use std::sync::Arc;

/// Every voice in the priority list failed for one section.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error(
    "could not generate audio for section {} with any voice (tried {}). Last error: {}",
    .section_index + 1,
    .attempted.join(", "),
    .causes.last().map(String::as_str).unwrap_or("no voices configured")
)]
pub struct SynthesisFailure {
    pub section_index: usize,
    pub attempted: Vec<String>,
    pub causes: Vec<String>,
}

/// Turns section texts into audio clips, walking a fixed voice priority list.
///
/// Each voice is tried once, in order; the first that yields decodable audio
/// wins. Sections are synthesized one after another.
pub struct SpeechSynthesizer {
    tts_repo: Arc<dyn TtsRepository>,
    voice_priority: Vec<String>,
    sample_rate: u32,
}

impl SpeechSynthesizer {
    pub fn new(tts_repo: Arc<dyn TtsRepository>, voice_priority: Vec<String>, sample_rate: u32) -> Self {
        Self {
            tts_repo,
            voice_priority,
            sample_rate,
        }
    }

    /// Synthesize all sections in order. The first failing section aborts the run.
    pub async fn synthesize(&self, sections: &[String]) -> Result<Vec<AudioClip>, SynthesisFailure> {
        let mut clips = Vec::with_capacity(sections.len());

        for (index, text) in sections.iter().enumerate() {
            tracing::info!(
                section = index + 1,
                text_length = text.len(),
                "Converting section to speech"
            );
            clips.push(self.synthesize_section(index, text).await?);
        }

        Ok(clips)
    }

    /// Synthesize one section, falling back through the voice list.
    pub async fn synthesize_section(
        &self,
        section_index: usize,
        text: &str,
    ) -> Result<AudioClip, SynthesisFailure> {
        let mut attempted = Vec::with_capacity(self.voice_priority.len());
        let mut causes = Vec::new();

        for voice in &self.voice_priority {
            attempted.push(voice.clone());
            tracing::info!(
                provider = self.tts_repo.provider(),
                section = section_index + 1,
                voice = %voice,
                "Trying voice"
            );

            match self.try_voice(text, voice).await {
                Ok(clip) => {
                    tracing::info!(
                        section = section_index + 1,
                        voice = %voice,
                        duration_ms = clip.duration_ms(),
                        "Successfully used voice"
                    );
                    return Ok(clip);
                }
                Err(cause) => {
                    tracing::warn!(
                        section = section_index + 1,
                        voice = %voice,
                        error = %cause,
                        "Failed to use voice"
                    );
                    causes.push(cause);
                }
            }
        }

        let failure = SynthesisFailure {
            section_index,
            attempted,
            causes,
        };
        tracing::error!(error = %failure, "Speech synthesis failed");
        Err(failure)
    }

    async fn try_voice(&self, text: &str, voice: &str) -> Result<AudioClip, String> {
        let audio = self.tts_repo.synthesize(text, voice).await?;
        let clip = codec::decode(&audio, Some("mp3")).map_err(|e| e.to_string())?;
        codec::resample(clip, self.sample_rate).map_err(|e| e.to_string())
    }
}
