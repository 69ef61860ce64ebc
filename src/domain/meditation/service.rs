use super::dto::{MeditationPrompt, MeditationResult};
use super::error::MeditationServiceError;
use super::segmenter::{Segmentation, Segmenter};
use crate::domain::audio::{Artifact, AudioAssembler};
use crate::domain::speech::SpeechSynthesizer;
use crate::infrastructure::config::PipelineConfig;
use crate::infrastructure::repositories::ScriptRepository;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;

#[async_trait]
pub trait MeditationServiceApi: Send + Sync {
    /// Run the full pipeline for one request
    ///
    /// This operation:
    /// - Generates a script from the prompt
    /// - Segments it into three sections
    /// - Synthesizes each section, falling back through the voice list
    /// - Mixes the sections with silence gaps over a background bed and exports the file
    ///
    /// Nothing is exported unless every step before it succeeded.
    async fn generate(
        &self,
        prompt: MeditationPrompt,
    ) -> Result<MeditationResult, MeditationServiceError>;
}

pub struct MeditationService {
    script_repo: Arc<dyn ScriptRepository>,
    synthesizer: Option<SpeechSynthesizer>,
    assembler: Arc<AudioAssembler>,
    segmenter: Segmenter,
    delimiter: String,
    background_path: Option<PathBuf>,
}

impl MeditationService {
    /// `synthesizer` is `None` when speech synthesis is switched off; the
    /// service then exports a placeholder tone instead of a mix.
    pub fn new(
        script_repo: Arc<dyn ScriptRepository>,
        synthesizer: Option<SpeechSynthesizer>,
        assembler: Arc<AudioAssembler>,
        pipeline: &PipelineConfig,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            script_repo,
            synthesizer,
            assembler,
            segmenter: Segmenter::new(&pipeline.delimiter)?,
            delimiter: pipeline.delimiter.clone(),
            background_path: pipeline.background_path.clone(),
        })
    }

    async fn generate_script(&self, prompt: &MeditationPrompt) -> Result<String, MeditationServiceError> {
        tracing::info!(
            provider = self.script_repo.provider(),
            "Generating meditation text"
        );

        self.script_repo
            .generate(prompt, &self.delimiter)
            .await
            .map_err(MeditationServiceError::Generation)
    }

    async fn render_audio(&self, segmentation: &Segmentation) -> Result<Artifact, MeditationServiceError> {
        let assembler = self.assembler.clone();

        let Some(synthesizer) = &self.synthesizer else {
            tracing::info!("Speech synthesis disabled, exporting placeholder audio");
            return run_blocking(move || assembler.render_placeholder()).await;
        };

        let clips = synthesizer.synthesize(&segmentation.sections).await?;

        let background_path = self.background_path.clone();
        run_blocking(move || assembler.assemble(&clips, background_path.as_deref())).await
    }
}

/// Mixing and encoding are CPU bound; keep them off the async workers.
async fn run_blocking<F>(job: F) -> Result<Artifact, MeditationServiceError>
where
    F: FnOnce() -> Result<Artifact, crate::domain::audio::AssemblyError> + Send + 'static,
{
    tokio::task::spawn_blocking(job)
        .await
        .map_err(|e| anyhow::anyhow!("audio assembly task failed: {}", e))?
        .map_err(MeditationServiceError::from)
}

#[async_trait]
impl MeditationServiceApi for MeditationService {
    async fn generate(
        &self,
        prompt: MeditationPrompt,
    ) -> Result<MeditationResult, MeditationServiceError> {
        let start_time = std::time::Instant::now();
        tracing::info!(
            disease = %prompt.disease,
            symptom = %prompt.symptom,
            "Starting meditation generation"
        );

        let script = self.generate_script(&prompt).await?;
        let segmentation = self.segmenter.segment(&script);
        tracing::info!(
            strategy = %segmentation.strategy,
            section_lengths = ?segmentation.sections.iter().map(|s| s.len()).collect::<Vec<_>>(),
            "Script segmented"
        );

        let artifact = self.render_audio(&segmentation).await?;

        tracing::info!(
            artifact = %artifact.file_name,
            duration_ms = artifact.duration_ms,
            latency_ms = start_time.elapsed().as_millis(),
            "Meditation generation completed"
        );

        Ok(MeditationResult {
            script,
            sections: segmentation.sections,
            strategy: segmentation.strategy,
            artifact_name: artifact.file_name,
            duration_ms: artifact.duration_ms,
        })
    }
}
