use super::clip::{samples_for, AudioClip};
use super::codec::{self, AudioError};
use crate::infrastructure::config::{PipelineConfig, TONE_FREQUENCY_HZ};
use crate::infrastructure::storage::ArtifactStore;
use std::path::{Path, PathBuf};

/// Placeholder export used when speech synthesis is switched off.
const PLACEHOLDER_FREQUENCY_HZ: f32 = 440.0;
const PLACEHOLDER_ATTENUATION_DB: f32 = -30.0;
const PLACEHOLDER_DURATION_MS: u64 = 60_000;

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("failed to decode audio: {0}")]
    Decode(String),
    #[error("failed to export meditation: {0}")]
    Export(String),
    #[error("failed to resample audio: {0}")]
    Resample(String),
    #[error("artifact storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AudioError> for AssemblyError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::Decode(msg) => AssemblyError::Decode(msg),
            AudioError::Encode(msg) => AssemblyError::Export(msg),
            AudioError::Resample(msg) => AssemblyError::Resample(msg),
            AudioError::Io(e) => AssemblyError::Io(e),
        }
    }
}

/// Where the background bed of a mix came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundSource {
    File,
    Tone,
}

/// Exported audio file.
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    pub file_name: String,
    pub path: PathBuf,
    pub duration_ms: u64,
}

/// Concatenates spoken sections with silence gaps and lays a background bed under them.
pub struct AudioAssembler {
    gap_ms: u64,
    background_attenuation_db: f32,
    tone_attenuation_db: f32,
    sample_rate: u32,
    store: ArtifactStore,
}

impl AudioAssembler {
    pub fn new(pipeline: &PipelineConfig, store: ArtifactStore) -> Self {
        Self {
            gap_ms: pipeline.gap_ms,
            background_attenuation_db: pipeline.background_attenuation_db,
            tone_attenuation_db: pipeline.tone_attenuation_db,
            sample_rate: pipeline.sample_rate,
            store,
        }
    }

    /// Sections in order, each followed by a silence gap except the last.
    ///
    /// Clips are expected at the assembler's sample rate.
    pub fn build_timeline(&self, clips: &[AudioClip]) -> AudioClip {
        let gap = AudioClip::silent(self.gap_ms, self.sample_rate);
        let mut timeline = AudioClip::empty(self.sample_rate);

        for (index, clip) in clips.iter().enumerate() {
            timeline.append(clip);
            if index + 1 < clips.len() {
                timeline.append(&gap);
            }
        }

        timeline
    }

    /// Background bed of exactly `len` samples.
    ///
    /// A readable file at `background_path` is attenuated and looped or cut to
    /// length. A missing or undecodable file falls back to a synthesized tone;
    /// this never fails.
    pub fn load_background(
        &self,
        background_path: Option<&Path>,
        len: usize,
    ) -> (AudioClip, BackgroundSource) {
        if let Some(path) = background_path {
            if path.is_file() {
                match self.decode_background(path) {
                    Ok(track) => {
                        if track.len() < len {
                            tracing::info!(
                                background_ms = track.duration_ms(),
                                "Background shorter than meditation, looping it"
                            );
                        }
                        let bed = track
                            .apply_gain_db(self.background_attenuation_db)
                            .looped_to(len);
                        return (bed, BackgroundSource::File);
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Error loading background music, using ambient tone"
                        );
                    }
                }
            } else {
                tracing::warn!(
                    path = %path.display(),
                    "Background music file not found, using ambient tone"
                );
            }
        }

        let tone = AudioClip::sine(TONE_FREQUENCY_HZ, len, self.sample_rate)
            .apply_gain_db(self.tone_attenuation_db);
        (tone, BackgroundSource::Tone)
    }

    fn decode_background(&self, path: &Path) -> Result<AudioClip, AudioError> {
        let track = codec::decode_file(path)?;
        codec::resample(track, self.sample_rate)
    }

    /// Timeline with the background overlaid from time zero.
    pub fn mix(&self, clips: &[AudioClip], background_path: Option<&Path>) -> AudioClip {
        let timeline = self.build_timeline(clips);
        let (background, source) = self.load_background(background_path, timeline.len());

        tracing::info!(
            sections = clips.len(),
            timeline_ms = timeline.duration_ms(),
            background = ?source,
            "Mixing meditation"
        );

        timeline.overlay(&background)
    }

    /// Mix `clips` over the background and export the result.
    ///
    /// Any export failure aborts the assembly; no partial file is left behind.
    pub fn assemble(
        &self,
        clips: &[AudioClip],
        background_path: Option<&Path>,
    ) -> Result<Artifact, AssemblyError> {
        let mixed = self.mix(clips, background_path);
        self.export(&mixed)
    }

    /// Export the short tone used when no speech is synthesized.
    pub fn render_placeholder(&self) -> Result<Artifact, AssemblyError> {
        let len = samples_for(PLACEHOLDER_DURATION_MS, self.sample_rate);
        let tone = AudioClip::sine(PLACEHOLDER_FREQUENCY_HZ, len, self.sample_rate)
            .apply_gain_db(PLACEHOLDER_ATTENUATION_DB);
        self.export(&tone)
    }

    fn export(&self, clip: &AudioClip) -> Result<Artifact, AssemblyError> {
        let file_name = self.store.new_artifact_name();
        let path = self.store.write_atomically(&file_name, |partial| {
            codec::encode_wav_file(clip, partial).map_err(AssemblyError::from)
        })?;

        tracing::info!(
            artifact = %file_name,
            duration_ms = clip.duration_ms(),
            "Final meditation created"
        );

        Ok(Artifact {
            file_name,
            path,
            duration_ms: clip.duration_ms(),
        })
    }
}
