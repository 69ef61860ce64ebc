use super::segmenter::{SegmentationStrategy, Sections};
use serde::{Deserialize, Serialize};

/// Request for POST /api/generate-meditation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateMeditationRequest {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub disease: String,
    #[serde(default)]
    pub symptom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_instruction: Option<String>,
}

/// Validated user parameters handed to the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct MeditationPrompt {
    pub disease: String,
    pub symptom: String,
    pub additional_instruction: Option<String>,
}

impl GenerateMeditationRequest {
    /// Trimmed parameters, or `None` when a required field is blank.
    pub fn to_prompt(&self) -> Option<MeditationPrompt> {
        let disease = self.disease.trim();
        let symptom = self.symptom.trim();
        if disease.is_empty() || symptom.is_empty() {
            return None;
        }

        let additional_instruction = self
            .additional_instruction
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Some(MeditationPrompt {
            disease: disease.to_string(),
            symptom: symptom.to_string(),
            additional_instruction,
        })
    }
}

/// Response for POST /api/generate-meditation
#[derive(Debug, Serialize, Deserialize)]
pub struct GenerateMeditationResponse {
    pub success: bool,
    pub meditation_text: String,
    pub chapters: Vec<String>,
    pub segmentation: SegmentationStrategy,
    pub audio_url: String,
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct MeditationResult {
    pub script: String,
    pub sections: Sections,
    pub strategy: SegmentationStrategy,
    pub artifact_name: String,
    pub duration_ms: u64,
}

impl From<MeditationResult> for GenerateMeditationResponse {
    fn from(result: MeditationResult) -> Self {
        Self {
            success: true,
            audio_url: format!("/download/{}", result.artifact_name),
            meditation_text: result.script,
            chapters: result.sections.to_vec(),
            segmentation: result.strategy,
        }
    }
}
