use super::script_repository::ScriptRepository;
use crate::domain::meditation::{prompt::mock_script, MeditationPrompt};
use async_trait::async_trait;

/// Offline script source returning a canned three-section meditation.
#[derive(Debug, Default)]
pub struct MockScriptRepository;

impl MockScriptRepository {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ScriptRepository for MockScriptRepository {
    async fn generate(&self, prompt: &MeditationPrompt, delimiter: &str) -> Result<String, String> {
        tracing::info!(
            disease = %prompt.disease,
            symptom = %prompt.symptom,
            "Using mock meditation script"
        );
        Ok(mock_script(prompt, delimiter))
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}
