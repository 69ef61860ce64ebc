use crate::domain::meditation::MeditationPrompt;
use async_trait::async_trait;

/// Repository for meditation script generation.
/// Abstracts the language model behind the pipeline (OpenAI, canned mock).
#[async_trait]
pub trait ScriptRepository: Send + Sync {
    /// Generate a full script for `prompt`, asking for sections separated by `delimiter`.
    ///
    /// # Errors
    /// Returns a human-readable cause when the model is unreachable or
    /// returns no usable text.
    async fn generate(&self, prompt: &MeditationPrompt, delimiter: &str) -> Result<String, String>;

    /// Provider name used in logs.
    fn provider(&self) -> &'static str;
}
