use super::script_repository::ScriptRepository;
use crate::domain::meditation::{
    prompt::{build_prompt, SYSTEM_MESSAGE},
    MeditationPrompt,
};
use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use std::sync::Arc;

const MAX_TOKENS: u32 = 2000;
const TEMPERATURE: f32 = 0.7;

/// OpenAI chat completion implementation of the script repository
pub struct OpenAiScriptRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
}

impl OpenAiScriptRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self { client, model }
    }

    fn build_request(
        &self,
        prompt: &MeditationPrompt,
        delimiter: &str,
    ) -> Result<CreateChatCompletionRequest, OpenAIError> {
        CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .max_tokens(MAX_TOKENS)
            .temperature(TEMPERATURE)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_MESSAGE)
                    .build()?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(build_prompt(prompt, delimiter))
                    .build()?
                    .into(),
            ])
            .build()
    }
}

#[async_trait]
impl ScriptRepository for OpenAiScriptRepository {
    async fn generate(&self, prompt: &MeditationPrompt, delimiter: &str) -> Result<String, String> {
        let start_time = std::time::Instant::now();

        let request = self
            .build_request(prompt, delimiter)
            .map_err(|e| format!("invalid OpenAI request: {}", e))?;

        tracing::info!(
            model = %self.model,
            disease = %prompt.disease,
            symptom = %prompt.symptom,
            "Calling OpenAI chat completion"
        );

        let response = self.client.chat().create(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                "OpenAI chat completion failed"
            );
            format!("OpenAI error: {}", e)
        })?;

        let script = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| "OpenAI returned an empty script".to_string())?;

        tracing::info!(
            provider = "openai",
            model = %self.model,
            latency_ms = start_time.elapsed().as_millis(),
            script_length = script.len(),
            "Meditation script generated"
        );

        Ok(script)
    }

    fn provider(&self) -> &'static str {
        "openai"
    }
}
