use super::tts_repository::TtsRepository;
use async_openai::{
    config::OpenAIConfig,
    types::{CreateSpeechRequest, SpeechModel, Voice},
    Client,
};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;

/// OpenAI has a limit of 4096 characters per request
const MAX_BATCH_SIZE: usize = 4096;

/// OpenAI TTS implementation of TTS repository
pub struct OpenAiTtsRepository {
    client: Arc<Client<OpenAIConfig>>,
    model: String,
    sentence_pattern: Regex,
}

impl OpenAiTtsRepository {
    pub fn new(client: Arc<Client<OpenAIConfig>>, model: String) -> Self {
        Self {
            client,
            model,
            sentence_pattern: Regex::new(r"[.!?]+\s+").expect("sentence pattern is valid"),
        }
    }

    /// Call OpenAI TTS API to synthesize a single text batch
    async fn call_openai(&self, text: &str, voice: Voice) -> Result<Vec<u8>, String> {
        let model = match self.model.as_str() {
            "tts-1" => SpeechModel::Tts1,
            "tts-1-hd" => SpeechModel::Tts1Hd,
            other => SpeechModel::Other(other.to_string()),
        };

        let request = CreateSpeechRequest {
            model,
            input: text.to_string(),
            voice,
            response_format: None, // Defaults to MP3
            speed: None,
        };

        let response = self.client.audio().speech(request).await.map_err(|e| {
            tracing::error!(
                error = %e,
                model = %self.model,
                text_length = text.len(),
                "OpenAI TTS API call failed"
            );
            format!("OpenAI TTS error: {}", e)
        })?;

        Ok(response.bytes.to_vec())
    }
}

/// Map a configured voice name onto the OpenAI voice set.
fn parse_voice(voice: &str) -> Result<Voice, String> {
    match voice.trim().to_lowercase().as_str() {
        "alloy" => Ok(Voice::Alloy),
        "echo" => Ok(Voice::Echo),
        "fable" => Ok(Voice::Fable),
        "onyx" => Ok(Voice::Onyx),
        "nova" => Ok(Voice::Nova),
        "shimmer" => Ok(Voice::Shimmer),
        _ => Err(format!("voice '{}' is not an OpenAI voice", voice)),
    }
}

/// Split text into batches that respect sentence boundaries.
/// Each batch is at most MAX_BATCH_SIZE bytes.
fn split_into_batches(sentence_pattern: &Regex, text: &str) -> Vec<String> {
    if text.len() <= MAX_BATCH_SIZE {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current = String::new();
    let mut last_end = 0;

    let push_piece = |piece: &str, current: &mut String, batches: &mut Vec<String>| {
        if !current.is_empty() && current.len() + piece.len() > MAX_BATCH_SIZE {
            batches.push(current.trim().to_string());
            current.clear();
        }
        if piece.len() > MAX_BATCH_SIZE {
            batches.extend(split_by_chars(piece));
        } else {
            current.push_str(piece);
        }
    };

    for mat in sentence_pattern.find_iter(text) {
        push_piece(&text[last_end..mat.end()], &mut current, &mut batches);
        last_end = mat.end();
    }
    if last_end < text.len() {
        push_piece(&text[last_end..], &mut current, &mut batches);
    }
    if !current.trim().is_empty() {
        batches.push(current.trim().to_string());
    }

    batches
}

/// Hard split on char boundaries for text without usable sentence breaks.
fn split_by_chars(text: &str) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut chunk = String::new();
    for c in text.chars() {
        if chunk.len() + c.len_utf8() > MAX_BATCH_SIZE {
            chunks.push(std::mem::take(&mut chunk));
        }
        chunk.push(c);
    }
    if !chunk.is_empty() {
        chunks.push(chunk);
    }
    chunks
}

#[async_trait]
impl TtsRepository for OpenAiTtsRepository {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let voice_enum = parse_voice(voice)?;

        let batches = split_into_batches(&self.sentence_pattern, text);
        tracing::info!(
            voice = voice,
            model = %self.model,
            text_length = text.len(),
            batch_count = batches.len(),
            "Starting OpenAI TTS synthesis"
        );

        // MP3 frames concatenate into a single decodable stream
        let mut audio_data = Vec::new();
        for (index, batch) in batches.iter().enumerate() {
            let chunk = self.call_openai(batch, voice_enum.clone()).await?;
            tracing::debug!(
                batch_index = index,
                batch_size = batch.len(),
                audio_size = chunk.len(),
                "Batch synthesized"
            );
            audio_data.extend(chunk);
        }

        tracing::info!(
            provider = "openai",
            model = %self.model,
            voice = voice,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            batch_count = batches.len(),
            audio_size_bytes = audio_data.len(),
            "TTS synthesis completed"
        );

        Ok(audio_data)
    }

    fn provider(&self) -> &'static str {
        "openai"
    }
}
