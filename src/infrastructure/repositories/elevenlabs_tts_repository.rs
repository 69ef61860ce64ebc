use super::tts_repository::TtsRepository;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;

pub const ELEVENLABS_API_URL: &str = "https://api.elevenlabs.io";
const OUTPUT_FORMAT: &str = "mp3_44100_128";
const VOICE_ID_LEN: usize = 20;

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct VoiceEntry {
    voice_id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    voices: Vec<VoiceEntry>,
}

/// ElevenLabs implementation of TTS repository.
///
/// Voices may be given as raw voice ids or as display names. Names are
/// resolved against the account's voice list, fetched once and reused.
pub struct ElevenLabsTtsRepository {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    voices: OnceCell<Vec<VoiceEntry>>,
}

impl ElevenLabsTtsRepository {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, ELEVENLABS_API_URL.to_string())
    }

    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            voices: OnceCell::new(),
        }
    }

    async fn list_voices(&self) -> Result<&[VoiceEntry], String> {
        let voices = self
            .voices
            .get_or_try_init(|| async {
                let response = self
                    .http
                    .get(format!("{}/v1/voices", self.base_url))
                    .header("xi-api-key", &self.api_key)
                    .send()
                    .await
                    .map_err(|e| format!("ElevenLabs voice list unavailable: {}", e))?;

                if !response.status().is_success() {
                    return Err(format!(
                        "ElevenLabs voice list returned {}",
                        response.status()
                    ));
                }

                let body: VoicesResponse = response
                    .json()
                    .await
                    .map_err(|e| format!("invalid ElevenLabs voice list: {}", e))?;

                tracing::debug!(voices = body.voices.len(), "ElevenLabs voice list loaded");
                Ok::<_, String>(body.voices)
            })
            .await?;

        Ok(voices.as_slice())
    }

    async fn resolve_voice_id(&self, voice: &str) -> Result<String, String> {
        if looks_like_voice_id(voice) {
            return Ok(voice.to_string());
        }

        let voices = self.list_voices().await?;
        find_voice_id(voices, voice).ok_or_else(|| format!("voice '{}' not found", voice))
    }
}

/// ElevenLabs ids are 20 alphanumeric characters.
fn looks_like_voice_id(voice: &str) -> bool {
    voice.len() == VOICE_ID_LEN && voice.chars().all(|c| c.is_ascii_alphanumeric())
}

fn find_voice_id(voices: &[VoiceEntry], name: &str) -> Option<String> {
    voices
        .iter()
        .find(|v| v.name.trim().eq_ignore_ascii_case(name.trim()))
        .map(|v| v.voice_id.clone())
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String> {
        let start_time = std::time::Instant::now();
        let voice_id = self.resolve_voice_id(voice).await?;

        tracing::info!(
            voice = voice,
            voice_id = %voice_id,
            model = %self.model,
            text_length = text.len(),
            "Calling ElevenLabs TTS API"
        );

        let response = self
            .http
            .post(format!("{}/v1/text-to-speech/{}", self.base_url, voice_id))
            .query(&[("output_format", OUTPUT_FORMAT)])
            .header("xi-api-key", &self.api_key)
            .header(reqwest::header::ACCEPT, "audio/mpeg")
            .json(&SpeechRequest {
                text,
                model_id: &self.model,
            })
            .send()
            .await
            .map_err(|e| format!("ElevenLabs request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(format!("ElevenLabs returned {}: {}", status, detail.trim()));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| format!("failed to read ElevenLabs audio: {}", e))?
            .to_vec();

        if audio.is_empty() {
            return Err("ElevenLabs returned empty audio".to_string());
        }

        tracing::info!(
            provider = "elevenlabs",
            voice_id = %voice_id,
            latency_ms = start_time.elapsed().as_millis(),
            characters_count = text.len(),
            audio_size_bytes = audio.len(),
            "TTS synthesis completed"
        );

        Ok(audio)
    }

    fn provider(&self) -> &'static str {
        "elevenlabs"
    }
}
