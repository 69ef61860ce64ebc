use serde::Deserialize;
use std::env;
use std::path::PathBuf;

/// Silence inserted between consecutive spoken sections.
pub const SECTION_GAP_MS: u64 = 60_000;
/// Gain applied to a background track decoded from disk.
pub const BACKGROUND_ATTENUATION_DB: f32 = -15.0;
/// Gain applied to the synthesized substitute tone.
pub const TONE_ATTENUATION_DB: f32 = -20.0;
/// Frequency of the substitute background tone.
pub const TONE_FREQUENCY_HZ: f32 = 220.0;
/// Working sample rate of the whole pipeline.
pub const PIPELINE_SAMPLE_RATE: u32 = 44_100;

pub const DEFAULT_APP_PASSWORD: &str = "meditation2024";
pub const DEFAULT_DELIMITER: &str = "[SECTION_BREAK]";
pub const DEFAULT_BACKGROUND_PATH: &str = "background_music.mp3";
pub const DEFAULT_OUTPUT_DIR: &str = "public/download";

pub const ELEVENLABS_DEFAULT_VOICES: &[&str] = &[
    "Priyanka Sogam",
    "21m00Tcm4TlvDq8ikWAM",
    "Rachel",
    "Adam",
    "Antoni",
];
pub const OPENAI_DEFAULT_VOICES: &[&str] = &["shimmer", "nova", "alloy"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    pub app_password: String,
    pub output_dir: PathBuf,
    // Script generation
    pub script_provider: ScriptProvider,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    // Speech synthesis
    pub tts_provider: TtsProvider,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_model: String,
    pub openai_tts_model: String,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ScriptProvider {
    Mock,
    OpenAi,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TtsProvider {
    Disabled,
    ElevenLabs,
    OpenAi,
}

impl TtsProvider {
    pub fn default_voices(&self) -> Vec<String> {
        let voices: &[&str] = match self {
            TtsProvider::ElevenLabs | TtsProvider::Disabled => ELEVENLABS_DEFAULT_VOICES,
            TtsProvider::OpenAi => OPENAI_DEFAULT_VOICES,
        };
        voices.iter().map(|v| v.to_string()).collect()
    }
}

/// Options handed to the segmentation/synthesis/assembly pipeline at construction time.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct PipelineConfig {
    pub delimiter: String,
    pub gap_ms: u64,
    pub voice_priority: Vec<String>,
    pub background_path: Option<PathBuf>,
    pub background_attenuation_db: f32,
    pub tone_attenuation_db: f32,
    pub sample_rate: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            gap_ms: SECTION_GAP_MS,
            voice_priority: TtsProvider::ElevenLabs.default_voices(),
            background_path: Some(PathBuf::from(DEFAULT_BACKGROUND_PATH)),
            background_attenuation_db: BACKGROUND_ATTENUATION_DB,
            tone_attenuation_db: TONE_ATTENUATION_DB,
            sample_rate: PIPELINE_SAMPLE_RATE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let script_provider = parse_script_provider(
            &env::var("SCRIPT_PROVIDER").unwrap_or_else(|_| "mock".to_string()),
        )?;
        let tts_provider = parse_tts_provider(
            &env::var("TTS_PROVIDER").unwrap_or_else(|_| "disabled".to_string()),
        )?;

        let openai_api_key = non_empty_var("OPENAI_API_KEY");
        let elevenlabs_api_key = non_empty_var("ELEVENLABS_API_KEY");

        if openai_api_key.is_none()
            && (script_provider == ScriptProvider::OpenAi || tts_provider == TtsProvider::OpenAi)
        {
            return Err("OPENAI_API_KEY is required for the selected providers".into());
        }
        if elevenlabs_api_key.is_none() && tts_provider == TtsProvider::ElevenLabs {
            return Err("ELEVENLABS_API_KEY is required when TTS_PROVIDER=elevenlabs".into());
        }

        let voice_priority = match env::var("VOICE_PRIORITY") {
            Ok(raw) => parse_voice_list(&raw),
            Err(_) => tts_provider.default_voices(),
        };
        if voice_priority.is_empty() {
            return Err("VOICE_PRIORITY must name at least one voice".into());
        }

        let delimiter = env::var("SECTION_DELIMITER").unwrap_or_else(|_| DEFAULT_DELIMITER.to_string());
        if delimiter.trim().is_empty() {
            return Err("SECTION_DELIMITER cannot be blank".into());
        }

        let background_path = match env::var("BACKGROUND_MUSIC_PATH") {
            Ok(path) if path.trim().is_empty() => None,
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => Some(PathBuf::from(DEFAULT_BACKGROUND_PATH)),
        };

        let config = Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT").as_deref() {
                Ok("production") => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT").as_deref() {
                Ok("json") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            app_password: env::var("APP_PASSWORD").unwrap_or_else(|_| DEFAULT_APP_PASSWORD.to_string()),
            output_dir: PathBuf::from(
                env::var("OUTPUT_DIR").unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string()),
            ),
            script_provider,
            openai_api_key,
            openai_model: env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".to_string()),
            tts_provider,
            elevenlabs_api_key,
            elevenlabs_model: env::var("ELEVENLABS_MODEL")
                .unwrap_or_else(|_| "eleven_multilingual_v2".to_string()),
            openai_tts_model: env::var("OPENAI_TTS_MODEL").unwrap_or_else(|_| "tts-1".to_string()),
            pipeline: PipelineConfig {
                delimiter,
                voice_priority,
                background_path,
                ..PipelineConfig::default()
            },
        };

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_script_provider(raw: &str) -> Result<ScriptProvider, String> {
    match raw.trim().to_lowercase().as_str() {
        "mock" => Ok(ScriptProvider::Mock),
        "openai" => Ok(ScriptProvider::OpenAi),
        other => Err(format!("unknown SCRIPT_PROVIDER '{}'", other)),
    }
}

fn parse_tts_provider(raw: &str) -> Result<TtsProvider, String> {
    match raw.trim().to_lowercase().as_str() {
        "disabled" | "none" | "" => Ok(TtsProvider::Disabled),
        "elevenlabs" => Ok(TtsProvider::ElevenLabs),
        "openai" => Ok(TtsProvider::OpenAi),
        other => Err(format!("unknown TTS_PROVIDER '{}'", other)),
    }
}

/// Split a comma separated voice list, dropping blanks but keeping order.
fn parse_voice_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
