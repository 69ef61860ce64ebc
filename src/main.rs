use async_openai::{config::OpenAIConfig, Client};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use meditation_backend::controllers::{download::DownloadController, meditation::MeditationController};
use meditation_backend::domain::audio::AudioAssembler;
use meditation_backend::domain::meditation::MeditationService;
use meditation_backend::domain::speech::SpeechSynthesizer;
use meditation_backend::infrastructure::auth::SharedSecret;
use meditation_backend::infrastructure::config::{
    Config, LogFormat, ScriptProvider, TtsProvider, DEFAULT_APP_PASSWORD,
};
use meditation_backend::infrastructure::http::start_http_server;
use meditation_backend::infrastructure::repositories::{
    ElevenLabsTtsRepository, MockScriptRepository, OpenAiScriptRepository, OpenAiTtsRepository,
    ScriptRepository, TtsRepository,
};
use meditation_backend::infrastructure::storage::ArtifactStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting Meditation Backend on {}:{}",
        config.host,
        config.port
    );
    tracing::info!(
        script_provider = ?config.script_provider,
        tts_provider = ?config.tts_provider,
        voices = ?config.pipeline.voice_priority,
        "Providers selected"
    );

    if !config.is_development() && config.app_password == DEFAULT_APP_PASSWORD {
        tracing::warn!("APP_PASSWORD is the default value in production");
    }

    // Prepare the artifact directory
    let store = ArtifactStore::new(config.output_dir.clone());
    store.ensure_dir()?;
    tracing::info!(output_dir = %store.dir().display(), "Artifact directory ready");

    match &config.pipeline.background_path {
        Some(path) if path.is_file() => {
            tracing::info!(path = %path.display(), "Background music found")
        }
        Some(path) => tracing::warn!(
            path = %path.display(),
            "Background music not found, a generated tone will be used"
        ),
        None => tracing::info!("Background music lookup disabled"),
    }

    let config = Arc::new(config);
    let openai_client = config
        .openai_api_key
        .as_ref()
        .map(|key| Arc::new(Client::with_config(OpenAIConfig::new().with_api_key(key))));

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Instantiate repositories (inject API clients)
    tracing::info!("Instantiating repositories...");
    let script_repo: Arc<dyn ScriptRepository> = match (config.script_provider, &openai_client) {
        (ScriptProvider::OpenAi, Some(client)) => Arc::new(OpenAiScriptRepository::new(
            client.clone(),
            config.openai_model.clone(),
        )),
        (ScriptProvider::OpenAi, None) => return Err("OPENAI_API_KEY is not set".into()),
        (ScriptProvider::Mock, _) => Arc::new(MockScriptRepository::new()),
    };

    let tts_repo: Option<Arc<dyn TtsRepository>> = match config.tts_provider {
        TtsProvider::Disabled => None,
        TtsProvider::ElevenLabs => {
            let api_key = config
                .elevenlabs_api_key
                .clone()
                .ok_or("ELEVENLABS_API_KEY is not set")?;
            let repo: Arc<dyn TtsRepository> = Arc::new(ElevenLabsTtsRepository::new(
                api_key,
                config.elevenlabs_model.clone(),
            ));
            Some(repo)
        }
        TtsProvider::OpenAi => {
            let client = openai_client.clone().ok_or("OPENAI_API_KEY is not set")?;
            let repo: Arc<dyn TtsRepository> = Arc::new(OpenAiTtsRepository::new(
                client,
                config.openai_tts_model.clone(),
            ));
            Some(repo)
        }
    };

    // 2. Instantiate services (inject repositories)
    tracing::info!("Instantiating services...");
    let synthesizer = tts_repo.map(|repo| {
        SpeechSynthesizer::new(
            repo,
            config.pipeline.voice_priority.clone(),
            config.pipeline.sample_rate,
        )
    });
    let assembler = Arc::new(AudioAssembler::new(&config.pipeline, store.clone()));
    let meditation_service = Arc::new(MeditationService::new(
        script_repo,
        synthesizer,
        assembler,
        &config.pipeline,
    )?);

    // 3. Instantiate controllers (inject services)
    tracing::info!("Instantiating controllers...");
    let meditation_controller = Arc::new(MeditationController::new(
        meditation_service,
        SharedSecret::new(config.app_password.clone()),
    ));
    let download_controller = Arc::new(DownloadController::new(store));

    // Start HTTP server with all routes
    start_http_server(config, meditation_controller, download_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "meditation_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "meditation_backend=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
