pub mod elevenlabs_tts_repository;
pub mod mock_script_repository;
pub mod openai_script_repository;
pub mod openai_tts_repository;
pub mod script_repository;
pub mod tts_repository;

pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use mock_script_repository::MockScriptRepository;
pub use openai_script_repository::OpenAiScriptRepository;
pub use openai_tts_repository::OpenAiTtsRepository;
pub use script_repository::ScriptRepository;
pub use tts_repository::TtsRepository;
