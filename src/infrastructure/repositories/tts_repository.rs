use async_trait::async_trait;

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (ElevenLabs, OpenAI, etc.)
///
/// Implementations are responsible for:
/// - Handling provider-specific text length limitations
/// - Resolving the voice identifier to whatever the provider expects
/// - Returning one encoded audio payload per call
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize `text` with a single voice.
    ///
    /// Returns encoded audio (MP3) ready for decoding.
    ///
    /// # Errors
    /// Returns a human-readable cause if the voice is unknown, the provider
    /// rejects the request, or the provider is unreachable. Callers decide
    /// whether to try another voice.
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, String>;

    /// Provider name used in logs.
    fn provider(&self) -> &'static str;
}
