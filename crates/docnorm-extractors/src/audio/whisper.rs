//! OpenAI Whisper transcription backend using async-openai.

use async_openai::{
    config::OpenAIConfig,
    types::{AudioInput, CreateTranscriptionRequestArgs},
    Client,
};
use async_trait::async_trait;

use docnorm_core::{DocnormError, DocnormResult, Transcriber, TranscriptionConfig};

/// Whisper transcriber for the `/audio/transcriptions` endpoint.
pub struct WhisperTranscriber {
    client: Client<OpenAIConfig>,
    model: String,
}

impl WhisperTranscriber {
    /// Create a transcriber from explicit configuration.
    pub fn new(config: TranscriptionConfig) -> Self {
        let openai_config = if let Some(ref base_url) = config.base_url {
            OpenAIConfig::new()
                .with_api_key(config.api_key.clone())
                .with_api_base(base_url)
        } else {
            OpenAIConfig::new().with_api_key(config.api_key.clone())
        };

        Self {
            client: Client::with_config(openai_config),
            model: config.model,
        }
    }

    /// Create a transcriber from `OPENAI_API_KEY` / `OPENAI_BASE_URL`.
    pub fn from_env() -> DocnormResult<Self> {
        Ok(Self::new(TranscriptionConfig::from_env()?))
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, file_name: &str, audio: Vec<u8>) -> DocnormResult<String> {
        let bytes = audio.len();
        let request = CreateTranscriptionRequestArgs::default()
            .file(AudioInput::from_vec_u8(file_name.to_string(), audio))
            .model(self.model.clone())
            .build()
            .map_err(|e| DocnormError::transcription(format!("invalid request: {}", e)))?;

        tracing::debug!(model = %self.model, file_name, bytes, "Sending audio to Whisper API");

        let response = self
            .client
            .audio()
            .transcribe(request)
            .await
            .map_err(|e| DocnormError::transcription(format!("OpenAI API error: {}", e)))?;

        Ok(response.text)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
