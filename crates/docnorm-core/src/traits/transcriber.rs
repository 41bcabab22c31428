//! Transcriber trait - the speech-to-text collaborator.

use async_trait::async_trait;

use crate::error::DocnormResult;

/// Model identifier requested from every transcription backend.
pub const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Maps a named audio buffer to recognized text.
///
/// The file name matters: backends infer the container format from its
/// extension.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe one audio buffer.
    async fn transcribe(&self, file_name: &str, audio: Vec<u8>) -> DocnormResult<String>;

    /// Get the model name.
    fn model_name(&self) -> &str;
}
