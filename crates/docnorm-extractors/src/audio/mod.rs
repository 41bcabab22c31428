//! Audio transcription with size-driven chunking.
//!
//! Small assets go to the transcriber untouched. Assets over the size
//! threshold are decoded, split into overlapping windows, re-encoded as WAV
//! and transcribed one window at a time, in order.

mod decode;
mod encode;
mod whisper;

pub use decode::{decode_audio, DecodedAudio, TARGET_SAMPLE_RATE};
pub use encode::encode_wav;
pub use whisper::WhisperTranscriber;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use docnorm_core::chunking::ChunkingPolicy;
use docnorm_core::{DocnormError, DocnormResult, Extractor, Segment, Transcriber};
use serde::Deserialize;

use crate::ExtractorKind;

/// The audio extractor takes no options.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AudioOptions {}

/// Speech-to-text extractor for audio and video files.
///
/// Without an injected transcriber, a Whisper client is built from the
/// environment for each call and dropped when the call returns.
#[derive(Clone, Default)]
pub struct AudioExtractor {
    transcriber: Option<Arc<dyn Transcriber>>,
    policy: ChunkingPolicy,
}

impl AudioExtractor {
    /// Create an audio extractor that uses Whisper.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific transcriber instead of Whisper.
    pub fn with_transcriber(mut self, transcriber: Arc<dyn Transcriber>) -> Self {
        self.transcriber = Some(transcriber);
        self
    }

    /// Override the size threshold and window geometry.
    pub fn with_policy(mut self, policy: ChunkingPolicy) -> Self {
        self.policy = policy;
        self
    }

    fn acquire_transcriber(&self) -> DocnormResult<Arc<dyn Transcriber>> {
        match &self.transcriber {
            Some(transcriber) => Ok(Arc::clone(transcriber)),
            None => Ok(Arc::new(WhisperTranscriber::from_env()?)),
        }
    }
}

#[async_trait]
impl Extractor for AudioExtractor {
    #[tracing::instrument(skip(self, options), fields(extractor = self.name()))]
    async fn extract(
        &self,
        source: &str,
        options: &serde_json::Value,
    ) -> DocnormResult<Vec<Segment>> {
        let _: AudioOptions = docnorm_core::parse_options(self.name(), options)?;
        let transcriber = self.acquire_transcriber()?;

        let segments = transcribe(Path::new(source), transcriber.as_ref(), &self.policy).await?;

        tracing::info!(segments = segments.len(), "Audio transcription completed");
        Ok(segments)
    }

    fn name(&self) -> &str {
        ExtractorKind::Audio.as_str()
    }
}

/// Transcribe an audio/video file into one segment per window.
///
/// The size check happens once. Windows are planned completely before the
/// first upload, sent strictly in order, and any window failure aborts the
/// whole call.
pub async fn transcribe(
    path: &Path,
    transcriber: &dyn Transcriber,
    policy: &ChunkingPolicy,
) -> DocnormResult<Vec<Segment>> {
    let size_bytes = tokio::fs::metadata(path).await?.len();
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("audio")
        .to_string();

    if !policy.requires_chunking(size_bytes) {
        tracing::debug!(size_bytes, "Transcribing file in a single request");
        let audio = tokio::fs::read(path).await?;
        let text = transcriber.transcribe(&file_name, audio).await?;
        return Ok(vec![Segment::from(text)]);
    }

    let data = tokio::fs::read(path).await?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_string);
    let audio =
        tokio::task::spawn_blocking(move || decode_audio(data, extension.as_deref())).await??;

    let windows = policy.plan(audio.duration_ms());
    if windows.is_empty() {
        return Err(DocnormError::decode("zero-duration audio"));
    }
    tracing::debug!(
        size_bytes,
        duration_ms = audio.duration_ms(),
        windows = windows.len(),
        "Asset exceeds size threshold, transcribing in windows"
    );

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");

    let mut segments = Vec::with_capacity(windows.len());
    for window in &windows {
        let wav = encode_wav(audio.window(window), audio.sample_rate())?;
        let chunk_name = format!("chunk_{}_{}.wav", window.index, stem);

        let text = transcriber
            .transcribe(&chunk_name, wav)
            .await
            .map_err(|e| e.in_window(window.index))?;

        tracing::debug!(
            window = window.index,
            start_ms = window.start_ms,
            end_ms = window.end_ms,
            "Window transcribed"
        );
        segments.push(Segment::from(text));
    }

    Ok(segments)
}
