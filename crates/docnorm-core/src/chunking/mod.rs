//! Audio window planning for chunked transcription.
//!
//! Whether an asset is chunked depends only on its byte size. When it is,
//! the whole window sequence is planned up front from the decoded duration.
//! Windows are fixed-length, consecutive windows overlap, and the last one
//! is clipped to the asset's end.

use serde::{Deserialize, Serialize};

use crate::error::{DocnormError, DocnormResult};

/// Assets larger than this many bytes are split before transcription.
pub const SIZE_THRESHOLD_BYTES: u64 = 25 * 1024 * 1024;

/// Nominal window length (10 minutes).
pub const WINDOW_LENGTH_MS: u64 = 10 * 60 * 1000;

/// Overlap between consecutive windows (30 seconds).
pub const OVERLAP_MS: u64 = 30 * 1000;

/// A time range `[start_ms, end_ms)` of an audio asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioWindow {
    /// Position in the window sequence.
    pub index: usize,
    pub start_ms: u64,
    pub end_ms: u64,
}

impl AudioWindow {
    pub fn duration_ms(&self) -> u64 {
        self.end_ms - self.start_ms
    }
}

/// Size threshold and window geometry for chunked transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingPolicy {
    size_threshold_bytes: u64,
    window_length_ms: u64,
    overlap_ms: u64,
}

impl Default for ChunkingPolicy {
    fn default() -> Self {
        Self {
            size_threshold_bytes: SIZE_THRESHOLD_BYTES,
            window_length_ms: WINDOW_LENGTH_MS,
            overlap_ms: OVERLAP_MS,
        }
    }
}

impl ChunkingPolicy {
    /// Create a policy; the overlap must be shorter than the window.
    pub fn new(
        size_threshold_bytes: u64,
        window_length_ms: u64,
        overlap_ms: u64,
    ) -> DocnormResult<Self> {
        if window_length_ms == 0 || overlap_ms >= window_length_ms {
            return Err(DocnormError::Configuration(format!(
                "window length ({} ms) must be positive and longer than the overlap ({} ms)",
                window_length_ms, overlap_ms
            )));
        }

        Ok(Self {
            size_threshold_bytes,
            window_length_ms,
            overlap_ms,
        })
    }

    pub fn size_threshold_bytes(&self) -> u64 {
        self.size_threshold_bytes
    }

    pub fn window_length_ms(&self) -> u64 {
        self.window_length_ms
    }

    pub fn overlap_ms(&self) -> u64 {
        self.overlap_ms
    }

    /// Distance between consecutive window starts.
    pub fn stride_ms(&self) -> u64 {
        self.window_length_ms - self.overlap_ms
    }

    /// Whether an asset of this size must be split.
    pub fn requires_chunking(&self, size_bytes: u64) -> bool {
        size_bytes > self.size_threshold_bytes
    }

    /// Plan every window covering `[0, duration_ms)`.
    ///
    /// Window `i` starts at `i * stride`; the count is
    /// `ceil(duration_ms / stride)`. A zero duration yields no windows.
    pub fn plan(&self, duration_ms: u64) -> Vec<AudioWindow> {
        (0..duration_ms)
            .step_by(self.stride_ms() as usize)
            .enumerate()
            .map(|(index, start_ms)| AudioWindow {
                index,
                start_ms,
                end_ms: (start_ms + self.window_length_ms).min(duration_ms),
            })
            .collect()
    }
}
