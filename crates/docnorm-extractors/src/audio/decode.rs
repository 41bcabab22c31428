//! Audio decoding into a time-indexed mono PCM buffer.
//!
//! Any container/codec symphonia can probe is accepted, including the audio
//! track of video files. Output is 16 kHz mono so that a full window fits
//! under the transcription upload limit once re-encoded.

use std::io::Cursor;

use docnorm_core::chunking::AudioWindow;
use docnorm_core::{DocnormError, DocnormResult};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

/// Sample rate of decoded audio and of every encoded window.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Decoded mono PCM samples with their sample rate.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl DecodedAudio {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn duration_ms(&self) -> u64 {
        self.samples.len() as u64 * 1000 / self.sample_rate as u64
    }

    /// Samples covered by a window, clipped to the buffer.
    pub fn window(&self, window: &AudioWindow) -> &[f32] {
        let start = self.sample_index(window.start_ms);
        let end = self.sample_index(window.end_ms).max(start);
        &self.samples[start..end]
    }

    fn sample_index(&self, ms: u64) -> usize {
        let index = ms * self.sample_rate as u64 / 1000;
        (index as usize).min(self.samples.len())
    }
}

/// Decode an audio/video byte stream to 16 kHz mono PCM.
///
/// `extension` is a probe hint taken from the file name. Fails when no audio
/// track is found or nothing decodes.
pub fn decode_audio(data: Vec<u8>, extension: Option<&str>) -> DocnormResult<DecodedAudio> {
    let mss = MediaSourceStream::new(Box::new(Cursor::new(data)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| DocnormError::decode(format!("probe: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| DocnormError::decode("no audio track found"))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let source_rate = codec_params
        .sample_rate
        .ok_or_else(|| DocnormError::decode("unknown sample rate"))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &DecoderOptions::default())
        .map_err(|e| DocnormError::decode(format!("codec: {}", e)))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(symphonia::core::errors::Error::ResetRequired) => break,
            Err(e) => {
                return Err(DocnormError::decode(format!("packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => {
                return Err(DocnormError::decode(format!("decode: {}", e)));
            }
        };

        let spec = *decoded.spec();
        let channels = spec.channels.count();
        let num_frames = decoded.frames();
        if num_frames == 0 {
            continue;
        }

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let samples = sample_buf.samples();

        if channels > 1 {
            for frame in samples.chunks(channels) {
                let mono: f32 = frame.iter().sum::<f32>() / channels as f32;
                all_samples.push(mono);
            }
        } else {
            all_samples.extend_from_slice(samples);
        }
    }

    if all_samples.is_empty() {
        return Err(DocnormError::decode("no audio samples decoded"));
    }

    if source_rate != TARGET_SAMPLE_RATE {
        all_samples = resample(&all_samples, source_rate, TARGET_SAMPLE_RATE)?;
    }

    let audio = DecodedAudio::new(all_samples, TARGET_SAMPLE_RATE);
    tracing::debug!(
        samples = audio.samples().len(),
        duration_ms = audio.duration_ms(),
        source_rate,
        "Audio decoded to 16kHz mono PCM"
    );

    Ok(audio)
}

fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> DocnormResult<Vec<f32>> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| DocnormError::decode(format!("resampler init: {}", e)))?;

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize + chunk_size);

    for chunk in samples.chunks(chunk_size) {
        let input = if chunk.len() < chunk_size {
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            padded
        } else {
            chunk.to_vec()
        };

        let result = resampler
            .process(&[input], None)
            .map_err(|e| DocnormError::decode(format!("resample: {}", e)))?;

        if let Some(channel) = result.first() {
            output.extend_from_slice(channel);
        }
    }

    // The final chunk was zero-padded; drop the padding's output.
    let expected_len = (samples.len() as f64 * ratio) as usize;
    output.truncate(expected_len);

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_and_window_slicing() {
        let audio = DecodedAudio::new(vec![0.0; 48_000], TARGET_SAMPLE_RATE);
        assert_eq!(audio.duration_ms(), 3_000);

        let window = AudioWindow {
            index: 1,
            start_ms: 1_000,
            end_ms: 2_500,
        };
        assert_eq!(audio.window(&window).len(), 24_000);
    }

    #[test]
    fn test_window_past_end_is_clipped() {
        let audio = DecodedAudio::new(vec![0.0; 16_000], TARGET_SAMPLE_RATE);
        let window = AudioWindow {
            index: 0,
            start_ms: 500,
            end_ms: 5_000,
        };
        assert_eq!(audio.window(&window).len(), 8_000);
    }

    #[test]
    fn test_stereo_is_downmixed_per_frame() {
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: TARGET_SAMPLE_RATE,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..TARGET_SAMPLE_RATE {
            writer.write_sample(i16::MAX / 2).unwrap();
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();

        let audio = decode_audio(cursor.into_inner(), Some("wav")).unwrap();

        assert_eq!(audio.duration_ms(), 1_000);
        assert!((audio.samples()[0] - 0.25).abs() < 0.01);
    }

    #[test]
    fn test_garbage_bytes_fail_to_decode() {
        let result = decode_audio(b"definitely not audio".to_vec(), Some("mp3"));
        assert!(matches!(result, Err(DocnormError::Decode { .. })));
    }

    #[test]
    fn test_resample_halves_length() {
        let samples = vec![0.25f32; 32_000];
        let resampled = resample(&samples, 32_000, 16_000).unwrap();
        assert_eq!(resampled.len(), 16_000);
    }
}
