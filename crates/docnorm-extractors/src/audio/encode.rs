//! WAV encoding of PCM windows for upload.

use std::io::Cursor;

use docnorm_core::{DocnormError, DocnormResult};

/// Encode mono f32 samples as 16-bit PCM WAV bytes.
pub fn encode_wav(samples: &[f32], sample_rate: u32) -> DocnormResult<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::with_capacity(44 + samples.len() * 2));
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec)
            .map_err(|e| DocnormError::decode(format!("wav header: {}", e)))?;

        for &sample in samples {
            let value = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            writer
                .write_sample(value)
                .map_err(|e| DocnormError::decode(format!("wav sample: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| DocnormError::decode(format!("wav finalize: {}", e)))?;
    }

    Ok(cursor.into_inner())
}
