use std::{io::Read, path::Path};

use hound::{SampleFormat, WavReader};
use log::debug;

use crate::{
    clip::{AudioClip, SampleReader, clip_id::ClipId, memory::MemoryClip},
    error::ClipError,
};

/// `WavClip` is a leaf clip decoded from a RIFF/WAVE stream.
///
/// Supports:
/// - Integer PCM of any bit depth up to 32, normalized by `2^(bits - 1)`
/// - 32-bit float PCM, taken as is
/// - Any number of channels, downmixed to mono by averaging each frame
///
/// # Example
/// ```no_run
/// use audio_pipeline::clip::{AudioClip, wav::WavClip};
///
/// let clip = WavClip::from_file("speech.wav").unwrap();
/// println!("{} samples at {} Hz", clip.len(), clip.sample_rate());
/// ```
#[derive(Debug)]
pub struct WavClip {
    /// file name
    name: String,
    buffer: MemoryClip,
}

impl WavClip {
    fn from_reader<R: Read>(reader: WavReader<R>, name: &str) -> Result<Self, ClipError> {
        let spec = reader.spec();
        if spec.channels == 0 {
            return Err(ClipError::UnsupportedFormat("no audio channels".to_owned()));
        }
        if spec.sample_rate == 0 {
            return Err(ClipError::UnsupportedFormat("zero sample rate".to_owned()));
        }

        let samples = Self::decode_mono_samples(reader)?;
        debug!(
            "Decoded '{name}': {} samples at {} Hz from {} channel(s)",
            samples.len(),
            spec.sample_rate,
            spec.channels
        );
        Ok(Self {
            name: name.to_owned(),
            buffer: MemoryClip::new(spec.sample_rate, samples),
        })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ClipError> {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let reader = WavReader::open(path).map_err(|source| ClipError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(reader, &name)
    }

    pub fn from_stream<R: Read>(stream: R) -> Result<Self, ClipError> {
        let reader = WavReader::new(stream)?;
        Self::from_reader(reader, "stream")
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn decode_mono_samples<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>, ClipError> {
        let spec = reader.spec();
        let interleaved = match spec.sample_format {
            SampleFormat::Int => {
                let scale = 1.0 / 2.0_f64.powi(i32::from(spec.bits_per_sample) - 1);
                reader
                    .into_samples::<i32>()
                    .map(|s| s.map(|v| (f64::from(v) * scale) as f32))
                    .collect::<Result<Vec<f32>, _>>()?
            }
            SampleFormat::Float => reader
                .into_samples::<f32>()
                .collect::<Result<Vec<f32>, _>>()?,
        };

        Ok(Self::downmix(&interleaved, usize::from(spec.channels)))
    }

    /// Averages interleaved frames into one channel. A trailing partial frame
    /// is dropped.
    fn downmix(samples: &[f32], channels: usize) -> Vec<f32> {
        if channels == 1 {
            return samples.to_vec();
        }
        samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    }
}

impl AudioClip for WavClip {
    fn id(&self) -> ClipId {
        self.buffer.id()
    }

    fn sample_rate(&self) -> u32 {
        self.buffer.sample_rate()
    }

    fn len(&self) -> usize {
        self.buffer.len()
    }

    fn create_unchecked_sample_reader(&self) -> SampleReader {
        self.buffer.create_unchecked_sample_reader()
    }

    fn clone_clip(&self) -> Box<dyn AudioClip> {
        Box::new(Self {
            name: self.name.clone(),
            buffer: self.buffer.duplicate(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::constants::AUDIO_SAMPLE_EPSILON;

    use super::*;
    use hound::WavSpec;
    use std::io::Cursor;

    fn create_wav_buffer(spec: WavSpec, samples: &[i16]) -> Cursor<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        buffer.set_position(0);
        buffer
    }

    fn int_spec(channels: u16) -> WavSpec {
        WavSpec {
            channels,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        }
    }

    #[test]
    fn test_mono_wav_is_normalized() {
        let buffer = create_wav_buffer(int_spec(1), &[16384, -32768, 0]);
        let clip = WavClip::from_stream(buffer).unwrap();

        assert_eq!(clip.len(), 3);
        assert_eq!(clip.sample_rate(), 44100);
        assert_eq!(clip.name(), "stream");
        let samples: Vec<f32> = clip.samples().collect();
        assert!((samples[0] - 0.5).abs() < AUDIO_SAMPLE_EPSILON);
        assert!((samples[1] + 1.0).abs() < AUDIO_SAMPLE_EPSILON);
        assert_eq!(samples[2], 0.0);
    }

    #[test]
    fn test_stereo_wav_is_downmixed() {
        let buffer = create_wav_buffer(int_spec(2), &[16384, 0, -16384, -16384]);
        let clip = WavClip::from_stream(buffer).unwrap();

        assert_eq!(clip.len(), 2);
        let samples: Vec<f32> = clip.samples().collect();
        assert!((samples[0] - 0.25).abs() < AUDIO_SAMPLE_EPSILON);
        assert!((samples[1] + 0.5).abs() < AUDIO_SAMPLE_EPSILON);
    }

    #[test]
    fn test_three_channels_are_averaged() {
        let buffer = create_wav_buffer(int_spec(3), &[3000, 6000, 9000, 0, 0, 0]);
        let clip = WavClip::from_stream(buffer).unwrap();

        assert_eq!(clip.len(), 2);
        let samples: Vec<f32> = clip.samples().collect();
        assert!((samples[0] - 6000.0 / 32768.0).abs() < AUDIO_SAMPLE_EPSILON);
        assert_eq!(samples[1], 0.0);
    }

    #[test]
    fn test_float_wav_is_taken_as_is() {
        let spec = WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = hound::WavWriter::new(&mut buffer, spec).unwrap();
        for s in [0.125f32, -0.75] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
        buffer.set_position(0);

        let clip = WavClip::from_stream(buffer).unwrap();
        assert_eq!(clip.samples().collect::<Vec<_>>(), vec![0.125, -0.75]);
    }

    #[test]
    fn test_returns_silence_after_end_of_file() {
        let buffer = create_wav_buffer(int_spec(1), &[2000]);
        let clip = WavClip::from_stream(buffer).unwrap();

        let read = clip.create_sample_reader();
        assert_ne!(read(0), 0.0); // actual sample
        assert_eq!(read(1), 0.0); // padded silence
        assert_eq!(read(2), 0.0);
    }

    #[test]
    fn test_garbage_stream_should_fail() {
        let result = WavClip::from_stream(Cursor::new(b"not a wave file".to_vec()));
        assert!(matches!(result, Err(ClipError::Decode(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = WavClip::from_file("does/not/exist.wav").unwrap_err();
        assert!(matches!(err, ClipError::Open { .. }));
        assert!(err.to_string().contains("exist.wav"));
    }

    #[test]
    fn test_clone_has_new_identity() {
        let buffer = create_wav_buffer(int_spec(1), &[100, 200, 300]);
        let clip = WavClip::from_stream(buffer).unwrap();
        let copy = clip.clone_clip();

        assert_ne!(copy.id(), clip.id());
        assert_eq!(
            copy.samples().collect::<Vec<_>>(),
            clip.samples().collect::<Vec<_>>()
        );
    }
}
