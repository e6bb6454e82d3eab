use log::{debug, error};
use rubato::{
    Resampler as _, SincFixedIn, SincInterpolationParameters, SincInterpolationType,
    WindowFunction,
};

use crate::{
    clip::{AudioClip, SampleReader, clip_id::ClipId, memory::MemoryClip},
    effect::AudioEffect,
    error::ClipError,
};

/// Input frames handed to the sinc resampler per call.
const RESAMPLER_CHUNK_SIZE: usize = 1024;

/// An inner clip converted to another sample rate.
///
/// Conversion runs once, at construction, through a band-limited sinc
/// resampler, so content above the new Nyquist frequency is filtered out
/// instead of folding back into the band. The output is shifted by the
/// resampler's delay so sample `i` lines up with input time `i / sample_rate`.
#[derive(Debug)]
pub struct SampleRateConverter {
    id: ClipId,
    source_rate: u32,
    buffer: MemoryClip,
}

impl SampleRateConverter {
    /// Reads `inner` to the end and converts it to `sample_rate`. The result
    /// holds `round(len * sample_rate / source_rate)` samples.
    ///
    /// # Panics
    /// Panics if `sample_rate` is zero.
    pub fn new(inner: &dyn AudioClip, sample_rate: u32) -> Result<Self, ClipError> {
        assert!(sample_rate > 0, "target sample rate must be positive");
        let source_rate = inner.sample_rate();
        let ratio = f64::from(sample_rate) / f64::from(source_rate);
        let len = (inner.len() as f64 * ratio).round() as usize;

        let input: Vec<f32> = inner.samples().collect();
        let samples = if source_rate == sample_rate {
            input
        } else {
            sinc_resample(&input, ratio, len)?
        };
        debug!(
            "Resampled clip {} from {source_rate} Hz to {sample_rate} Hz ({} -> {len} samples)",
            inner.id(),
            inner.len()
        );

        Ok(Self {
            id: ClipId::new(),
            source_rate,
            buffer: MemoryClip::new(sample_rate, samples),
        })
    }

    /// Sample rate of the clip this one was converted from.
    pub fn source_rate(&self) -> u32 {
        self.source_rate
    }
}

impl AudioClip for SampleRateConverter {
    fn id(&self) -> ClipId {
        self.id
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
            id: ClipId::new(),
            source_rate: self.source_rate,
            buffer: self.buffer.duplicate(),
        })
    }
}

/// Runs `input` through a mono sinc resampler and returns `len` output samples
/// with the filter delay removed. Missing input past the end reads as silence.
fn sinc_resample(input: &[f32], ratio: f64, len: usize) -> Result<Vec<f32>, ClipError> {
    if len == 0 {
        return Ok(Vec::new());
    }

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 1.0, params, RESAMPLER_CHUNK_SIZE, 1)
        .map_err(|err| ClipError::Resample(format!("Failed to create resampler: {err}")))?;

    let delay = resampler.output_delay();
    let mut output = Vec::with_capacity(delay + len + resampler.output_frames_max());
    let mut chunk = vec![0.0; RESAMPLER_CHUNK_SIZE];
    let mut position = 0;
    while output.len() < delay + len {
        chunk.fill(0.0);
        if position < input.len() {
            let end = (position + RESAMPLER_CHUNK_SIZE).min(input.len());
            chunk[..end - position].copy_from_slice(&input[position..end]);
        }
        position += RESAMPLER_CHUNK_SIZE;

        let frames = resampler
            .process(std::slice::from_ref(&chunk), None)
            .map_err(|err| ClipError::Resample(format!("Resampling failed: {err}")))?;
        if let Some(channel) = frames.first() {
            output.extend_from_slice(channel);
        }
    }

    output.drain(..delay);
    output.truncate(len);
    Ok(output)
}

/// Converts a clip to `sample_rate`. Clips already at that rate pass through.
///
/// A clip the resampler rejects is returned as is; the rate mismatch then
/// surfaces wherever the rate is checked.
pub fn resample(sample_rate: u32) -> AudioEffect {
    AudioEffect::new(move |clip| {
        if clip.sample_rate() == sample_rate {
            return clip;
        }
        match SampleRateConverter::new(clip.as_ref(), sample_rate) {
            Ok(converter) => Box::new(converter),
            Err(err) => {
                error!("Keeping clip at {} Hz: {err}", clip.sample_rate());
                clip
            }
        }
    })
}
