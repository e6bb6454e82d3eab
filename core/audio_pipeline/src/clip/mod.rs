use std::{fmt, iter::FusedIterator};

use crate::clip::clip_id::ClipId;

pub mod clip_id;
pub mod memory;
pub mod wav;

/// Maps a sample index to an amplitude. Readers are pure: any index may be
/// read any number of times, in any order.
pub type SampleReader = Box<dyn Fn(usize) -> f32 + Send + Sync>;

/// An immutable, lazily evaluated mono signal.
///
/// Derived clips wrap an inner clip and compute their samples on demand from
/// the inner clip's reader, so a chain of effects never materializes
/// intermediate buffers.
pub trait AudioClip: Send + Sync + fmt::Debug {
    fn id(&self) -> ClipId;

    /// Sampling frequency in Hz, always positive.
    fn sample_rate(&self) -> u32;

    /// Number of valid sample indices.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Builds a reader that is only defined for indices in `0..self.len()`.
    /// Reading past the end may panic or return any value.
    fn create_unchecked_sample_reader(&self) -> SampleReader;

    /// Builds a reader that returns silence for indices past the end.
    fn create_sample_reader(&self) -> SampleReader {
        let read = self.create_unchecked_sample_reader();
        let len = self.len();
        Box::new(move |index| if index < len { read(index) } else { 0.0 })
    }

    /// Duplicates the clip graph under a fresh identity. The copy reads
    /// exactly like the original and outlives it.
    fn clone_clip(&self) -> Box<dyn AudioClip>;

    /// Iterates over every sample in order.
    fn samples(&self) -> Samples {
        Samples {
            read: self.create_sample_reader(),
            index: 0,
            len: self.len(),
        }
    }
}

impl Clone for Box<dyn AudioClip> {
    fn clone(&self) -> Self {
        self.clone_clip()
    }
}

/// Sequential iterator over a clip's samples.
pub struct Samples {
    read: SampleReader,
    index: usize,
    len: usize,
}

impl fmt::Debug for Samples {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Samples")
            .field("index", &self.index)
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl Iterator for Samples {
    type Item = f32;

    fn next(&mut self) -> Option<f32> {
        if self.index >= self.len {
            return None;
        }
        let sample = (self.read)(self.index);
        self.index += 1;
        Some(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.len - self.index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Samples {}

impl FusedIterator for Samples {}

/// Quantizes a normalized sample to 16-bit PCM, clamping to `[-1, 1]`.
pub fn to_i16_sample(sample: f32) -> i16 {
    let sample = sample.clamp(-1.0, 1.0);
    if sample < 0.0 {
        (sample * 32_768.0) as i16
    } else {
        (sample * 32_767.0) as i16
    }
}
