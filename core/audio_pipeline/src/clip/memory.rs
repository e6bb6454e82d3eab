use std::sync::Arc;

use crate::clip::{AudioClip, SampleReader, clip_id::ClipId};

/// A leaf clip backed by decoded samples held in memory.
///
/// The sample buffer is shared between clones, which is safe because it is
/// never written after construction.
#[derive(Debug)]
pub struct MemoryClip {
    id: ClipId,
    sample_rate: u32,
    samples: Arc<[f32]>,
}

impl MemoryClip {
    /// # Panics
    /// Panics if `sample_rate` is zero.
    pub fn new(sample_rate: u32, samples: impl Into<Arc<[f32]>>) -> Self {
        assert!(sample_rate > 0, "sample rate must be positive");
        Self {
            id: ClipId::new(),
            sample_rate,
            samples: samples.into(),
        }
    }

    pub fn from_fn(sample_rate: u32, len: usize, f: impl FnMut(usize) -> f32) -> Self {
        Self::new(sample_rate, (0..len).map(f).collect::<Vec<_>>())
    }

    pub fn silence(sample_rate: u32, len: usize) -> Self {
        Self::new(sample_rate, vec![0.0; len])
    }

    /// Copy sharing the same samples under a new identity.
    pub(crate) fn duplicate(&self) -> Self {
        Self {
            id: ClipId::new(),
            sample_rate: self.sample_rate,
            samples: Arc::clone(&self.samples),
        }
    }
}

impl AudioClip for MemoryClip {
    fn id(&self) -> ClipId {
        self.id
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn len(&self) -> usize {
        self.samples.len()
    }

    fn create_unchecked_sample_reader(&self) -> SampleReader {
        let samples = Arc::clone(&self.samples);
        Box::new(move |index| samples[index])
    }

    fn clone_clip(&self) -> Box<dyn AudioClip> {
        Box::new(self.duplicate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_fn_generates_every_index() {
        let clip = MemoryClip::from_fn(16_000, 5, |i| i as f32 / 10.0);
        assert_eq!(clip.len(), 5);
        assert_eq!(clip.sample_rate(), 16_000);
        assert_eq!(clip.samples().collect::<Vec<_>>(), vec![0.0, 0.1, 0.2, 0.3, 0.4]);
    }

    #[test]
    fn clone_outlives_original() {
        let original = MemoryClip::from_fn(22_050, 100, |i| (i as f32).cos());
        let expected: Vec<f32> = original.samples().collect();
        let copy = original.clone_clip();
        let original_id = original.id();
        drop(original);

        assert_ne!(copy.id(), original_id);
        assert_eq!(copy.sample_rate(), 22_050);
        assert_eq!(copy.samples().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn silence_is_all_zeros() {
        let clip = MemoryClip::silence(8_000, 16);
        assert!(clip.samples().all(|s| s == 0.0));
        assert!(!clip.is_empty());
        assert!(MemoryClip::silence(8_000, 0).is_empty());
    }

    #[test]
    #[should_panic(expected = "sample rate must be positive")]
    fn zero_sample_rate_panics() {
        let _ = MemoryClip::silence(0, 4);
    }
}
