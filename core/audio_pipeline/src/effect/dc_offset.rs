use std::sync::Arc;

use log::debug;

use crate::{
    clip::{AudioClip, SampleReader, clip_id::ClipId},
    constants::DC_OFFSET_EPSILON,
    effect::AudioEffect,
};

/// Adds a constant to every sample of an inner clip.
#[derive(Debug)]
pub struct DcOffset {
    id: ClipId,
    inner: Arc<dyn AudioClip>,
    offset: f32,
}

impl DcOffset {
    pub fn new(inner: Box<dyn AudioClip>, offset: f32) -> Self {
        Self {
            id: ClipId::new(),
            inner: Arc::from(inner),
            offset,
        }
    }
}

impl AudioClip for DcOffset {
    fn id(&self) -> ClipId {
        self.id
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn create_unchecked_sample_reader(&self) -> SampleReader {
        let read = self.inner.create_sample_reader();
        let offset = self.offset;
        Box::new(move |index| read(index) + offset)
    }

    fn clone_clip(&self) -> Box<dyn AudioClip> {
        Box::new(Self {
            id: ClipId::new(),
            inner: Arc::clone(&self.inner),
            offset: self.offset,
        })
    }
}

/// Mean sample value of a clip; zero for an empty clip.
pub fn dc_offset(clip: &dyn AudioClip) -> f32 {
    if clip.is_empty() {
        return 0.0;
    }
    let sum: f64 = clip.samples().map(f64::from).sum();
    (sum / clip.len() as f64) as f32
}

pub fn add_dc_offset(offset: f32) -> AudioEffect {
    AudioEffect::new(move |clip| Box::new(DcOffset::new(clip, offset)))
}

/// Centers a clip around zero. The mean is measured once, when the effect is
/// applied; offsets below 16-bit resolution leave the clip unwrapped.
pub fn remove_dc_offset() -> AudioEffect {
    AudioEffect::new(|clip| {
        let offset = dc_offset(clip.as_ref());
        if offset.abs() < DC_OFFSET_EPSILON {
            return clip;
        }
        debug!("Removing DC offset of {offset} from clip {}", clip.id());
        Box::new(DcOffset::new(clip, -offset))
    })
}
