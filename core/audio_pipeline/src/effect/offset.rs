use std::sync::Arc;

use crate::{
    clip::{AudioClip, SampleReader, clip_id::ClipId},
    effect::AudioEffect,
};

/// Prepends `offset` samples of silence to an inner clip.
#[derive(Debug)]
pub struct Offset {
    id: ClipId,
    inner: Arc<dyn AudioClip>,
    offset: usize,
}

impl Offset {
    pub fn new(inner: Box<dyn AudioClip>, offset: usize) -> Self {
        Self {
            id: ClipId::new(),
            inner: Arc::from(inner),
            offset,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl AudioClip for Offset {
    fn id(&self) -> ClipId {
        self.id
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn len(&self) -> usize {
        self.offset + self.inner.len()
    }

    fn create_unchecked_sample_reader(&self) -> SampleReader {
        let read = self.inner.create_sample_reader();
        let offset = self.offset;
        Box::new(move |index| {
            if index < offset {
                0.0
            } else {
                read(index - offset)
            }
        })
    }

    fn clone_clip(&self) -> Box<dyn AudioClip> {
        Box::new(Self {
            id: ClipId::new(),
            inner: Arc::clone(&self.inner),
            offset: self.offset,
        })
    }
}

/// Shifts a clip later in time by `offset` samples of leading silence.
pub fn add_offset(offset: usize) -> AudioEffect {
    AudioEffect::new(move |clip| Box::new(Offset::new(clip, offset)))
}
