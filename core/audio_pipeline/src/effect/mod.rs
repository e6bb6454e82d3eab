use std::fmt;

use crate::clip::AudioClip;

pub mod dc_offset;
pub mod offset;
pub mod resample;

pub use dc_offset::{DcOffset, add_dc_offset, remove_dc_offset};
pub use offset::{Offset, add_offset};
pub use resample::{SampleRateConverter, resample};

type Transform = dyn FnOnce(Box<dyn AudioClip>) -> Box<dyn AudioClip> + Send;

/// Wraps an owned clip into a new owned clip.
///
/// Effects never touch the clip they are given; they only decide how the
/// resulting clip reads from it. Chains apply left to right.
pub struct AudioEffect(Box<Transform>);

impl AudioEffect {
    pub fn new(
        transform: impl FnOnce(Box<dyn AudioClip>) -> Box<dyn AudioClip> + Send + 'static,
    ) -> Self {
        Self(Box::new(transform))
    }

    /// Returns the clip unchanged.
    pub fn identity() -> Self {
        Self::new(|clip| clip)
    }

    pub fn apply(self, clip: Box<dyn AudioClip>) -> Box<dyn AudioClip> {
        (self.0)(clip)
    }

    /// `self` followed by `next`.
    pub fn then(self, next: Self) -> Self {
        Self::new(move |clip| next.apply(self.apply(clip)))
    }
}

impl fmt::Debug for AudioEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioEffect").finish_non_exhaustive()
    }
}

/// Folds `effects` over `clip` in order.
pub fn apply_effects(
    clip: Box<dyn AudioClip>,
    effects: impl IntoIterator<Item = AudioEffect>,
) -> Box<dyn AudioClip> {
    effects
        .into_iter()
        .fold(clip, |clip, effect| effect.apply(clip))
}

/// Method-call form of effect application:
/// `clip.pipe(resample(16_000)).pipe(add_offset(120))`.
pub trait ClipExt {
    fn pipe(self, effect: AudioEffect) -> Box<dyn AudioClip>;
}

impl ClipExt for Box<dyn AudioClip> {
    fn pipe(self, effect: AudioEffect) -> Box<dyn AudioClip> {
        effect.apply(self)
    }
}

impl<C: AudioClip + 'static> ClipExt for C {
    fn pipe(self, effect: AudioEffect) -> Box<dyn AudioClip> {
        effect.apply(Box::new(self))
    }
}
