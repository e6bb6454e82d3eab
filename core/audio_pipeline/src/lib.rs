//! Audio preprocessing front end for frame-based speech features.
//!
//! A signal is modelled as a graph of lazily evaluated [`clip::AudioClip`]s.
//! [`effect::AudioEffect`]s wrap one clip into another (resampling, DC offset
//! removal, leading silence), and the [`feeder::StreamingFrameFeeder`] streams
//! the finished clip through an [`mfcc::FrameExtractor`] in 16-bit chunks,
//! collecting exactly one coefficient vector per frame.

pub mod clip;
pub mod constants;
pub mod effect;
pub mod error;
pub mod feeder;

pub use error::{ClipError, PipelineError};
