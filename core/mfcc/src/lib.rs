//! Streaming mel-frequency cepstral coefficient extraction.
//!
//! [`StreamingMfcc`] accepts 16-bit samples in arbitrarily sized pieces,
//! buffers partial analysis windows between calls and emits one cepstral
//! vector per completed frame. The [`FrameExtractor`] trait is the seam the
//! audio pipeline drives.

pub mod config;
pub mod error;
pub mod extractor;
mod spectrum;
pub mod streaming;

pub use config::MfccConfig;
pub use error::MfccError;
pub use extractor::{FrameExtractor, ProcessedFrames};
pub use streaming::StreamingMfcc;
