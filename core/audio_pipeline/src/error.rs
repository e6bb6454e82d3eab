use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a clip: decoding a file or converting its rate.
#[derive(Debug, Error)]
pub enum ClipError {
    #[error("Failed to open WAV file '{}': {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("Failed to decode WAV data: {0}")]
    Decode(#[from] hound::Error),
    #[error("Unsupported WAV format: {0}")]
    UnsupportedFormat(String),
    #[error("{0}")]
    Resample(String),
}

/// Fatal failures of the frame feeding pipeline. Each variant names the stage
/// that failed; no partial output survives any of them.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Error initializing configuration: {0}")]
    Configuration(String),
    #[error("Error processing frames")]
    Processing(#[source] mfcc::MfccError),
    #[error("Error ending utterance")]
    Flush(#[source] mfcc::MfccError),
    #[error("Error processing frames: extractor reported {reported} frames with room for {capacity}")]
    FrameOverrun { reported: usize, capacity: usize },
}
