use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MfccError {
    #[error("invalid extractor configuration: {0}")]
    InvalidConfig(String),
    /// The output buffer does not hold a whole, non-zero number of frames.
    #[error("output buffer of {len} values cannot hold {vector_size}-value frames")]
    OutputSize { len: usize, vector_size: usize },
    #[error("no utterance in progress")]
    UtteranceNotStarted,
}
