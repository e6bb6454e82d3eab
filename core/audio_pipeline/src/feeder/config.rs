use mfcc::MfccConfig;

use crate::{clip::AudioClip, constants::DEFAULT_CHUNK_SIZE, error::PipelineError};

/// Extractor parameters plus the chunking used to feed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeederConfig {
    pub mfcc: MfccConfig,
    /// Samples per extractor call. Affects performance only.
    pub chunk_size: usize,
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            mfcc: MfccConfig::default(),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl FeederConfig {
    pub fn frame_shift(&self) -> usize {
        self.mfcc.frame_shift()
    }

    pub fn window_samples(&self) -> usize {
        self.mfcc.frame_size()
    }

    /// Leading silence that centers the first analysis window on the start
    /// of the signal: `(round(window_length * sample_rate) - frame_shift) / 2`.
    ///
    /// `round` goes half away from zero and the halving truncates, so a
    /// 401-sample window with a 160-sample shift gives 120. Windows shorter
    /// than the shift give 0.
    pub fn alignment_offset(&self) -> usize {
        self.window_samples().saturating_sub(self.frame_shift()) / 2
    }

    /// `floor(frame_rate * len / sample_rate)` for the clip being fed.
    pub fn expected_frame_count(&self, clip: &dyn AudioClip) -> usize {
        let frames =
            u64::from(self.mfcc.frame_rate) * clip.len() as u64 / u64::from(clip.sample_rate());
        frames as usize
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        self.mfcc
            .validate()
            .map_err(|err| PipelineError::Configuration(err.to_string()))?;
        if self.chunk_size == 0 {
            return Err(PipelineError::Configuration(
                "chunk size must be positive".to_owned(),
            ));
        }
        Ok(())
    }
}
