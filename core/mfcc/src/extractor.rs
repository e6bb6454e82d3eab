use crate::error::MfccError;

/// Result of one [`FrameExtractor::process_frames`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessedFrames {
    /// Frames written to the front of the output buffer.
    pub frames: usize,
    /// Input samples taken from the front of the input slice.
    pub consumed: usize,
}

/// A stateful, frame-based feature extractor fed with a sample stream.
///
/// Output buffers are flat: a buffer of `n * cepstrum_size()` values holds
/// `n` frames.
pub trait FrameExtractor {
    /// Values per emitted frame.
    fn cepstrum_size(&self) -> usize;

    /// Resets all state carried between utterances.
    fn start_stream(&mut self);

    fn start_utterance(&mut self) -> Result<(), MfccError>;

    /// Consumes samples until the input is exhausted or `output` is full.
    /// Samples that do not complete a frame stay buffered for the next call.
    fn process_frames(
        &mut self,
        samples: &[i16],
        output: &mut [f32],
    ) -> Result<ProcessedFrames, MfccError>;

    /// Ends the utterance, turning any buffered tail into one final frame.
    /// Returns the number of frames written (0 or 1).
    fn end_utterance(&mut self, output: &mut [f32]) -> Result<usize, MfccError>;
}

impl<E: FrameExtractor + ?Sized> FrameExtractor for &mut E {
    fn cepstrum_size(&self) -> usize {
        (**self).cepstrum_size()
    }

    fn start_stream(&mut self) {
        (**self).start_stream();
    }

    fn start_utterance(&mut self) -> Result<(), MfccError> {
        (**self).start_utterance()
    }

    fn process_frames(
        &mut self,
        samples: &[i16],
        output: &mut [f32],
    ) -> Result<ProcessedFrames, MfccError> {
        (**self).process_frames(samples, output)
    }

    fn end_utterance(&mut self, output: &mut [f32]) -> Result<usize, MfccError> {
        (**self).end_utterance(output)
    }
}
