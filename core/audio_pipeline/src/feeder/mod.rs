use log::{debug, info, warn};
use mfcc::{FrameExtractor, StreamingMfcc};

use crate::{
    clip::{AudioClip, to_i16_sample},
    effect::{ClipExt, add_offset, remove_dc_offset, resample},
    error::PipelineError,
};

pub mod config;
pub mod frames;
pub mod progress;

pub use config::FeederConfig;
pub use frames::CoefficientFrames;
pub use progress::{LogProgressSink, NullProgressSink, ProgressSink};

/// Drives a [`FrameExtractor`] over one finished clip.
///
/// The output holds exactly `frame_rate * len / sample_rate` vectors. The
/// clip is quantized to 16 bits and fed in chunks; every call tells the
/// extractor how many output slots remain, and a clip whose frames run short
/// gets one more vector from the end-of-utterance flush of the buffered tail.
#[derive(Debug)]
pub struct StreamingFrameFeeder<E> {
    config: FeederConfig,
    extractor: E,
}

impl<E: FrameExtractor> StreamingFrameFeeder<E> {
    pub fn new(config: FeederConfig, extractor: E) -> Self {
        Self { config, extractor }
    }

    /// Feeds `clip` through the extractor once, start to end.
    ///
    /// Consumes the feeder: the extractor and its buffered state are dropped
    /// when this returns, whether it succeeded or not.
    pub fn feed(
        mut self,
        clip: &dyn AudioClip,
        progress: &mut dyn ProgressSink,
    ) -> Result<CoefficientFrames, PipelineError> {
        self.check_configuration(clip)?;

        let total = self.config.expected_frame_count(clip);
        let mut frames = CoefficientFrames::zeroed(total, self.config.mfcc.num_cepstra);
        debug!(
            "Feeding {} samples at {} Hz, expecting {total} frames",
            clip.len(),
            clip.sample_rate()
        );

        self.extractor.start_stream();
        self.extractor
            .start_utterance()
            .map_err(PipelineError::Processing)?;

        let extractor = &mut self.extractor;
        let mut written = 0;
        for_each_16bit_chunk(clip, self.config.chunk_size, progress, |chunk| {
            let remaining = total - written;
            if remaining == 0 {
                return Ok(());
            }
            let processed = extractor
                .process_frames(chunk, frames.slots_from_mut(written))
                .map_err(PipelineError::Processing)?;
            if processed.frames > remaining {
                return Err(PipelineError::FrameOverrun {
                    reported: processed.frames,
                    capacity: remaining,
                });
            }
            written += processed.frames;
            Ok(())
        })?;

        if written < total {
            let flushed = self
                .extractor
                .end_utterance(frames.slot_mut(written))
                .map_err(PipelineError::Flush)?;
            if flushed > 1 {
                return Err(PipelineError::FrameOverrun {
                    reported: flushed,
                    capacity: 1,
                });
            }
            if flushed == 0 {
                warn!("End of utterance produced no frame; frame {written} stays empty");
            }
            written += flushed;
        }

        info!("Extracted {written} of {total} frames");
        Ok(frames)
    }

    fn check_configuration(&self, clip: &dyn AudioClip) -> Result<(), PipelineError> {
        self.config.validate()?;

        let expected = self.config.mfcc.num_cepstra;
        let actual = self.extractor.cepstrum_size();
        if actual != expected {
            return Err(PipelineError::Configuration(format!(
                "extractor produces {actual} cepstra per frame, expected {expected}"
            )));
        }
        if clip.sample_rate() != self.config.mfcc.sample_rate {
            return Err(PipelineError::Configuration(format!(
                "clip sample rate {} Hz does not match the extractor's {} Hz",
                clip.sample_rate(),
                self.config.mfcc.sample_rate
            )));
        }
        Ok(())
    }
}

/// Reads `clip` in order as 16-bit chunks of at most `chunk_size` samples,
/// reporting progress after each chunk.
fn for_each_16bit_chunk<F>(
    clip: &dyn AudioClip,
    chunk_size: usize,
    progress: &mut dyn ProgressSink,
    mut process: F,
) -> Result<(), PipelineError>
where
    F: FnMut(&[i16]) -> Result<(), PipelineError>,
{
    let total = clip.len();
    let mut samples = clip.samples();
    let mut buffer = Vec::with_capacity(chunk_size);
    let mut processed = 0;

    loop {
        buffer.clear();
        buffer.extend(samples.by_ref().take(chunk_size).map(to_i16_sample));
        if buffer.is_empty() {
            break;
        }
        process(&buffer)?;
        processed += buffer.len();
        progress.report_progress(processed, total);
    }

    Ok(())
}

/// Standard front end: resample to the extractor's rate, remove DC offset,
/// then prepend the alignment offset.
pub fn prepare_clip(clip: Box<dyn AudioClip>, config: &FeederConfig) -> Box<dyn AudioClip> {
    clip.pipe(resample(config.mfcc.sample_rate))
        .pipe(remove_dc_offset())
        .pipe(add_offset(config.alignment_offset()))
}

/// Prepares `clip` and extracts one MFCC vector per frame.
pub fn extract_mfcc(
    clip: Box<dyn AudioClip>,
    config: &FeederConfig,
    progress: &mut dyn ProgressSink,
) -> Result<CoefficientFrames, PipelineError> {
    config.validate()?;
    let extractor = StreamingMfcc::new(config.mfcc)
        .map_err(|err| PipelineError::Configuration(err.to_string()))?;
    let clip = prepare_clip(clip, config);
    StreamingFrameFeeder::new(*config, extractor).feed(clip.as_ref(), progress)
}
