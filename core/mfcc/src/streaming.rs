use std::{fmt, sync::Arc};

use log::debug;
use rustfft::{Fft, FftPlanner, num_complex::Complex};

use crate::{
    config::MfccConfig,
    error::MfccError,
    extractor::{FrameExtractor, ProcessedFrames},
    spectrum::{CepstralTransform, MelFilterbank, hamming_window},
};

/// Streaming MFCC extractor.
///
/// Samples are buffered until a full window is available. Each emitted frame
/// drops `frame_shift` samples from the front of the buffer, so consecutive
/// windows overlap by `frame_size - frame_shift` samples. Pre-emphasis runs
/// over the stream as a whole, carrying the last dropped sample into the
/// next window.
pub struct StreamingMfcc {
    config: MfccConfig,
    frame_size: usize,
    frame_shift: usize,
    window: Vec<f64>,
    filterbank: MelFilterbank,
    transform: CepstralTransform,
    fft: Arc<dyn Fft<f64>>,
    spectrum: Vec<Complex<f64>>,
    power: Vec<f64>,
    /// Samples of the window being assembled; always shorter than `frame_size`
    /// between calls.
    pending: Vec<i16>,
    /// Sample preceding `pending[0]` in the stream.
    prior: i16,
    in_utterance: bool,
}

impl StreamingMfcc {
    pub fn new(config: MfccConfig) -> Result<Self, MfccError> {
        config.validate()?;

        let frame_size = config.frame_size();
        let frame_shift = config.frame_shift();
        let fft = FftPlanner::new().plan_fft_forward(config.fft_size);
        let filterbank = MelFilterbank::new(
            config.num_filters,
            config.fft_size,
            f64::from(config.sample_rate),
            config.lower_filter_freq,
            config.upper_filter_freq,
        );
        debug!(
            "MFCC extractor: {frame_size}-sample window, {frame_shift}-sample shift, {} filters",
            filterbank.len()
        );

        Ok(Self {
            frame_size,
            frame_shift,
            window: hamming_window(frame_size),
            filterbank,
            transform: CepstralTransform::new(config.num_cepstra, config.num_filters),
            fft,
            spectrum: vec![Complex::default(); config.fft_size],
            power: vec![0.0; config.fft_size / 2 + 1],
            pending: Vec::with_capacity(frame_size),
            prior: 0,
            in_utterance: false,
            config,
        })
    }

    /// Number of whole frames `output` can hold.
    fn capacity(&self, output: &[f32]) -> Result<usize, MfccError> {
        let vector_size = self.config.num_cepstra;
        if output.len() % vector_size != 0 {
            return Err(MfccError::OutputSize {
                len: output.len(),
                vector_size,
            });
        }
        Ok(output.len() / vector_size)
    }

    /// Computes the cepstrum of the first `frame_size` pending samples.
    fn compute_frame(&mut self, cepstrum: &mut [f32]) {
        let alpha = self.config.pre_emphasis;
        let mut previous = f64::from(self.prior);

        for (i, bin) in self.spectrum.iter_mut().enumerate() {
            *bin = if i < self.frame_size {
                let sample = f64::from(self.pending[i]);
                let emphasized = alpha.mul_add(-previous, sample);
                previous = sample;
                Complex::new(emphasized * self.window[i], 0.0)
            } else {
                Complex::default()
            };
        }

        self.fft.process(&mut self.spectrum);
        for (power, bin) in self.power.iter_mut().zip(&self.spectrum) {
            *power = bin.norm_sqr();
        }

        let log_energies = self.filterbank.log_energies(&self.power);
        self.transform.apply(&log_energies, cepstrum);
    }

    fn advance(&mut self) {
        self.prior = self.pending[self.frame_shift - 1];
        self.pending.drain(..self.frame_shift);
    }
}

impl fmt::Debug for StreamingMfcc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingMfcc")
            .field("config", &self.config)
            .field("pending", &self.pending.len())
            .field("in_utterance", &self.in_utterance)
            .finish_non_exhaustive()
    }
}

impl FrameExtractor for StreamingMfcc {
    fn cepstrum_size(&self) -> usize {
        self.config.num_cepstra
    }

    fn start_stream(&mut self) {
        self.pending.clear();
        self.prior = 0;
        self.in_utterance = false;
    }

    fn start_utterance(&mut self) -> Result<(), MfccError> {
        self.pending.clear();
        self.prior = 0;
        self.in_utterance = true;
        debug!("Utterance started");
        Ok(())
    }

    fn process_frames(
        &mut self,
        samples: &[i16],
        output: &mut [f32],
    ) -> Result<ProcessedFrames, MfccError> {
        if !self.in_utterance {
            return Err(MfccError::UtteranceNotStarted);
        }
        let capacity = self.capacity(output)?;
        let vector_size = self.config.num_cepstra;

        let mut result = ProcessedFrames::default();
        while result.frames < capacity {
            let wanted = self.frame_size - self.pending.len();
            let take = wanted.min(samples.len() - result.consumed);
            self.pending
                .extend_from_slice(&samples[result.consumed..result.consumed + take]);
            result.consumed += take;
            if self.pending.len() < self.frame_size {
                break;
            }

            let start = result.frames * vector_size;
            self.compute_frame(&mut output[start..start + vector_size]);
            self.advance();
            result.frames += 1;
        }

        Ok(result)
    }

    fn end_utterance(&mut self, output: &mut [f32]) -> Result<usize, MfccError> {
        if !self.in_utterance {
            return Err(MfccError::UtteranceNotStarted);
        }
        self.in_utterance = false;
        if self.pending.is_empty() {
            debug!("Utterance ended without buffered samples");
            return Ok(0);
        }
        if self.capacity(output)? == 0 {
            return Err(MfccError::OutputSize {
                len: output.len(),
                vector_size: self.config.num_cepstra,
            });
        }

        let tail = self.pending.len();
        self.pending.resize(self.frame_size, 0);
        self.compute_frame(&mut output[..self.config.num_cepstra]);
        self.pending.clear();
        debug!("Utterance ended, flushed {tail} buffered samples");
        Ok(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MfccConfig {
        MfccConfig {
            window_length: 0.025,
            ..MfccConfig::default()
        }
    }

    fn tone(len: usize, amplitude: f64) -> Vec<i16> {
        (0..len)
            .map(|i| {
                let phase = 2.0 * std::f64::consts::PI * 440.0 * i as f64 / 16_000.0;
                (amplitude * phase.sin()) as i16
            })
            .collect()
    }

    fn started() -> StreamingMfcc {
        let mut mfcc = StreamingMfcc::new(config()).unwrap();
        mfcc.start_stream();
        mfcc.start_utterance().unwrap();
        mfcc
    }

    #[test]
    fn rejects_silence_removal() {
        let result = StreamingMfcc::new(MfccConfig {
            remove_silence: true,
            ..config()
        });
        assert!(matches!(result, Err(MfccError::InvalidConfig(_))));
    }

    #[test]
    fn emits_one_frame_per_shift_after_the_first_window() {
        let mut mfcc = started();
        let mut output = vec![0.0; 10 * 13];

        let result = mfcc.process_frames(&tone(1000, 8000.0), &mut output).unwrap();

        // 1 + (1000 - 400) / 160
        assert_eq!(result.frames, 4);
        assert_eq!(result.consumed, 1000);
        assert!(output[..4 * 13].iter().all(|v| v.is_finite()));
        assert!(output[4 * 13..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn stops_consuming_when_output_is_full() {
        let mut mfcc = started();
        let mut output = vec![0.0; 2 * 13];

        let result = mfcc.process_frames(&tone(1000, 8000.0), &mut output).unwrap();

        assert_eq!(result.frames, 2);
        assert_eq!(result.consumed, 400 + 160);
    }

    #[test]
    fn chunked_input_matches_single_call() {
        let samples = tone(2000, 8000.0);

        let mut whole = started();
        let mut expected = vec![0.0; 20 * 13];
        let frames = whole.process_frames(&samples, &mut expected).unwrap().frames;

        let mut chunked = started();
        let mut actual = vec![0.0; 20 * 13];
        let mut written = 0;
        for chunk in samples.chunks(37) {
            let result = chunked
                .process_frames(chunk, &mut actual[written * 13..])
                .unwrap();
            assert_eq!(result.consumed, chunk.len());
            written += result.frames;
        }

        assert_eq!(written, frames);
        assert_eq!(actual, expected);
    }

    #[test]
    fn end_utterance_flushes_the_buffered_tail() {
        let mut mfcc = started();
        let mut output = vec![0.0; 10 * 13];
        mfcc.process_frames(&tone(1000, 8000.0), &mut output).unwrap();

        let mut last = vec![0.0; 13];
        assert_eq!(mfcc.end_utterance(&mut last).unwrap(), 1);
        assert!(last.iter().all(|v| v.is_finite()));
        assert_ne!(last, vec![0.0; 13]);

        assert_eq!(
            mfcc.end_utterance(&mut last),
            Err(MfccError::UtteranceNotStarted)
        );
    }

    #[test]
    fn end_utterance_without_samples_emits_nothing() {
        let mut mfcc = started();
        let mut last = vec![0.0; 13];
        assert_eq!(mfcc.end_utterance(&mut last).unwrap(), 0);
        assert_eq!(last, vec![0.0; 13]);
    }

    #[test]
    fn processing_requires_an_utterance() {
        let mut mfcc = StreamingMfcc::new(config()).unwrap();
        mfcc.start_stream();
        let mut output = vec![0.0; 13];
        assert_eq!(
            mfcc.process_frames(&[0; 10], &mut output),
            Err(MfccError::UtteranceNotStarted)
        );
    }

    #[test]
    fn rejects_partial_output_frames() {
        let mut mfcc = started();
        let mut output = vec![0.0; 20];
        assert_eq!(
            mfcc.process_frames(&[0; 10], &mut output),
            Err(MfccError::OutputSize {
                len: 20,
                vector_size: 13
            })
        );
    }

    #[test]
    fn louder_signal_raises_the_zeroth_cepstrum() {
        let mut quiet = started();
        let mut quiet_out = vec![0.0; 13];
        quiet.process_frames(&tone(400, 1000.0), &mut quiet_out).unwrap();

        let mut loud = started();
        let mut loud_out = vec![0.0; 13];
        loud.process_frames(&tone(400, 16000.0), &mut loud_out).unwrap();

        assert!(loud_out[0] > quiet_out[0]);
    }

    #[test]
    fn silence_produces_finite_cepstra() {
        let mut mfcc = started();
        let mut output = vec![0.0; 2 * 13];
        let result = mfcc.process_frames(&[0; 560], &mut output).unwrap();
        assert_eq!(result.frames, 2);
        assert!(output.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn new_utterance_discards_previous_tail() {
        let samples = tone(400, 8000.0);

        let mut fresh = started();
        let mut expected = vec![0.0; 13];
        fresh.process_frames(&samples, &mut expected).unwrap();

        let mut reused = started();
        let mut scratch = vec![0.0; 13];
        reused.process_frames(&tone(250, 3000.0), &mut scratch).unwrap();
        reused.start_utterance().unwrap();
        let mut actual = vec![0.0; 13];
        reused.process_frames(&samples, &mut actual).unwrap();

        assert_eq!(actual, expected);
    }
}
