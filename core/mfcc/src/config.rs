use crate::error::MfccError;

/// Parameters of the feature extractor.
///
/// Defaults match the classic 16 kHz speech front end: 100 frames per second,
/// a 25.625 ms window, 40 mel filters and 13 cepstra.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MfccConfig {
    /// Input sampling frequency in Hz.
    pub sample_rate: u32,
    /// Output frames per second.
    pub frame_rate: u32,
    /// Analysis window length in seconds.
    pub window_length: f64,
    /// Number of cepstral coefficients per frame.
    pub num_cepstra: usize,
    pub num_filters: usize,
    /// Lower edge of the mel filterbank in Hz.
    pub lower_filter_freq: f64,
    /// Upper edge of the mel filterbank in Hz.
    pub upper_filter_freq: f64,
    pub fft_size: usize,
    /// Pre-emphasis coefficient, `0.0` disables the filter.
    pub pre_emphasis: f64,
    /// Voice activity detection inside the extractor. There is none, so this
    /// must stay `false`; utterance boundaries are owned by the caller.
    pub remove_silence: bool,
}

impl Default for MfccConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            frame_rate: 100,
            window_length: 0.025_625,
            num_cepstra: 13,
            num_filters: 40,
            lower_filter_freq: 133.333_34,
            upper_filter_freq: 6_855.497_6,
            fft_size: 512,
            pre_emphasis: 0.97,
            remove_silence: false,
        }
    }
}

impl MfccConfig {
    /// Samples between the starts of consecutive frames.
    pub fn frame_shift(&self) -> usize {
        if self.frame_rate == 0 {
            return 0;
        }
        (f64::from(self.sample_rate) / f64::from(self.frame_rate)).round() as usize
    }

    /// Samples covered by one analysis window.
    pub fn frame_size(&self) -> usize {
        (self.window_length * f64::from(self.sample_rate)).round() as usize
    }

    pub fn validate(&self) -> Result<(), MfccError> {
        let invalid = |msg: String| Err(MfccError::InvalidConfig(msg));

        if self.sample_rate == 0 {
            return invalid("sample rate must be positive".to_owned());
        }
        if self.frame_rate == 0 {
            return invalid("frame rate must be positive".to_owned());
        }
        let frame_shift = self.frame_shift();
        if frame_shift == 0 {
            return invalid(format!(
                "frame rate {} is too high for sample rate {}",
                self.frame_rate, self.sample_rate
            ));
        }
        let frame_size = self.frame_size();
        if frame_size < frame_shift {
            return invalid(format!(
                "window of {frame_size} samples is shorter than the frame shift of {frame_shift}"
            ));
        }
        if self.fft_size < frame_size {
            return invalid(format!(
                "FFT size {} is smaller than the window of {frame_size} samples",
                self.fft_size
            ));
        }
        if self.num_filters == 0 {
            return invalid("at least one mel filter is required".to_owned());
        }
        if self.num_cepstra == 0 || self.num_cepstra > self.num_filters {
            return invalid(format!(
                "{} cepstra cannot be derived from {} filters",
                self.num_cepstra, self.num_filters
            ));
        }

        let nyquist = f64::from(self.sample_rate) / 2.0;
        let filters_in_range = self.lower_filter_freq >= 0.0
            && self.lower_filter_freq < self.upper_filter_freq
            && self.upper_filter_freq <= nyquist;
        if !filters_in_range {
            return invalid(format!(
                "filterbank {}..{} Hz does not fit below the Nyquist frequency of {nyquist} Hz",
                self.lower_filter_freq, self.upper_filter_freq
            ));
        }
        if !(0.0..1.0).contains(&self.pre_emphasis) {
            return invalid(format!(
                "pre-emphasis {} is outside [0, 1)",
                self.pre_emphasis
            ));
        }
        if self.remove_silence {
            return invalid("silence removal is not supported".to_owned());
        }

        Ok(())
    }
}
