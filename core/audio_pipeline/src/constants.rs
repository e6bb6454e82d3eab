/// Tolerance for comparing normalized samples in tests.
pub const AUDIO_SAMPLE_EPSILON: f32 = 1e-4;

/// Samples handed to the extractor per call: 0.1 s at 16 kHz.
pub const DEFAULT_CHUNK_SIZE: usize = 1600;

/// DC offsets smaller than one 16-bit quantization step are left alone.
pub const DC_OFFSET_EPSILON: f32 = 1.0 / 32_768.0;
