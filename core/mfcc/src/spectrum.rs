use std::f64::consts::PI;

/// Log energies below this are clamped so silent frames stay finite.
const ENERGY_FLOOR: f64 = 1e-5;

pub fn hz_to_mel(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

pub fn mel_to_hz(mel: f64) -> f64 {
    700.0 * (10.0_f64.powf(mel / 2595.0) - 1.0)
}

pub fn hamming_window(len: usize) -> Vec<f64> {
    if len == 1 {
        return vec![1.0];
    }
    let denominator = (len - 1) as f64;
    (0..len)
        .map(|i| 0.54 - 0.46 * (2.0 * PI * i as f64 / denominator).cos())
        .collect()
}

#[derive(Debug)]
struct TriangularFilter {
    first_bin: usize,
    weights: Vec<f64>,
}

/// Triangular filters spaced evenly on the mel scale, weighted by the
/// frequency of each FFT bin.
#[derive(Debug)]
pub struct MelFilterbank {
    filters: Vec<TriangularFilter>,
}

impl MelFilterbank {
    pub fn new(
        num_filters: usize,
        fft_size: usize,
        sample_rate: f64,
        lower_freq: f64,
        upper_freq: f64,
    ) -> Self {
        let mel_low = hz_to_mel(lower_freq);
        let mel_step = (hz_to_mel(upper_freq) - mel_low) / (num_filters + 1) as f64;
        let edges: Vec<f64> = (0..num_filters + 2)
            .map(|i| mel_to_hz(mel_step.mul_add(i as f64, mel_low)))
            .collect();

        let bin_width = sample_rate / fft_size as f64;
        let bin_count = fft_size / 2 + 1;

        let filters = edges
            .windows(3)
            .map(|edge| {
                let (left, center, right) = (edge[0], edge[1], edge[2]);
                let weights: Vec<(usize, f64)> = (0..bin_count)
                    .map(|bin| {
                        let freq = bin as f64 * bin_width;
                        let weight = if freq > left && freq < center {
                            (freq - left) / (center - left)
                        } else if freq >= center && freq < right {
                            (right - freq) / (right - center)
                        } else {
                            0.0
                        };
                        (bin, weight)
                    })
                    .filter(|&(_, weight)| weight > 0.0)
                    .collect();

                TriangularFilter {
                    first_bin: weights.first().map_or(0, |&(bin, _)| bin),
                    weights: weights.into_iter().map(|(_, weight)| weight).collect(),
                }
            })
            .collect();

        Self { filters }
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Natural log of each filter's energy over a power spectrum.
    pub fn log_energies(&self, power: &[f64]) -> Vec<f64> {
        self.filters
            .iter()
            .map(|filter| {
                let energy: f64 = filter
                    .weights
                    .iter()
                    .zip(&power[filter.first_bin..])
                    .map(|(weight, bin)| weight * bin)
                    .sum();
                energy.max(ENERGY_FLOOR).ln()
            })
            .collect()
    }
}

/// Legacy cosine transform of log filter energies into cepstra:
/// `c[i] = sum_j b_j * L[j] * cos(pi * i * (j + 0.5) / N) / (2N)` with the
/// first filter weighted `b_0 = 1` and all others `b_j = 2`.
#[derive(Debug)]
pub struct CepstralTransform {
    cosines: Vec<Vec<f64>>,
    scale: f64,
}

impl CepstralTransform {
    pub fn new(num_cepstra: usize, num_filters: usize) -> Self {
        let filters = num_filters as f64;
        let cosines = (0..num_cepstra)
            .map(|i| {
                (0..num_filters)
                    .map(|j| {
                        let beta = if j == 0 { 1.0 } else { 2.0 };
                        beta * (PI * i as f64 * (j as f64 + 0.5) / filters).cos()
                    })
                    .collect()
            })
            .collect();

        Self {
            cosines,
            scale: 1.0 / (2.0 * filters),
        }
    }

    pub fn apply(&self, log_energies: &[f64], cepstrum: &mut [f32]) {
        for (value, row) in cepstrum.iter_mut().zip(&self.cosines) {
            let sum: f64 = row.iter().zip(log_energies).map(|(c, l)| c * l).sum();
            *value = (sum * self.scale) as f32;
        }
    }
}
