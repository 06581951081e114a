// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use std::f64::consts::TAU;

use crate::frequency::NO_SIGNAL;

/// Relative fit residual accepted by default. Loose enough for 16 bit recordings.
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Windows with less energy than this are treated as silence.
const ENERGY_FLOOR: f64 = 1e-9;

///
/// A demodulator of pcm samples. Gets the instantaneous frequency of each sample.
///
/// A steady tone `sin(φ + nΔ)` satisfies `s[n - 1] + s[n + 1] = 2 cos(Δ) s[n]` exactly, so
/// `cos(Δ)` is fitted by least squares over the three centres of a five sample window. When
/// the window straddles a change of frequency the fit residual grows; if it exceeds
/// `tolerance` (relative to the window energy) the sample is reported as [`NO_SIGNAL`] instead
/// of a blend of the two tones.
///
#[derive(Clone, Copy, Debug)]
pub struct ToneDemodulator {
    sample_rate: f32,
    tolerance: f64,
}

impl ToneDemodulator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            tolerance: DEFAULT_TOLERANCE,
        }
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frequency at every sample. The first and last two samples have no full window.
    pub fn demodulate(&self, samples: &[f32]) -> Vec<f32> {
        let mut instantaneous = vec![NO_SIGNAL; samples.len()];
        if samples.len() < 5 {
            return instantaneous;
        }

        for (i, window) in samples.windows(5).enumerate() {
            instantaneous[i + 2] = self.estimate(window);
        }

        instantaneous
    }

    fn estimate(&self, window: &[f32]) -> f32 {
        let s: [f64; 5] = std::array::from_fn(|i| window[i] as f64);

        let mut energy = 0.0;
        let mut correlation = 0.0;
        for m in 1..4 {
            energy += s[m] * s[m];
            correlation += s[m] * (s[m - 1] + s[m + 1]);
        }
        if energy < ENERGY_FLOOR {
            return NO_SIGNAL;
        }

        let cos_delta = correlation / (2.0 * energy);
        let residual: f64 = (1..4)
            .map(|m| {
                let error = s[m - 1] + s[m + 1] - 2.0 * cos_delta * s[m];
                error * error
            })
            .sum();
        if residual > self.tolerance * energy {
            return NO_SIGNAL;
        }

        (cos_delta.clamp(-1.0, 1.0).acos() * self.sample_rate as f64 / TAU) as f32
    }
}
