// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use std::f64::consts::TAU;

/// Sample rate of the generated audio unless asked otherwise.
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;

/// Frequency of a black pixel.
pub const BLACK_FREQUENCY: f32 = 1500.0;

/// Distance from black to white.
pub const COLOR_SPAN: f32 = 800.0;

///
/// SampleGenerator is a generator to generate constant stream of pcm wave data.
///
/// Tones are appended one after another to a single buffer. The oscillator phase runs on
/// from one tone into the next, so frequency changes never jump in amplitude.
///
pub struct SampleGenerator {
    /// The sample rate of the result wave file
    sample_rate: u32,

    /// Oscillator phase in `[0, 2π)`, never reset between tones
    phase: f64,

    /// The delta of the length, for compensating the precision related to the sample rate
    delta_length: f64,

    samples: Vec<f32>,
}

impl Default for SampleGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl SampleGenerator {
    /// Create a new sample generator.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            phase: 0.0,
            delta_length: 0.0,
            samples: vec![],
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples written so far.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in `[-1, 1]`.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    ///
    /// Append a tone of `frequency` Hz lasting `duration_in_ms`.
    ///
    /// A tone rarely lasts a whole number of samples. The leftover fraction is carried
    /// into the next tone, so the total sample count never drifts more than one sample
    /// from the total duration.
    ///
    pub fn write_tone(&mut self, frequency: f32, duration_in_ms: f32) {
        let exact =
            self.sample_rate as f64 * duration_in_ms.max(0.0) as f64 / 1000.0 + self.delta_length;
        let num_samples = exact.floor();
        self.delta_length = exact - num_samples;

        let step = TAU * frequency as f64 / self.sample_rate as f64;
        self.samples.reserve(num_samples as usize);
        for _ in 0..num_samples as usize {
            self.samples.push(self.phase.sin() as f32);
            self.phase = (self.phase + step).rem_euclid(TAU);
        }
    }

    ///
    /// Append the tone for a colour value.
    ///
    /// Reference is at below:
    ///
    /// > Dayton Paper Appendix A: RGB Color Encoding
    /// >
    /// > SSTV systems use the frequency range of 1500-2300hz to represent
    /// > the range of brightness values from pure black to pure white.
    ///
    /// `value` is clamped to `[0, 255]` first.
    ///
    pub fn write_color(&mut self, duration_in_ms: f32, value: f32) {
        self.write_tone(color_frequency(value), duration_in_ms);
    }
}

/// $$ f = 1500 + v / 255 * 800 $$
#[inline]
pub fn color_frequency(value: f32) -> f32 {
    BLACK_FREQUENCY + value.clamp(0.0, 255.0) / 255.0 * COLOR_SPAN
}
