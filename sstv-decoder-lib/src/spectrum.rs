// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use std::{f32::consts::TAU, sync::Arc};

use num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

use crate::DecodeError;

pub const DEFAULT_FFT_SIZE: usize = 2048;

/// Magnitudes are floored here instead of going to negative infinity.
const MIN_DB: f32 = -240.0;

/// One spectral snapshot: magnitudes in dB, `bin_width` Hz apart, starting at 0 Hz.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    pub magnitudes: Vec<f32>,
    pub bin_width: f32,
}

///
/// Turns frames of PCM samples into [`Spectrum`]s.
///
/// Frames are weighted with a Blackman window and transformed with a forward FFT of
/// `fft_size` points. Only the lower half of the bins is kept. Magnitudes are
/// `20 * log10(|X| / fft_size)`.
///
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex32>,
    sample_rate: f32,
}

impl SpectrumAnalyzer {
    pub fn new(fft_size: usize, sample_rate: f32) -> Result<Self, DecodeError> {
        if fft_size < 4 || fft_size % 2 != 0 {
            return Err(DecodeError::FftSize(fft_size));
        }
        if !(sample_rate > 0.0) {
            return Err(DecodeError::SampleRate(sample_rate));
        }

        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);

        let n = (fft_size - 1) as f32;
        let window = (0..fft_size)
            .map(|i| {
                let x = i as f32 / n;
                0.42 - 0.5 * (TAU * x).cos() + 0.08 * (2.0 * TAU * x).cos()
            })
            .collect();

        Ok(Self {
            fft,
            window,
            buffer: vec![Complex32::new(0.0, 0.0); fft_size],
            sample_rate,
        })
    }

    pub fn fft_size(&self) -> usize {
        self.window.len()
    }

    pub fn bin_width(&self) -> f32 {
        self.sample_rate / self.fft_size() as f32
    }

    ///
    /// Analyze the most recent `fft_size` samples of `frame`.
    ///
    /// Shorter frames are padded with silence in front, like a capture buffer that has not
    /// filled up yet.
    ///
    pub fn analyze(&mut self, frame: &[f32]) -> Spectrum {
        let fft_size = self.fft_size();
        let frame = &frame[frame.len().saturating_sub(fft_size)..];
        let padding = fft_size - frame.len();

        for (i, value) in self.buffer.iter_mut().enumerate() {
            let sample = if i < padding { 0.0 } else { frame[i - padding] };
            *value = Complex32::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        let scale = 1.0 / fft_size as f32;
        let magnitudes = self.buffer[..fft_size / 2]
            .iter()
            .map(|bin| {
                let magnitude = bin.norm() * scale;
                if magnitude > 0.0 {
                    (20.0 * magnitude.log10()).max(MIN_DB)
                } else {
                    MIN_DB
                }
            })
            .collect();

        Spectrum {
            magnitudes,
            bin_width: self.bin_width(),
        }
    }
}
