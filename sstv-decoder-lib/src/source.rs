// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use crate::{
    demodulator::ToneDemodulator, frequency::estimate_frequency, spectrum::SpectrumAnalyzer,
};

/// Display refresh period, the cadence of the spectral front end.
pub const DEFAULT_TICK_MS: f64 = 1000.0 / 60.0;

/// One frequency estimate and when it was taken.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub frequency: f32,
    pub timestamp_ms: f64,
}

///
/// Anything that produces time-ordered ticks: a timer over a capture buffer, a hardware
/// interrupt, or a test harness feeding synthetic tones.
///
pub trait TickSource: Iterator<Item = Tick> {}

impl<T: Iterator<Item = Tick>> TickSource for T {}

///
/// Ticks at a coarse, fixed period. Each tick analyzes the audio received up to that point.
///
pub struct SpectrumTicks<'a> {
    analyzer: SpectrumAnalyzer,
    samples: &'a [f32],
    sample_rate: f64,
    tick_ms: f64,
    noise_gate: bool,
    index: usize,
}

impl<'a> SpectrumTicks<'a> {
    pub fn new(analyzer: SpectrumAnalyzer, samples: &'a [f32], sample_rate: f32) -> Self {
        Self {
            analyzer,
            samples,
            sample_rate: sample_rate as f64,
            tick_ms: DEFAULT_TICK_MS,
            noise_gate: false,
            index: 0,
        }
    }

    pub fn with_tick_ms(mut self, tick_ms: f64) -> Self {
        if tick_ms > 0.0 {
            self.tick_ms = tick_ms;
        }
        self
    }

    pub fn with_noise_gate(mut self, noise_gate: bool) -> Self {
        self.noise_gate = noise_gate;
        self
    }
}

impl Iterator for SpectrumTicks<'_> {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        let timestamp_ms = self.index as f64 * self.tick_ms;
        let end = (timestamp_ms * self.sample_rate / 1000.0).round() as usize;
        if end > self.samples.len() {
            return None;
        }
        self.index += 1;

        let spectrum = self.analyzer.analyze(&self.samples[..end]);
        Some(Tick {
            frequency: estimate_frequency(
                &spectrum.magnitudes,
                spectrum.bin_width,
                self.noise_gate,
            ),
            timestamp_ms,
        })
    }
}

///
/// Ticks at the sample rate, or every `decimation` samples, from a [`ToneDemodulator`].
///
pub struct ToneTicks {
    frequencies: Vec<f32>,
    sample_ms: f64,
    decimation: usize,
    index: usize,
}

impl ToneTicks {
    pub fn new(demodulator: &ToneDemodulator, samples: &[f32]) -> Self {
        Self {
            frequencies: demodulator.demodulate(samples),
            sample_ms: 1000.0 / demodulator.sample_rate() as f64,
            decimation: 1,
            index: 0,
        }
    }

    pub fn with_decimation(mut self, decimation: usize) -> Self {
        self.decimation = decimation.max(1);
        self
    }
}

impl Iterator for ToneTicks {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        let frequency = *self.frequencies.get(self.index)?;
        let timestamp_ms = self.index as f64 * self.sample_ms;
        self.index += self.decimation;
        Some(Tick {
            frequency,
            timestamp_ms,
        })
    }
}

/// Ticks from a closure, see [`from_fn`].
pub struct FromFn<F>(F);

impl<F: FnMut() -> Option<Tick>> Iterator for FromFn<F> {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        (self.0)()
    }
}

/// Build a tick source out of a closure. The source ends when it returns `None`.
pub fn from_fn<F: FnMut() -> Option<Tick>>(f: F) -> FromFn<F> {
    FromFn(f)
}

#[cfg(test)]
mod test {
    use std::f32::consts::TAU;

    use approx::assert_abs_diff_eq;

    use super::*;

    fn tone(frequency: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (TAU * frequency * i as f32 / sample_rate).sin())
            .collect()
    }

    #[test]
    fn tone_ticks_follow_the_sample_clock() {
        let samples = tone(1500.0, 8000.0, 800);
        let ticks: Vec<Tick> = ToneTicks::new(&ToneDemodulator::new(8000.0), &samples)
            .with_decimation(4)
            .collect();

        assert_eq!(ticks.len(), 200);
        assert_eq!(ticks[0].frequency, 0.0);
        assert_abs_diff_eq!(ticks[1].timestamp_ms, 0.5);
        assert_abs_diff_eq!(ticks[100].frequency, 1500.0, epsilon = 1.0);
    }

    #[test]
    fn spectrum_ticks_at_refresh_rate() {
        let samples = tone(1900.0, 44100.0, 44100);
        let analyzer = SpectrumAnalyzer::new(2048, 44100.0).unwrap();
        let ticks: Vec<Tick> = SpectrumTicks::new(analyzer, &samples, 44100.0)
            .with_noise_gate(true)
            .collect();

        // One second of audio, ticks from 0 ms up to and including 1000 ms.
        assert_eq!(ticks.len(), 61);
        assert_eq!(ticks[0].frequency, 0.0);
        assert_abs_diff_eq!(ticks[30].timestamp_ms, 500.0, epsilon = 1e-9);
        for tick in &ticks[3..] {
            assert_abs_diff_eq!(tick.frequency, 1900.0, epsilon = 5.0);
        }
    }

    #[test]
    fn closures_are_sources() {
        let mut now = 0.0;
        let source = from_fn(|| {
            now += 10.0;
            (now <= 30.0).then_some(Tick {
                frequency: 1200.0,
                timestamp_ms: now,
            })
        });
        let stamps: Vec<f64> = source.map(|tick| tick.timestamp_ms).collect();
        assert_eq!(stamps, vec![10.0, 20.0, 30.0]);
    }
}
