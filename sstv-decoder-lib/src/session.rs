// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use image::{Rgb, RgbImage};
use sstv_mode_lib::{Channel, Mode};

use crate::{
    frequency::estimate_frequency,
    line_buffer::LineBuffer,
    rasterizer::rasterize_line,
    spectrum::Spectrum,
    sync::{SyncDetector, SyncState},
};

/// Lowest tone taken as picture content.
const PIXEL_TONE_LOW: f32 = 1400.0;
/// Highest tone taken as picture content.
const PIXEL_TONE_HIGH: f32 = 2600.0;

const BLACK_TONE: f32 = 1500.0;
const TONE_SPAN: f32 = 800.0;

/// A finished picture. Never changes once created.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    /// Sequence number, counted per decoder.
    pub id: u64,
    /// Timestamp of the tick that completed the picture.
    pub timestamp_ms: f64,
    pub mode: Mode,
    pub image: RgbImage,
}

#[derive(Clone, Debug, PartialEq)]
pub enum DecoderEvent {
    /// The first sync pulse was accepted, a picture starts.
    Locked { timestamp_ms: f64 },
    /// One column of a component was received. `color` is tinted by the channel.
    Pixel { x: usize, y: usize, color: Rgb<u8> },
    /// Row `y` is final.
    Line { y: usize, pixels: Vec<Rgb<u8>> },
    Completed(DecodedImage),
}

fn preview_color(channel: Channel, value: f32) -> Rgb<u8> {
    let v = value.round() as u8;
    match channel {
        Channel::R => Rgb([v, 0, 0]),
        Channel::G => Rgb([0, v, 0]),
        Channel::B => Rgb([0, 0, v]),
        Channel::Y | Channel::U | Channel::V => Rgb([v, v, v]),
    }
}

///
/// State of one running decode.
///
/// Fed one `(frequency, timestamp)` tick at a time. Sync pulses start and end scanlines;
/// tones in between are sorted into the components of the line by their time after the
/// last sync. Ticks may arrive at any cadence, a coarse clock simply leaves columns
/// unwritten.
///
#[derive(Clone, Debug)]
pub struct DecoderSession {
    mode: Mode,
    sync: SyncDetector,
    state: SyncState,
    last_line_ms: f64,
    row: usize,
    line: LineBuffer,
    raster: RgbImage,
    completed: u64,
}

impl DecoderSession {
    pub fn new(mode: Mode) -> Self {
        let timing = mode.timing();
        Self {
            mode,
            sync: SyncDetector::new(),
            state: SyncState::Idle,
            last_line_ms: 0.0,
            row: 0,
            line: LineBuffer::new(timing),
            raster: RgbImage::new(timing.width as u32, timing.height as u32),
            completed: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    /// The row being received.
    pub fn row(&self) -> usize {
        self.row
    }

    pub fn confidence(&self) -> f32 {
        self.sync.confidence()
    }

    pub fn strikes(&self) -> f32 {
        self.sync.strikes()
    }

    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// Rows received so far for the current picture.
    pub fn raster(&self) -> &RgbImage {
        &self.raster
    }

    /// Process one tick.
    pub fn step(&mut self, frequency: f32, now_ms: f64) -> Vec<DecoderEvent> {
        let mut events = Vec::new();
        self.step_into(frequency, now_ms, &mut events);
        events
    }

    /// Estimate the frequency of a spectral snapshot, then process it as one tick.
    pub fn step_spectrum(
        &mut self,
        spectrum: &Spectrum,
        noise_gate: bool,
        now_ms: f64,
    ) -> Vec<DecoderEvent> {
        let frequency = estimate_frequency(&spectrum.magnitudes, spectrum.bin_width, noise_gate);
        self.step(frequency, now_ms)
    }

    /// Like [`DecoderSession::step`], appending to a caller owned buffer.
    pub fn step_into(&mut self, frequency: f32, now_ms: f64, events: &mut Vec<DecoderEvent>) {
        let timing = self.mode.timing();
        let elapsed = (now_ms - self.last_line_ms) as f32;

        self.sync.observe(frequency);
        if self
            .sync
            .should_accept(elapsed, timing.total_line_time, self.state)
        {
            self.accept_sync(now_ms, events);
            return;
        }

        if self.state == SyncState::Decoding
            && (PIXEL_TONE_LOW..=PIXEL_TONE_HIGH).contains(&frequency)
        {
            self.write_sample(frequency, elapsed, events);
        }
    }

    fn accept_sync(&mut self, now_ms: f64, events: &mut Vec<DecoderEvent>) {
        match self.state {
            SyncState::Idle => {
                tracing::debug!(mode = %self.mode, now_ms, "sync locked");
                self.state = SyncState::Decoding;
                self.row = 0;
                self.clear_raster();
                self.line.clear();
                events.push(DecoderEvent::Locked {
                    timestamp_ms: now_ms,
                });
            }
            SyncState::Decoding => {
                tracing::debug!(row = self.row, confidence = self.sync.confidence(), "sync");
                self.flush_line(events);
                if self.row >= self.mode.timing().height {
                    self.complete(now_ms, events);
                }
            }
        }

        self.sync.accept();
        self.last_line_ms = now_ms;
    }

    fn write_sample(&mut self, frequency: f32, elapsed: f32, events: &mut Vec<DecoderEvent>) {
        let timing = self.mode.timing();
        let header_end = timing.header_end();
        if !(elapsed > header_end && elapsed < timing.total_line_time) {
            return;
        }

        let Some((component, remainder)) = self.mode.layout().locate(elapsed - header_end)
        else {
            return;
        };

        let column = (remainder / component.duration * component.width as f32).floor() as usize;
        let x = column.min(component.width - 1);
        let value = ((frequency - BLACK_TONE) / TONE_SPAN * 255.0).clamp(0.0, 255.0);

        self.line.write(component.channel, x, value);
        events.push(DecoderEvent::Pixel {
            x,
            y: self.row,
            color: preview_color(component.channel, value),
        });
    }

    fn flush_line(&mut self, events: &mut Vec<DecoderEvent>) {
        let pixels = rasterize_line(&self.line, self.mode.timing());
        if self.row < self.raster.height() as usize {
            for (x, pixel) in pixels.iter().enumerate() {
                self.raster.put_pixel(x as u32, self.row as u32, *pixel);
            }
        }
        tracing::trace!(row = self.row, "line flushed");

        events.push(DecoderEvent::Line {
            y: self.row,
            pixels,
        });
        self.row += 1;
        self.line.clear();
    }

    fn complete(&mut self, now_ms: f64, events: &mut Vec<DecoderEvent>) {
        let timing = self.mode.timing();
        let image = std::mem::replace(
            &mut self.raster,
            RgbImage::new(timing.width as u32, timing.height as u32),
        );
        let decoded = DecodedImage {
            id: self.completed,
            timestamp_ms: now_ms,
            mode: self.mode,
            image,
        };
        tracing::info!(id = decoded.id, mode = %self.mode, "image completed");

        self.completed += 1;
        self.state = SyncState::Idle;
        self.row = 0;
        events.push(DecoderEvent::Completed(decoded));
    }

    fn clear_raster(&mut self) {
        for pixel in self.raster.pixels_mut() {
            *pixel = Rgb([0, 0, 0]);
        }
    }

    /// Stop decoding. Back to idle with empty buffers; picture numbering carries on.
    pub fn reset(&mut self) {
        self.sync.reset();
        self.state = SyncState::Idle;
        self.last_line_ms = 0.0;
        self.row = 0;
        self.line.clear();
        self.clear_raster();
    }

    /// Reset and start listening for another mode.
    pub fn switch_mode(&mut self, mode: Mode) {
        let completed = self.completed;
        *self = Self::new(mode);
        self.completed = completed;
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use approx::assert_abs_diff_eq;

    use super::*;

    fn lock(session: &mut DecoderSession, start_ms: f64, step_ms: f64) -> f64 {
        let mut now = start_ms;
        for _ in 0..8 {
            session.step(1200.0, now);
            now += step_ms;
        }
        now - step_ms
    }

    fn tone_for(value: f32) -> f32 {
        BLACK_TONE + value / 255.0 * TONE_SPAN
    }

    #[test]
    fn eighth_sync_sample_locks() {
        let mut session = DecoderSession::new(Mode::Robot36);
        for i in 0..7 {
            assert!(session.step(1200.0, i as f64).is_empty());
        }
        assert_eq!(session.state(), SyncState::Idle);

        let events = session.step(1195.0, 7.0);
        assert_eq!(events, vec![DecoderEvent::Locked { timestamp_ms: 7.0 }]);
        assert_eq!(session.state(), SyncState::Decoding);
        assert_eq!(session.strikes(), 0.0);
        assert_eq!(session.confidence(), 80.0);
    }

    #[test]
    fn no_lock_without_a_run() {
        // Each isolated hit is paid back by the five misses after it.
        let mut session = DecoderSession::new(Mode::Robot36);
        for i in 0..1000 {
            let frequency = if i % 6 == 0 { 1200.0 } else { 1900.0 };
            assert!(session.step(frequency, i as f64 * 0.1).is_empty());
            assert!(session.strikes() < 1.0 + f32::EPSILON);
        }
        assert_eq!(session.state(), SyncState::Idle);
    }

    #[test]
    fn bounded_over_long_runs() {
        let mut session = DecoderSession::new(Mode::Scottie1);
        let mut now = 0.0;
        for i in 0..200_000 {
            let frequency = match (i / 5000) % 3 {
                0 => 1200.0,
                1 => 0.0,
                _ => 1900.0,
            };
            session.step(frequency, now);
            now += 0.25;
            assert!((0.0..=100.0).contains(&session.confidence()));
            assert!(session.strikes() >= 0.0);
            assert!(session.row() <= 256);
        }
    }

    #[test]
    fn column_from_elapsed_time() {
        let mut session = DecoderSession::new(Mode::Scottie1);
        let locked = lock(&mut session, 0.0, 1.0);
        assert_eq!(locked, 7.0);

        // 51 is exactly 160 Hz above black.
        let frequency = 1660.0;

        // Inside the sync and break.
        assert!(session.step(frequency, locked + 5.0).is_empty());
        // Green, 89.5 ms into the component.
        assert_eq!(
            session.step(frequency, locked + 100.0),
            vec![DecoderEvent::Pixel {
                x: 207,
                y: 0,
                color: Rgb([0, 51, 0]),
            }]
        );
        // Gap between green and blue.
        assert!(session.step(frequency, locked + 149.24).is_empty());
        // Blue, 10 ms into the component.
        assert_eq!(
            session.step(frequency, locked + 160.24),
            vec![DecoderEvent::Pixel {
                x: 23,
                y: 0,
                color: Rgb([0, 0, 51]),
            }]
        );
        // Not a picture tone.
        assert!(session.step(1300.0, locked + 200.0).is_empty());
        // Past the end of the line.
        assert!(session.step(frequency, locked + 430.0).is_empty());

        assert_abs_diff_eq!(
            session.line().get(Channel::G, 207).unwrap_or_default(),
            51.0,
            epsilon = 1e-3
        );
        assert_abs_diff_eq!(
            session.line().get(Channel::B, 23).unwrap_or_default(),
            51.0,
            epsilon = 1e-3
        );
    }

    #[test]
    fn tones_are_clamped() {
        let mut session = DecoderSession::new(Mode::Robot8Bw);
        let locked = lock(&mut session, 0.0, 1.0);
        // 1450 Hz is below black, 2500 Hz is above white.
        session.step(1450.0, locked + 11.0);
        session.step(2500.0, locked + 40.0);
        let low = ((11.0 - 10.0) / 56.66 * 160.0) as usize;
        let high = ((40.0 - 10.0) / 56.66 * 160.0) as usize;
        assert_eq!(session.line().get(Channel::Y, low), Some(0.0));
        assert_eq!(session.line().get(Channel::Y, high), Some(255.0));
    }

    #[test]
    fn early_sync_is_ignored_while_decoding() {
        let mut session = DecoderSession::new(Mode::Robot36);
        let locked = lock(&mut session, 0.0, 1.0);
        // A second run of sync tone half way through the line.
        for i in 0..20 {
            assert!(session.step(1200.0, locked + 60.0 + i as f64).is_empty());
        }
        assert_eq!(session.row(), 0);

        // Accepted once 80% of the line has passed.
        let mut events = vec![];
        for i in 0..8 {
            events.extend(session.step(1200.0, locked + 120.0 + i as f64));
        }
        assert_eq!(session.row(), 1);
        assert!(matches!(events.as_slice(), [DecoderEvent::Line { y: 0, .. }]));
    }

    ///
    /// Feeds a picture at a sample accurate cadence: every line is one flat gray level.
    ///
    #[test]
    fn decodes_a_whole_picture() {
        let mode = Mode::Robot8Bw;
        let timing = mode.timing();
        let line_time = timing.total_line_time as f64;
        let level = |row: usize| (row * 2 % 256) as f32;

        let mut session = DecoderSession::new(mode);
        let mut events = vec![];
        let step_ms = 0.05;
        let ticks = ((timing.height as f64 + 0.5) * line_time / step_ms) as usize;
        for tick in 0..ticks {
            let now = tick as f64 * step_ms;
            let row = (now / line_time) as usize;
            let local = now - row as f64 * line_time;
            let frequency = if row >= timing.height || local < timing.sync_duration as f64 {
                1200.0
            } else {
                tone_for(level(row))
            };
            session.step_into(frequency, now, &mut events);
        }

        let lines = events
            .iter()
            .filter(|event| matches!(event, DecoderEvent::Line { .. }))
            .count();
        assert_eq!(lines, timing.height);
        assert!(matches!(events.first(), Some(DecoderEvent::Locked { .. })));

        let Some(DecoderEvent::Completed(decoded)) = events
            .iter()
            .find(|event| matches!(event, DecoderEvent::Completed(_)))
        else {
            panic!("no completed image");
        };
        assert_eq!(decoded.id, 0);
        assert_eq!(decoded.mode, mode);
        assert_eq!(decoded.image.dimensions(), (160, 120));
        for y in 0..120 {
            let expected = level(y) as u8;
            // The sync is accepted a few ticks into the pulse, the tail columns stay black.
            for x in 0..150 {
                assert_eq!(
                    decoded.image.get_pixel(x, y as u32),
                    &Rgb([expected, expected, expected]),
                    "({x}, {y})"
                );
            }
        }
        // The closing sync pulse is long enough to lock on the next picture.
        assert_eq!(session.state(), SyncState::Decoding);
        assert_eq!(session.row(), 0);
    }

    ///
    /// A display refresh clock: ticks every 16.667 ms give or take a few ms, so only a few
    /// columns of each line are ever seen.
    ///
    #[test]
    fn coarse_clock_leaves_gaps() {
        const JITTER: [f64; 7] = [0.0, 2.4, -3.1, 1.7, -0.6, 3.3, -2.2];
        let mut session = DecoderSession::new(Mode::Scottie1);
        let mut now = 1000.0;
        let mut tick = 0;
        let mut next = |now: &mut f64| {
            *now += 16.667 + JITTER[tick % JITTER.len()];
            tick += 1;
        };

        let mut events = vec![];
        for _ in 0..8 {
            session.step_into(1200.0, now, &mut events);
            next(&mut now);
        }
        assert!(matches!(events.as_slice(), [DecoderEvent::Locked { .. }]));
        events.clear();

        let frequency = tone_for(64.0);
        for _ in 0..32 {
            session.step_into(frequency, now, &mut events);
            next(&mut now);
        }
        let pixels: Vec<(usize, Rgb<u8>)> = events
            .iter()
            .filter_map(|event| match event {
                DecoderEvent::Pixel { x, y: 0, color } => Some((*x, *color)),
                _ => None,
            })
            .collect();
        assert_eq!(pixels.len(), events.len());
        assert!(pixels.len() > 15 && pixels.len() < 32);
        events.clear();

        for _ in 0..8 {
            session.step_into(1200.0, now, &mut events);
            next(&mut now);
        }
        let Some(DecoderEvent::Line { y: 0, pixels: row }) = events.first() else {
            panic!("line was not flushed");
        };

        // Every preview column shows up in the row, every other column is black.
        for (x, color) in &pixels {
            let [r, g, b] = row[*x].0;
            assert_eq!(r.max(g).max(b), 64);
            assert_eq!(color.0.iter().copied().max(), Some(64));
        }
        let columns: BTreeSet<usize> = pixels.iter().map(|(x, _)| *x).collect();
        let black = row.iter().filter(|pixel| **pixel == Rgb([0, 0, 0])).count();
        assert_eq!(black, 320 - columns.len());
    }

    #[test]
    fn reset_goes_back_to_idle() {
        let mut session = DecoderSession::new(Mode::Robot36);
        let locked = lock(&mut session, 0.0, 1.0);
        session.step(tone_for(200.0), locked + 30.0);
        assert!(!session.line().is_empty());

        session.reset();
        assert_eq!(session.state(), SyncState::Idle);
        assert_eq!(session.row(), 0);
        assert_eq!(session.confidence(), 0.0);
        assert!(session.line().is_empty());

        session.switch_mode(Mode::Martin1);
        assert_eq!(session.mode(), Mode::Martin1);
        assert_eq!(session.raster().dimensions(), (320, 256));
    }

    #[test]
    fn spectrum_ticks_use_the_estimator() {
        let mut session = DecoderSession::new(Mode::Robot36);
        let bin_width = 44100.0 / 2048.0;
        let mut magnitudes = vec![-150.0; 1024];
        let bin = (1200.0 / bin_width) as usize;
        magnitudes[bin] = -20.0;
        magnitudes[bin + 1] = -20.0;
        let spectrum = Spectrum {
            magnitudes,
            bin_width,
        };

        let mut events = vec![];
        for i in 0..8 {
            events.extend(session.step_spectrum(&spectrum, true, i as f64 * 16.667));
        }
        assert!(matches!(events.as_slice(), [DecoderEvent::Locked { .. }]));
    }
}
