// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

/// Sync pulse frequency.
pub const SYNC_TONE: f32 = 1200.0;

/// A tick closer than this to [`SYNC_TONE`] counts as a sync hit.
pub const SYNC_TOLERANCE: f32 = 30.0;

/// Strikes needed before a sync is accepted, exclusive.
pub const STRIKE_THRESHOLD: f32 = 7.0;

/// While decoding, a new sync is only accepted after this share of a line.
pub const LINE_GATE: f32 = 0.8;

const STRIKE_DECAY: f32 = 0.2;
const CONFIDENCE_STEP: f32 = 10.0;
const CONFIDENCE_DECAY: f32 = 0.3;
const CONFIDENCE_MAX: f32 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Decoding,
}

///
/// Run-length detector for sync pulses.
///
/// Every tick near 1200 Hz adds a strike and raises the confidence; every other tick lets
/// both decay towards zero. Strikes are real valued, so a short glitch inside a sync pulse
/// only costs a fraction of a strike.
///
#[derive(Clone, Debug, PartialEq)]
pub struct SyncDetector {
    strikes: f32,
    confidence: f32,
}

impl Default for SyncDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncDetector {
    pub fn new() -> Self {
        Self {
            strikes: 0.0,
            confidence: 0.0,
        }
    }

    pub fn strikes(&self) -> f32 {
        self.strikes
    }

    /// Lock confidence in `[0, 100]`.
    pub fn confidence(&self) -> f32 {
        self.confidence
    }

    pub fn is_sync_tone(frequency: f32) -> bool {
        (frequency - SYNC_TONE).abs() < SYNC_TOLERANCE
    }

    /// Account for one tick. Returns whether it was a sync hit.
    pub fn observe(&mut self, frequency: f32) -> bool {
        let hit = Self::is_sync_tone(frequency);
        if hit {
            self.strikes += 1.0;
            self.confidence = (self.confidence + CONFIDENCE_STEP).min(CONFIDENCE_MAX);
        } else {
            self.strikes = (self.strikes - STRIKE_DECAY).max(0.0);
            self.confidence = (self.confidence - CONFIDENCE_DECAY).max(0.0);
        }
        hit
    }

    ///
    /// Whether a sync may be accepted `elapsed` ms after the previous one.
    ///
    /// When idle any long enough run of strikes is accepted, there is no line to protect.
    ///
    pub fn should_accept(&self, elapsed: f32, total_line_time: f32, state: SyncState) -> bool {
        self.strikes > STRIKE_THRESHOLD
            && (elapsed > LINE_GATE * total_line_time || state == SyncState::Idle)
    }

    /// Start counting strikes for the next sync. The confidence is kept.
    pub fn accept(&mut self) {
        self.strikes = 0.0;
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
