// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use sstv_mode_lib::Mode;

use crate::{
    history::History,
    session::{DecoderEvent, DecoderSession},
    source::{Tick, TickSource},
};

///
/// Drives a [`DecoderSession`] from a tick source and keeps the decoded pictures.
///
/// The history is only ever written here, when the session reports a completed picture.
///
pub struct SSTVDecoder {
    session: DecoderSession,
    history: History,
    events: Vec<DecoderEvent>,
}

impl SSTVDecoder {
    pub fn new(mode: Mode) -> Self {
        SSTVDecoder {
            session: DecoderSession::new(mode),
            history: History::new(),
            events: Vec::new(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    pub fn session(&self) -> &DecoderSession {
        &self.session
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Process one tick, handing every event to `on_event` before it is stored.
    pub fn feed(&mut self, tick: Tick, mut on_event: impl FnMut(&DecoderEvent)) {
        self.session
            .step_into(tick.frequency, tick.timestamp_ms, &mut self.events);

        for event in self.events.drain(..) {
            on_event(&event);
            if let DecoderEvent::Completed(image) = event {
                self.history.push(image);
            }
        }
    }

    /// Decode until the source runs dry. Returns how many ticks were processed.
    pub fn run<S: TickSource>(
        &mut self,
        source: S,
        mut on_event: impl FnMut(&DecoderEvent),
    ) -> usize {
        let mut ticks = 0;
        for tick in source {
            self.feed(tick, &mut on_event);
            ticks += 1;
        }
        tracing::debug!(ticks, images = self.history.len(), "source exhausted");
        ticks
    }

    /// Drop the picture in progress and listen for `mode` instead.
    pub fn switch_mode(&mut self, mode: Mode) {
        tracing::info!(from = %self.session.mode(), to = %mode, "switching mode");
        self.session.switch_mode(mode);
    }

    /// Drop the picture in progress. The history is kept.
    pub fn stop(&mut self) {
        self.session.reset();
    }
}
