// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use crate::timing::{Component, ModeTiming};

/// A component together with its start time, relative to the end of the line header.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ComponentSlot {
    pub component: Component,
    pub start: f32,
}

impl ComponentSlot {
    #[inline]
    pub fn end(&self) -> f32 {
        self.start + self.component.duration
    }
}

///
/// Cumulative offsets of the components of one line.
///
/// Component `i` starts at `Σ_{j<i}(duration_j + gap)` after the sync pulse and break tone.
/// Slots are sorted and never overlap, so the active component for a point in time is the
/// last slot starting at or before it, provided that point lies before the slot's end.
///
#[derive(Clone, Debug, PartialEq)]
pub struct LineLayout {
    slots: Vec<ComponentSlot>,
}

impl LineLayout {
    pub fn new(timing: &ModeTiming) -> Self {
        let mut start = 0.0;
        let slots = timing
            .components
            .iter()
            .map(|component| {
                let slot = ComponentSlot {
                    component: *component,
                    start,
                };
                start += component.duration + timing.gap_duration;
                slot
            })
            .collect();

        Self { slots }
    }

    pub fn slots(&self) -> &[ComponentSlot] {
        &self.slots
    }

    ///
    /// Find the component being transmitted `local_time` ms after the line header.
    ///
    /// Returns the component and the time elapsed inside it, or `None` inside a gap and
    /// outside of the scanned part of the line.
    ///
    pub fn locate(&self, local_time: f32) -> Option<(Component, f32)> {
        if !(local_time >= 0.0) {
            return None;
        }

        let index = self.slots.partition_point(|slot| slot.start <= local_time);
        let slot = self.slots.get(index.checked_sub(1)?)?;
        let remainder = local_time - slot.start;

        (remainder < slot.component.duration).then_some((slot.component, remainder))
    }
}
