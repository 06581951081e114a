// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use sstv_mode_lib::{Channel, ModeTiming};

///
/// Samples of the scanline being received, one row per channel, indexed by column.
///
/// A column stays `None` until a tone for it arrives. Channels the mode does not transmit
/// have no columns at all.
///
#[derive(Clone, Debug, PartialEq)]
pub struct LineBuffer {
    channels: [Vec<Option<f32>>; 6],
}

impl LineBuffer {
    pub fn new(timing: &ModeTiming) -> Self {
        let mut channels: [Vec<Option<f32>>; 6] = Default::default();
        for component in timing.components {
            channels[component.channel.index()] = vec![None; component.width];
        }
        Self { channels }
    }

    /// Store `value` at column `x`. Columns outside the channel are ignored.
    pub fn write(&mut self, channel: Channel, x: usize, value: f32) {
        if let Some(slot) = self.channels[channel.index()].get_mut(x) {
            *slot = Some(value);
        }
    }

    pub fn get(&self, channel: Channel, x: usize) -> Option<f32> {
        self.channels[channel.index()].get(x).copied().flatten()
    }

    /// Number of columns held for `channel`.
    pub fn width(&self, channel: Channel) -> usize {
        self.channels[channel.index()].len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.iter().flatten().all(Option::is_none)
    }

    pub fn clear(&mut self) {
        for channel in self.channels.iter_mut() {
            channel.fill(None);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn sized_by_components() {
        let buffer = LineBuffer::new(&ModeTiming::ROBOT36);
        assert_eq!(buffer.width(Channel::Y), 320);
        assert_eq!(buffer.width(Channel::U), 160);
        assert_eq!(buffer.width(Channel::V), 160);
        assert_eq!(buffer.width(Channel::R), 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn write_then_clear() {
        let mut buffer = LineBuffer::new(&ModeTiming::SCOTTIE1);
        buffer.write(Channel::G, 5, 200.0);
        buffer.write(Channel::G, 320, 1.0);
        buffer.write(Channel::Y, 0, 1.0);

        assert_eq!(buffer.get(Channel::G, 5), Some(200.0));
        assert_eq!(buffer.get(Channel::G, 4), None);
        assert_eq!(buffer.get(Channel::G, 320), None);
        assert_eq!(buffer.get(Channel::Y, 0), None);
        assert!(!buffer.is_empty());

        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.width(Channel::G), 320);
    }
}
