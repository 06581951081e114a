// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

/// A colour channel carried by one scan segment of a line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Y,
    U,
    V,
    R,
    G,
    B,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Y,
        Channel::U,
        Channel::V,
        Channel::R,
        Channel::G,
        Channel::B,
    ];

    /// Dense index, used to keep per-channel buffers in a plain array.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Channel::Y => 0,
            Channel::U => 1,
            Channel::V => 2,
            Channel::R => 3,
            Channel::G => 4,
            Channel::B => 5,
        }
    }

    pub const fn name(self) -> char {
        match self {
            Channel::Y => 'Y',
            Channel::U => 'U',
            Channel::V => 'V',
            Channel::R => 'R',
            Channel::G => 'G',
            Channel::B => 'B',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorEncoding {
    /// Luma plus two colour differences, centred on 128.
    Yuv,
    Rgb,
    /// Luma only.
    Bw,
}

/// One scan segment: `width` samples of `channel` spread over `duration` ms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Component {
    pub channel: Channel,
    pub duration: f32,
    pub width: usize,
}

impl Component {
    const fn new(channel: Channel, duration: f32, width: usize) -> Self {
        Self {
            channel,
            duration,
            width,
        }
    }
}

///
/// Timing and geometry of one SSTV mode.
///
/// All durations are in milliseconds, all frequencies in Hz. The components are listed in
/// transmission order, each one followed by `gap_duration` of break tone on the decoding side.
///
/// `total_line_time` equals `sync_duration + break_duration + Σ(component.duration +
/// gap_duration)`.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModeTiming {
    pub name: &'static str,
    pub width: usize,
    pub height: usize,
    pub vis_code: u8,
    pub sync_freq: f32,
    pub sync_duration: f32,
    pub break_freq: f32,
    pub break_duration: f32,
    pub gap_duration: f32,
    pub total_line_time: f32,
    pub color_encoding: ColorEncoding,
    pub components: &'static [Component],
}

impl ModeTiming {
    ///
    /// Robot 8 B/W
    ///
    /// Color Mode: luminance only, one scan per line.
    ///
    /// Image Size: 160x120
    ///
    pub const ROBOT8_BW: Self = Self {
        name: "Robot 8 (B/W)",
        width: 160,
        height: 120,
        vis_code: 2,
        sync_freq: 1200.0,
        sync_duration: 10.0,
        break_freq: 1500.0,
        break_duration: 0.0,
        gap_duration: 0.0,
        total_line_time: 66.66,
        color_encoding: ColorEncoding::Bw,
        components: &[Component::new(Channel::Y, 56.66, 160)],
    };

    ///
    /// Robot 36
    ///
    /// Color Mode: YUV, chroma at half horizontal resolution.
    /// Scan Sequence: Y, V, U
    ///
    /// Image Size: 320x240
    ///
    pub const ROBOT36: Self = Self {
        name: "Robot 36",
        width: 320,
        height: 240,
        vis_code: 8,
        sync_freq: 1200.0,
        sync_duration: 9.0,
        break_freq: 1500.0,
        break_duration: 3.0,
        gap_duration: 1.5,
        total_line_time: 148.5,
        color_encoding: ColorEncoding::Yuv,
        components: &[
            Component::new(Channel::Y, 88.0, 320),
            Component::new(Channel::V, 22.0, 160),
            Component::new(Channel::U, 22.0, 160),
        ],
    };

    ///
    /// Martin 1
    ///
    /// Color Mode: RGB
    /// Scan Sequence: Green, Blue, Red
    ///
    /// Image Size: 320x256
    ///
    pub const MARTIN1: Self = Self {
        name: "Martin 1",
        width: 320,
        height: 256,
        vis_code: 44,
        sync_freq: 1200.0,
        sync_duration: 4.862,
        break_freq: 1500.0,
        break_duration: 0.572,
        gap_duration: 0.572,
        total_line_time: 446.446,
        color_encoding: ColorEncoding::Rgb,
        components: &[
            Component::new(Channel::G, 146.432, 320),
            Component::new(Channel::B, 146.432, 320),
            Component::new(Channel::R, 146.432, 320),
        ],
    };

    ///
    /// Scottie 1
    ///
    /// Color Mode: RGB
    /// Scan Sequence: Green, Blue, Red
    ///
    /// Image Size: 320x256
    ///
    pub const SCOTTIE1: Self = Self {
        name: "Scottie 1",
        width: 320,
        height: 256,
        vis_code: 60,
        sync_freq: 1200.0,
        sync_duration: 9.0,
        break_freq: 1500.0,
        break_duration: 1.5,
        gap_duration: 1.5,
        total_line_time: 429.72,
        color_encoding: ColorEncoding::Rgb,
        components: &[
            Component::new(Channel::G, 138.24, 320),
            Component::new(Channel::B, 138.24, 320),
            Component::new(Channel::R, 138.24, 320),
        ],
    };

    ///
    /// Wraase SC2-180
    ///
    /// Color Mode: RGB
    /// Scan Sequence: Red, Green, Blue
    ///
    /// Image Size: 320x256
    ///
    pub const WRAASE_SC2_180: Self = Self {
        name: "Wraase SC2-180",
        width: 320,
        height: 256,
        vis_code: 55,
        sync_freq: 1200.0,
        sync_duration: 5.0,
        break_freq: 1500.0,
        break_duration: 0.5,
        gap_duration: 0.5,
        total_line_time: 712.0,
        color_encoding: ColorEncoding::Rgb,
        components: &[
            Component::new(Channel::R, 235.0, 320),
            Component::new(Channel::G, 235.0, 320),
            Component::new(Channel::B, 235.0, 320),
        ],
    };

    /// Sync pulse plus break tone, i.e. where the first component starts.
    #[inline]
    pub fn header_end(&self) -> f32 {
        self.sync_duration + self.break_duration
    }

    /// Line length recomputed from the components.
    pub fn scan_time(&self) -> f32 {
        self.header_end()
            + self
                .components
                .iter()
                .map(|component| component.duration + self.gap_duration)
                .sum::<f32>()
    }

    /// The component carrying `channel`, if this mode transmits it.
    pub fn component(&self, channel: Channel) -> Option<&Component> {
        self.components
            .iter()
            .find(|component| component.channel == channel)
    }
}
