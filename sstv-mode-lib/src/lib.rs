//! # sstv-mode-lib
//!
//! Timing tables of the SSTV modes understood by the encoder and the decoder.
//!
//! The set of modes is closed: every lookup goes through [`Mode`], so an unknown mode can
//! not be asked for. The tables and the per-mode [`LineLayout`] are built once per process
//! and never change afterwards.

mod layout;
mod timing;

use std::{fmt, str::FromStr, sync::OnceLock};

use thiserror::Error;

pub use layout::{ComponentSlot, LineLayout};
pub use timing::{Channel, ColorEncoding, Component, ModeTiming};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown SSTV mode \"{0}\", expected one of robot8, robot36, martin1, scottie1, wraase180")]
pub struct ParseModeError(String);

/// Support modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Robot8Bw,
    Robot36,
    Martin1,
    Scottie1,
    WraaseSc2_180,
}

struct Registry {
    timings: [&'static ModeTiming; 5],
    layouts: [LineLayout; 5],
}

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let timings = Mode::ALL.map(|mode| match mode {
            Mode::Robot8Bw => &ModeTiming::ROBOT8_BW,
            Mode::Robot36 => &ModeTiming::ROBOT36,
            Mode::Martin1 => &ModeTiming::MARTIN1,
            Mode::Scottie1 => &ModeTiming::SCOTTIE1,
            Mode::WraaseSc2_180 => &ModeTiming::WRAASE_SC2_180,
        });
        let layouts = timings.map(LineLayout::new);
        Registry { timings, layouts }
    })
}

impl Mode {
    pub const ALL: [Mode; 5] = [
        Mode::Robot8Bw,
        Mode::Robot36,
        Mode::Martin1,
        Mode::Scottie1,
        Mode::WraaseSc2_180,
    ];

    #[inline]
    const fn index(self) -> usize {
        match self {
            Mode::Robot8Bw => 0,
            Mode::Robot36 => 1,
            Mode::Martin1 => 2,
            Mode::Scottie1 => 3,
            Mode::WraaseSc2_180 => 4,
        }
    }

    pub fn timing(self) -> &'static ModeTiming {
        registry().timings[self.index()]
    }

    pub fn layout(self) -> &'static LineLayout {
        &registry().layouts[self.index()]
    }

    /// The name used on the command line and in file names.
    pub const fn short_name(self) -> &'static str {
        match self {
            Mode::Robot8Bw => "robot8",
            Mode::Robot36 => "robot36",
            Mode::Martin1 => "martin1",
            Mode::Scottie1 => "scottie1",
            Mode::WraaseSc2_180 => "wraase180",
        }
    }

    pub fn from_vis_code(vis_code: u8) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.timing().vis_code == vis_code)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.timing().name)
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        Self::ALL
            .into_iter()
            .find(|mode| {
                let long: String = mode
                    .timing()
                    .name
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                wanted == mode.short_name() || wanted == long
            })
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}
