// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Error, WrapErr, bail};
use serde::Deserialize;
use sstv_decoder_lib::{DEFAULT_FFT_SIZE, DEFAULT_TICK_MS, DEFAULT_TOLERANCE};
use sstv_mode_lib::Mode;

use crate::args::DecodeArgs;

/// How audio is turned into frequency ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Frontend {
    /// FFT snapshots at a display refresh cadence.
    #[default]
    Spectrum,
    /// Per-sample tone demodulation.
    Tone,
}

///
/// Decode settings read from a TOML file.
///
/// ```toml
/// mode = "scottie1"
/// frontend = "tone"
/// bandpass = true
/// output_dir = "pictures"
/// ```
///
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DecodeProfile {
    pub mode: Option<String>,
    pub frontend: Option<Frontend>,
    pub fft_size: Option<usize>,
    pub tick_ms: Option<f64>,
    pub noise_gate: Option<bool>,
    pub bandpass: Option<bool>,
    pub tolerance: Option<f64>,
    pub decimation: Option<usize>,
    pub output_dir: Option<PathBuf>,
}

impl DecodeProfile {
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Could not read {}", path.display()))?;
        Self::parse(&text).wrap_err_with(|| format!("Invalid decode profile {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self, Error> {
        Ok(toml::from_str(text)?)
    }
}

/// Effective decode settings: command line first, then the profile, then defaults.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodeSettings {
    pub mode: Mode,
    pub frontend: Frontend,
    pub fft_size: usize,
    pub tick_ms: f64,
    pub noise_gate: bool,
    pub bandpass: bool,
    pub tolerance: f64,
    pub decimation: usize,
    pub output_dir: PathBuf,
}

impl DecodeSettings {
    pub fn resolve(args: &DecodeArgs, profile: DecodeProfile) -> Result<Self, Error> {
        let mode = match (args.mode, profile.mode) {
            (Some(mode), _) => mode,
            (None, Some(name)) => name.parse()?,
            (None, None) => Mode::Robot36,
        };

        let settings = Self {
            mode,
            frontend: args.frontend.or(profile.frontend).unwrap_or_default(),
            fft_size: args.fft_size.or(profile.fft_size).unwrap_or(DEFAULT_FFT_SIZE),
            tick_ms: args.tick_ms.or(profile.tick_ms).unwrap_or(DEFAULT_TICK_MS),
            noise_gate: args.noise_gate.or(profile.noise_gate).unwrap_or(true),
            bandpass: args.bandpass.or(profile.bandpass).unwrap_or(false),
            tolerance: args
                .tolerance
                .or(profile.tolerance)
                .unwrap_or(DEFAULT_TOLERANCE),
            decimation: args.decimation.or(profile.decimation).unwrap_or(1),
            output_dir: args
                .output_dir
                .clone()
                .or(profile.output_dir)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        if !(settings.tick_ms > 0.0) {
            bail!("Tick period must be greater than 0 ms");
        }
        if !(settings.tolerance > 0.0) {
            bail!("Demodulator tolerance must be greater than 0");
        }
        if settings.decimation == 0 {
            bail!("Decimation must be at least 1");
        }

        Ok(settings)
    }
}
