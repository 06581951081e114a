// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sstv_encoder_lib::DEFAULT_SAMPLE_RATE;
use sstv_mode_lib::Mode;

use crate::config::Frontend;

#[derive(Debug, Parser)]
#[command(name = "sstv", version, about = "Slow Scan Television encoder and decoder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Turn a picture into an SSTV transmission
    Encode(EncodeArgs),

    /// Recover pictures from a recorded transmission
    Decode(DecodeArgs),

    /// List the supported modes
    Modes,
}

#[derive(Debug, Args)]
pub struct EncodeArgs {
    /// Picture to send, in any common image format.
    pub image: PathBuf,

    #[arg(short, long, default_value = "robot36")]
    pub mode: Mode,

    /// Output wav file. Defaults to the picture name with the mode appended.
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_SAMPLE_RATE)]
    pub sample_rate: u32,

    /// Linear gain applied before writing 16 bit samples.
    #[arg(long, default_value_t = 0.5)]
    pub volume: f32,
}

///
/// Options of the decoder. Anything not given here is taken from `--config`, then from
/// the built in defaults.
///
#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Recorded transmission, a wav file.
    pub input: PathBuf,

    /// Mode to listen for. Defaults to robot36.
    #[arg(short, long)]
    pub mode: Option<Mode>,

    /// TOML decode profile.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub frontend: Option<Frontend>,

    /// Size of segments that are FFT'd
    #[arg(long)]
    pub fft_size: Option<usize>,

    /// Spectrum tick period in milliseconds.
    #[arg(long)]
    pub tick_ms: Option<f64>,

    /// Treat quiet spectra as no signal.
    #[arg(long)]
    pub noise_gate: Option<bool>,

    /// Band-pass the audio to 1-3 kHz first.
    #[arg(long)]
    pub bandpass: Option<bool>,

    /// Residual accepted by the tone demodulator.
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Only use every n-th tone tick.
    #[arg(long)]
    pub decimation: Option<usize>,

    /// Where decoded pictures are written.
    #[arg(short, long = "output")]
    pub output_dir: Option<PathBuf>,
}
