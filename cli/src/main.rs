// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

mod args;
mod config;

use std::{fs::File, path::Path};

use clap::Parser;
use color_eyre::eyre::{Error, WrapErr, bail, eyre};
use sstv_decoder_lib::{
    DecoderEvent, SpectrumAnalyzer, SpectrumTicks, SSTVDecoder, ToneDemodulator, ToneTicks,
    bandpass_filter,
};
use sstv_encoder_lib::{encode_picture_into_file, load_image};
use sstv_mode_lib::Mode;
use tracing_subscriber::EnvFilter;

use crate::{
    args::{Cli, Command, DecodeArgs, EncodeArgs},
    config::{DecodeProfile, DecodeSettings, Frontend},
};

fn main() -> Result<(), Error> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    tracing::debug!(?cli);

    match cli.command {
        Command::Encode(args) => encode(args),
        Command::Decode(args) => decode(args),
        Command::Modes => {
            print_modes();
            Ok(())
        }
    }
}

fn encode(args: EncodeArgs) -> Result<(), Error> {
    if args.sample_rate == 0 {
        bail!("Sample rate must be greater than 0");
    }

    let output = args.output.unwrap_or_else(|| {
        let stem = args
            .image
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sstv".to_owned());
        args.image
            .with_file_name(format!("{stem}_{}.wav", args.mode.short_name()))
    });

    let image = load_image(&args.image)
        .wrap_err_with(|| format!("Could not load {}", args.image.display()))?;
    encode_picture_into_file(&image, args.mode, &output, args.sample_rate, args.volume)?;

    println!("{} -> {} ({})", args.image.display(), output.display(), args.mode);
    Ok(())
}

/// Read a wav file as mono samples.
fn read_wav(path: &Path) -> Result<(Vec<f32>, f32), Error> {
    let file =
        File::open(path).wrap_err_with(|| format!("Could not open {}", path.display()))?;
    let (head, samples) = wav_io::read_from_file(file)
        .map_err(|error| eyre!("Could not read {}: {error:?}", path.display()))?;
    tracing::debug!(?head, samples = samples.len());

    let channels = head.channels.max(1) as usize;
    let samples = if channels > 1 {
        tracing::warn!(channels, "mixing down to mono");
        samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    Ok((samples, head.sample_rate as f32))
}

fn decode(args: DecodeArgs) -> Result<(), Error> {
    let profile = match &args.config {
        Some(path) => DecodeProfile::load(path)?,
        None => DecodeProfile::default(),
    };
    let settings = DecodeSettings::resolve(&args, profile)?;
    tracing::debug!(?settings);

    let (samples, sample_rate) = read_wav(&args.input)?;
    let samples = if settings.bandpass {
        bandpass_filter(&samples, sample_rate)?
    } else {
        samples
    };

    let mut decoder = SSTVDecoder::new(settings.mode);
    let mut lines = 0;
    let on_event = |event: &DecoderEvent| match event {
        DecoderEvent::Locked { timestamp_ms } => {
            tracing::info!(timestamp_ms, "picture started");
        }
        DecoderEvent::Line { .. } => lines += 1,
        _ => {}
    };

    let ticks = match settings.frontend {
        Frontend::Spectrum => {
            let analyzer = SpectrumAnalyzer::new(settings.fft_size, sample_rate)?;
            let source = SpectrumTicks::new(analyzer, &samples, sample_rate)
                .with_tick_ms(settings.tick_ms)
                .with_noise_gate(settings.noise_gate);
            decoder.run(source, on_event)
        }
        Frontend::Tone => {
            let demodulator =
                ToneDemodulator::new(sample_rate).with_tolerance(settings.tolerance);
            let source =
                ToneTicks::new(&demodulator, &samples).with_decimation(settings.decimation);
            decoder.run(source, on_event)
        }
    };
    tracing::info!(ticks, "decoding finished");

    std::fs::create_dir_all(&settings.output_dir)
        .wrap_err_with(|| format!("Could not create {}", settings.output_dir.display()))?;
    for picture in decoder.history().iter() {
        let path = settings.output_dir.join(format!(
            "sstv_{}_{}.png",
            picture.id,
            picture.mode.short_name()
        ));
        picture
            .image
            .save(&path)
            .wrap_err_with(|| format!("Could not write {}", path.display()))?;
        println!("{} at {:.1} s", path.display(), picture.timestamp_ms / 1000.0);
    }

    println!(
        "{lines} lines, {} pictures decoded as {}",
        decoder.history().len(),
        settings.mode
    );
    Ok(())
}

fn print_modes() {
    println!(
        "{:<10} {:<16} {:>4} {:>8} {:>10}  colour",
        "name", "mode", "VIS", "size", "line (ms)"
    );
    for mode in Mode::ALL {
        let timing = mode.timing();
        println!(
            "{:<10} {:<16} {:>4} {:>8} {:>10.3}  {:?}",
            mode.short_name(),
            timing.name,
            timing.vis_code,
            format!("{}x{}", timing.width, timing.height),
            timing.total_line_time,
            timing.color_encoding,
        );
    }
}
