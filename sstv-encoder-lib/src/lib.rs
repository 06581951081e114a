//! # sstv-encoder-lib
//!
//! sstv-encoder-lib is a library to convert images into audio using the Slow Scan Television algorithms.
//!
//! Samples are generated as `f32` in `[-1, 1]` at 44100 Hz unless another sample rate is asked
//! for, and written to files as 16 bit pcm.
//!
//! For more detail, see encode_picture_into_pcm and encode_picture_into_file.

mod header;
pub mod sample_generator;
mod scan;
pub mod sstv_image;

use std::{fs::File, path::Path};

use sstv_mode_lib::Mode;
use thiserror::Error;
use wav_io::writer::i16samples_to_file;

pub use header::generate_header;
pub use sample_generator::{DEFAULT_SAMPLE_RATE, SampleGenerator};
pub use scan::{generate_line, generate_scan};
pub use sstv_image::SSTVImage;

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("Load image error: {0}")]
    LoadImage(#[from] image::ImageError),

    #[error("Create output file error: {0}")]
    CreateFileError(String),

    #[error("Write output file error: {0}")]
    WriteFileError(String),
}

/// Load the picture to send. Fails before any audio is generated.
pub fn load_image(path: impl AsRef<Path>) -> Result<SSTVImage, EncodeError> {
    SSTVImage::open(path)
}

///
/// Append the header and every scanline of `image` to `ctx`.
///
/// The image is resized to the mode geometry first. Returns the number of samples written.
///
pub fn encode_picture_into_pcm(
    ctx: &mut SampleGenerator,
    image: &SSTVImage,
    mode: Mode,
) -> usize {
    let timing = mode.timing();
    let start = ctx.len();
    tracing::info!(%mode, sample_rate = ctx.sample_rate(), "encoding picture");

    let image = image.resize(timing.width, timing.height);
    generate_header(ctx, timing);
    generate_scan(ctx, &image, timing);

    let written = ctx.len() - start;
    tracing::info!(
        samples = written,
        seconds = written as f64 / ctx.sample_rate() as f64,
        "picture encoded"
    );
    written
}

/// Generate pure pcm data.
pub fn encode_picture(image: &SSTVImage, mode: Mode, sample_rate: u32) -> Vec<f32> {
    let mut ctx = SampleGenerator::new(sample_rate);
    encode_picture_into_pcm(&mut ctx, image, mode);
    ctx.into_samples()
}

/// Scale samples by `volume` and convert them to 16 bit pcm.
pub fn to_i16_samples(samples: &[f32], volume: f32) -> Vec<i16> {
    samples
        .iter()
        .map(|sample| (32767.0 * (sample * volume).clamp(-1.0, 1.0)).floor() as i16)
        .collect()
}

/// Encode the picture into a 16 bit mono wav file.
pub fn encode_picture_into_file(
    image: &SSTVImage,
    mode: Mode,
    name: impl AsRef<Path>,
    sample_rate: u32,
    volume: f32,
) -> Result<File, EncodeError> {
    let mut file =
        File::create(name).map_err(|error| EncodeError::CreateFileError(error.to_string()))?;

    let head = wav_io::new_header(sample_rate, 16, false, true);
    let samples = to_i16_samples(&encode_picture(image, mode, sample_rate), volume);
    i16samples_to_file(&mut file, &head, &samples)
        .map_err(|error| EncodeError::WriteFileError(error.to_string()))?;

    Ok(file)
}
