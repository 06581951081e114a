//! # sstv-decoder-lib
//!
//! Turn a stream of SSTV tones back into images.
//!
//! A [`TickSource`] turns audio into `(frequency, timestamp)` ticks, either from spectral
//! snapshots ([`SpectrumTicks`]) or straight from PCM ([`ToneTicks`]). Each tick is fed to a
//! [`DecoderSession`], which tracks the sync pulses, sorts the tones into the colour
//! components of the current line and rasterizes finished lines. [`SSTVDecoder`] drives a
//! session from a tick source and keeps the last completed images in a bounded [`History`].
//!
//! ```no_run
//! use sstv_decoder_lib::{SSTVDecoder, ToneDemodulator, ToneTicks};
//! use sstv_mode_lib::Mode;
//!
//! # let samples: Vec<f32> = vec![];
//! let mut decoder = SSTVDecoder::new(Mode::Robot36);
//! let ticks = ToneTicks::new(&ToneDemodulator::new(44100.0), &samples);
//! decoder.run(ticks, |_event| {});
//! for image in decoder.history().iter() {
//!     println!("{} at {} ms", image.mode, image.timestamp_ms);
//! }
//! ```

mod bandpass_filter;
mod demodulator;
mod frequency;
mod history;
mod line_buffer;
mod rasterizer;
mod session;
mod source;
mod spectrum;
mod sstv_decoder;
mod sync;

use thiserror::Error;

pub use bandpass_filter::bandpass_filter;
pub use demodulator::{DEFAULT_TOLERANCE, ToneDemodulator};
pub use frequency::{
    NO_SIGNAL, NOISE_FLOOR_DB, SEARCH_BAND_HIGH, SEARCH_BAND_LOW, estimate_frequency,
    parabolic_offset,
};
pub use history::{HISTORY_CAPACITY, History};
pub use line_buffer::LineBuffer;
pub use rasterizer::{rasterize_line, yuv_to_rgb};
pub use session::{DecodedImage, DecoderEvent, DecoderSession};
pub use source::{DEFAULT_TICK_MS, FromFn, SpectrumTicks, Tick, TickSource, ToneTicks, from_fn};
pub use spectrum::{DEFAULT_FFT_SIZE, Spectrum, SpectrumAnalyzer};
pub use sstv_decoder::SSTVDecoder;
pub use sync::{SyncDetector, SyncState};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("FFT size must be even and at least 4, got {0}")]
    FftSize(usize),
    #[error("Unusable sample rate {0} Hz")]
    SampleRate(f32),
    #[error("Cannot build the band-pass filter: {0}")]
    Filter(String),
}
