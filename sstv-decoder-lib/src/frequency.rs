// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

/// Returned when there is no usable tone.
pub const NO_SIGNAL: f32 = 0.0;

/// Lower edge of the band searched for the strongest tone.
pub const SEARCH_BAND_LOW: f32 = 800.0;

/// Upper edge of the band searched for the strongest tone.
pub const SEARCH_BAND_HIGH: f32 = 2800.0;

/// With the noise gate on, peaks below this level count as silence.
pub const NOISE_FLOOR_DB: f32 = -90.0;

///
/// Sub-bin offset of a peak, from the magnitudes of the peak bin (`beta`) and its left
/// (`alpha`) and right (`gamma`) neighbours.
///
/// A flat peak has a zero denominator; it is replaced by 1 which puts the peak at the centre
/// of its bin.
///
pub fn parabolic_offset(alpha: f32, beta: f32, gamma: f32) -> f32 {
    let denominator = alpha - 2.0 * beta + gamma;
    let denominator = if denominator == 0.0 { 1.0 } else { denominator };
    0.5 * (alpha - gamma) / denominator
}

///
/// Get the dominant frequency of a spectral snapshot.
///
/// `spectrum` holds magnitudes in dB, one per bin of `bin_width` Hz. Only bins inside
/// [`SEARCH_BAND_LOW`, `SEARCH_BAND_HIGH`] are searched, and only as far as the buffer
/// reaches. The peak is refined with parabolic interpolation over its neighbours.
///
/// Returns [`NO_SIGNAL`] when no bin was found, or when `noise_gate` is set and the peak is
/// quieter than [`NOISE_FLOOR_DB`].
///
pub fn estimate_frequency(spectrum: &[f32], bin_width: f32, noise_gate: bool) -> f32 {
    if !(bin_width > 0.0) || !bin_width.is_finite() {
        return NO_SIGNAL;
    }

    let start_bin = (SEARCH_BAND_LOW / bin_width).floor() as usize;
    let end_bin = ((SEARCH_BAND_HIGH / bin_width).ceil() as usize).min(spectrum.len());

    let mut peak: Option<(usize, f32)> = None;
    for index in start_bin..end_bin {
        let magnitude = spectrum[index];
        if magnitude > peak.map_or(f32::NEG_INFINITY, |(_, max)| max) {
            peak = Some((index, magnitude));
        }
    }

    let Some((peak_bin, beta)) = peak else {
        return NO_SIGNAL;
    };
    if noise_gate && beta < NOISE_FLOOR_DB {
        return NO_SIGNAL;
    }

    let alpha = if peak_bin > 0 {
        spectrum[peak_bin - 1]
    } else {
        beta
    };
    let gamma = spectrum.get(peak_bin + 1).copied().unwrap_or(beta);

    (peak_bin as f32 + parabolic_offset(alpha, beta, gamma)) * bin_width
}
