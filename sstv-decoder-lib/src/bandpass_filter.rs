// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use biquad::{Biquad, Coefficients, DirectForm1, ToHertz, Type};

use crate::DecodeError;

const LOW_CUTOFF_HZ: f32 = 1000.0;
const HIGH_CUTOFF_HZ: f32 = 3000.0;

/// Keep the 1 kHz to 3 kHz band that carries every SSTV tone.
pub fn bandpass_filter(samples: &[f32], fs: f32) -> Result<Vec<f32>, DecodeError> {
    if !(fs > 2.0 * HIGH_CUTOFF_HZ) {
        return Err(DecodeError::SampleRate(fs));
    }

    let coeffs_lp =
        Coefficients::<f32>::from_params(Type::LowPass, fs.hz(), HIGH_CUTOFF_HZ.hz(), 1.)
            .map_err(|error| DecodeError::Filter(format!("{error:?}")))?;
    let coeffs_hp =
        Coefficients::<f32>::from_params(Type::HighPass, fs.hz(), LOW_CUTOFF_HZ.hz(), 1.)
            .map_err(|error| DecodeError::Filter(format!("{error:?}")))?;

    let mut biquad_lp = DirectForm1::<f32>::new(coeffs_lp);
    let mut biquad_hp = DirectForm1::<f32>::new(coeffs_hp);
    Ok(samples
        .iter()
        .map(|&x| biquad_lp.run(biquad_hp.run(x)))
        .collect())
}
