// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use sstv_mode_lib::ModeTiming;

use crate::sample_generator::SampleGenerator;

const LEADER_TONE: f32 = 1900.0;
const BREAK_TONE: f32 = 1200.0;

///
/// Generate the beginning of the header.
///
/// The mode is announced by a single tone 1200 Hz plus the VIS code above the break tone,
/// framed by start and stop bits.
///
/// Refrence: Dayton Paper - VIS Code and Robot calibration header
///
pub fn generate_header(ctx: &mut SampleGenerator, timing: &ModeTiming) {
    // Leader tone
    ctx.write_tone(LEADER_TONE, 300.0);
    // Break
    ctx.write_tone(BREAK_TONE, 10.0);
    // Leader tone
    ctx.write_tone(LEADER_TONE, 300.0);
    // VIS start bit
    ctx.write_tone(BREAK_TONE, 30.0);
    // VIS code
    ctx.write_tone(BREAK_TONE + timing.vis_code as f32, 100.0);
    // VIS stop bit
    ctx.write_tone(BREAK_TONE, 30.0);
}
