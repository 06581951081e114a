// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use sstv_mode_lib::{Channel, ColorEncoding, ModeTiming};

use crate::{sample_generator::SampleGenerator, sstv_image::SSTVImage};

///
/// Generate one scanline.
///
/// Step 1: Sync pulse
/// Step 2: Sync porch
/// Step 3: Every component in order, one tone per column. Columns are picked from the
/// image by nearest neighbour, so chroma at half width takes every other pixel.
///
/// In YUV modes the luma scan is followed by a separator of `gap_duration`; chroma scans
/// are not.
///
pub fn generate_line(
    ctx: &mut SampleGenerator,
    image: &SSTVImage,
    timing: &ModeTiming,
    y: usize,
) {
    ctx.write_tone(timing.sync_freq, timing.sync_duration);
    ctx.write_tone(timing.break_freq, timing.break_duration);

    let image_width = image.width();
    for component in timing.components {
        let pixel_duration = component.duration / component.width as f32;
        for x in 0..component.width {
            let source_x = x * image_width / component.width;
            ctx.write_color(
                pixel_duration,
                image.channel_value(source_x, y, component.channel),
            );

            if timing.color_encoding == ColorEncoding::Yuv
                && component.channel == Channel::Y
                && x == component.width - 1
            {
                ctx.write_tone(timing.break_freq, timing.gap_duration);
            }
        }
    }
}

/// Generate every scanline of `image`, which must already have the mode geometry.
pub fn generate_scan(ctx: &mut SampleGenerator, image: &SSTVImage, timing: &ModeTiming) {
    for y in 0..image.height() {
        generate_line(ctx, image, timing, y);
    }
}
