// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use image::Rgb;
use sstv_mode_lib::{Channel, ColorEncoding, ModeTiming};

use crate::line_buffer::LineBuffer;

/// Unwritten luma and chroma columns are mid gray.
const YUV_FILL: f32 = 128.0;

/// Unwritten RGB and B/W columns are black.
const RGB_FILL: f32 = 0.0;

#[inline]
fn to_u8(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

/// Convert one YUV sample, all channels centred on 128 for the colour differences.
pub fn yuv_to_rgb(y: f32, u: f32, v: f32) -> Rgb<u8> {
    let u = u - 128.0;
    let v = v - 128.0;
    Rgb([
        to_u8(y + 1.402 * v),
        to_u8(y - 0.34414 * u - 0.71414 * v),
        to_u8(y + 1.772 * u),
    ])
}

///
/// Build one row of `timing.width` pixels out of a received line.
///
/// Chroma is stretched to the luma resolution with `floor(x * chroma_width / width)`, where
/// `chroma_width` is the width of the chroma component.
/// A partly written line is still stretched over the full component width, not over the
/// columns received so far.
///
pub fn rasterize_line(buffer: &LineBuffer, timing: &ModeTiming) -> Vec<Rgb<u8>> {
    let width = timing.width;
    let sample = |channel: Channel, x: usize, fill: f32| buffer.get(channel, x).unwrap_or(fill);

    (0..width)
        .map(|x| match timing.color_encoding {
            ColorEncoding::Bw => {
                let y = to_u8(sample(Channel::Y, x, RGB_FILL));
                Rgb([y, y, y])
            }
            ColorEncoding::Yuv => {
                let chroma = |channel: Channel| {
                    let chroma_width = buffer.width(channel);
                    sample(channel, x * chroma_width / width, YUV_FILL)
                };
                yuv_to_rgb(
                    sample(Channel::Y, x, YUV_FILL),
                    chroma(Channel::U),
                    chroma(Channel::V),
                )
            }
            ColorEncoding::Rgb => Rgb([
                to_u8(sample(Channel::R, x, RGB_FILL)),
                to_u8(sample(Channel::G, x, RGB_FILL)),
                to_u8(sample(Channel::B, x, RGB_FILL)),
            ]),
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn neutral_yuv_is_gray() {
        assert_eq!(yuv_to_rgb(128.0, 128.0, 128.0), Rgb([128, 128, 128]));
        assert_eq!(yuv_to_rgb(0.0, 128.0, 128.0), Rgb([0, 0, 0]));
        assert_eq!(yuv_to_rgb(255.0, 128.0, 128.0), Rgb([255, 255, 255]));
    }

    #[test]
    fn yuv_clamps() {
        assert_eq!(yuv_to_rgb(255.0, 255.0, 255.0), Rgb([255, 121, 255]));
        assert_eq!(yuv_to_rgb(0.0, 0.0, 0.0), Rgb([0, 135, 0]));
    }

    #[test]
    fn empty_lines_use_fill_values() {
        let robot36 = ModeTiming::ROBOT36;
        let row = rasterize_line(&LineBuffer::new(&robot36), &robot36);
        assert_eq!(row.len(), 320);
        assert!(row.iter().all(|&pixel| pixel == Rgb([128, 128, 128])));

        let scottie1 = ModeTiming::SCOTTIE1;
        let row = rasterize_line(&LineBuffer::new(&scottie1), &scottie1);
        assert!(row.iter().all(|&pixel| pixel == Rgb([0, 0, 0])));

        let robot8 = ModeTiming::ROBOT8_BW;
        let row = rasterize_line(&LineBuffer::new(&robot8), &robot8);
        assert_eq!(row.len(), 160);
        assert!(row.iter().all(|&pixel| pixel == Rgb([0, 0, 0])));
    }

    #[test]
    fn chroma_is_stretched() {
        let robot36 = ModeTiming::ROBOT36;
        let mut buffer = LineBuffer::new(&robot36);
        buffer.write(Channel::Y, 6, 100.0);
        buffer.write(Channel::Y, 7, 100.0);
        buffer.write(Channel::U, 3, 228.0);

        let row = rasterize_line(&buffer, &robot36);
        // Columns 6 and 7 share chroma sample 3.
        assert_eq!(row[6], row[7]);
        assert_eq!(row[6], yuv_to_rgb(100.0, 228.0, 128.0));
        assert_eq!(row[5], Rgb([128, 128, 128]));
    }

    #[test]
    fn partial_chroma_keeps_full_width() {
        let robot36 = ModeTiming::ROBOT36;
        let mut buffer = LineBuffer::new(&robot36);
        for column in 0..10 {
            buffer.write(Channel::U, column, 50.0 + column as f32 * 10.0);
        }

        let row = rasterize_line(&buffer, &robot36);
        assert_eq!(row[0], yuv_to_rgb(128.0, 50.0, 128.0));
        assert_eq!(row[19], yuv_to_rgb(128.0, 140.0, 128.0));
        assert_eq!(row[20], Rgb([128, 128, 128]));
        assert_eq!(row[319], Rgb([128, 128, 128]));
    }

    #[test]
    fn rgb_channels_are_independent() {
        let scottie1 = ModeTiming::SCOTTIE1;
        let mut buffer = LineBuffer::new(&scottie1);
        buffer.write(Channel::R, 10, 255.0);
        buffer.write(Channel::G, 10, 127.6);
        buffer.write(Channel::B, 11, 3.0);

        let row = rasterize_line(&buffer, &scottie1);
        assert_eq!(row[10], Rgb([255, 128, 0]));
        assert_eq!(row[11], Rgb([0, 0, 3]));
    }
}
