// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use std::path::Path;

use image::{DynamicImage, RgbImage, imageops::FilterType};
use sstv_mode_lib::Channel;

use crate::EncodeError;

/// An RGB8 raster ready to be sent.
#[derive(Clone, Debug, PartialEq)]
pub struct SSTVImage {
    image: RgbImage,
}

impl From<RgbImage> for SSTVImage {
    fn from(image: RgbImage) -> Self {
        Self { image }
    }
}

impl From<DynamicImage> for SSTVImage {
    fn from(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
        }
    }
}

impl SSTVImage {
    /// Load and decode an image file of any format the `image` crate knows.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EncodeError> {
        Ok(image::open(path)?.into())
    }

    /// Get the width of the image.
    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    /// Get the height of the image.
    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.image
    }

    /// Get the pixel at the (x,y) position, with [R, G, B] values.
    pub fn rgb_pixel(&self, x: usize, y: usize) -> [u8; 3] {
        self.image.get_pixel(x as u32, y as u32).0
    }

    ///
    /// Get one channel of the pixel at the (x,y) position, scaled to 0-255.
    ///
    /// > $$ Y = 0.299 R + 0.587 G + 0.114 B $$
    /// > $$ U = 128 - 0.1687 R - 0.3313 G + 0.5 B $$
    /// > $$ V = 128 + 0.5 R - 0.4187 G - 0.0813 B $$
    ///
    pub fn channel_value(&self, x: usize, y: usize, channel: Channel) -> f32 {
        let [r, g, b] = self.rgb_pixel(x, y).map(f32::from);
        match channel {
            Channel::Y => 0.299 * r + 0.587 * g + 0.114 * b,
            Channel::U => 128.0 - 0.1687 * r - 0.3313 * g + 0.5 * b,
            Channel::V => 128.0 + 0.5 * r - 0.4187 * g - 0.0813 * b,
            Channel::R => r,
            Channel::G => g,
            Channel::B => b,
        }
    }

    /// Resize the image to the new_width and new_height, with the nearest-neighbor
    /// interpolation algorithm.
    pub fn resize(&self, new_width: usize, new_height: usize) -> Self {
        if self.width() == new_width && self.height() == new_height {
            return self.clone();
        }
        tracing::debug!(
            from = ?self.image.dimensions(),
            to = ?(new_width, new_height),
            "resizing image"
        );
        Self {
            image: image::imageops::resize(
                &self.image,
                new_width as u32,
                new_height as u32,
                FilterType::Nearest,
            ),
        }
    }
}
