// Copyright 2025 BenderBlog Rodriguez and Contributors.
// SPDX-License-Identifier: 0BSD

use std::collections::VecDeque;

use crate::session::DecodedImage;

/// Completed pictures kept around.
pub const HISTORY_CAPACITY: usize = 20;

/// The last [`HISTORY_CAPACITY`] decoded pictures, newest first.
#[derive(Clone, Debug, Default)]
pub struct History {
    images: VecDeque<DecodedImage>,
}

impl History {
    pub fn new() -> Self {
        Self {
            images: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    /// Add a picture in front, dropping the oldest ones past capacity.
    pub(crate) fn push(&mut self, image: DecodedImage) {
        self.images.push_front(image);
        self.images.truncate(HISTORY_CAPACITY);
    }

    pub fn latest(&self) -> Option<&DecodedImage> {
        self.images.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecodedImage> {
        self.images.iter()
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

#[cfg(test)]
mod test {
    use image::RgbImage;
    use sstv_mode_lib::Mode;

    use super::*;

    fn picture(id: u64) -> DecodedImage {
        DecodedImage {
            id,
            timestamp_ms: id as f64 * 36_000.0,
            mode: Mode::Robot36,
            image: RgbImage::new(4, 3),
        }
    }

    #[test]
    fn keeps_the_newest_twenty() {
        let mut history = History::new();
        assert!(history.latest().is_none());

        for id in 0..25 {
            history.push(picture(id));
            assert!(history.len() <= HISTORY_CAPACITY);
        }

        assert_eq!(history.len(), 20);
        let ids: Vec<u64> = history.iter().map(|image| image.id).collect();
        assert_eq!(ids, (5..25).rev().collect::<Vec<u64>>());
        assert_eq!(history.latest().map(|image| image.id), Some(24));
    }
}
