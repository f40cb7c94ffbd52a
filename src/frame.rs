// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The frame buffer: RGBA bytes, row-major, split into one band of
//! contiguous rows per worker.  Each band sits behind its own lock
//! that only its worker ever takes during a cycle, so the locks are
//! never contended; they exist so that workers can write through a
//! shared reference to the frame.

use std::ops::Range;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Bytes per pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// The rows worker `index` of `workers` is responsible for in a frame
/// `height` rows tall.  Every worker gets `height / workers` rows and
/// the last one also picks up the remainder, so the ranges always
/// cover the whole frame exactly once.
pub fn row_range(index: usize, workers: usize, height: usize) -> Range<usize> {
    debug_assert!(index < workers);
    let rows = height / workers;
    let start = rows * index;
    if index + 1 == workers {
        start..height
    } else {
        start..start + rows
    }
}

/// A contiguous run of rows.
#[derive(Debug)]
pub struct Band {
    rows: Range<usize>,
    pixels: Vec<u8>,
}

impl Band {
    fn new(rows: Range<usize>, width: usize) -> Band {
        let pixels = vec![0; rows.len() * width * BYTES_PER_PIXEL];
        Band { rows, pixels }
    }

    /// The frame rows this band holds.
    pub fn rows(&self) -> Range<usize> {
        self.rows.clone()
    }

    /// The band's bytes, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// The band's bytes, row-major, for writing.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }
}

/// An RGBA frame, `width` x `height` pixels.
#[derive(Debug)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    bands: Vec<Mutex<Band>>,
}

impl FrameBuffer {
    /// Allocates a zeroed frame split into `bands` bands.
    pub fn new(width: usize, height: usize, bands: usize) -> FrameBuffer {
        assert!(bands > 0, "a frame needs at least one band");
        let bands = (0..bands)
            .map(|index| Mutex::new(Band::new(row_range(index, bands, height), width)))
            .collect();
        FrameBuffer {
            width,
            height,
            bands,
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of bands, which is the number of workers it was laid out
    /// for.
    pub fn band_count(&self) -> usize {
        self.bands.len()
    }

    /// Locks band `index`.  A band left poisoned by a panicking worker
    /// only ever holds pixel bytes, so the lock is recovered.
    pub fn band(&self, index: usize) -> MutexGuard<'_, Band> {
        self.bands[index]
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Copies the frame out as one row-major RGBA buffer.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.width * self.height * BYTES_PER_PIXEL);
        for index in 0..self.bands.len() {
            rgba.extend_from_slice(self.band(index).pixels());
        }
        rgba
    }

    /// The pixel at column `x`, row `y`.  Panics outside the frame.
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "({}, {}) is outside the frame", x, y);
        let band = self
            .bands
            .iter()
            .map(|band| band.lock().unwrap_or_else(PoisonError::into_inner))
            .find(|band| band.rows.contains(&y))
            .unwrap_or_else(|| unreachable!("bands cover every row"));
        let offset = ((y - band.rows.start) * self.width + x) * BYTES_PER_PIXEL;
        let mut pixel = [0; 4];
        pixel.copy_from_slice(&band.pixels[offset..offset + BYTES_PER_PIXEL]);
        pixel
    }
}
