// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Filling pixels in.  `render_band` is what every worker runs on its
//! own rows; `render_single` does the whole frame on the calling
//! thread and is the reference the pool is checked against.

use crate::context::RenderContext;
use crate::escape::shade;
use crate::frame::{Band, BYTES_PER_PIXEL};
use crate::planes::{Pixel, PlaneMapper};
use itertools::iproduct;
use std::ops::Range;

/// Renders the rows of `band` from `context`.
pub fn render_band(context: &RenderContext, band: &mut Band) {
    let rows = band.rows();
    render_rows(context, rows, band.pixels_mut());
}

/// Renders the whole frame on this thread and returns it as row-major
/// RGBA bytes.  The context's own frame is left untouched.
pub fn render_single(context: &RenderContext) -> Vec<u8> {
    let frame = context.frame();
    let mut pixels = vec![0; frame.width() * frame.height() * BYTES_PER_PIXEL];
    render_rows(context, 0..frame.height(), &mut pixels);
    pixels
}

// `out` holds exactly the rows in `rows`.
fn render_rows(context: &RenderContext, rows: Range<usize>, out: &mut [u8]) {
    let frame = context.frame();
    let width = frame.width();
    debug_assert_eq!(out.len(), rows.len() * width * BYTES_PER_PIXEL);

    let mapper = PlaneMapper::new(&context.viewport, width, frame.height());
    let params = context.params();
    let first = rows.start;
    for (row, column) in iproduct!(rows, 0..width) {
        let z = mapper.pixel_to_point(&Pixel(column, row));
        let color = shade(z, params, &context.gradient);
        let offset = ((row - first) * width + column) * BYTES_PER_PIXEL;
        out[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color.to_bytes());
    }
}
