// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which maps the integral plane of
//! the frame buffer onto the complex plane, and the Viewport that
//! decides which part of the complex plane is visible.
//!
//! There are three spaces involved.  Pixels live on the integral
//! plane with an origin at 0,0.  The viewport lives in "view" space,
//! which uses the same units as the surface: at startup the viewport
//! is exactly the surface, and panning and zooming move and scale it
//! from there.  Finally view coordinates are centered on the surface
//! and scaled so that its full height spans two units of the complex
//! plane.

use crate::error::RenderError;
use num::Complex;

/// Linearly remaps `value` from the range `[x0, y0]` onto `[x1, y1]`.
/// The source range must not be empty.
#[inline]
pub fn map(value: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    debug_assert!(x0 != y0, "cannot map from an empty range");
    x1 + (value - x0) / (y0 - x0) * (y1 - x1)
}

/// Describes the column, row of a pixel in the frame buffer.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// A point in view space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point(pub f64, pub f64);

/// The visible rectangle, in view space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Viewport {
    /// Center of the rectangle.
    pub center: Point,
    /// Width and height of the rectangle.
    pub size: Point,
}

impl Viewport {
    /// A viewport from a center and a size.  Both components of the
    /// size must be finite and non-zero.
    pub fn new(center: Point, size: Point) -> Result<Viewport, RenderError> {
        let usable = |v: f64| v.is_finite() && v != 0.0;
        if !usable(size.0) || !usable(size.1) {
            return Err(RenderError::DegenerateViewport {
                width: size.0,
                height: size.1,
            });
        }
        Ok(Viewport { center, size })
    }

    /// The viewport that shows a `width` x `height` surface unzoomed.
    pub fn for_surface(width: usize, height: usize) -> Viewport {
        let (width, height) = (width as f64, height as f64);
        Viewport {
            center: Point(width / 2.0, height / 2.0),
            size: Point(width, height),
        }
    }

    /// Left edge.
    pub fn left(&self) -> f64 {
        self.center.0 - self.size.0 * 0.5
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.center.1 - self.size.1 * 0.5
    }

    /// Moves the view by a drag of `dx`, `dy` surface pixels on a
    /// surface `surface_width` pixels wide.  The drag is scaled by the
    /// current zoom, so the content follows the pointer at any depth.
    pub fn pan(&mut self, dx: f64, dy: f64, surface_width: usize) {
        let zoom = self.size.0 / surface_width as f64;
        self.center.0 += dx * zoom;
        self.center.1 += dy * zoom;
    }

    /// Scales the view by `factor`.  When zooming in, the center first
    /// drifts a fifth of the way toward `target`, so repeated zooms
    /// home in on it.
    pub fn zoom_towards(&mut self, target: Point, factor: f64) {
        if factor < 1.0 {
            self.center.0 += (target.0 - self.center.0) * 0.2;
            self.center.1 += (target.1 - self.center.1) * 0.2;
        }
        self.size.0 *= factor;
        self.size.1 *= factor;
    }

    /// Zoom factor for a mouse wheel `delta`: positive deltas zoom in.
    pub fn scroll_factor(delta: f64) -> f64 {
        1.0 - delta * 0.1
    }
}

/// Maps pixels of a `width` x `height` frame buffer through a viewport
/// onto the complex plane.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    width: usize,
    height: usize,
    left: f64,
    top: f64,
    view_width: f64,
    view_height: f64,
    // Complex-plane units per view unit.
    scale: f64,
}

impl PlaneMapper {
    /// A mapper for the current viewport and frame size.
    pub fn new(viewport: &Viewport, width: usize, height: usize) -> PlaneMapper {
        PlaneMapper {
            width,
            height,
            left: viewport.left(),
            top: viewport.top(),
            view_width: viewport.size.0,
            view_height: viewport.size.1,
            scale: 1.0 / (height as f64 / 2.0),
        }
    }

    /// The pixel's position in view space.
    pub fn pixel_to_view(&self, pixel: &Pixel) -> Point {
        Point(
            map(
                pixel.0 as f64,
                0.0,
                self.width as f64,
                self.left,
                self.left + self.view_width,
            ),
            map(
                pixel.1 as f64,
                0.0,
                self.height as f64,
                self.top,
                self.top + self.view_height,
            ),
        )
    }

    /// A view-space point on the complex plane.
    pub fn view_to_point(&self, view: Point) -> Complex<f64> {
        Complex::new(
            (view.0 - self.width as f64 / 2.0) * self.scale,
            (view.1 - self.height as f64 / 2.0) * self.scale,
        )
    }

    /// Given a pixel on the integral plane, return the complex number
    /// it looks at.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        self.view_to_point(self.pixel_to_view(pixel))
    }
}
