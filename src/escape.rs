// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time evaluator.
//!
//! A Julia set fixes the constant `c` and asks, for every starting
//! point `z`, how many rounds of `z = z * z + c` it takes before `z`
//! leaves the circle of radius 2.  Points that never leave within the
//! iteration cap are in the set.  The count alone produces visible
//! bands of color; the smoothed count uses the final magnitude of `z`
//! to slide between neighbouring bands.

use crate::gradient::{Color, Gradient};
use num::Complex;

/// Squared escape radius.
pub const ESCAPE_RADIUS_SQR: f64 = 4.0;

/// The fixed parameters of the recurrence, plus how to color it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FractalParams {
    /// The constant added every iteration.
    pub c: Complex<f64>,
    /// Give up on a point after this many iterations.
    pub max_iterations: u32,
    /// Color by the continuous count instead of the integral one.
    pub smoothing: bool,
}

/// Where the orbit of a single point stopped.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Escape {
    /// The iteration at which the orbit escaped, or the cap if it
    /// never did.
    pub iterations: u32,
    /// The last value of the orbit.
    pub z: Complex<f64>,
}

impl Escape {
    /// Iterates the orbit of `z` until it escapes or `limit` rounds
    /// have passed.
    pub fn iterate(mut z: Complex<f64>, c: Complex<f64>, limit: u32) -> Escape {
        let mut i = 0;
        while i < limit {
            z = z * z + c;
            if z.norm_sqr() >= ESCAPE_RADIUS_SQR {
                break;
            }
            i += 1;
        }
        Escape { iterations: i, z }
    }

    /// The renormalized, continuous iteration count.  The inner
    /// logarithm is clamped to 1 so points that stopped inside the
    /// escape radius keep their integral count.
    pub fn smooth_count(&self) -> f64 {
        let length = self.z.norm();
        f64::from(self.iterations) - length.log2().max(1.0).log2()
    }
}

/// Colors the point `z` using `params` and `gradient`.
#[inline]
pub fn shade(z: Complex<f64>, params: &FractalParams, gradient: &Gradient) -> Color {
    let escape = Escape::iterate(z, params.c, params.max_iterations);
    if params.smoothing {
        gradient.color_at(escape.smooth_count())
    } else {
        gradient.color_at(f64::from(escape.iterations))
    }
}
