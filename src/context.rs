// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The render context: the frame, and everything the workers read
//! while filling it in.  The orchestrator edits it between cycles;
//! during a cycle it is read-only for everyone.

use crate::config::Config;
use crate::error::RenderError;
use crate::escape::FractalParams;
use crate::frame::FrameBuffer;
use crate::gradient::{Domain, Gradient};
use crate::planes::Viewport;
use crate::timer::Timer;
use log::debug;
use num::Complex;

/// The state a frame is rendered from.
#[derive(Debug)]
pub struct RenderContext {
    /// The visible part of the plane.
    pub viewport: Viewport,
    /// The color mapping.  Its domain should track the iteration cap;
    /// use [`RenderContext::set_max_iterations`] to keep it that way.
    pub gradient: Gradient,
    params: FractalParams,
    frame: FrameBuffer,
}

impl RenderContext {
    /// Builds a context, with a frame laid out for `config.workers`
    /// workers.
    pub fn new(config: &Config) -> Result<RenderContext, RenderError> {
        config.validate()?;
        Ok(RenderContext {
            viewport: Viewport::for_surface(config.width, config.height),
            gradient: config.gradient(),
            params: FractalParams {
                c: config.constant,
                max_iterations: config.max_iterations,
                smoothing: config.smoothing,
            },
            frame: FrameBuffer::new(config.width, config.height, config.workers),
        })
    }

    /// The current fractal parameters.
    pub fn params(&self) -> &FractalParams {
        &self.params
    }

    /// The frame.
    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// Sets the Julia constant.
    pub fn set_constant(&mut self, c: Complex<f64>) {
        self.params.c = c;
    }

    /// Turns smoothing on or off.
    pub fn set_smoothing(&mut self, smoothing: bool) {
        self.params.smoothing = smoothing;
    }

    /// Sets the iteration cap and stretches the gradient over
    /// `[0, max_iterations]`, keeping its shape.
    pub fn set_max_iterations(&mut self, max_iterations: u32) -> Result<(), RenderError> {
        if max_iterations == 0 {
            return Err(RenderError::InvalidIterations);
        }
        self.params.max_iterations = max_iterations;
        self.gradient
            .set_domain(Domain::new(0.0, f64::from(max_iterations)), false);
        Ok(())
    }

    /// Reallocates the frame at the new size and resets the viewport
    /// to show the whole surface.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), RenderError> {
        self.reallocate(width, height, self.frame.band_count())
    }

    // Lays the frame out for a different number of bands.
    pub(crate) fn reallocate(
        &mut self,
        width: usize,
        height: usize,
        bands: usize,
    ) -> Result<(), RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::InvalidSize { width, height });
        }
        let _timer = Timer::new("resize");
        debug!("resizing frame to {}x{} in {} bands", width, height, bands);
        self.frame = FrameBuffer::new(width, height, bands);
        self.viewport = Viewport::for_surface(width, height);
        Ok(())
    }
}
