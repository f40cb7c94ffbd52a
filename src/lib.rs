#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Julia set renderer
//!
//! A Julia set fixes a complex constant `c` and iterates
//! `z = z * z + c` for every point `z` of the complex plane, measuring
//! how many rounds it takes for `z` to run off to infinity.  That
//! count, smoothed or not, is pushed through a color gradient to give
//! the pixel its color.
//!
//! This crate is the compute core of an interactive viewer.  A fixed
//! pool of worker threads renders one whole frame per barrier cycle,
//! each worker owning a band of rows; between cycles the caller pans,
//! zooms, edits the gradient or the parameters, resizes the frame, and
//! reads the finished pixels out for display.
//!
//! ```no_run
//! use juliaset::{Config, RenderContext, WorkerPool};
//!
//! let config = Config::default();
//! let context = RenderContext::new(&config).unwrap();
//! let mut pool = WorkerPool::spawn(context, config.workers, config.poll_interval).unwrap();
//! pool.render_frame().unwrap();
//! let rgba = pool.context().unwrap().frame().to_rgba();
//! # drop(rgba);
//! ```

extern crate crossbeam;
extern crate failure;
extern crate itertools;
extern crate log;
extern crate num;

pub mod config;
pub mod context;
pub mod error;
pub mod escape;
pub mod frame;
pub mod gradient;
pub mod planes;
pub mod pool;
pub mod render;
pub mod timer;

pub use config::Config;
pub use context::RenderContext;
pub use error::RenderError;
pub use escape::{Escape, FractalParams};
pub use frame::FrameBuffer;
pub use gradient::{Color, Domain, Gradient, GradientKey};
pub use planes::{map, Pixel, PlaneMapper, Point, Viewport};
pub use pool::{WorkerPool, WorkerState};
pub use render::render_single;
