// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors the renderer can report back to whoever drives it.  Broken
//! invariants (a zero-width gradient domain, a key index past the end)
//! are not in here: those are bugs in the caller, and they panic.

use failure::Fail;
use std::io;

/// Everything that can go wrong while configuring or driving the
/// worker pool.
#[derive(Debug, Fail)]
pub enum RenderError {
    /// The frame buffer must have at least one row and one column.
    #[fail(display = "frame size must be non-zero, got {}x{}", width, height)]
    InvalidSize {
        /// Requested width in pixels.
        width: usize,
        /// Requested height in pixels.
        height: usize,
    },

    /// A pool needs at least one worker.
    #[fail(display = "worker count must be at least 1, got {}", _0)]
    InvalidWorkerCount(usize),

    /// An iteration cap of zero collapses the gradient domain.
    #[fail(display = "iteration cap must be at least 1")]
    InvalidIterations,

    /// The viewport must cover a finite, non-empty region.
    #[fail(display = "viewport size must be finite and non-zero, got {}x{}", width, height)]
    DegenerateViewport {
        /// Requested view width.
        width: f64,
        /// Requested view height.
        height: f64,
    },

    /// A textual argument could not be understood.
    #[fail(display = "{}", _0)]
    InvalidArgument(String),

    /// The operating system refused to start a worker thread.
    #[fail(display = "could not spawn worker {}: {}", index, cause)]
    Spawn {
        /// Index of the worker that failed to start.
        index: usize,
        /// The underlying error.
        #[cause]
        cause: io::Error,
    },

    /// A worker went away in the middle of a cycle.
    #[fail(display = "worker {} is no longer running", _0)]
    WorkerLost(usize),

    /// The pool has been shut down and cannot render any more frames.
    #[fail(display = "worker pool has been shut down")]
    Stopped,

    /// Somebody panicked while holding the render context for writing.
    #[fail(display = "render context lock was poisoned")]
    Poisoned,
}
