// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Scoped timing.  Create a `Timer` at the top of a block and it logs
//! how long the block took when it goes out of scope.

use log::{log, log_enabled, Level};
use std::time::Instant;

/// Logs the time between its creation and its drop.
pub struct Timer {
    label: String,
    level: Level,
    started: Instant,
}

impl Timer {
    /// A timer that reports at debug level.
    pub fn new<S: Into<String>>(label: S) -> Timer {
        Timer::with_level(label, Level::Debug)
    }

    /// A timer that reports at `level`.
    pub fn with_level<S: Into<String>>(label: S, level: Level) -> Timer {
        Timer {
            label: label.into(),
            level,
            started: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if log_enabled!(self.level) {
            log!(
                self.level,
                "- {} took: {}ms",
                self.label,
                self.started.elapsed().as_millis()
            );
        }
    }
}
