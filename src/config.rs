// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Startup configuration, and the little parsers used to fill it in
//! from the command line.

use crate::error::RenderError;
use crate::gradient::{Color, Domain, Gradient};
use num::Complex;
use std::str::FromStr;
use std::time::Duration;

/// Number of render workers.
pub const DEFAULT_WORKERS: usize = 16;
/// Iteration cap, and the top of the gradient's domain.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;
/// Real and imaginary parts of the Julia constant.
pub const DEFAULT_CONSTANT: (f64, f64) = (-0.8, 0.4);
/// Surface width and height.
pub const DEFAULT_SIZE: (usize, usize) = (1200, 800);
/// How often an idle worker wakes up to check whether it should quit.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Everything needed to build a render context and its worker pool.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Number of render workers; fixed for the life of the pool.
    pub workers: usize,
    /// Surface width in pixels.
    pub width: usize,
    /// Surface height in pixels.
    pub height: usize,
    /// Iteration cap.
    pub max_iterations: u32,
    /// The Julia constant.
    pub constant: Complex<f64>,
    /// Color by the continuous iteration count.
    pub smoothing: bool,
    /// Idle wake-up interval for workers.
    pub poll_interval: Duration,
    /// Gradient keys as absolute iteration counts and colors.
    pub keys: Vec<(f64, Color)>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            workers: DEFAULT_WORKERS,
            width: DEFAULT_SIZE.0,
            height: DEFAULT_SIZE.1,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            constant: Complex::new(DEFAULT_CONSTANT.0, DEFAULT_CONSTANT.1),
            smoothing: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
            keys: Config::default_keys(DEFAULT_MAX_ITERATIONS),
        }
    }
}

impl Config {
    /// White at zero through red and green to blue at the cap.
    pub fn default_keys(max_iterations: u32) -> Vec<(f64, Color)> {
        let max = f64::from(max_iterations);
        vec![
            (0.0, Color::WHITE),
            (max / 3.0, Color::RED),
            (2.0 * max / 3.0, Color::GREEN),
            (max, Color::BLUE),
        ]
    }

    /// Checks everything the core treats as a precondition.
    pub fn validate(&self) -> Result<(), RenderError> {
        if self.workers == 0 {
            return Err(RenderError::InvalidWorkerCount(self.workers));
        }
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidSize {
                width: self.width,
                height: self.height,
            });
        }
        if self.max_iterations == 0 {
            return Err(RenderError::InvalidIterations);
        }
        if self.keys.is_empty() {
            return Err(RenderError::InvalidArgument(
                "a gradient needs at least one key".to_string(),
            ));
        }
        Ok(())
    }

    /// The gradient described by `keys`, over `[0, max_iterations]`.
    pub fn gradient(&self) -> Gradient {
        let mut gradient = Gradient::new(Domain::new(0.0, f64::from(self.max_iterations)));
        for &(position, color) in &self.keys {
            gradient.add_key(position, color);
        }
        gradient
    }
}

/// Given a string and a separator, returns the two values separated
/// by the separator.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

/// A complex number written as `re,im`.
pub fn parse_complex(s: &str) -> Option<Complex<f64>> {
    parse_pair(s, ',').map(|(re, im)| Complex { re, im })
}

/// A color written as `RRGGBB` or `RRGGBBAA` hex, with an optional
/// leading `#`.
pub fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim_start_matches('#');
    if !(s.len() == 6 || s.len() == 8) || !s.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
    let alpha = if s.len() == 8 { channel(6)? } else { 255 };
    Some(Color::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
}

/// A gradient key written as `POSITION:COLOR`.
pub fn parse_key(s: &str) -> Option<(f64, Color)> {
    let index = s.find(':')?;
    let position = f64::from_str(&s[..index]).ok()?;
    let color = parse_color(&s[index + 1..])?;
    Some((position, color))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.workers, 16);
        assert_eq!(config.keys.len(), 4);
    }

    #[test]
    fn default_gradient_spans_the_iteration_cap() {
        let gradient = Config::default().gradient();
        assert_eq!(gradient.domain(), Domain::new(0.0, 100.0));
        assert_eq!(gradient.color_at(0.0), Color::WHITE);
        assert_eq!(gradient.color_at(100.0), Color::BLUE);
    }

    #[test]
    fn validate_rejects_degenerate_setups() {
        let bad = [
            Config {
                workers: 0,
                ..Config::default()
            },
            Config {
                height: 0,
                ..Config::default()
            },
            Config {
                max_iterations: 0,
                ..Config::default()
            },
            Config {
                keys: vec![],
                ..Config::default()
            },
        ];
        for config in &bad {
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }

    #[test]
    fn parses_pairs() {
        assert_eq!(parse_pair::<usize>("800x600", 'x'), Some((800, 600)));
        assert_eq!(parse_pair::<usize>("800x", 'x'), None);
        assert_eq!(parse_pair::<usize>("800,600", 'x'), None);
        assert_eq!(parse_complex("-0.8,0.4"), Some(Complex::new(-0.8, 0.4)));
    }

    #[test]
    fn parses_colors() {
        assert_eq!(parse_color("ff0000"), Some(Color::RED));
        assert_eq!(parse_color("#00ff00"), Some(Color::GREEN));
        assert_eq!(parse_color("0000ff80"), Some(Color::rgba(0, 0, 255, 128)));
        assert_eq!(parse_color("fff"), None);
        assert_eq!(parse_color("gg0000"), None);
    }

    #[test]
    fn parses_keys() {
        assert_eq!(parse_key("33.3:ff0000"), Some((33.3, Color::RED)));
        assert_eq!(parse_key("0:#ffffff"), Some((0.0, Color::WHITE)));
        assert_eq!(parse_key("red:ff0000"), None);
        assert_eq!(parse_key("10"), None);
    }
}
