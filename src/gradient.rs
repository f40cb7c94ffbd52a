// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Color gradients.
//!
//! A gradient is an ordered list of color keys.  Each key sits at a
//! position that is stored *normalized* against the gradient's domain,
//! so the same list of keys can be stretched over a different value
//! range just by swapping the domain out from under it.  This is what
//! happens when the iteration cap changes: the shape of the gradient
//! stays the same, it just covers more (or fewer) iterations.
//!
//! Lookups interpolate linearly between the two keys surrounding the
//! query and clamp to the first or last key outside of them.  There
//! are only ever a handful of keys, so both insertion and lookup are
//! linear scans.

/// An 8-bit-per-channel RGBA color.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    /// Opaque red.
    pub const RED: Color = Color::rgb(255, 0, 0);
    /// Opaque green.
    pub const GREEN: Color = Color::rgb(0, 255, 0);
    /// Opaque blue.
    pub const BLUE: Color = Color::rgb(0, 0, 255);
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b, a: 255 }
    }

    /// A color with an explicit alpha.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Color {
        Color { r, g, b, a }
    }

    /// The four channels in the order they are laid out in the frame
    /// buffer.
    pub fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// The absolute value range the gradient's key positions are
/// normalized against.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Domain {
    /// The value that normalizes to 0.
    pub low: f64,
    /// The value that normalizes to 1.
    pub high: f64,
}

impl Domain {
    /// Panics if `low == high`; a zero-width domain cannot normalize
    /// anything.
    pub fn new(low: f64, high: f64) -> Domain {
        assert!(
            high != low,
            "gradient domain must have a non-zero span, got [{}, {}]",
            low,
            high
        );
        Domain { low, high }
    }

    #[inline]
    fn normalize(&self, value: f64) -> f64 {
        (value - self.low) / (self.high - self.low)
    }

    #[inline]
    fn denormalize(&self, value: f64) -> f64 {
        value * (self.high - self.low) + self.low
    }
}

/// A single color stop.  `position` is normalized to the owning
/// gradient's domain.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GradientKey {
    /// Normalized position of the stop.
    pub position: f64,
    /// Color at the stop.
    pub color: Color,
}

/// An ordered table of color keys over a value domain.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    keys: Vec<GradientKey>,
    domain: Domain,
}

impl Gradient {
    /// An empty gradient over `domain`.
    pub fn new(domain: Domain) -> Gradient {
        Gradient {
            keys: Vec::new(),
            domain,
        }
    }

    /// Adds a key at an absolute `position` in the current domain.
    /// The key goes in front of the first key that sits strictly
    /// after it, so keys sharing a position keep their insertion
    /// order.
    pub fn add_key(&mut self, position: f64, color: Color) {
        let key = GradientKey {
            position: self.domain.normalize(position),
            color,
        };
        match self.keys.iter().position(|k| key.position < k.position) {
            Some(index) => self.keys.insert(index, key),
            None => self.keys.push(key),
        }
    }

    /// The color for an absolute `value` in the current domain.
    ///
    /// Below the first key this is the first key's color, at or past
    /// the last key it is the last key's color, and anywhere in
    /// between each channel is interpolated linearly and truncated.
    /// An empty gradient is transparent everywhere.
    pub fn color_at(&self, value: f64) -> Color {
        let value = self.domain.normalize(value);
        match self.keys.iter().position(|k| value < k.position) {
            Some(0) => self.keys[0].color,
            Some(index) => {
                let key0 = &self.keys[index - 1];
                let key1 = &self.keys[index];
                let t = (value - key0.position) / (key1.position - key0.position);
                lerp(key0.color, key1.color, t)
            }
            None => self
                .keys
                .last()
                .map(|k| k.color)
                .unwrap_or(Color::TRANSPARENT),
        }
    }

    /// Replaces the domain.
    ///
    /// With `renormalize` set, every key keeps the absolute value it
    /// had under the old domain.  Without it the normalized positions
    /// are left alone, which stretches the whole gradient over the
    /// new range.
    pub fn set_domain(&mut self, domain: Domain, renormalize: bool) {
        if renormalize {
            let old = self.domain;
            for key in &mut self.keys {
                key.position = domain.normalize(old.denormalize(key.position));
            }
        }
        self.domain = domain;
    }

    /// The current domain.
    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// The key at `index`.  Panics if out of range.
    pub fn key(&self, index: usize) -> &GradientKey {
        &self.keys[index]
    }

    /// All keys, sorted by position.
    pub fn keys(&self) -> &[GradientKey] {
        &self.keys
    }

    /// Recolors the key at `index` without moving it.  Panics if out
    /// of range.
    pub fn set_key_color(&mut self, index: usize, color: Color) {
        self.keys[index].color = color;
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether there are no keys at all.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[inline]
fn lerp(from: Color, to: Color, t: f64) -> Color {
    let channel = |a: u8, b: u8| ((1.0 - t) * f64::from(a) + t * f64::from(b)) as u8;
    Color {
        r: channel(from.r, to.r),
        g: channel(from.g, to.g),
        b: channel(from.b, to.b),
        a: channel(from.a, to.a),
    }
}
