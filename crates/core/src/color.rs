//! RGBA color value type used by every rendering path.

use serde::{Deserialize, Serialize};

/// Linear RGBA color with components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Rgba {
    /// Red component.
    pub r: f32,
    /// Green component.
    pub g: f32,
    /// Blue component.
    pub b: f32,
    /// Alpha component.
    pub a: f32,
}

impl Rgba {
    /// Construct from all four components.
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Construct an opaque color.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Return this color with a different alpha.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation toward `other` by `t` (alpha included).
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self {
            r: crate::lerp(self.r, other.r, t),
            g: crate::lerp(self.g, other.g, t),
            b: crate::lerp(self.b, other.b, t),
            a: crate::lerp(self.a, other.a, t),
        }
    }

    /// Scale the RGB channels by `factor`, leaving alpha untouched.
    pub fn scale_rgb(self, factor: f32) -> Self {
        Self {
            r: self.r * factor,
            g: self.g * factor,
            b: self.b * factor,
            a: self.a,
        }
    }

    /// Average of the RGB channels.
    pub fn luminance(self) -> f32 {
        (self.r + self.g + self.b) / 3.0
    }

    /// Collapse RGB to the channel average, keeping alpha.
    pub fn desaturated(self) -> Self {
        let l = self.luminance();
        Self {
            r: l,
            g: l,
            b: l,
            a: self.a,
        }
    }

    /// Add `amount` to each RGB channel, clamping at 1.
    pub fn brightened(self, amount: f32) -> Self {
        Self {
            r: (self.r + amount).min(1.0),
            g: (self.g + amount).min(1.0),
            b: (self.b + amount).min(1.0),
            a: self.a,
        }
    }
}
