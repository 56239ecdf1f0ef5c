use crate::foundation::error::{PendvizError, PendvizResult};

pub use kurbo::{Point, Rect};

/// Output raster size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> PendvizResult<Self> {
        let canvas = Self { width, height };
        canvas.validate()?;
        Ok(canvas)
    }

    pub fn validate(self) -> PendvizResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PendvizError::validation("canvas width/height must be non-zero"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(PendvizError::validation(format!(
                "canvas {}x{} exceeds the {}px raster limit",
                self.width,
                self.height,
                u16::MAX
            )));
        }
        Ok(())
    }

    pub fn is_even(self) -> bool {
        self.width.is_multiple_of(2) && self.height.is_multiple_of(2)
    }
}

/// Playback rate of an animated artifact, in whole frames per second.
///
/// Independent of the simulation timestep.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Fps(pub u32);

impl Fps {
    pub fn new(fps: u32) -> PendvizResult<Self> {
        if fps == 0 {
            return Err(PendvizError::validation("fps must be > 0"));
        }
        Ok(Self(fps))
    }

    /// Per-frame delay in milliseconds as a rational `(numer, denom)`.
    pub fn frame_delay_ms(self) -> (u32, u32) {
        (1000, self.0.max(1))
    }
}

impl Default for Fps {
    fn default() -> Self {
        Self(60)
    }
}

/// Straight (non-premultiplied) RGBA8 colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(214, 39, 40);
    pub const BLUE: Self = Self::rgb(31, 119, 180);
    pub const LIGHT_BLUE: Self = Self::rgb(135, 206, 235);
    pub const GREEN: Self = Self::rgb(44, 160, 44);
    pub const GREY: Self = Self::rgb(128, 128, 128);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Same colour with alpha scaled by `alpha` in `[0, 1]`.
    pub fn with_alpha(self, alpha: f32) -> Self {
        let a = (f32::from(self.a) * alpha.clamp(0.0, 1.0)).round() as u8;
        Self { a, ..self }
    }

    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// `#rrggbb` form for SVG attributes (alpha is emitted separately).
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
