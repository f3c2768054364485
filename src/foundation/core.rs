use crate::foundation::error::{OverprintError, OverprintResult};

pub use kurbo::{Point, Rect, Vec2};

/// Largest edge the CPU rasterizer accepts (`vello_cpu` pixmaps are `u16`-sized).
pub const MAX_CANVAS_EDGE: u32 = u16::MAX as u32;

/// Output surface dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// 500×300 interactive preview surface.
    pub const PREVIEW: Canvas = Canvas {
        width: 500,
        height: 300,
    };

    /// 1080×1080 server export surface.
    pub const EXPORT: Canvas = Canvas {
        width: 1080,
        height: 1080,
    };

    /// Construct a canvas, rejecting empty or oversized dimensions.
    pub fn new(width: u32, height: u32) -> OverprintResult<Self> {
        let c = Self { width, height };
        c.validate()?;
        Ok(c)
    }

    /// Check that both edges are in `1..=MAX_CANVAS_EDGE`.
    pub fn validate(self) -> OverprintResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(OverprintError::invalid_scene(
                "canvas width/height must be > 0",
            ));
        }
        if self.width > MAX_CANVAS_EDGE || self.height > MAX_CANVAS_EDGE {
            return Err(OverprintError::invalid_scene(format!(
                "canvas width/height must be <= {MAX_CANVAS_EDGE}"
            )));
        }
        Ok(())
    }

    /// Number of bytes in a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }

    /// Canvas as a rectangle anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channel array in `[r, g, b, a]` order.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
