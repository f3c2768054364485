use crate::{
    foundation::core::Point,
    foundation::error::{OverprintError, OverprintResult},
    foundation::math::mul_div255_u8,
};

/// Single-channel 8-bit coverage, same dimensions as the surface it is painted onto.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct CoverageMask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl CoverageMask {
    pub(crate) fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize],
        }
    }

    /// Take the alpha channel of a premultiplied RGBA8 buffer.
    pub(crate) fn from_alpha(
        rgba8_premul: &[u8],
        width: u32,
        height: u32,
    ) -> OverprintResult<Self> {
        if rgba8_premul.len() != width as usize * height as usize * 4 {
            return Err(OverprintError::Other(anyhow::anyhow!(
                "coverage source is {} bytes, expected {}x{}x4",
                rgba8_premul.len(),
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            data: rgba8_premul.chunks_exact(4).map(|px| px[3]).collect(),
        })
    }

    pub(crate) fn width(&self) -> u32 {
        self.width
    }

    pub(crate) fn height(&self) -> u32 {
        self.height
    }

    pub(crate) fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.iter().all(|&c| c == 0)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, x: u32, y: u32) -> u8 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Shift by whole pixels; coverage moved past an edge is dropped.
    pub(crate) fn translated(&self, dx: i64, dy: i64) -> Self {
        let mut out = Self::new(self.width, self.height);
        let w = i64::from(self.width);
        let h = i64::from(self.height);
        for y in 0..h {
            let sy = y - dy;
            if sy < 0 || sy >= h {
                continue;
            }
            let x0 = dx.max(0);
            let x1 = (w + dx).min(w);
            if x0 >= x1 {
                continue;
            }
            let dst = (y * w) as usize;
            let src = (sy * w) as usize;
            out.data[dst + x0 as usize..dst + x1 as usize].copy_from_slice(
                &self.data[src + (x0 - dx) as usize..src + (x1 - dx) as usize],
            );
        }
        out
    }
}

/// Anti-aliased coverage of a circle at one pixel center, in `0..=255`.
pub(crate) fn circle_coverage(center: Point, radius: f64, x: u32, y: u32) -> u8 {
    let dx = f64::from(x) + 0.5 - center.x;
    let dy = f64::from(y) + 0.5 - center.y;
    let dist = (dx * dx + dy * dy).sqrt();
    let c = (radius - dist + 0.5).clamp(0.0, 1.0);
    (c * 255.0).round() as u8
}

/// Multiply a premultiplied RGBA8 layer by a circular clip.
///
/// The edge is one pixel wide; pixels whose centers are further than half a pixel outside
/// the circle end up fully transparent.
pub(crate) fn clip_layer_to_circle(
    layer: &mut [u8],
    width: u32,
    height: u32,
    center: Point,
    radius: f64,
) -> OverprintResult<()> {
    if layer.len() != width as usize * height as usize * 4 {
        return Err(OverprintError::Other(anyhow::anyhow!(
            "circle clip expects a {width}x{height} layer"
        )));
    }
    for (y, row) in (0..height).zip(layer.chunks_exact_mut(width as usize * 4)) {
        for (x, px) in (0..width).zip(row.chunks_exact_mut(4)) {
            if px[3] == 0 {
                continue;
            }
            match circle_coverage(center, radius, x, y) {
                255 => {}
                0 => px.fill(0),
                cov => {
                    let c = u16::from(cov);
                    for v in px.iter_mut() {
                        *v = mul_div255_u8(u16::from(*v), c);
                    }
                }
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/mask.rs"]
mod tests;
