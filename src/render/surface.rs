use crate::{
    foundation::core::{Canvas, Rgba8Premul},
    foundation::error::{OverprintError, OverprintResult},
    foundation::math::{mul_div255_u8, premul_over_px, unpremultiply_px},
    render::mask::CoverageMask,
};

/// In-memory pixel buffer being painted, premultiplied RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    canvas: Canvas,
    data: Vec<u8>,
}

impl Surface {
    /// Fully transparent surface.
    pub fn new(canvas: Canvas) -> OverprintResult<Self> {
        canvas.validate()?;
        Ok(Self {
            canvas,
            data: vec![0u8; canvas.rgba_len()],
        })
    }

    /// Surface dimensions.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the surface, returning its premultiplied bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = (y as usize * self.canvas.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel_straight(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixel(x, y).map(unpremultiply_px)
    }

    /// Straight-alpha RGBA8 copy of the whole surface.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply_px([px[0], px[1], px[2], px[3]]));
        }
        out
    }

    /// Overwrite every pixel with `color`.
    pub(crate) fn fill(&mut self, color: Rgba8Premul) {
        let rgba = color.to_array();
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba);
        }
    }

    /// Source-over a same-sized premultiplied layer onto this surface.
    pub(crate) fn composite_over(&mut self, layer: &[u8]) -> OverprintResult<()> {
        if layer.len() != self.data.len() {
            return Err(OverprintError::Other(anyhow::anyhow!(
                "layer is {} bytes, surface is {}",
                layer.len(),
                self.data.len()
            )));
        }
        for (dst, src) in self.data.chunks_exact_mut(4).zip(layer.chunks_exact(4)) {
            if src[3] == 0 {
                continue;
            }
            let out = premul_over_px(
                [dst[0], dst[1], dst[2], dst[3]],
                [src[0], src[1], src[2], src[3]],
            );
            dst.copy_from_slice(&out);
        }
        Ok(())
    }

    /// Paint `mask` using a per-row premultiplied color, source-over.
    pub(crate) fn composite_mask(
        &mut self,
        mask: &CoverageMask,
        mut row_color: impl FnMut(u32) -> Rgba8Premul,
    ) -> OverprintResult<()> {
        if mask.width() != self.canvas.width || mask.height() != self.canvas.height {
            return Err(OverprintError::Other(anyhow::anyhow!(
                "mask is {}x{}, surface is {}x{}",
                mask.width(),
                mask.height(),
                self.canvas.width,
                self.canvas.height
            )));
        }
        let w = self.canvas.width as usize;
        for (y, (dst_row, cov_row)) in self
            .data
            .chunks_exact_mut(w * 4)
            .zip(mask.data().chunks_exact(w))
            .enumerate()
        {
            if cov_row.iter().all(|&c| c == 0) {
                continue;
            }
            let color = row_color(y as u32).to_array();
            if color[3] == 0 {
                continue;
            }
            for (dst, &cov) in dst_row.chunks_exact_mut(4).zip(cov_row) {
                if cov == 0 {
                    continue;
                }
                let src = if cov == 255 {
                    color
                } else {
                    let c = u16::from(cov);
                    [
                        mul_div255_u8(u16::from(color[0]), c),
                        mul_div255_u8(u16::from(color[1]), c),
                        mul_div255_u8(u16::from(color[2]), c),
                        mul_div255_u8(u16::from(color[3]), c),
                    ]
                };
                let out = premul_over_px([dst[0], dst[1], dst[2], dst[3]], src);
                dst.copy_from_slice(&out);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
