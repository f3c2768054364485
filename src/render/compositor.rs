use std::sync::Arc;

use crate::{
    assets::decode::PreparedImage,
    foundation::error::{OverprintError, OverprintResult},
    prepare::resolve::ResolvedOverlay,
    render::{mask::clip_layer_to_circle, surface::Surface},
};

/// Paint overlays onto `surface` in list order.
///
/// Each overlay goes through its own transparent layer, so a circular clip never outlives
/// the overlay it belongs to.
pub(crate) fn draw_overlays(
    surface: &mut Surface,
    overlays: &[ResolvedOverlay],
) -> OverprintResult<()> {
    for overlay in overlays {
        draw_overlay(surface, overlay)?;
    }
    Ok(())
}

pub(crate) fn draw_overlay(
    surface: &mut Surface,
    overlay: &ResolvedOverlay,
) -> OverprintResult<()> {
    let canvas_rect = surface.canvas().rect();
    if overlay.rect.intersect(canvas_rect).area() <= 0.0 {
        tracing::trace!(index = overlay.index, "overlay outside canvas");
        return Ok(());
    }

    let mut layer = rasterize_image_layer(surface.width(), surface.height(), overlay)?;
    if let Some((center, radius)) = overlay.clip_circle() {
        clip_layer_to_circle(
            layer.data_as_u8_slice_mut(),
            surface.width(),
            surface.height(),
            center,
            radius,
        )?;
    }
    surface.composite_over(layer.data_as_u8_slice())
}

fn rasterize_image_layer(
    width: u32,
    height: u32,
    overlay: &ResolvedOverlay,
) -> OverprintResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims_u16(width, height)?;
    let image = &overlay.image;
    let paint = vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(image_to_pixmap(image)?)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    };

    let sx = overlay.rect.width() / f64::from(image.width);
    let sy = overlay.rect.height() / f64::from(image.height);
    let transform =
        vello_cpu::kurbo::Affine::new([sx, 0.0, 0.0, sy, overlay.rect.x0, overlay.rect.y0]);

    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_transform(transform);
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(image.width),
        f64::from(image.height),
    ));
    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap)
}

pub(crate) fn surface_dims_u16(width: u32, height: u32) -> OverprintResult<(u16, u16)> {
    let w: u16 = width
        .try_into()
        .map_err(|_| OverprintError::invalid_scene("surface width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| OverprintError::invalid_scene("surface height exceeds u16"))?;
    Ok((w, h))
}

fn image_to_pixmap(image: &PreparedImage) -> OverprintResult<vello_cpu::Pixmap> {
    let w: u16 = image
        .width
        .try_into()
        .map_err(|_| OverprintError::decode("overlay image width exceeds u16"))?;
    let h: u16 = image
        .height
        .try_into()
        .map_err(|_| OverprintError::decode("overlay image height exceeds u16"))?;
    if image.rgba8_premul.len() != image.width as usize * image.height as usize * 4 {
        return Err(OverprintError::decode("prepared image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = image
        .rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
