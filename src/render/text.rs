use crate::{
    assets::fonts::{FontFace, FontLibrary, ShapedLine, TextLayoutEngine},
    foundation::core::{Canvas, Point, Rgba8Premul},
    foundation::error::{OverprintError, OverprintResult},
    foundation::math::lerp_u8,
    render::{
        blur::blur_mask, compositor::surface_dims_u16, mask::CoverageMask, surface::Surface,
    },
    scene::model::{Shadow, TextAlign, TextBaseline, TextBlock},
};

/// Vertical gradient spanning the whole text block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct VerticalGradient {
    top: f64,
    height: f64,
    start: Rgba8Premul,
    end: Rgba8Premul,
}

impl VerticalGradient {
    /// Gradient running from the first line origin down `pitch * line_count` pixels.
    pub(crate) fn for_block(text: &TextBlock, origin: Point) -> Self {
        let line_count = text.lines().len() as f64;
        Self {
            top: origin.y,
            height: text.line_pitch() * line_count,
            start: text.gradient_start.to_premul(),
            end: text.gradient_end.to_premul(),
        }
    }

    /// Color at the center of pixel row `y`. Rows outside the span take the end colors.
    pub(crate) fn color_at_row(&self, y: u32) -> Rgba8Premul {
        if self.height <= 0.0 {
            return self.start;
        }
        let t = (f64::from(y) + 0.5 - self.top) / self.height;
        Rgba8Premul {
            r: lerp_u8(self.start.r, self.end.r, t),
            g: lerp_u8(self.start.g, self.end.g, t),
            b: lerp_u8(self.start.b, self.end.b, t),
            a: lerp_u8(self.start.a, self.end.a, t),
        }
    }
}

#[derive(Clone, Copy, Debug)]
enum GlyphPaint {
    Fill,
    Stroke(f64),
}

/// Paint the text block on top of whatever `surface` already holds.
///
/// Per line: outline stroke, gradient fill, then the shadowed second fill when the block
/// carries a shadow. The shadow is only ever passed down as an argument.
#[tracing::instrument(skip_all, fields(lines = text.lines().len(), family = %text.font_family))]
pub(crate) fn draw_text(
    surface: &mut Surface,
    text: &TextBlock,
    fonts: &FontLibrary,
    engine: &mut TextLayoutEngine,
) -> OverprintResult<()> {
    if !text.has_glyphs() {
        return Ok(());
    }
    let face = fonts.face(&text.font_family).ok_or_else(|| {
        OverprintError::font(format!(
            "no font file configured for family '{}'",
            text.font_family
        ))
    })?;

    let canvas = surface.canvas();
    let origin = text.anchor.origin(canvas);
    let gradient = VerticalGradient::for_block(text, origin);
    let pitch = text.line_pitch();
    let size = text.font_size as f32;

    for (i, line) in text.lines().into_iter().enumerate() {
        if line.chars().all(char::is_whitespace) {
            continue;
        }
        let shaped = engine.shape_line(face, line, size)?;
        if shaped.glyphs.is_empty() {
            continue;
        }
        let pen = line_pen(text, canvas, origin, &shaped, origin.y + i as f64 * pitch);
        draw_line(surface, text, face, &shaped, pen, &gradient)?;
    }
    Ok(())
}

fn draw_line(
    surface: &mut Surface,
    text: &TextBlock,
    face: &FontFace,
    shaped: &ShapedLine,
    pen: Point,
    gradient: &VerticalGradient,
) -> OverprintResult<()> {
    let canvas = surface.canvas();
    let size = text.font_size as f32;

    if text.outline_width_px > 0.0 && text.outline_color.is_visible() {
        let stroke = glyph_mask(
            canvas,
            face,
            shaped,
            size,
            pen,
            GlyphPaint::Stroke(text.outline_width_px),
        )?;
        let color = text.outline_color.to_premul();
        surface.composite_mask(&stroke, |_| color)?;
    }

    let fill = glyph_mask(canvas, face, shaped, size, pen, GlyphPaint::Fill)?;
    surface.composite_mask(&fill, |y| gradient.color_at_row(y))?;

    if let Some(shadow) = &text.shadow {
        draw_shadow(surface, &fill, shadow)?;
        surface.composite_mask(&fill, |y| gradient.color_at_row(y))?;
    }
    Ok(())
}

fn draw_shadow(
    surface: &mut Surface,
    fill: &CoverageMask,
    shadow: &Shadow,
) -> OverprintResult<()> {
    if !shadow.is_visible() {
        return Ok(());
    }
    let max_dx = f64::from(fill.width());
    let max_dy = f64::from(fill.height());
    let shifted = fill.translated(
        shadow.offset_x.round().clamp(-max_dx, max_dx) as i64,
        shadow.offset_y.round().clamp(-max_dy, max_dy) as i64,
    );
    let blurred = blur_mask(&shifted, shadow.blur / 2.0)?;
    let color = shadow.color.to_premul();
    surface.composite_mask(&blurred, |_| color)
}

/// Pen position (line start on the baseline) for one line.
fn line_pen(
    text: &TextBlock,
    canvas: Canvas,
    origin: Point,
    shaped: &ShapedLine,
    line_y: f64,
) -> Point {
    let canvas_w = f64::from(canvas.width);
    let x = match text.align {
        TextAlign::Left => origin.x,
        TextAlign::Center => canvas_w / 2.0 - shaped.width / 2.0,
        TextAlign::Right => canvas_w - origin.x - shaped.width,
    };
    let y = match text.baseline {
        TextBaseline::Alphabetic => line_y,
        TextBaseline::Middle => line_y + (shaped.ascent - shaped.descent) / 2.0,
    };
    Point::new(x, y)
}

fn glyph_mask(
    canvas: Canvas,
    face: &FontFace,
    shaped: &ShapedLine,
    size: f32,
    pen: Point,
    paint: GlyphPaint,
) -> OverprintResult<CoverageMask> {
    let (w, h) = surface_dims_u16(canvas.width, canvas.height)?;
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    let mut ctx = vello_cpu::RenderContext::new(w, h);
    ctx.set_transform(vello_cpu::kurbo::Affine::translate((pen.x, pen.y)));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 255, 255, 255));

    let glyphs = shaped.glyphs.iter().cloned();
    match paint {
        GlyphPaint::Fill => {
            ctx.glyph_run(face.font_data())
                .font_size(size)
                .fill_glyphs(glyphs);
        }
        GlyphPaint::Stroke(width) => {
            ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
            ctx.glyph_run(face.font_data())
                .font_size(size)
                .stroke_glyphs(glyphs);
        }
    }

    ctx.flush();
    ctx.render_to_pixmap(&mut pixmap);
    CoverageMask::from_alpha(pixmap.data_as_u8_slice(), canvas.width, canvas.height)
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
