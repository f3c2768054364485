use xxhash_rust::xxh3::Xxh3;

use crate::scene::color::Color;
use crate::scene::model::{
    ImageSource, Overlay, OverlayShape, Scene, Shadow, TextAlign, TextAnchor, TextBaseline,
    TextBlock,
};

const XXH3_SEED: u64 = 0x6f76_6572_7072_696e;

/// Stable content fingerprint of a [`Scene`].
///
/// Two scenes with equal fingerprints render to identical pixels, so an interactive caller can
/// skip redundant re-renders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneFingerprint {
    /// High 64 bits.
    pub hi: u64,
    /// Low 64 bits.
    pub lo: u64,
}

/// Compute the fingerprint of a scene.
pub fn fingerprint_scene(scene: &Scene) -> SceneFingerprint {
    let mut h = StableHasher::new();
    h.write_u32(scene.canvas.width);
    h.write_u32(scene.canvas.height);
    write_color(&mut h, scene.background);
    write_text(&mut h, &scene.text);
    h.write_u32(scene.overlays.len() as u32);
    for o in &scene.overlays {
        write_overlay(&mut h, o);
    }
    h.finish()
}

struct StableHasher {
    inner: Xxh3,
}

impl StableHasher {
    fn new() -> Self {
        Self {
            inner: Xxh3::with_seed(XXH3_SEED),
        }
    }

    fn write_bytes(&mut self, b: &[u8]) {
        self.inner.update(b);
    }

    fn write_u8(&mut self, v: u8) {
        self.write_bytes(&[v]);
    }

    fn write_u32(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.write_bytes(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_str(&mut self, s: &str) {
        self.write_u64(s.len() as u64);
        self.write_bytes(s.as_bytes());
    }

    fn finish(self) -> SceneFingerprint {
        let v = self.inner.digest128();
        SceneFingerprint {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

fn write_color(h: &mut StableHasher, c: Color) {
    h.write_bytes(&[c.r, c.g, c.b, c.a]);
}

fn write_text(h: &mut StableHasher, t: &TextBlock) {
    h.write_str(&t.content);
    h.write_f64(t.font_size);
    h.write_str(&t.font_family);
    h.write_f64(t.line_height);
    h.write_u8(match t.align {
        TextAlign::Left => 0,
        TextAlign::Center => 1,
        TextAlign::Right => 2,
    });
    match t.anchor {
        TextAnchor::Percent { x, y } => {
            h.write_u8(0);
            h.write_f64(x);
            h.write_f64(y);
        }
        TextAnchor::CanvasCenter { offset_y } => {
            h.write_u8(1);
            h.write_f64(offset_y);
        }
    }
    h.write_u8(match t.baseline {
        TextBaseline::Alphabetic => 0,
        TextBaseline::Middle => 1,
    });
    // max_width is inert, so it does not participate.
    write_color(h, t.outline_color);
    h.write_f64(t.outline_width_px);
    write_color(h, t.gradient_start);
    write_color(h, t.gradient_end);
    write_shadow(h, t.shadow.as_ref());
}

fn write_shadow(h: &mut StableHasher, s: Option<&Shadow>) {
    let Some(s) = s else {
        h.write_u8(0);
        return;
    };
    h.write_u8(1);
    write_color(h, s.color);
    h.write_f64(s.blur);
    h.write_f64(s.offset_x);
    h.write_f64(s.offset_y);
}

fn write_overlay(h: &mut StableHasher, o: &Overlay) {
    match &o.source {
        ImageSource::DataUri(s) => {
            h.write_u8(0);
            h.write_str(s);
        }
        ImageSource::Path(p) => {
            h.write_u8(1);
            h.write_str(p);
        }
        ImageSource::Url(u) => {
            h.write_u8(2);
            h.write_str(u);
        }
        ImageSource::Decoded(img) => {
            h.write_u8(3);
            h.write_u32(img.width);
            h.write_u32(img.height);
            h.write_bytes(&img.rgba8_premul);
        }
    }
    h.write_f64(o.x);
    h.write_f64(o.y);
    h.write_f64(o.width);
    h.write_f64(o.height);
    h.write_u8(match o.shape {
        OverlayShape::Rectangle => 0,
        OverlayShape::Circle => 1,
    });
}

#[cfg(test)]
#[path = "../../tests/unit/scene/fingerprint.rs"]
mod tests;
