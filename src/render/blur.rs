use crate::{
    foundation::error::{OverprintError, OverprintResult},
    render::mask::CoverageMask,
};

/// Gaussian blur of a coverage mask. Samples outside the mask count as zero.
///
/// `sigma <= 0` returns the mask unchanged.
pub(crate) fn blur_mask(mask: &CoverageMask, sigma: f64) -> OverprintResult<CoverageMask> {
    if !sigma.is_finite() || sigma <= 0.0 || mask.is_empty() {
        return Ok(mask.clone());
    }
    let (w, h) = (mask.width(), mask.height());
    // Taps further than the longer edge only ever read zero padding.
    let radius = (sigma * 3.0).ceil().min(f64::from(w.max(h))) as u32;
    let kernel = gaussian_kernel_q16(radius, sigma)?;

    let mut tmp = CoverageMask::new(w, h);
    let mut out = CoverageMask::new(w, h);
    horizontal_pass(mask.data(), tmp.data_mut(), w, h, &kernel);
    vertical_pass(tmp.data(), out.data_mut(), w, h, &kernel);
    Ok(out)
}

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f64) -> OverprintResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(OverprintError::invalid_scene("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(OverprintError::Other(anyhow::anyhow!(
            "gaussian kernel sum is zero"
        )));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    for y in 0..i64::from(height) {
        let row = (y * w) as usize;
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sx = x + ki as i64 - radius;
                if sx < 0 || sx >= w {
                    continue;
                }
                acc += u64::from(kw) * u64::from(src[row + sx as usize]);
            }
            dst[row + x as usize] = q16_to_u8(acc);
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i64;
    let w = i64::from(width);
    let h = i64::from(height);
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0u64;
            for (ki, &kw) in k.iter().enumerate() {
                let sy = y + ki as i64 - radius;
                if sy < 0 || sy >= h {
                    continue;
                }
                acc += u64::from(kw) * u64::from(src[(sy * w + x) as usize]);
            }
            dst[(y * w + x) as usize] = q16_to_u8(acc);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
