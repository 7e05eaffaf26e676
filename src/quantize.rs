use kmeans_colors::get_kmeans;
use palette::{IntoColor, Lab, Srgb};

use crate::buffer::PixelBuffer;
use crate::color::{Color, Palette};
use crate::error::{Error, Result};

/// Index of the palette entry nearest to `color`. The first entry wins ties.
#[inline]
pub fn nearest_index(palette: &Palette, color: Color) -> usize {
    let mut best_idx = 0;
    let mut best_dist = u32::MAX;
    for (idx, entry) in palette.iter().enumerate() {
        let dist = color.distance_sq(entry.color);
        if dist < best_dist {
            best_dist = dist;
            best_idx = idx;
        }
    }
    best_idx
}

/// Map every pixel of `source` to its nearest palette color.
///
/// Source alpha is ignored and the result is fully opaque. The source buffer
/// is left untouched.
pub fn quantize(source: &PixelBuffer, palette: &Palette) -> Result<PixelBuffer> {
    palette.ensure_non_empty()?;
    let (w, h) = source.dimensions();
    let entries = palette.entries();

    let mut quantized_raw: Vec<u8> = Vec::with_capacity(source.as_raw().len());
    for chunk in source.as_raw().chunks(4) {
        let color = Color::new(chunk[0], chunk[1], chunk[2]);
        let mapped = entries[nearest_index(palette, color)].color;
        quantized_raw.extend_from_slice(&[mapped.r, mapped.g, mapped.b, 255]);
    }

    log::info!("quantized {w}x{h} image to {} colors", palette.len());
    PixelBuffer::from_raw(w, h, quantized_raw)
}

/// Suggest a `k`-color palette for `source` by running k-means in Lab space
/// over its opaque pixels. Labels are `color_1..=k`.
pub fn suggest_palette(source: &PixelBuffer, k: usize, seed: u64) -> Result<Palette> {
    if k == 0 {
        return Err(Error::InvalidColorCount);
    }

    let lab_pixels: Vec<Lab> = source
        .as_raw()
        .chunks(4)
        .filter(|chunk| chunk[3] != 0)
        .map(|chunk| {
            let srgb = Srgb::<u8>::new(chunk[0], chunk[1], chunk[2]);
            let lab: Lab = srgb.into_linear().into_color();
            lab
        })
        .collect();
    if lab_pixels.is_empty() {
        return Err(Error::NoOpaquePixels);
    }

    let kmeans = get_kmeans(k, 20, 1e-4, false, &lab_pixels, seed);
    let mut palette = Palette::default();
    for (i, &lab) in kmeans.centroids.iter().enumerate() {
        let rgb_f32: Srgb<f32> = Srgb::from_linear(lab.into_color());
        let c: Srgb<u8> = rgb_f32.into_format::<u8>();
        palette.push(format!("color_{}", i + 1), Color::from(c))?;
    }

    log::debug!("suggested {} palette colors from {} pixels", palette.len(), lab_pixels.len());
    Ok(palette)
}
