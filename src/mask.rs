use image::Rgba;

use crate::buffer::PixelBuffer;
use crate::color::{Color, Palette};
use crate::error::{Error, Result};

/// Single-color stencil extracted from a quantized image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pub label: String,
    pub color: Color,
    /// Pixels claimed from the image, not counting corner markers.
    pub pixel_count: usize,
    pub buffer: PixelBuffer,
}

impl Mask {
    /// True if no image pixel belongs to this label; only markers are set.
    pub fn is_empty(&self) -> bool {
        self.pixel_count == 0
    }
}

/// All masks of one generation pass, in palette order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MaskSet {
    width: u32,
    height: u32,
    masks: Vec<Mask>,
}

impl MaskSet {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn get(&self, label: &str) -> Option<&Mask> {
        self.masks.iter().find(|m| m.label == label)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mask> {
        self.masks.iter()
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }

    pub fn into_masks(self) -> Vec<Mask> {
        self.masks
    }
}

/// Registration marker settings stamped at every mask corner.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Markers {
    pub color: Color,
    pub size: u32,
}

/// Extract one mask per palette label.
///
/// A pixel is claimed by the first label whose color equals it exactly and
/// only if the pixel is opaque, so content regions never overlap. An opaque
/// pixel no label claims is an error. Corner markers are stamped afterwards
/// and do overlap across masks.
pub fn generate_masks(
    quantized: &PixelBuffer,
    palette: &Palette,
    markers: Markers,
) -> Result<MaskSet> {
    palette.ensure_non_empty()?;
    let (w, h) = quantized.dimensions();

    let mut buffers = palette
        .iter()
        .map(|_| PixelBuffer::new(w, h))
        .collect::<Result<Vec<_>>>()?;

    let mut counts = vec![0usize; palette.len()];

    for (x, y, px) in quantized.as_image().enumerate_pixels() {
        if px[3] == 0 {
            continue;
        }
        let color = Color::from_rgba(px);
        let idx = palette
            .position_of(color)
            .ok_or(Error::UnclaimedPixel { x, y, color })?;
        buffers[idx].put_pixel(x, y, color.to_rgba());
        counts[idx] += 1;
    }

    let masks: Vec<Mask> = palette
        .iter()
        .zip(buffers)
        .zip(counts)
        .map(|((entry, mut buffer), pixel_count)| {
            stamp_corner_markers(&mut buffer, markers);
            Mask {
                label: entry.label.clone(),
                color: entry.color,
                pixel_count,
                buffer,
            }
        })
        .collect();

    log::info!("generated {} masks for {w}x{h} image", masks.len());
    Ok(MaskSet {
        width: w,
        height: h,
        masks,
    })
}

/// Paint `size`×`size` opaque blocks into all four corners, clipped to the
/// buffer.
pub fn stamp_corner_markers(buffer: &mut PixelBuffer, markers: Markers) {
    let (w, h) = buffer.dimensions();
    let sw = markers.size.min(w);
    let sh = markers.size.min(h);
    let px: Rgba<u8> = markers.color.to_rgba();

    for (ox, oy) in [(0, 0), (w - sw, 0), (0, h - sh), (w - sw, h - sh)] {
        for y in oy..oy + sh {
            for x in ox..ox + sw {
                buffer.put_pixel(x, y, px);
            }
        }
    }
}

/// True if (x, y) lies inside one of the corner marker blocks.
pub fn is_marker_pixel(dimensions: (u32, u32), size: u32, x: u32, y: u32) -> bool {
    let (w, h) = dimensions;
    let near_x = x < size || x + size >= w;
    let near_y = y < size || y + size >= h;
    near_x && near_y
}
