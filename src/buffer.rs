use image::{self, DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage, imageops::FilterType};

use crate::color::Color;
use crate::error::{Error, Result};

/// Row-major RGBA raster with non-zero area.
///
/// Every stage of the pipeline hands out its own buffer; nothing is aliased.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Self::filled(width, height, Rgba([0, 0, 0, 0]))
    }

    pub fn filled(width: u32, height: u32, px: Rgba<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::ZeroArea);
        }
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, px),
        })
    }

    pub fn from_image(image: RgbaImage) -> Result<Self> {
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::ZeroArea);
        }
        Ok(Self { image })
    }

    /// Wrap raw RGBA bytes (`width * height * 4` of them).
    pub fn from_raw(width: u32, height: u32, raw: Vec<u8>) -> Result<Self> {
        let expected = (width as usize) * (height as usize) * 4;
        let actual = raw.len();
        if actual != expected {
            return Err(Error::RawLength { expected, actual });
        }
        let image =
            RgbaImage::from_raw(width, height, raw).ok_or(Error::RawLength { expected, actual })?;
        Self::from_image(image)
    }

    /// Build from opaque colors laid out row-major.
    pub fn from_colors(width: u32, height: u32, colors: &[Color]) -> Result<Self> {
        let raw: Vec<u8> = colors
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, 255])
            .collect();
        Self::from_raw(width, height, raw)
    }

    /// Decode an encoded image, shrinking it so the longest side is at most
    /// `max_dimension` while keeping the aspect ratio.
    pub fn decode(bytes: &[u8], max_dimension: u32) -> Result<Self> {
        let img = image::load_from_memory(bytes)?;
        let (orig_w, orig_h) = img.dimensions();
        let max_side = orig_w.max(orig_h);

        let img = if max_dimension > 0 && max_side > max_dimension {
            let ratio = max_dimension as f32 / max_side as f32;
            let w = ((orig_w as f32) * ratio).round().max(1.0) as u32;
            let h = ((orig_h as f32) * ratio).round().max(1.0) as u32;
            log::debug!("downsizing upload from {orig_w}x{orig_h} to {w}x{h}");
            DynamicImage::ImageRgba8(image::imageops::resize(&img, w, h, FilterType::Triangle))
        } else {
            img
        };

        Self::from_image(img.to_rgba8())
    }

    /// PNG-encode the buffer.
    pub fn to_png(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        {
            let mut cursor = std::io::Cursor::new(&mut buf);
            self.image.write_to(&mut cursor, ImageFormat::Png)?;
        }
        Ok(buf)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width() && y < self.height()
    }

    pub fn check_bounds(&self, x: u32, y: u32) -> Result<()> {
        if self.contains(x, y) {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            })
        }
    }

    pub fn check_dimensions(&self, expected: (u32, u32)) -> Result<()> {
        let actual = self.dimensions();
        if actual == expected {
            Ok(())
        } else {
            Err(Error::DimensionMismatch { expected, actual })
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.image.get_pixel(x, y)
    }

    pub fn color_at(&self, x: u32, y: u32) -> Color {
        Color::from_rgba(self.image.get_pixel(x, y))
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, px: Rgba<u8>) {
        self.image.put_pixel(x, y, px);
    }

    /// Replace RGB at (x, y), leaving alpha alone.
    pub fn set_rgb(&mut self, x: u32, y: u32, color: Color) {
        let px = self.image.get_pixel_mut(x, y);
        px[0] = color.r;
        px[1] = color.g;
        px[2] = color.b;
    }

    pub fn is_fully_transparent(&self) -> bool {
        self.image.pixels().all(|px| px[3] == 0)
    }

    pub fn opaque_count(&self) -> usize {
        self.image.pixels().filter(|px| px[3] != 0).count()
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub(crate) fn as_image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }
}
