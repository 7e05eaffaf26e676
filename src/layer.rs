use image::imageops;

use crate::buffer::PixelBuffer;
use crate::config::LayerGroup;
use crate::error::Result;
use crate::mask::MaskSet;

/// A fabrication layer composited from one group's masks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layer {
    pub name: String,
    pub buffer: PixelBuffer,
}

/// Draw `top` over `bottom` with source-over alpha compositing.
pub fn draw_over(bottom: &mut PixelBuffer, top: &PixelBuffer) -> Result<()> {
    top.check_dimensions(bottom.dimensions())?;
    imageops::overlay(bottom.as_image_mut(), top.as_image(), 0, 0);
    Ok(())
}

/// Composite the listed buffers bottom to top onto a transparent canvas.
pub fn composite<'a, I>(dimensions: (u32, u32), layers: I) -> Result<PixelBuffer>
where
    I: IntoIterator<Item = &'a PixelBuffer>,
{
    let mut out = PixelBuffer::new(dimensions.0, dimensions.1)?;
    for top in layers {
        draw_over(&mut out, top)?;
    }
    Ok(out)
}

/// Build one layer per group, in group order.
///
/// Labels missing from `masks` and masks that claimed no pixels contribute
/// nothing, so a layer made only of such masks comes out fully transparent
/// and is dropped.
pub fn composite_layers(masks: &MaskSet, groups: &[LayerGroup]) -> Result<Vec<Layer>> {
    let mut layers = Vec::with_capacity(groups.len());

    for group in groups {
        let members = group
            .labels
            .iter()
            .filter_map(|label| masks.get(label))
            .filter(|mask| !mask.is_empty());
        let buffer = composite(masks.dimensions(), members.map(|m| &m.buffer))?;

        if buffer.is_fully_transparent() {
            log::debug!("dropping empty layer `{}`", group.name);
            continue;
        }
        layers.push(Layer {
            name: group.name.clone(),
            buffer,
        });
    }

    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, Palette};
    use crate::mask::{Markers, generate_masks};
    use image::Rgba;

    const RED: Color = Color::new(200, 0, 0);
    const GREEN: Color = Color::new(0, 200, 0);
    const BLUE: Color = Color::new(0, 0, 200);

    fn spot(w: u32, h: u32, at: &[(u32, u32)], color: Color) -> PixelBuffer {
        let mut buf = PixelBuffer::new(w, h).unwrap();
        for &(x, y) in at {
            buf.put_pixel(x, y, color.to_rgba());
        }
        buf
    }

    #[test]
    fn later_masks_draw_over_earlier_ones() {
        let a = spot(3, 1, &[(0, 0), (1, 0)], RED);
        let b = spot(3, 1, &[(1, 0)], GREEN);
        let out = composite((3, 1), [&a, &b]).unwrap();
        assert_eq!(out.pixel(0, 0), RED.to_rgba());
        assert_eq!(out.pixel(1, 0), GREEN.to_rgba());
        assert_eq!(out.pixel(2, 0), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn compositing_is_associative() {
        let a = spot(4, 4, &[(0, 0), (1, 1), (2, 2)], RED);
        let b = spot(4, 4, &[(1, 1), (3, 3)], GREEN);
        let c = spot(4, 4, &[(2, 2), (3, 3), (0, 3)], BLUE);

        let all_at_once = composite((4, 4), [&a, &b, &c]).unwrap();
        let mut staged = composite((4, 4), [&a, &b]).unwrap();
        draw_over(&mut staged, &c).unwrap();
        assert_eq!(all_at_once, staged);
    }

    #[test]
    fn missing_labels_and_empty_layers() {
        let palette = Palette::new([("red", RED), ("green", GREEN)]).unwrap();
        let quantized = PixelBuffer::from_colors(4, 4, &[RED; 16]).unwrap();
        let masks = generate_masks(&quantized, &palette, Markers { color: RED, size: 2 }).unwrap();

        let groups = [
            LayerGroup::new("front", ["nope", "red"]),
            LayerGroup::new("unused", ["green"]),
            LayerGroup::new("ghost", ["nope"]),
        ];
        let layers = composite_layers(&masks, &groups).unwrap();
        assert_eq!(layers.len(), 1);
        assert_eq!(layers[0].name, "front");
        assert_eq!(layers[0].buffer, quantized);
        assert!(!masks.get("green").unwrap().buffer.is_fully_transparent());
    }

    #[test]
    fn size_mismatch_is_rejected() {
        let mut bottom = PixelBuffer::new(2, 2).unwrap();
        let top = PixelBuffer::new(3, 2).unwrap();
        assert!(matches!(
            draw_over(&mut bottom, &top),
            Err(crate::Error::DimensionMismatch { .. })
        ));
    }
}
