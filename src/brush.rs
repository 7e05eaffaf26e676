use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::edit::EditOutcome;
use crate::error::Result;

/// Paint the square of side `2 * floor(diameter / 2) + 1` centred on (x, y).
/// Pixels that fall outside the buffer are skipped; painted pixels become
/// fully opaque.
pub fn brush_stamp(
    buffer: &mut PixelBuffer,
    x: u32,
    y: u32,
    color: Color,
    diameter: u32,
) -> Result<EditOutcome> {
    buffer.check_bounds(x, y)?;

    let radius = (diameter / 2) as i64;
    let (w, h) = buffer.dimensions();
    let (cx, cy) = (x as i64, y as i64);
    let px = color.to_rgba();

    let x_range = (cx - radius).max(0)..=(cx + radius).min(w as i64 - 1);
    let y_range = (cy - radius).max(0)..=(cy + radius).min(h as i64 - 1);

    let mut painted = 0usize;
    for sy in y_range {
        for sx in x_range.clone() {
            buffer.put_pixel(sx as u32, sy as u32, px);
            painted += 1;
        }
    }

    Ok(EditOutcome::Changed(painted))
}
