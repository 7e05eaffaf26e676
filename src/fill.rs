use std::collections::VecDeque;

use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::edit::EditOutcome;
use crate::error::{Error, Result};

pub(crate) fn check_tolerance(tolerance: f64) -> Result<()> {
    if tolerance.is_finite() && tolerance >= 0.0 {
        Ok(())
    } else {
        Err(Error::InvalidTolerance)
    }
}

/// True when filling from (x, y) would leave the buffer unchanged: the fill
/// color is already within tolerance of the start pixel.
pub fn fill_is_noop(buffer: &PixelBuffer, x: u32, y: u32, color: Color, tolerance: f64) -> bool {
    buffer.color_at(x, y).within(color, tolerance)
}

/// Recolor the 4-connected region around (x, y) whose pixels lie within
/// `tolerance` of the start pixel's original color. Alpha is preserved.
///
/// Every pixel is evaluated at most once: the visited flag is set when a
/// pixel is first examined, whether or not it ends up recolored.
pub fn region_fill(
    buffer: &mut PixelBuffer,
    x: u32,
    y: u32,
    color: Color,
    tolerance: f64,
) -> Result<EditOutcome> {
    check_tolerance(tolerance)?;
    buffer.check_bounds(x, y)?;

    let seed = buffer.color_at(x, y);
    if seed.within(color, tolerance) {
        log::debug!("fill at ({x}, {y}) skipped: {color} already within {tolerance} of {seed}");
        return Ok(EditOutcome::Unchanged);
    }

    let (w, h) = buffer.dimensions();
    let pixel_count = (w as usize) * (h as usize);
    let mut visited = vec![false; pixel_count];
    let mut queue: VecDeque<(u32, u32)> = VecDeque::with_capacity(pixel_count);
    let mut recolored = 0usize;

    // The seed is within tolerance of itself.
    visited[(y as usize) * (w as usize) + x as usize] = true;
    buffer.set_rgb(x, y, color);
    recolored += 1;
    queue.push_back((x, y));

    while let Some((px, py)) = queue.pop_front() {
        let neighbors = [
            (px.wrapping_sub(1), py),
            (px + 1, py),
            (px, py.wrapping_sub(1)),
            (px, py + 1),
        ];
        for (nx, ny) in neighbors {
            if nx >= w || ny >= h {
                continue;
            }
            let idx = (ny as usize) * (w as usize) + nx as usize;
            if visited[idx] {
                continue;
            }
            visited[idx] = true;
            if !buffer.color_at(nx, ny).within(seed, tolerance) {
                continue;
            }
            buffer.set_rgb(nx, ny, color);
            recolored += 1;
            queue.push_back((nx, ny));
        }
    }

    log::debug!("fill at ({x}, {y}) recolored {recolored} pixels");
    Ok(EditOutcome::Changed(recolored))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    const BLACK: Color = Color::new(0, 0, 0);
    const WHITE: Color = Color::new(255, 255, 255);
    const RED: Color = Color::new(255, 0, 0);

    #[test]
    fn fills_uniform_buffer_completely() {
        let mut buf = PixelBuffer::from_colors(3, 3, &[BLACK; 9]).unwrap();
        let outcome = region_fill(&mut buf, 1, 1, WHITE, 0.0).unwrap();
        assert_eq!(outcome, EditOutcome::Changed(9));
        assert!(buf.as_image().pixels().all(|px| *px == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn stops_at_out_of_tolerance_wall() {
        // Column 1 is a red wall separating two black regions.
        #[rustfmt::skip]
        let colors = [
            BLACK, RED, BLACK,
            BLACK, RED, BLACK,
            BLACK, RED, BLACK,
        ];
        let mut buf = PixelBuffer::from_colors(3, 3, &colors).unwrap();
        region_fill(&mut buf, 0, 0, WHITE, 10.0).unwrap();

        for y in 0..3 {
            assert_eq!(buf.color_at(0, y), WHITE);
            assert_eq!(buf.color_at(1, y), RED);
            assert_eq!(buf.color_at(2, y), BLACK);
        }
    }

    #[test]
    fn diagonal_neighbors_are_not_connected() {
        #[rustfmt::skip]
        let colors = [
            BLACK, RED,
            RED, BLACK,
        ];
        let mut buf = PixelBuffer::from_colors(2, 2, &colors).unwrap();
        assert_eq!(region_fill(&mut buf, 0, 0, WHITE, 0.0).unwrap(), EditOutcome::Changed(1));
        assert_eq!(buf.color_at(1, 1), BLACK);
    }

    #[test]
    fn tolerance_is_measured_from_the_start_color() {
        // A gradient where each step is 8 away from its neighbor but the far
        // end is 24 away from the start.
        let colors: Vec<Color> = (0..4).map(|i| Color::new(i * 8, 0, 0)).collect();
        let mut buf = PixelBuffer::from_colors(4, 1, &colors).unwrap();
        region_fill(&mut buf, 0, 0, WHITE, 16.0).unwrap();
        assert_eq!(buf.color_at(2, 0), WHITE);
        assert_eq!(buf.color_at(3, 0), Color::new(24, 0, 0));
    }

    #[test]
    fn fill_color_within_tolerance_is_a_noop() {
        let colors = [Color::new(10, 10, 10), Color::new(12, 12, 12), BLACK, RED];
        let mut buf = PixelBuffer::from_colors(2, 2, &colors).unwrap();
        let before = buf.clone();
        assert!(fill_is_noop(&buf, 0, 0, Color::new(12, 10, 10), 5.0));
        let outcome = region_fill(&mut buf, 0, 0, Color::new(12, 10, 10), 5.0).unwrap();
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert_eq!(buf, before);
    }

    #[test]
    fn seed_in_far_corner_visits_each_pixel_once() {
        let mut buf = PixelBuffer::from_colors(5, 3, &[BLACK; 15]).unwrap();
        let outcome = region_fill(&mut buf, 4, 2, RED, 0.0).unwrap();
        assert_eq!(outcome, EditOutcome::Changed(15));
        assert_eq!(buf.color_at(0, 0), RED);
    }

    #[test]
    fn alpha_is_preserved() {
        let mut buf = PixelBuffer::filled(2, 1, Rgba([0, 0, 0, 128])).unwrap();
        region_fill(&mut buf, 0, 0, WHITE, 0.0).unwrap();
        assert_eq!(buf.pixel(1, 0), Rgba([255, 255, 255, 128]));
    }

    #[test]
    fn invalid_input_leaves_buffer_untouched() {
        let mut buf = PixelBuffer::from_colors(2, 2, &[BLACK; 4]).unwrap();
        let before = buf.clone();
        assert!(matches!(
            region_fill(&mut buf, 2, 0, WHITE, 0.0),
            Err(Error::OutOfBounds { .. })
        ));
        assert!(matches!(
            region_fill(&mut buf, 0, 0, WHITE, -1.0),
            Err(Error::InvalidTolerance)
        ));
        assert!(matches!(
            region_fill(&mut buf, 0, 0, WHITE, f64::NAN),
            Err(Error::InvalidTolerance)
        ));
        assert_eq!(buf, before);
    }
}
