use crate::buffer::PixelBuffer;

#[inline(always)]
fn clamp_channel(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

fn map_rgb(source: &PixelBuffer, f: impl Fn(u8) -> u8) -> PixelBuffer {
    let mut out = source.clone();
    for px in out.as_image_mut().pixels_mut() {
        px[0] = f(px[0]);
        px[1] = f(px[1]);
        px[2] = f(px[2]);
    }
    out
}

/// Add `delta` to every RGB channel, saturating at 0 and 255.
pub fn adjust_brightness(source: &PixelBuffer, delta: i32) -> PixelBuffer {
    map_rgb(source, |c| (c as i32 + delta).clamp(0, 255) as u8)
}

/// Scale RGB contrast around mid-grey. `amount` runs from -1.0 (flat grey)
/// to 1.0 (hard threshold); 0.0 is the identity.
pub fn adjust_contrast(source: &PixelBuffer, amount: f32) -> PixelBuffer {
    let c = amount.clamp(-1.0, 1.0) * 255.0;
    // At c == 255 the denominator is 4, so the factor stays finite.
    let factor = (259.0 * (c + 255.0)) / (255.0 * (259.0 - c));
    map_rgb(source, |v| clamp_channel(factor * (v as f32 - 128.0) + 128.0))
}
