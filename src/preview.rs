use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::config::Substitution;

/// Render a physical-material preview: every pixel whose RGB exactly matches
/// a substitution's `from` takes its `to` color. First matching entry wins;
/// alpha passes through.
pub fn render_preview(quantized: &PixelBuffer, substitutions: &[Substitution]) -> PixelBuffer {
    let mut out = quantized.clone();
    for px in out.as_image_mut().pixels_mut() {
        let color = Color::from_rgba(px);
        if let Some(sub) = substitutions.iter().find(|s| s.from == color) {
            px[0] = sub.to.r;
            px[1] = sub.to.g;
            px[2] = sub.to.b;
        }
    }
    out
}
