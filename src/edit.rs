use crate::brush::brush_stamp;
use crate::buffer::PixelBuffer;
use crate::color::Color;
use crate::error::Result;
use crate::fill::{check_tolerance, fill_is_noop, region_fill};

/// What an edit did to its buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditOutcome {
    /// Number of pixels written.
    Changed(usize),
    /// Nothing to do; the buffer is byte-identical to before.
    Unchanged,
}

impl EditOutcome {
    pub fn is_changed(self) -> bool {
        matches!(self, EditOutcome::Changed(_))
    }
}

/// A single in-place correction applied to an editable canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operation {
    Fill {
        x: u32,
        y: u32,
        color: Color,
        tolerance: f64,
    },
    Stamp {
        x: u32,
        y: u32,
        color: Color,
        diameter: u32,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Fill { .. } => "fill",
            Operation::Stamp { .. } => "stamp",
        }
    }

    pub fn color(&self) -> Color {
        match *self {
            Operation::Fill { color, .. } | Operation::Stamp { color, .. } => color,
        }
    }

    /// Check every precondition without touching the buffer.
    pub fn validate(&self, buffer: &PixelBuffer) -> Result<()> {
        match *self {
            Operation::Fill { x, y, tolerance, .. } => {
                check_tolerance(tolerance)?;
                buffer.check_bounds(x, y)
            }
            Operation::Stamp { x, y, .. } => buffer.check_bounds(x, y),
        }
    }

    /// True if applying this operation is known to change nothing.
    /// Only meaningful after `validate` succeeded.
    pub fn is_noop(&self, buffer: &PixelBuffer) -> bool {
        match *self {
            Operation::Fill { x, y, color, tolerance } => {
                fill_is_noop(buffer, x, y, color, tolerance)
            }
            Operation::Stamp { .. } => false,
        }
    }

    pub fn apply(&self, buffer: &mut PixelBuffer) -> Result<EditOutcome> {
        match *self {
            Operation::Fill { x, y, color, tolerance } => region_fill(buffer, x, y, color, tolerance),
            Operation::Stamp { x, y, color, diameter } => brush_stamp(buffer, x, y, color, diameter),
        }
    }
}
