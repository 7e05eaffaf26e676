use std::fmt;
use std::str::FromStr;

use crate::buffer::PixelBuffer;
use crate::color::Palette;
use crate::config::PipelineConfig;
use crate::edit::{EditOutcome, Operation};
use crate::error::{Error, Result};
use crate::history::EditHistory;
use crate::pipeline::{Fabrication, fabricate};
use crate::quantize::quantize;

/// The two editable canvases of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Canvas {
    Source,
    Simplified,
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Canvas::Source => write!(f, "source"),
            Canvas::Simplified => write!(f, "simplified"),
        }
    }
}

impl FromStr for Canvas {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" | "original" => Ok(Canvas::Source),
            "simplified" | "quantized" => Ok(Canvas::Simplified),
            _ => Err(Error::UnknownCanvas(s.to_string())),
        }
    }
}

/// Per-image editing state. Callers serialize access; every method runs to
/// completion before the next starts.
#[derive(Clone, Debug)]
pub struct Session {
    config: PipelineConfig,
    source: PixelBuffer,
    simplified: Option<PixelBuffer>,
    palette: Option<Palette>,
    history: EditHistory,
}

impl Session {
    pub fn new(config: PipelineConfig, source: PixelBuffer) -> Self {
        let history = EditHistory::new(config.history_capacity);
        Self {
            config,
            source,
            simplified: None,
            palette: None,
            history,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn history(&self) -> &EditHistory {
        &self.history
    }

    pub fn palette(&self) -> Option<&Palette> {
        self.palette.as_ref()
    }

    pub fn source(&self) -> &PixelBuffer {
        &self.source
    }

    pub fn simplified(&self) -> Option<&PixelBuffer> {
        self.simplified.as_ref()
    }

    pub fn canvas(&self, canvas: Canvas) -> Result<&PixelBuffer> {
        match canvas {
            Canvas::Source => Ok(&self.source),
            Canvas::Simplified => self
                .simplified
                .as_ref()
                .ok_or(Error::CanvasUnavailable(canvas)),
        }
    }

    fn canvas_mut(&mut self, canvas: Canvas) -> Result<&mut PixelBuffer> {
        match canvas {
            Canvas::Source => Ok(&mut self.source),
            Canvas::Simplified => self
                .simplified
                .as_mut()
                .ok_or(Error::CanvasUnavailable(canvas)),
        }
    }

    /// Replace the source image. Both canvases' histories are cleared and
    /// any previous simplification is discarded.
    pub fn load(&mut self, source: PixelBuffer) {
        self.source = source;
        self.simplified = None;
        self.palette = None;
        self.history.reset_all();
    }

    /// Quantize the current source with `palette` into a fresh simplified
    /// canvas. Its history starts empty.
    pub fn simplify(&mut self, palette: Palette) -> Result<&PixelBuffer> {
        let simplified = quantize(&self.source, &palette)?;
        self.history.reset(Canvas::Simplified);
        self.palette = Some(palette);
        let simplified = self.simplified.insert(simplified);
        Ok(&*simplified)
    }

    /// Validate, snapshot, then apply `op` to `canvas`.
    ///
    /// Rejected operations leave both the canvas and its history untouched;
    /// so do operations known in advance to change nothing. Edits on the
    /// simplified canvas must paint with a palette color.
    pub fn apply(&mut self, canvas: Canvas, op: Operation) -> Result<EditOutcome> {
        let buffer = self.canvas(canvas)?;
        op.validate(buffer)?;
        // Every opaque pixel of the simplified canvas must stay claimable by a mask.
        if canvas == Canvas::Simplified {
            let color = op.color();
            let in_palette = self.palette.as_ref().is_some_and(|p| p.position_of(color).is_some());
            if !in_palette {
                return Err(Error::ColorNotInPalette(color));
            }
        }
        if op.is_noop(buffer) {
            log::debug!("{} on {canvas} canvas has nothing to do", op.name());
            return Ok(EditOutcome::Unchanged);
        }

        self.history.snapshot(canvas, buffer.clone());
        op.apply(self.canvas_mut(canvas)?)
    }

    /// Restore the most recent snapshot of `canvas`. Returns `false` when
    /// there was nothing to undo.
    pub fn undo(&mut self, canvas: Canvas) -> Result<bool> {
        self.canvas(canvas)?;
        match self.history.undo(canvas) {
            Some(previous) => {
                *self.canvas_mut(canvas)? = previous;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn reset_history(&mut self, canvas: Canvas) -> usize {
        self.history.reset(canvas)
    }

    /// Generate masks, layers and preview from the corrected simplified
    /// canvas.
    pub fn fabricate(&self) -> Result<Fabrication> {
        let simplified = self.canvas(Canvas::Simplified)?;
        let palette = self
            .palette
            .as_ref()
            .ok_or(Error::CanvasUnavailable(Canvas::Simplified))?;
        fabricate(simplified, palette, &self.config)
    }
}
