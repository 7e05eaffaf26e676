//! Palette reduction and fabrication-layer decomposition for multi-layer
//! illuminated panels.
//!
//! Pipeline: source image → [`quantize`] → hand corrections on a [`Session`]
//! ([`region_fill`] / [`brush_stamp`], each undoable through [`EditHistory`])
//! → [`generate_masks`] → [`composite_layers`], with [`render_preview`]
//! alongside. [`fabricate`] runs the last three in one go.

mod adjust;
mod brush;
mod buffer;
mod color;
mod config;
mod edit;
mod error;
mod fill;
mod history;
mod layer;
mod mask;
mod pipeline;
mod preview;
mod quantize;
mod session;
mod workflow;

pub mod wasm;

pub use adjust::{adjust_brightness, adjust_contrast};
pub use brush::brush_stamp;
pub use buffer::PixelBuffer;
pub use color::{BOARD_BLACK, Color, ColorScheme, NamedColor, Palette, SILK_WHITE};
pub use config::{LayerGroup, PREVIEW_NAME, PipelineConfig, SIMULATED_METAL, Substitution};
pub use edit::{EditOutcome, Operation};
pub use error::{Error, Result};
pub use fill::{fill_is_noop, region_fill};
pub use history::{DEFAULT_HISTORY_CAPACITY, EditHistory, HistoryStack};
pub use layer::{Layer, composite, composite_layers, draw_over};
pub use mask::{Markers, Mask, MaskSet, generate_masks, is_marker_pixel, stamp_corner_markers};
pub use pipeline::{Fabrication, NamedRaster, fabricate, mask_name};
pub use preview::render_preview;
pub use quantize::{nearest_index, quantize, suggest_palette};
pub use session::{Canvas, Session};
pub use workflow::{Workflow, WorkflowEvent};
