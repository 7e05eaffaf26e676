use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::buffer::PixelBuffer;
use crate::color::{Color, ColorScheme, Palette};
use crate::config::PipelineConfig;
use crate::edit::Operation;
use crate::error::Error;
use crate::pipeline::NamedRaster;
use crate::quantize::suggest_palette;
use crate::session::{Canvas, Session};
use crate::workflow::{Workflow, WorkflowEvent};

fn js_err(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Browser-facing editor: one uploaded image, its two canvases and their
/// undo stacks.
#[wasm_bindgen]
pub struct Editor {
    session: Session,
    workflow: Workflow,
}

impl Editor {
    fn advance(&mut self, event: WorkflowEvent) -> Result<(), JsValue> {
        self.workflow = self
            .workflow
            .on(event)
            .ok_or_else(|| JsValue::from_str(&format!("{event:?} is not allowed while {:?}", self.workflow)))?;
        Ok(())
    }

    fn edit(&mut self, canvas: &str, op: Operation) -> Result<bool, JsValue> {
        let canvas: Canvas = canvas.parse().map_err(js_err)?;
        let outcome = self.session.apply(canvas, op).map_err(js_err)?;
        if canvas == Canvas::Simplified && outcome.is_changed() {
            self.advance(WorkflowEvent::SimplifiedEdited)?;
        }
        Ok(outcome.is_changed())
    }
}

#[wasm_bindgen]
impl Editor {
    /// Decode `input` (PNG/JPEG/WebP bytes) and start a session. `config` is
    /// an optional JSON pipeline config.
    #[wasm_bindgen(constructor)]
    pub fn new(input: Vec<u8>, config: Option<String>) -> Result<Editor, JsValue> {
        let config = match config {
            Some(json) => PipelineConfig::from_json(&json).map_err(js_err)?,
            None => PipelineConfig::default(),
        };
        let source = PixelBuffer::decode(&input, config.max_dimension).map_err(js_err)?;
        let mut editor = Editor {
            session: Session::new(config, source),
            workflow: Workflow::default(),
        };
        editor.advance(WorkflowEvent::ImageLoaded)?;
        Ok(editor)
    }

    pub fn width(&self) -> u32 {
        self.session.source().width()
    }

    pub fn height(&self) -> u32 {
        self.session.source().height()
    }

    pub fn state(&self) -> String {
        format!("{:?}", self.workflow)
    }

    /// Quantize with a built-in scheme (`blue`, `red`, ...).
    pub fn simplify(&mut self, scheme: String) -> Result<(), JsValue> {
        let scheme: ColorScheme = scheme.parse().map_err(js_err)?;
        self.session.simplify(scheme.palette()).map_err(js_err)?;
        self.advance(WorkflowEvent::PaletteChosen)
    }

    /// Quantize with a custom palette given as `label=#RRGGBB,...`.
    pub fn simplify_custom(&mut self, palette: String) -> Result<(), JsValue> {
        let palette = Palette::parse(&palette).map_err(js_err)?;
        self.session.simplify(palette).map_err(js_err)?;
        self.advance(WorkflowEvent::PaletteChosen)
    }

    /// Suggest `n_colors` hex colors from the source image.
    pub fn suggest_palette(&self, n_colors: usize) -> Result<Array, JsValue> {
        let palette = suggest_palette(self.session.source(), n_colors, 0).map_err(js_err)?;
        let out = Array::new();
        for entry in palette.iter() {
            out.push(&JsValue::from_str(&entry.color.to_hex()));
        }
        Ok(out)
    }

    pub fn fill(
        &mut self,
        canvas: String,
        x: u32,
        y: u32,
        hex: String,
        tolerance: Option<f64>,
    ) -> Result<bool, JsValue> {
        let op = Operation::Fill {
            x,
            y,
            color: Color::from_hex(&hex).map_err(js_err)?,
            tolerance: tolerance.unwrap_or(self.session.config().tolerance),
        };
        self.edit(&canvas, op)
    }

    pub fn stamp(
        &mut self,
        canvas: String,
        x: u32,
        y: u32,
        hex: String,
        diameter: Option<u32>,
    ) -> Result<bool, JsValue> {
        let op = Operation::Stamp {
            x,
            y,
            color: Color::from_hex(&hex).map_err(js_err)?,
            diameter: diameter.unwrap_or(self.session.config().brush_size),
        };
        self.edit(&canvas, op)
    }

    pub fn undo(&mut self, canvas: String) -> Result<bool, JsValue> {
        let canvas: Canvas = canvas.parse().map_err(js_err)?;
        self.session.undo(canvas).map_err(js_err)
    }

    /// Raw RGBA bytes of a canvas, ready for `ImageData`.
    pub fn pixels(&self, canvas: String) -> Result<Uint8Array, JsValue> {
        let canvas: Canvas = canvas.parse().map_err(js_err)?;
        let buffer = self.session.canvas(canvas).map_err(js_err)?;
        Ok(Uint8Array::from(buffer.as_raw()))
    }

    /// Generate masks, layers and preview as an array of
    /// `{ kind, name, exportName, fileName, image }`, `image` being PNG bytes.
    pub fn generate(&mut self) -> Result<Array, JsValue> {
        let fabrication = self.session.fabricate().map_err(js_err)?;
        self.advance(WorkflowEvent::OutputsGenerated)?;

        let out = Array::new();
        for raster in &fabrication.masks {
            let obj = raster_object("mask", raster)?;
            out.push(&obj);
        }
        for raster in &fabrication.layers {
            let obj = raster_object("layer", raster)?;
            out.push(&obj);
        }
        let preview = raster_object("preview", &fabrication.preview)?;
        out.push(&preview);
        Ok(out)
    }
}

fn raster_object(kind: &str, raster: &NamedRaster) -> Result<Object, JsValue> {
    let png = raster.buffer.to_png().map_err(js_err)?;
    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("kind"), &JsValue::from_str(kind))?;
    Reflect::set(&result, &JsValue::from_str("name"), &JsValue::from_str(&raster.name))?;
    Reflect::set(&result, &JsValue::from_str("exportName"), &JsValue::from_str(&raster.export_name))?;
    Reflect::set(&result, &JsValue::from_str("fileName"), &JsValue::from_str(&raster.file_name()))?;
    Reflect::set(&result, &JsValue::from_str("image"), &Uint8Array::from(png.as_slice()))?;
    Ok(result)
}
