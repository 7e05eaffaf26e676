use crate::buffer::PixelBuffer;
use crate::color::Palette;
use crate::config::{PREVIEW_NAME, PipelineConfig};
use crate::error::Result;
use crate::layer::composite_layers;
use crate::mask::{Markers, generate_masks};
use crate::preview::render_preview;

/// A raster handed to the outside world, with its internal name and the
/// fabrication-facing name it should be exported under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedRaster {
    pub name: String,
    pub export_name: String,
    pub buffer: PixelBuffer,
}

impl NamedRaster {
    fn new(name: impl Into<String>, config: &PipelineConfig, buffer: PixelBuffer) -> Self {
        let name = name.into();
        let export_name = config.export_name(&name);
        Self {
            name,
            export_name,
            buffer,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.png", self.export_name)
    }
}

/// Every output of one generation pass. Nothing here is mutated after
/// creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fabrication {
    pub masks: Vec<NamedRaster>,
    pub layers: Vec<NamedRaster>,
    pub preview: NamedRaster,
}

impl Fabrication {
    pub fn iter(&self) -> impl Iterator<Item = &NamedRaster> {
        self.masks
            .iter()
            .chain(self.layers.iter())
            .chain(std::iter::once(&self.preview))
    }
}

/// Internal raster name of the mask for `label`.
pub fn mask_name(label: &str) -> String {
    format!("mask_{label}")
}

/// Decompose a corrected quantized image into masks, layers and a preview.
pub fn fabricate(
    quantized: &PixelBuffer,
    palette: &Palette,
    config: &PipelineConfig,
) -> Result<Fabrication> {
    let markers = Markers {
        color: config.marker_color,
        size: config.marker_size,
    };
    let mask_set = generate_masks(quantized, palette, markers)?;
    let layers = composite_layers(&mask_set, &config.layer_groups)?
        .into_iter()
        .map(|layer| NamedRaster::new(layer.name, config, layer.buffer))
        .collect();
    let masks = mask_set
        .into_masks()
        .into_iter()
        .map(|mask| NamedRaster::new(mask_name(&mask.label), config, mask.buffer))
        .collect();
    let preview = NamedRaster::new(
        PREVIEW_NAME,
        config,
        render_preview(quantized, &config.preview_substitutions),
    );

    Ok(Fabrication {
        masks,
        layers,
        preview,
    })
}
