use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::{BOARD_BLACK, Color};
use crate::error::Result;
use crate::history::DEFAULT_HISTORY_CAPACITY;

/// Names one fabrication layer and the mask labels drawn into it, bottom
/// first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerGroup {
    pub name: String,
    pub labels: Vec<String>,
}

impl LayerGroup {
    pub fn new<I, S>(name: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }
}

/// Exact-match color replacement used by the preview.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substitution {
    pub from: Color,
    pub to: Color,
}

/// Simulated metal shown in place of board-black in previews.
pub const SIMULATED_METAL: Color = Color::new(160, 160, 160);

/// Name of the preview raster in the export table.
pub const PREVIEW_NAME: &str = "preview";

/// Everything the pipeline needs that is not pixel data. Construct once and
/// pass by reference; nothing reads ambient defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub tolerance: f64,
    pub brush_size: u32,
    pub history_capacity: usize,
    pub max_dimension: u32,
    pub marker_color: Color,
    pub marker_size: u32,
    pub layer_groups: Vec<LayerGroup>,
    pub export_names: BTreeMap<String, String>,
    pub preview_substitutions: Vec<Substitution>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        const LIGHT: [&str; 8] = [
            "light_blue",
            "light_green",
            "light_red",
            "light_purple",
            "light_cyan",
            "light_yellow",
            "light_orange",
            "light_pink",
        ];
        const DARK: [&str; 8] = [
            "dark_blue",
            "dark_green",
            "dark_red",
            "dark_purple",
            "dark_cyan",
            "dark_yellow",
            "dark_orange",
            "dark_pink",
        ];

        let mut front_copper: Vec<&str> = LIGHT.to_vec();
        front_copper.push("black");

        let export_names = [
            ("front_copper", "front layer"),
            ("front_solder_mask", "front solder mask layer"),
            ("front_silkscreen", "front silkscreen layer"),
            ("bottom_solder_mask", "bottom solder mask layer"),
            (PREVIEW_NAME, "preview"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            tolerance: 30.0,
            brush_size: 5,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            max_dimension: 2048,
            marker_color: Color::new(0, 0, 0),
            marker_size: 2,
            layer_groups: vec![
                LayerGroup::new("front_copper", front_copper),
                LayerGroup::new("front_solder_mask", ["black"]),
                LayerGroup::new("front_silkscreen", ["white"]),
                LayerGroup::new("bottom_solder_mask", DARK),
            ],
            export_names,
            preview_substitutions: vec![Substitution {
                from: BOARD_BLACK,
                to: SIMULATED_METAL,
            }],
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON config; absent fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Fabrication-facing name for an internal raster name.
    pub fn export_name(&self, name: &str) -> String {
        self.export_names
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}
