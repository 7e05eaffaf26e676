use std::fmt;
use std::str::FromStr;

use image::Rgba;
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An opaque RGB color. Equality is exact per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Squared Euclidean RGB distance. Ordering matches the true distance, so
    /// nearest-match comparisons never need the square root.
    #[inline(always)]
    pub fn distance_sq(self, other: Color) -> u32 {
        let dr = self.r as i32 - other.r as i32;
        let dg = self.g as i32 - other.g as i32;
        let db = self.b as i32 - other.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }

    pub fn distance(self, other: Color) -> f64 {
        (self.distance_sq(other) as f64).sqrt()
    }

    /// `distance(other) <= tolerance`, evaluated without a square root.
    #[inline(always)]
    pub fn within(self, other: Color, tolerance: f64) -> bool {
        self.distance_sq(other) as f64 <= tolerance * tolerance
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    pub fn from_rgba(px: &Rgba<u8>) -> Self {
        Self::new(px[0], px[1], px[2])
    }

    /// Parse `RRGGBB` with or without a leading `#`.
    pub fn from_hex(s: &str) -> Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(Error::InvalidHex(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| Error::InvalidHex(s.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }

    pub fn to_hex(self) -> String {
        format!("{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Color> for [u8; 3] {
    fn from(c: Color) -> Self {
        [c.r, c.g, c.b]
    }
}

impl From<Srgb<u8>> for Color {
    fn from(c: Srgb<u8>) -> Self {
        Self::new(c.red, c.green, c.blue)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

/// A color bound to a label that is unique within its palette.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedColor {
    pub label: String,
    pub color: Color,
}

/// Ordered label → color mapping. Insertion order breaks quantization ties,
/// so it is preserved exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NamedColor>", into = "Vec<NamedColor>")]
pub struct Palette {
    entries: Vec<NamedColor>,
}

impl Palette {
    /// Build a palette, rejecting repeated labels.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Color)>,
        S: Into<String>,
    {
        let mut palette = Palette::default();
        for (label, color) in entries {
            palette.push(label, color)?;
        }
        Ok(palette)
    }

    pub fn push(&mut self, label: impl Into<String>, color: Color) -> Result<()> {
        let label = label.into();
        if self.get(&label).is_some() {
            return Err(Error::DuplicateLabel(label));
        }
        self.entries.push(NamedColor { label, color });
        Ok(())
    }

    /// Parse a comma-separated `label=#RRGGBB` list.
    pub fn parse(text: &str) -> Result<Self> {
        let mut palette = Palette::default();
        for item in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (label, hex) = item
                .split_once('=')
                .ok_or_else(|| Error::InvalidHex(item.to_string()))?;
            palette.push(label.trim(), Color::from_hex(hex)?)?;
        }
        Ok(palette)
    }

    pub fn get(&self, label: &str) -> Option<Color> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.color)
    }

    /// Index of the first entry with exactly this color.
    pub fn position_of(&self, color: Color) -> Option<usize> {
        self.entries.iter().position(|e| e.color == color)
    }

    pub fn entries(&self) -> &[NamedColor] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedColor> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.is_empty() {
            Err(Error::EmptyPalette)
        } else {
            Ok(())
        }
    }

    /// Every color offered by the source-canvas correction brush.
    pub fn correction_colors() -> Self {
        const COLORS: [(&str, [u8; 3]); 18] = [
            ("dark_blue", [22, 31, 125]),
            ("light_blue", [93, 167, 227]),
            ("dark_green", [25, 53, 34]),
            ("light_green", [249, 225, 149]),
            ("black", [6, 16, 8]),
            ("white", [230, 234, 235]),
            ("dark_purple", [125, 22, 125]),
            ("light_purple", [227, 93, 227]),
            ("dark_red", [125, 22, 22]),
            ("light_red", [227, 93, 93]),
            ("dark_cyan", [22, 125, 125]),
            ("light_cyan", [93, 227, 227]),
            ("dark_yellow", [125, 125, 22]),
            ("light_yellow", [227, 227, 93]),
            ("dark_orange", [125, 75, 22]),
            ("light_orange", [227, 175, 93]),
            ("dark_pink", [125, 22, 75]),
            ("light_pink", [227, 93, 175]),
        ];
        Self::from_table(&COLORS)
    }

    fn from_table(table: &[(&str, [u8; 3])]) -> Self {
        Self {
            entries: table
                .iter()
                .map(|&(label, rgb)| NamedColor {
                    label: label.to_string(),
                    color: rgb.into(),
                })
                .collect(),
        }
    }
}

impl TryFrom<Vec<NamedColor>> for Palette {
    type Error = Error;

    fn try_from(entries: Vec<NamedColor>) -> Result<Self> {
        Palette::new(entries.into_iter().map(|e| (e.label, e.color)))
    }
}

impl From<Palette> for Vec<NamedColor> {
    fn from(palette: Palette) -> Self {
        palette.entries
    }
}

/// Simulated board-black, shared by every built-in scheme.
pub const BOARD_BLACK: Color = Color::new(6, 16, 8);
/// Silkscreen white, shared by every built-in scheme.
pub const SILK_WHITE: Color = Color::new(230, 234, 235);

/// Built-in six-color palettes, named after their dominant hue.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorScheme {
    Blue,
    Red,
    Purple,
    Green,
    Yellow,
    Orange,
    Pink,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 7] = [
        ColorScheme::Blue,
        ColorScheme::Red,
        ColorScheme::Purple,
        ColorScheme::Green,
        ColorScheme::Yellow,
        ColorScheme::Orange,
        ColorScheme::Pink,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Blue => "blue",
            ColorScheme::Red => "red",
            ColorScheme::Purple => "purple",
            ColorScheme::Green => "green",
            ColorScheme::Yellow => "yellow",
            ColorScheme::Orange => "orange",
            ColorScheme::Pink => "pink",
        }
    }

    pub fn palette(self) -> Palette {
        let accents: [(&str, [u8; 3]); 4] = match self {
            ColorScheme::Blue => [
                ("dark_blue", [22, 31, 125]),
                ("light_blue", [93, 167, 227]),
                ("dark_green", [25, 53, 34]),
                ("light_green", [249, 225, 149]),
            ],
            ColorScheme::Red => [
                ("dark_red", [125, 22, 22]),
                ("light_red", [227, 93, 93]),
                ("dark_green", [25, 53, 34]),
                ("light_green", [249, 225, 149]),
            ],
            ColorScheme::Purple => [
                ("dark_purple", [125, 22, 125]),
                ("light_purple", [227, 93, 227]),
                ("dark_green", [25, 53, 34]),
                ("light_green", [249, 225, 149]),
            ],
            ColorScheme::Green => [
                ("dark_green", [34, 125, 22]),
                ("light_green", [149, 227, 93]),
                ("dark_cyan", [22, 125, 125]),
                ("light_cyan", [93, 227, 227]),
            ],
            ColorScheme::Yellow => [
                ("dark_yellow", [125, 125, 22]),
                ("light_yellow", [227, 227, 93]),
                ("dark_orange", [125, 75, 22]),
                ("light_orange", [227, 175, 93]),
            ],
            ColorScheme::Orange => [
                ("dark_orange", [125, 75, 22]),
                ("light_orange", [227, 175, 93]),
                ("dark_red", [125, 22, 22]),
                ("light_red", [227, 93, 93]),
            ],
            ColorScheme::Pink => [
                ("dark_pink", [125, 22, 75]),
                ("light_pink", [227, 93, 175]),
                ("dark_purple", [125, 22, 125]),
                ("light_purple", [227, 93, 227]),
            ],
        };

        let mut table = accents.to_vec();
        table.push(("black", BOARD_BLACK.into()));
        table.push(("white", SILK_WHITE.into()));
        Palette::from_table(&table)
    }
}

impl FromStr for ColorScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        ColorScheme::ALL
            .into_iter()
            .find(|scheme| scheme.name() == wanted)
            .ok_or_else(|| Error::UnknownScheme(s.to_string()))
    }
}
