//! Plot styling threaded explicitly into the renderer

use plotters::style::RGBColor;

/// Colours used for categorical series, in assignment order
pub const DEFAULT_PALETTE: [RGBColor; 5] = [
    RGBColor(0x2E, 0x8B, 0x57), // sea green
    RGBColor(0xDC, 0x14, 0x3C), // crimson
    RGBColor(0x8B, 0x45, 0x13), // saddle brown
    RGBColor(0x69, 0x69, 0x69), // dim grey
    RGBColor(0xFF, 0xD7, 0x00), // gold
];

pub const SKY_BLUE: RGBColor = RGBColor(0x87, 0xCE, 0xEB);
pub const LIGHT_GREEN: RGBColor = RGBColor(0x90, 0xEE, 0x90);
pub const CORAL: RGBColor = RGBColor(0xFF, 0x7F, 0x50);
pub const GOLD: RGBColor = RGBColor(0xFF, 0xD7, 0x00);
pub const FOREST_GREEN: RGBColor = RGBColor(0x00, 0x80, 0x00);

/// Anchors of the yellow-orange-red sequential colour map, low to high
const YL_OR_RD: [RGBColor; 9] = [
    RGBColor(0xFF, 0xFF, 0xCC),
    RGBColor(0xFF, 0xED, 0xA0),
    RGBColor(0xFE, 0xD9, 0x76),
    RGBColor(0xFE, 0xB2, 0x4C),
    RGBColor(0xFD, 0x8D, 0x3C),
    RGBColor(0xFC, 0x4E, 0x2A),
    RGBColor(0xE3, 0x1A, 0x1C),
    RGBColor(0xBD, 0x00, 0x26),
    RGBColor(0x80, 0x00, 0x26),
];

/// Image size, fonts and colours of every chart
#[derive(Debug, Clone, PartialEq)]
pub struct PlotStyle {
    pub width: u32,
    pub height: u32,
    pub font_family: String,
    pub title_size: u32,
    pub axis_label_size: u32,
    pub tick_label_size: u32,
    /// Size of the numbers drawn next to bars, slices and heatmap cells
    pub value_label_size: u32,
    pub palette: Vec<RGBColor>,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            font_family: "sans-serif".to_string(),
            title_size: 40,
            axis_label_size: 30,
            tick_label_size: 20,
            value_label_size: 16,
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl PlotStyle {
    /// Palette colour for the `index`th category; the palette repeats.
    pub fn color(&self, index: usize) -> RGBColor {
        if self.palette.is_empty() {
            return DEFAULT_PALETTE[index % DEFAULT_PALETTE.len()];
        }

        self.palette[index % self.palette.len()]
    }
}

/// Maps `fraction` in `[0, 1]` onto the yellow-orange-red colour map.
///
/// Values outside the range are clamped.
pub fn heat_color(fraction: f64) -> RGBColor {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let scaled = fraction * (YL_OR_RD.len() - 1) as f64;
    let lower = scaled.floor() as usize;
    let upper = (lower + 1).min(YL_OR_RD.len() - 1);
    let t = scaled - lower as f64;

    let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    let (a, b) = (YL_OR_RD[lower], YL_OR_RD[upper]);
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Whether text on a cell of `color` should be white rather than black
pub fn needs_light_text(color: RGBColor) -> bool {
    let luminance = 0.299 * color.0 as f64 + 0.587 * color.1 as f64 + 0.114 * color.2 as f64;
    luminance < 128.0
}
