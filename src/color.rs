use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::table::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            hsl_to_color32(Hsl::new(hue, 0.75, 0.55))
        })
        .collect()
}

fn hsl_to_color32(hsl: Hsl) -> Color32 {
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Sequential ramp for numeric hue encoding: cold blue at 0 → warm yellow
/// at 1.
pub fn sequential(t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    hsl_to_color32(Hsl::new(240.0 - 180.0 * t, 0.7, 0.5))
}

/// Diverging ramp for correlation values in [-1, 1]: blue below zero, white
/// at zero, red above.
pub fn diverging(t: f64) -> Color32 {
    let t = t.clamp(-1.0, 1.0) as f32;
    let white: LinSrgb = Srgb::new(1.0f32, 1.0, 1.0).into_linear();
    let end: LinSrgb = if t >= 0.0 {
        Srgb::new(0.70f32, 0.09, 0.17).into_linear()
    } else {
        Srgb::new(0.13f32, 0.40, 0.67).into_linear()
    };
    let mixed = white.mix(end, t.abs());
    let rgb: Srgb<f32> = Srgb::from_linear(mixed);
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Color mapping: cell value → Color32
// ---------------------------------------------------------------------------

/// Maps the unique values of a chosen hue column to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from a column's unique values.
    pub fn new(unique_values: &BTreeSet<CellValue>) -> Self {
        let palette = generate_palette(unique_values.len());
        let mapping: BTreeMap<CellValue, Color32> = unique_values
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given cell value.
    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_is_distinct() {
        let palette = generate_palette(8);
        assert_eq!(palette.len(), 8);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn test_diverging_endpoints() {
        assert_eq!(diverging(0.0), Color32::from_rgb(255, 255, 255));
        let pos = diverging(1.0);
        assert!(pos.r() > pos.b());
        let neg = diverging(-1.0);
        assert!(neg.b() > neg.r());
    }

    #[test]
    fn test_color_map_assigns_and_falls_back() {
        let unique: BTreeSet<CellValue> = [
            CellValue::Text("a".into()),
            CellValue::Text("b".into()),
        ]
        .into_iter()
        .collect();
        let map = ColorMap::new(&unique);
        assert_ne!(
            map.color_for(&CellValue::Text("a".into())),
            map.color_for(&CellValue::Text("b".into()))
        );
        assert_eq!(map.color_for(&CellValue::Null), Color32::GRAY);
    }
}
