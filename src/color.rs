use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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

/// `n` shades of a single hue from light to dark, for ordered categories
/// such as company sizes or months.
pub fn sequential_palette(hue: f32, n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let t = if n > 1 { i as f32 / (n - 1) as f32 } else { 0.5 };
            hsl_to_color32(Hsl::new(hue, 0.65, 0.75 - 0.4 * t))
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

// ---------------------------------------------------------------------------
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Maps category labels to colours, in the order they were given.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    pub fn new(categories: &[String], palette: Vec<Color32>) -> Self {
        let mapping = categories.iter().cloned().zip(palette).collect();
        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Distinct hues, one per category.
    pub fn categorical(categories: &[String]) -> Self {
        Self::new(categories, generate_palette(categories.len()))
    }

    pub fn color_for(&self, category: &str) -> Color32 {
        self.mapping
            .get(category)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let palette = generate_palette(5);
        assert_eq!(palette.len(), 5);
        for (i, a) in palette.iter().enumerate() {
            for b in &palette[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn sequential_palette_darkens() {
        let shades = sequential_palette(210.0, 3);
        let lightness = |c: &Color32| u32::from(c.r()) + u32::from(c.g()) + u32::from(c.b());
        assert!(lightness(&shades[0]) > lightness(&shades[2]));
    }

    #[test]
    fn unknown_category_falls_back_to_grey() {
        let map = ColorMap::categorical(&["SA".to_string(), "G".to_string()]);
        assert_ne!(map.color_for("SA"), map.color_for("G"));
        assert_eq!(map.color_for("XL"), Color32::GRAY);
    }
}
