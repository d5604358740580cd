use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// Colour of the averaged curve; series colours never get this dark.
pub const AVERAGE_COLOR: Color32 = Color32::BLACK;

/// `n` distinct series colours from evenly spaced hues. Neighbouring
/// series alternate lightness so adjacent hues stay apart.
pub fn series_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let lightness = if i % 2 == 0 { 0.50 } else { 0.62 };
            let rgb: Srgb = Hsl::new(hue, 0.80, lightness).into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Colour of series `index`; grey when the palette is too short.
pub fn series_color(palette: &[Color32], index: usize) -> Color32 {
    palette.get(index).copied().unwrap_or(Color32::GRAY)
}

// ---------------------------------------------------------------------------
// Reference line colours
// ---------------------------------------------------------------------------

/// User-selectable colour of the horizontal reference lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineColor {
    Red,
    #[default]
    Green,
    Yellow,
    Blue,
    Black,
}

impl LineColor {
    pub const ALL: [LineColor; 5] = [
        LineColor::Red,
        LineColor::Green,
        LineColor::Yellow,
        LineColor::Blue,
        LineColor::Black,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LineColor::Red => "Red",
            LineColor::Green => "Green",
            LineColor::Yellow => "Yellow",
            LineColor::Blue => "Blue",
            LineColor::Black => "Black",
        }
    }

    pub fn color32(self) -> Color32 {
        match self {
            LineColor::Red => Color32::from_rgb(220, 0, 0),
            LineColor::Green => Color32::from_rgb(0, 160, 0),
            LineColor::Yellow => Color32::from_rgb(230, 200, 0),
            LineColor::Blue => Color32::from_rgb(0, 90, 220),
            LineColor::Black => Color32::BLACK,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_colors_are_distinct() {
        for (i, a) in LineColor::ALL.iter().enumerate() {
            for b in &LineColor::ALL[i + 1..] {
                assert_ne!(a.color32(), b.color32());
                assert_ne!(a.label(), b.label());
            }
        }
        assert_eq!(LineColor::default().color32(), Color32::from_rgb(0, 160, 0));
    }

    #[test]
    fn palette_has_one_colour_per_series() {
        let palette = series_palette(5);
        assert_eq!(palette.len(), 5);
        assert_eq!(series_color(&palette, 9), Color32::GRAY);
    }
}
