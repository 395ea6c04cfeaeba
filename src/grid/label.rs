//! Text overlays burned directly into a composite.

use std::fs;
use std::path::Path;

use ab_glyph::{Font, FontArc, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use serde::{Deserialize, Serialize};

use super::{GridError, color};

const BUNDLED_FONT_BYTES: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");

/// Pixel height of a label drawn at `scale == 1.0`.
pub const PX_PER_SCALE: f32 = 30.0;

/// Font used for every label of a composite.
#[derive(Clone)]
pub struct Typeface {
    font: FontArc,
}

impl Typeface {
    /// DejaVu Sans, compiled into the binary.
    pub fn bundled() -> Result<Self, GridError> {
        Ok(Self {
            font: FontArc::try_from_slice(BUNDLED_FONT_BYTES)?,
        })
    }

    /// Loads a TTF/OTF file from disk.
    pub fn from_path(path: &Path) -> Result<Self, GridError> {
        let bytes = fs::read(path)?;
        Ok(Self {
            font: FontArc::try_from_vec(bytes)?,
        })
    }

    fn ascent(&self, scale: PxScale) -> f32 {
        self.font.as_scaled(scale).ascent()
    }
}

/// Scale, color and stroke weight of one class of label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub scale: f32,
    #[serde(with = "color")]
    pub color: Rgb<u8>,
    pub thickness: u32,
}

impl TextStyle {
    pub const fn new(scale: f32, color: Rgb<u8>, thickness: u32) -> Self {
        Self {
            scale,
            color,
            thickness,
        }
    }

    pub fn with_color(self, color: Rgb<u8>) -> Self {
        Self { color, ..self }
    }

    fn px_scale(&self) -> PxScale {
        PxScale::from(self.scale * PX_PER_SCALE)
    }
}

/// Draws `text` with its baseline starting at `position`.
///
/// Thickness `n` overdraws the glyphs on an `n`×`n` pixel neighborhood.
/// Anything outside the raster is clipped.
pub fn draw_label(
    image: &mut RgbImage,
    text: &str,
    position: (i32, i32),
    style: &TextStyle,
    typeface: &Typeface,
) {
    if text.is_empty() || style.thickness == 0 || style.scale <= 0.0 {
        return;
    }
    let scale = style.px_scale();
    let (x, baseline) = position;
    let top = baseline - typeface.ascent(scale).round() as i32;

    let t = style.thickness as i32;
    let shift = (t - 1) / 2;
    for dy in 0..t {
        for dx in 0..t {
            draw_text_mut(
                image,
                style.color,
                x + dx - shift,
                top + dy - shift,
                scale,
                &typeface.font,
                text,
            );
        }
    }
}
