//! Assembles normalized images into a labeled composite.
//!
//! Two arrangements are supported: a sectioned layout (centered target row
//! followed by one row per group) and a flat tile grid filled in reading order.
//! Captions are collected while the rows are stacked and burned in once the
//! final canvas exists, so every offset is relative to the tile or row it
//! belongs to.

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::label::{TextStyle, Typeface, draw_label};
use super::raster::{center_pad, concat_column, concat_row, pad_to_width, solid};
use super::{GridError, color};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const GREY: Rgb<u8> = Rgb([200, 200, 200]);
const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
const MAGENTA: Rgb<u8> = Rgb([255, 0, 255]);

const TARGET_OFFSET: (i32, i32) = (20, 30);
const HEADING_OFFSET: (i32, i32) = (10, 20);
const BAND_TEXT_OFFSET: (i32, i32) = (20, 40);
const CAPTION_OFFSET: (i32, i32) = (20, 50);
const SCORE_OFFSET: (i32, i32) = (20, 70);
const FOOTER_OFFSET: (i32, i32) = (10, 10);
const SCORE_PREFIX: &str = "Dist: ";

/// One image of a composite with its optional caption and score.
#[derive(Debug, Clone)]
pub struct Entry {
    pub image: RgbImage,
    pub caption: Option<String>,
    pub score: Option<f32>,
}

impl Entry {
    pub fn new(image: RgbImage) -> Self {
        Self {
            image,
            caption: None,
            score: None,
        }
    }

    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn score(mut self, score: f32) -> Self {
        self.score = Some(score);
        self
    }
}

/// A labeled row of match images.
#[derive(Debug, Clone)]
pub struct Group {
    pub label: String,
    /// Overrides the heading color for this group.
    pub color: Option<Rgb<u8>>,
    pub entries: Vec<Entry>,
}

/// Where section headings go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeadingMode {
    /// Drawn over the top of each row.
    Overlay,
    /// Each heading gets a solid band of `height` pixels above its row.
    Band { height: u32 },
}

/// Colors, gaps and text placement for a composite.
///
/// The default is the sectioned look: black fill, tiles butted together,
/// headings drawn over the image rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeStyle {
    #[serde(with = "color")]
    pub fill: Rgb<u8>,
    /// Horizontal gap between tiles.
    pub spacing: u32,
    pub headings: HeadingMode,
    /// Gap between a heading band and its row.
    pub heading_gap: u32,
    /// Gap after every row.
    pub section_gap: u32,
    pub min_width: u32,
    pub target_offset: (i32, i32),
    pub heading_offset: (i32, i32),
    pub band_text_offset: (i32, i32),
    pub caption_offset: (i32, i32),
    pub score_offset: (i32, i32),
    /// Measured from the bottom-left corner.
    pub footer_offset: (i32, i32),
    pub score_prefix: String,
    pub target_text: TextStyle,
    pub heading_text: TextStyle,
    pub caption_text: TextStyle,
    pub score_text: TextStyle,
    pub footer_text: TextStyle,
}

impl Default for ComposeStyle {
    fn default() -> Self {
        Self {
            fill: BLACK,
            spacing: 0,
            headings: HeadingMode::Overlay,
            heading_gap: 0,
            section_gap: 0,
            min_width: 0,
            target_offset: TARGET_OFFSET,
            heading_offset: HEADING_OFFSET,
            band_text_offset: BAND_TEXT_OFFSET,
            caption_offset: CAPTION_OFFSET,
            score_offset: SCORE_OFFSET,
            footer_offset: FOOTER_OFFSET,
            score_prefix: SCORE_PREFIX.to_string(),
            target_text: TextStyle::new(0.7, WHITE, 2),
            heading_text: TextStyle::new(0.7, YELLOW, 2),
            caption_text: TextStyle::new(0.5, WHITE, 1),
            score_text: TextStyle::new(0.4, GREY, 1),
            footer_text: TextStyle::new(0.5, MAGENTA, 1),
        }
    }
}

impl ComposeStyle {
    pub fn format_score(&self, score: f32) -> String {
        format!("{}{score:.3}", self.score_prefix)
    }
}

/// Caption along the bottom edge of the composite.
#[derive(Debug, Clone)]
pub struct Footer {
    pub text: String,
    pub color: Option<Rgb<u8>>,
}

struct Placed {
    text: String,
    at: (i32, i32),
    style: TextStyle,
}

fn offset(origin: (i32, i32), by: (i32, i32)) -> (i32, i32) {
    (origin.0 + by.0, origin.1 + by.1)
}

/// Queues caption and score labels for every tile of a row whose top-left is `(x0, y0)`.
fn place_tile_labels(
    entries: &[Entry],
    x0: i32,
    y0: i32,
    style: &ComposeStyle,
    placed: &mut Vec<Placed>,
) {
    let mut x = x0;
    for entry in entries {
        if let Some(caption) = &entry.caption {
            placed.push(Placed {
                text: caption.clone(),
                at: offset((x, y0), style.caption_offset),
                style: style.caption_text,
            });
        }
        if let Some(score) = entry.score {
            placed.push(Placed {
                text: style.format_score(score),
                at: offset((x, y0), style.score_offset),
                style: style.score_text,
            });
        }
        x += entry.image.width() as i32 + style.spacing as i32;
    }
}

fn burn_in(
    mut canvas: RgbImage,
    placed: &[Placed],
    footer: Option<&Footer>,
    style: &ComposeStyle,
    typeface: &Typeface,
) -> RgbImage {
    for label in placed {
        draw_label(&mut canvas, &label.text, label.at, &label.style, typeface);
    }
    if let Some(footer) = footer {
        let text_style = match footer.color {
            Some(c) => style.footer_text.with_color(c),
            None => style.footer_text,
        };
        let at = (
            style.footer_offset.0,
            canvas.height() as i32 - style.footer_offset.1,
        );
        draw_label(&mut canvas, &footer.text, at, &text_style, typeface);
    }
    canvas
}

/// Builds the sectioned composite: the target centered on top, then one row per group.
///
/// Rows are padded on the right to the widest row (or `style.min_width`), so
/// groups of different lengths or aspect ratios still stack.
pub fn compose(
    target: &Entry,
    groups: &[Group],
    footer: Option<&Footer>,
    style: &ComposeStyle,
    typeface: &Typeface,
) -> Result<RgbImage, GridError> {
    let mut rows = Vec::with_capacity(groups.len());
    for group in groups {
        rows.push(concat_row(
            group.entries.iter().map(|e| &e.image),
            style.spacing,
            style.fill,
        )?);
    }

    let width = rows
        .iter()
        .map(RgbImage::width)
        .chain(std::iter::once(target.image.width()))
        .max()
        .unwrap_or(0)
        .max(style.min_width);
    let target_x = ((width - target.image.width()) / 2) as i32;

    let mut parts: Vec<RgbImage> = Vec::new();
    let mut placed: Vec<Placed> = Vec::new();
    let mut y = 0i32;

    let band_height = match style.headings {
        HeadingMode::Overlay => None,
        HeadingMode::Band { height } => Some(height),
    };

    // Heading band plus the gap below it. No-op in overlay mode.
    let push_band = |parts: &mut Vec<RgbImage>,
                         placed: &mut Vec<Placed>,
                         y: &mut i32,
                         text: &str,
                         text_style: TextStyle| {
        let Some(height) = band_height else {
            return;
        };
        placed.push(Placed {
            text: text.to_string(),
            at: offset((0, *y), style.band_text_offset),
            style: text_style,
        });
        parts.push(solid(width, height, style.fill));
        *y += height as i32;
        if style.heading_gap > 0 {
            parts.push(solid(width, style.heading_gap, style.fill));
            *y += style.heading_gap as i32;
        }
    };

    let push_gap = |parts: &mut Vec<RgbImage>, y: &mut i32| {
        if style.section_gap > 0 {
            parts.push(solid(width, style.section_gap, style.fill));
            *y += style.section_gap as i32;
        }
    };

    if let Some(caption) = &target.caption {
        if band_height.is_some() {
            push_band(&mut parts, &mut placed, &mut y, caption, style.target_text);
        } else {
            placed.push(Placed {
                text: caption.clone(),
                at: offset((target_x, y), style.target_offset),
                style: style.target_text,
            });
        }
    }
    let header = center_pad(target.image.clone(), width, style.fill);
    y += header.height() as i32;
    parts.push(header);
    push_gap(&mut parts, &mut y);

    for (group, row) in groups.iter().zip(rows) {
        let heading_style = match group.color {
            Some(c) => style.heading_text.with_color(c),
            None => style.heading_text,
        };
        if band_height.is_some() {
            push_band(&mut parts, &mut placed, &mut y, &group.label, heading_style);
        } else {
            placed.push(Placed {
                text: group.label.clone(),
                at: offset((0, y), style.heading_offset),
                style: heading_style,
            });
        }

        place_tile_labels(&group.entries, 0, y, style, &mut placed);
        y += row.height() as i32;
        parts.push(pad_to_width(row, width, style.fill));
        push_gap(&mut parts, &mut y);
    }

    let canvas = concat_column(&parts)?;
    debug!(
        width = canvas.width(),
        height = canvas.height(),
        groups = groups.len(),
        labels = placed.len(),
        "composed sectioned grid"
    );
    Ok(burn_in(canvas, &placed, footer, style, typeface))
}

/// Builds a flat grid of `columns` tiles per row in reading order.
///
/// The last row is completed with blank tiles the size of the first tile.
pub fn compose_tiles(
    tiles: &[Entry],
    columns: usize,
    footer: Option<&Footer>,
    style: &ComposeStyle,
    typeface: &Typeface,
) -> Result<RgbImage, GridError> {
    if columns == 0 {
        return Err(GridError::Empty {
            what: "tile grid columns",
        });
    }
    let first = tiles.first().ok_or(GridError::Empty { what: "tile grid" })?;
    let blank = solid(first.image.width(), first.image.height(), style.fill);

    let mut rows = Vec::new();
    let mut placed = Vec::new();
    let mut y = 0i32;
    for chunk in tiles.chunks(columns) {
        let images = chunk
            .iter()
            .map(|e| &e.image)
            .chain(std::iter::repeat_n(&blank, columns - chunk.len()));
        let row = concat_row(images, style.spacing, style.fill)?;
        place_tile_labels(chunk, 0, y, style, &mut placed);
        y += row.height() as i32;
        rows.push(row);
    }

    let width = rows.iter().map(RgbImage::width).max().unwrap_or(0).max(style.min_width);
    let rows: Vec<RgbImage> = rows
        .into_iter()
        .map(|row| pad_to_width(row, width, style.fill))
        .collect();

    let canvas = concat_column(&rows)?;
    debug!(
        width = canvas.width(),
        height = canvas.height(),
        tiles = tiles.len(),
        columns,
        "composed tile grid"
    );
    Ok(burn_in(canvas, &placed, footer, style, typeface))
}
