//! Raster primitives: loading, resizing, padding and concatenation of RGB buffers.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{Axis, GridError};

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
// Bilinear, the usual default for 2D resizing.
const RESIZE_FILTER: FilterType = FilterType::Triangle;

/// How a source image is normalized before it is placed in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Sizing {
    /// Stretch to an exact width and height.
    Square { width: u32, height: u32 },
    /// Scale to a fixed height, keeping the aspect ratio.
    Height { height: u32 },
}

impl Sizing {
    pub fn square(side: u32) -> Self {
        Sizing::Square {
            width: side,
            height: side,
        }
    }

    fn apply(&self, image: &RgbImage) -> RgbImage {
        match *self {
            Sizing::Square { width, height } => {
                imageops::resize(image, width, height, RESIZE_FILTER)
            }
            Sizing::Height { height } => resize_to_height(image, height),
        }
    }

    fn placeholder_dims(&self) -> (u32, u32) {
        match *self {
            Sizing::Square { width, height } => (width, height),
            Sizing::Height { height } => (height, height),
        }
    }
}

/// What to do when a referenced image cannot be decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceholderPolicy {
    /// Log a warning and use a black block of the expected size.
    #[default]
    Substitute,
    /// Fail with [`GridError::Load`].
    Abort,
}

/// A normalized source image.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub image: RgbImage,
    /// Set when `image` is a black stand-in for a file that failed to decode.
    pub placeholder: bool,
}

/// Decodes `path` and normalizes it with `sizing`.
///
/// Decoding failures are not silent: under [`PlaceholderPolicy::Substitute`]
/// a warning is logged and the result is marked as a placeholder so callers
/// can report it; under [`PlaceholderPolicy::Abort`] the error is returned.
pub fn load_or_placeholder(
    path: &Path,
    sizing: Sizing,
    policy: PlaceholderPolicy,
) -> Result<Loaded, GridError> {
    match image::open(path) {
        Ok(decoded) => {
            let rgb = decoded.to_rgb8();
            debug!(
                path = %path.display(),
                width = rgb.width(),
                height = rgb.height(),
                "loaded image"
            );
            Ok(Loaded {
                image: sizing.apply(&rgb),
                placeholder: false,
            })
        }
        Err(source) => match policy {
            PlaceholderPolicy::Abort => Err(GridError::Load {
                path: path.to_path_buf(),
                source,
            }),
            PlaceholderPolicy::Substitute => {
                warn!(
                    path = %path.display(),
                    error = %source,
                    "could not load image, substituting black placeholder"
                );
                let (width, height) = sizing.placeholder_dims();
                Ok(Loaded {
                    image: solid(width, height, BLACK),
                    placeholder: true,
                })
            }
        },
    }
}

/// Resizes every image to the same `(width, height)`.
pub fn resize_uniform(images: &[RgbImage], size: (u32, u32)) -> Vec<RgbImage> {
    let (width, height) = size;
    images
        .iter()
        .map(|img| imageops::resize(img, width, height, RESIZE_FILTER))
        .collect()
}

/// Scales `image` to `height`, width follows the aspect ratio (truncated, at least 1).
pub fn resize_to_height(image: &RgbImage, height: u32) -> RgbImage {
    let (w, h) = image.dimensions();
    if h == 0 {
        return solid(height, height, BLACK);
    }
    let width = ((u64::from(height) * u64::from(w)) / u64::from(h)).max(1) as u32;
    imageops::resize(image, width, height, RESIZE_FILTER)
}

/// A `width`×`height` block of one color.
pub fn solid(width: u32, height: u32, fill: Rgb<u8>) -> RgbImage {
    RgbImage::from_pixel(width, height, fill)
}

/// Places images of equal height side by side with `spacing` pixels of `fill` between them.
pub fn concat_row<'a>(
    images: impl IntoIterator<Item = &'a RgbImage>,
    spacing: u32,
    fill: Rgb<u8>,
) -> Result<RgbImage, GridError> {
    let images: Vec<&RgbImage> = images.into_iter().collect();
    let first = images.first().ok_or(GridError::Empty { what: "row" })?;
    let height = first.height();
    for (index, img) in images.iter().enumerate().skip(1) {
        if img.height() != height {
            return Err(GridError::ShapeMismatch {
                axis: Axis::Height,
                index,
                expected: height,
                found: img.height(),
            });
        }
    }

    let gaps = images.len() as u32 - 1;
    let width = images.iter().map(|img| img.width()).sum::<u32>() + spacing * gaps;
    let mut out = solid(width, height, fill);
    let mut x = 0i64;
    for img in images {
        imageops::replace(&mut out, img, x, 0);
        x += i64::from(img.width()) + i64::from(spacing);
    }
    Ok(out)
}

/// Stacks rows of equal width top to bottom. Rows must be padded beforehand.
pub fn concat_column(rows: &[RgbImage]) -> Result<RgbImage, GridError> {
    let first = rows.first().ok_or(GridError::Empty { what: "column" })?;
    let width = first.width();
    for (index, row) in rows.iter().enumerate().skip(1) {
        if row.width() != width {
            return Err(GridError::ShapeMismatch {
                axis: Axis::Width,
                index,
                expected: width,
                found: row.width(),
            });
        }
    }

    let height = rows.iter().map(RgbImage::height).sum();
    let mut out = RgbImage::new(width, height);
    let mut y = 0i64;
    for row in rows {
        imageops::replace(&mut out, row, 0, y);
        y += i64::from(row.height());
    }
    Ok(out)
}

/// Extends `image` on the right with `fill` up to `width`. Wider images come back untouched.
pub fn pad_to_width(image: RgbImage, width: u32, fill: Rgb<u8>) -> RgbImage {
    if image.width() >= width {
        return image;
    }
    let mut out = solid(width, image.height(), fill);
    imageops::replace(&mut out, &image, 0, 0);
    out
}

/// Centers `image` horizontally in a `total_width` canvas; the odd pixel goes right.
pub fn center_pad(image: RgbImage, total_width: u32, fill: Rgb<u8>) -> RgbImage {
    if image.width() >= total_width {
        return image;
    }
    let left = (total_width - image.width()) / 2;
    let mut out = solid(total_width, image.height(), fill);
    imageops::replace(&mut out, &image, i64::from(left), 0);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const RED: Rgb<u8> = Rgb([255, 0, 0]);

    #[test]
    fn resize_uniform_yields_requested_size() {
        let images = vec![
            solid(640, 480, RED),
            solid(31, 977, RED),
            solid(1, 1, RED),
        ];
        let resized = resize_uniform(&images, (200, 150));
        assert_eq!(resized.len(), 3);
        for img in &resized {
            assert_eq!(img.dimensions(), (200, 150));
        }
    }

    #[test]
    fn resize_to_height_keeps_aspect() {
        let img = solid(400, 300, RED);
        let out = resize_to_height(&img, 150);
        assert_eq!(out.dimensions(), (200, 150));

        // 3:7 truncates rather than rounds.
        let tall = solid(3, 7, RED);
        assert_eq!(resize_to_height(&tall, 10).width(), 4);
    }

    #[test]
    fn concat_row_adds_widths_and_spacing() {
        let images = vec![solid(10, 5, RED), solid(20, 5, RED), solid(7, 5, RED)];
        let row = concat_row(&images, 4, WHITE).expect("row");
        assert_eq!(row.dimensions(), (10 + 20 + 7 + 2 * 4, 5));
        // first spacer column
        assert_eq!(*row.get_pixel(10, 0), WHITE);
        assert_eq!(*row.get_pixel(14, 0), RED);
    }

    #[test]
    fn concat_row_rejects_height_mismatch() {
        let images = vec![solid(10, 5, RED), solid(10, 6, RED)];
        match concat_row(&images, 0, WHITE) {
            Err(GridError::ShapeMismatch {
                axis: Axis::Height,
                index: 1,
                expected: 5,
                found: 6,
            }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn concat_row_rejects_empty_input() {
        assert!(matches!(
            concat_row(&Vec::<RgbImage>::new(), 0, WHITE),
            Err(GridError::Empty { .. })
        ));
    }

    #[test]
    fn concat_column_sums_heights() {
        let rows = vec![solid(12, 3, RED), solid(12, 9, WHITE)];
        let col = concat_column(&rows).expect("column");
        assert_eq!(col.dimensions(), (12, 12));
        assert_eq!(*col.get_pixel(0, 2), RED);
        assert_eq!(*col.get_pixel(0, 3), WHITE);
    }

    #[test]
    fn concat_column_rejects_width_mismatch() {
        let rows = vec![solid(12, 3, RED), solid(12, 3, RED), solid(11, 3, RED)];
        assert!(matches!(
            concat_column(&rows),
            Err(GridError::ShapeMismatch {
                axis: Axis::Width,
                index: 2,
                ..
            })
        ));
    }

    #[test]
    fn center_pad_floors_left_margin() {
        let img = solid(5, 2, RED);
        let out = center_pad(img, 12, WHITE);
        assert_eq!(out.dimensions(), (12, 2));
        // deficit 7: 3 left, 4 right
        assert_eq!(*out.get_pixel(2, 0), WHITE);
        assert_eq!(*out.get_pixel(3, 0), RED);
        assert_eq!(*out.get_pixel(7, 0), RED);
        assert_eq!(*out.get_pixel(8, 0), WHITE);
    }

    #[test]
    fn pad_to_width_is_idempotent() {
        let img = solid(5, 2, RED);
        let once = pad_to_width(img, 9, WHITE);
        assert_eq!(once.dimensions(), (9, 2));
        assert_eq!(*once.get_pixel(8, 1), WHITE);
        let twice = pad_to_width(once.clone(), 9, WHITE);
        assert_eq!(once, twice);
        let narrower = pad_to_width(once.clone(), 4, WHITE);
        assert_eq!(once, narrower);
    }

    #[test]
    fn missing_file_substitutes_black_placeholder() {
        let path = Path::new("definitely/not/here.jpg");
        let loaded = load_or_placeholder(path, Sizing::square(40), PlaceholderPolicy::Substitute)
            .expect("substitute never fails");
        assert!(loaded.placeholder);
        assert_eq!(loaded.image.dimensions(), (40, 40));
        assert!(loaded.image.pixels().all(|p| *p == BLACK));

        let tall = load_or_placeholder(
            path,
            Sizing::Height { height: 30 },
            PlaceholderPolicy::Substitute,
        )
        .expect("substitute never fails");
        assert_eq!(tall.image.dimensions(), (30, 30));
    }

    #[test]
    fn missing_file_aborts_under_strict_policy() {
        let path = Path::new("definitely/not/here.jpg");
        let err = load_or_placeholder(path, Sizing::square(40), PlaceholderPolicy::Abort)
            .expect_err("abort must fail");
        assert!(matches!(err, GridError::Load { .. }));
    }
}
