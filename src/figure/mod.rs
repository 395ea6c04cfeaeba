//! Declarative figure descriptions and their rendering.
//!
//! A figure names a target image, groups of ranked matches with captions and
//! distances, and the style to draw them with. Descriptions are plain JSON so
//! a new comparison needs no code:
//!
//! ```json
//! {
//!   "name": "task2",
//!   "output": "results/task2_results.jpg",
//!   "sizing": { "mode": "square", "width": 200, "height": 200 },
//!   "target": { "path": "pic.0164.jpg", "caption": "Target: pic.0164.jpg" },
//!   "groups": [
//!     { "label": "RGB Histogram Matching:", "color": "#ffff00",
//!       "tiles": [ { "path": "pic.0110.jpg", "caption": "pic.0110.jpg" } ] }
//!   ]
//! }
//! ```

pub mod presets;

use std::fs;
use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::grid::{
    ComposeStyle, Entry, Footer, GridError, Group, PlaceholderPolicy, Sizing, Typeface, color,
    compose, compose_tiles, load_or_placeholder,
};

/// A source image reference plus what to print on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub path: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Tile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
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

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub label: String,
    #[serde(default, with = "color::option", skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb<u8>>,
    pub tiles: Vec<Tile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterSpec {
    pub text: String,
    #[serde(default, with = "color::option", skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb<u8>>,
}

/// Arrangement of the figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayoutKind {
    /// Centered target row, then one row per group.
    #[default]
    Sections,
    /// Target followed by every match in reading order; group labels are not drawn.
    Tiles { columns: usize },
}

/// One complete figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureSpec {
    pub name: String,
    /// Preview window title.
    #[serde(default)]
    pub title: String,
    pub output: PathBuf,
    pub sizing: Sizing,
    /// Sizing of the target only, defaults to `sizing`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sizing: Option<Sizing>,
    #[serde(default)]
    pub layout: LayoutKind,
    pub target: Tile,
    #[serde(default)]
    pub groups: Vec<GroupSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<FooterSpec>,
    #[serde(default)]
    pub style: ComposeStyle,
}

/// A rendered figure and the sources that had to be replaced by placeholders.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub image: RgbImage,
    pub placeholders: Vec<PathBuf>,
}

impl FigureSpec {
    /// Reads a JSON figure description.
    pub fn from_path(path: &Path) -> Result<Self, GridError> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, GridError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Resolves every relative image path against `dir`.
    pub fn with_base_dir(mut self, dir: &Path) -> Self {
        let rebase = |tile: &mut Tile| {
            if tile.path.is_relative() {
                tile.path = dir.join(&tile.path);
            }
        };
        rebase(&mut self.target);
        for group in &mut self.groups {
            group.tiles.iter_mut().for_each(rebase);
        }
        self
    }

    pub fn tile_count(&self) -> usize {
        1 + self.groups.iter().map(|g| g.tiles.len()).sum::<usize>()
    }
}

/// Loads every tile of `spec` and lays them out.
pub fn render(
    spec: &FigureSpec,
    typeface: &Typeface,
    policy: PlaceholderPolicy,
) -> Result<Rendered, GridError> {
    info!(
        figure = %spec.name,
        tiles = spec.tile_count(),
        "rendering figure"
    );

    let mut placeholders = Vec::new();
    let mut load = |tile: &Tile, sizing: Sizing| -> Result<Entry, GridError> {
        let loaded = load_or_placeholder(&tile.path, sizing, policy)?;
        if loaded.placeholder {
            placeholders.push(tile.path.clone());
        }
        Ok(Entry {
            image: loaded.image,
            caption: tile.caption.clone(),
            score: tile.score,
        })
    };

    let target = load(&spec.target, spec.target_sizing.unwrap_or(spec.sizing))?;
    let mut groups = Vec::with_capacity(spec.groups.len());
    for group in &spec.groups {
        let entries = group
            .tiles
            .iter()
            .map(|tile| load(tile, spec.sizing))
            .collect::<Result<Vec<_>, _>>()?;
        groups.push(Group {
            label: group.label.clone(),
            color: group.color,
            entries,
        });
    }

    let footer = spec.footer.as_ref().map(|f| Footer {
        text: f.text.clone(),
        color: f.color,
    });

    let image = match spec.layout {
        LayoutKind::Sections => {
            compose(&target, &groups, footer.as_ref(), &spec.style, typeface)?
        }
        LayoutKind::Tiles { columns } => {
            let tiles: Vec<Entry> = std::iter::once(target)
                .chain(groups.into_iter().flat_map(|g| g.entries))
                .collect();
            compose_tiles(&tiles, columns, footer.as_ref(), &spec.style, typeface)?
        }
    };

    Ok(Rendered {
        image,
        placeholders,
    })
}

/// Encodes `image` to `path`, format chosen by extension. Parent directories are created.
pub fn write_composite(image: &RgbImage, path: &Path) -> Result<(), GridError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GridError::Write {
            path: path.to_path_buf(),
            source: image::ImageError::IoError(e),
        })?;
    }
    image.save(path).map_err(|source| GridError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "wrote composite");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_description_uses_defaults() {
        let json = r#"{
            "name": "tiny",
            "output": "out/tiny.png",
            "sizing": { "mode": "square", "width": 64, "height": 64 },
            "target": { "path": "t.jpg", "caption": "Target: t.jpg" }
        }"#;
        let spec: FigureSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.layout, LayoutKind::Sections);
        assert!(spec.groups.is_empty());
        assert_eq!(spec.style, ComposeStyle::default());
        assert_eq!(spec.tile_count(), 1);
    }

    #[test]
    fn partial_style_overrides_merge_with_defaults() {
        let json = r##"{
            "name": "styled",
            "output": "x.png",
            "sizing": { "mode": "height", "height": 100 },
            "layout": { "kind": "tiles", "columns": 2 },
            "target": { "path": "t.jpg" },
            "style": { "fill": "#ffffff", "spacing": 20 }
        }"##;
        let spec: FigureSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.layout, LayoutKind::Tiles { columns: 2 });
        assert_eq!(spec.style.fill, Rgb([255, 255, 255]));
        assert_eq!(spec.style.spacing, 20);
        assert_eq!(spec.style.score_prefix, ComposeStyle::default().score_prefix);
    }

    #[test]
    fn bad_color_is_rejected() {
        let json = r#"{
            "name": "bad",
            "output": "x.png",
            "sizing": { "mode": "height", "height": 100 },
            "target": { "path": "t.jpg" },
            "groups": [ { "label": "g", "color": "not-a-color", "tiles": [] } ]
        }"#;
        assert!(serde_json::from_str::<FigureSpec>(json).is_err());
    }

    #[test]
    fn base_dir_only_touches_relative_paths() {
        let spec = FigureSpec {
            name: "rebased".into(),
            title: String::new(),
            output: "out.png".into(),
            sizing: Sizing::square(10),
            target_sizing: None,
            layout: LayoutKind::Sections,
            target: Tile::new("pic.0001.jpg"),
            groups: vec![GroupSpec {
                label: "g".into(),
                color: None,
                tiles: vec![Tile::new("/abs/pic.0002.jpg"), Tile::new("pic.0003.jpg")],
            }],
            footer: None,
            style: ComposeStyle::default(),
        }
        .with_base_dir(Path::new("data/olympus"));
        assert_eq!(spec.target.path, Path::new("data/olympus/pic.0001.jpg"));
        assert_eq!(spec.groups[0].tiles[0].path, Path::new("/abs/pic.0002.jpg"));
        assert_eq!(spec.groups[0].tiles[1].path, Path::new("data/olympus/pic.0003.jpg"));
        // output is not an input image
        assert_eq!(spec.output, Path::new("out.png"));
    }
}
