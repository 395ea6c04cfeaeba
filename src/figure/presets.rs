//! The result figures of the retrieval exercise, one per task.
//!
//! Image paths are bare file names; resolve them with
//! [`FigureSpec::with_base_dir`] (usually [`DEFAULT_IMAGE_DIR`]). The match
//! lists and distances were produced by the retrieval programs and are kept
//! verbatim.

use image::Rgb;

use super::{FigureSpec, FooterSpec, GroupSpec, LayoutKind, Tile};
use crate::grid::{ComposeStyle, GridError, HeadingMode, Sizing, TextStyle};

pub const DEFAULT_IMAGE_DIR: &str = "data/olympus";

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const CYAN: Rgb<u8> = Rgb([0, 255, 255]);

const OVERLAP_NOTE: &str = "Note: Only pic.0628/0629 (nearly identical) appears in both";

const PRESETS: &[(&str, fn() -> FigureSpec)] = &[
    ("task1", task1),
    ("task2", task2),
    ("task3", task3),
    ("task4", task4),
    ("extension", extension),
    ("gabor", gabor),
];

pub fn names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|(name, _)| *name)
}

pub fn by_name(name: &str) -> Result<FigureSpec, GridError> {
    PRESETS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, build)| build())
        .ok_or_else(|| GridError::UnknownPreset(name.to_string()))
}

fn named(file: &str) -> Tile {
    Tile::new(file).caption(file)
}

fn group(label: &str, color: Rgb<u8>, tiles: Vec<Tile>) -> GroupSpec {
    GroupSpec {
        label: label.to_string(),
        color: Some(color),
        tiles,
    }
}

fn section_figure(name: &str, title: &str, target: &str, groups: Vec<GroupSpec>) -> FigureSpec {
    FigureSpec {
        name: name.to_string(),
        title: title.to_string(),
        output: format!("results/{name}_results.jpg").into(),
        sizing: Sizing::square(200),
        target_sizing: None,
        layout: LayoutKind::Sections,
        target: Tile::new(target).caption(format!("Target: {target}")),
        groups,
        footer: None,
        style: ComposeStyle::default(),
    }
}

fn overlap_footer() -> Option<FooterSpec> {
    Some(FooterSpec {
        text: OVERLAP_NOTE.to_string(),
        color: None,
    })
}

/// Baseline matching: target and four matches on a 2×3 grid.
fn task1() -> FigureSpec {
    let matches = [
        "pic.0986.jpg",
        "pic.0641.jpg",
        "pic.0547.jpg",
        "pic.1013.jpg",
    ];
    FigureSpec {
        name: "task1".into(),
        title: "Task 1 Results".into(),
        output: "results/task1_results.jpg".into(),
        sizing: Sizing::square(250),
        target_sizing: None,
        layout: LayoutKind::Tiles { columns: 3 },
        target: Tile::new("pic.1016.jpg").caption("Target: pic.1016.jpg"),
        groups: vec![group(
            "Matches",
            WHITE,
            matches
                .iter()
                .enumerate()
                .map(|(i, file)| Tile::new(*file).caption(format!("Match {}: {file}", i + 1)))
                .collect(),
        )],
        footer: None,
        style: ComposeStyle {
            caption_offset: (10, 30),
            caption_text: TextStyle::new(0.6, WHITE, 2),
            ..ComposeStyle::default()
        },
    }
}

fn task2() -> FigureSpec {
    let mut spec = section_figure(
        "task2",
        "Task 2 Results - RGB vs HSV",
        "pic.0164.jpg",
        vec![
            group(
                "RGB Histogram Matching:",
                YELLOW,
                vec![named("pic.0110.jpg"), named("pic.1032.jpg"), named("pic.0092.jpg")],
            ),
            group(
                "HSV Histogram Matching:",
                GREEN,
                vec![named("pic.0080.jpg"), named("pic.0599.jpg"), named("pic.0898.jpg")],
            ),
        ],
    );
    spec.style.target_text = TextStyle::new(0.6, WHITE, 2);
    spec
}

/// Multi-histogram (top and bottom halves) on a 2×2 grid with distances.
fn task3() -> FigureSpec {
    let matches = [
        ("pic.0273.jpg", 0.347),
        ("pic.1031.jpg", 0.375),
        ("pic.0409.jpg", 0.380),
    ];
    FigureSpec {
        name: "task3".into(),
        title: "Task 3 Results - Multi-Histogram".into(),
        output: "results/task3_results.jpg".into(),
        sizing: Sizing::square(280),
        target_sizing: None,
        layout: LayoutKind::Tiles { columns: 2 },
        target: Tile::new("pic.0274.jpg").caption("Target: pic.0274.jpg"),
        groups: vec![group(
            "Matches",
            WHITE,
            matches
                .iter()
                .enumerate()
                .map(|(i, (file, dist))| {
                    Tile::new(*file)
                        .caption(format!("Match {}: {file}", i + 1))
                        .score(*dist)
                })
                .collect(),
        )],
        footer: Some(FooterSpec {
            text: "Multi-Histogram Matching: Top + Bottom Halves".into(),
            color: None,
        }),
        style: ComposeStyle {
            caption_offset: (10, 30),
            score_offset: (10, 60),
            footer_offset: (50, 10),
            score_prefix: "Distance: ".into(),
            caption_text: TextStyle::new(0.7, YELLOW, 2),
            score_text: TextStyle::new(0.5, WHITE, 1),
            footer_text: TextStyle::new(0.6, GREEN, 2),
            ..ComposeStyle::default()
        },
    }
}

fn task4() -> FigureSpec {
    let mut spec = section_figure(
        "task4",
        "Task 4 Results - Color vs Color+Texture",
        "pic.0535.jpg",
        vec![
            group(
                "Color-Only Histogram (Task 2):",
                YELLOW,
                vec![named("pic.0285.jpg"), named("pic.0628.jpg"), named("pic.0952.jpg")],
            ),
            group(
                "Color + Texture (Task 4):",
                GREEN,
                vec![named("pic.0171.jpg"), named("pic.0454.jpg"), named("pic.0629.jpg")],
            ),
        ],
    );
    spec.footer = overlap_footer();
    spec
}

fn extension() -> FigureSpec {
    let scored = |file: &str, dist: f32| named(file).score(dist);
    let mut spec = section_figure(
        "extension",
        "Extension Results - Sobel vs Laws",
        "pic.0535.jpg",
        vec![
            group(
                "Sobel Gradient Texture (Task 4):",
                CYAN,
                vec![
                    scored("pic.0171.jpg", 0.186),
                    scored("pic.0454.jpg", 0.189),
                    scored("pic.0629.jpg", 0.191),
                ],
            ),
            group(
                "Laws Texture Filters (Extension):",
                GREEN,
                vec![
                    scored("pic.0285.jpg", 0.119),
                    scored("pic.0628.jpg", 0.121),
                    scored("pic.0731.jpg", 0.136),
                ],
            ),
        ],
    );
    spec.footer = overlap_footer();
    spec
}

/// Three texture methods side by side on white, headings in their own bands.
fn gabor() -> FigureSpec {
    let plain = |files: [&str; 3]| files.into_iter().map(Tile::new).collect::<Vec<_>>();
    let heading = |label: &str, files: [&str; 3]| GroupSpec {
        label: label.to_string(),
        color: None,
        tiles: plain(files),
    };
    FigureSpec {
        name: "gabor".into(),
        title: "Gabor vs Laws vs Sobel".into(),
        output: "gabor_laws_sobel_comparison.png".into(),
        sizing: Sizing::Height { height: 200 },
        target_sizing: Some(Sizing::Height { height: 300 }),
        layout: LayoutKind::Sections,
        target: Tile::new("pic.0535.jpg")
            .caption("Target: pic.0535.jpg (interior with stone wall)"),
        groups: vec![
            heading(
                "GABOR FILTERS (Extension 2):",
                ["pic.0605.jpg", "pic.0778.jpg", "pic.0805.jpg"],
            ),
            heading(
                "LAWS FILTERS (Extension 1):",
                ["pic.0285.jpg", "pic.0628.jpg", "pic.0731.jpg"],
            ),
            heading(
                "SOBEL GRADIENTS (Task 4):",
                ["pic.0171.jpg", "pic.0454.jpg", "pic.0629.jpg"],
            ),
        ],
        footer: None,
        style: ComposeStyle {
            fill: WHITE,
            spacing: 20,
            headings: HeadingMode::Band { height: 60 },
            heading_gap: 10,
            section_gap: 30,
            min_width: 1200,
            target_text: TextStyle::new(1.0, BLACK, 2),
            heading_text: TextStyle::new(1.0, BLACK, 2),
            ..ComposeStyle::default()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_name_resolves() {
        let names: Vec<_> = names().collect();
        assert_eq!(
            names,
            ["task1", "task2", "task3", "task4", "extension", "gabor"]
        );
        for name in names {
            let spec = by_name(name).unwrap();
            assert_eq!(spec.name, name);
            assert!(!spec.title.is_empty());
        }
    }

    #[test]
    fn unknown_name_is_an_error() {
        assert!(matches!(
            by_name("task9"),
            Err(GridError::UnknownPreset(n)) if n == "task9"
        ));
    }

    #[test]
    fn tile_counts_match_the_figures() {
        let count = |name| by_name(name).unwrap().tile_count();
        assert_eq!(count("task1"), 5);
        assert_eq!(count("task2"), 7);
        assert_eq!(count("task3"), 4);
        assert_eq!(count("task4"), 7);
        assert_eq!(count("extension"), 7);
        assert_eq!(count("gabor"), 10);
    }

    #[test]
    fn presets_survive_json() {
        for name in names() {
            let spec = by_name(name).unwrap();
            let json = spec.to_json_pretty().unwrap();
            let back: FigureSpec = serde_json::from_str(&json).unwrap();
            assert_eq!(back, spec, "{name} changed through JSON");
        }
    }

    #[test]
    fn extension_scores_are_ranked() {
        let spec = by_name("extension").unwrap();
        for group in &spec.groups {
            let scores: Vec<f32> = group.tiles.iter().filter_map(|t| t.score).collect();
            assert_eq!(scores.len(), 3);
            assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
