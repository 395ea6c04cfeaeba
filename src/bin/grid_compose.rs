use bytesize::ByteSize;
use clap::{ArgAction, ArgGroup, Parser};
use image::RgbImage;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cbir_result_grid::figure::{self, FigureSpec, presets};
use cbir_result_grid::grid::{PlaceholderPolicy, Typeface};

#[derive(Parser, Debug)]
#[command(
    name = "grid_compose",
    about = "Compose labeled comparison grids from image retrieval results",
    version,
    group(
        ArgGroup::new("source")
            .required(true)
            .args(["figure", "preset", "list"])
    )
)]
struct Cli {
    /// JSON figure description
    #[arg(short = 'f', long = "figure")]
    figure: Option<PathBuf>,

    /// Built-in figure (see --list)
    #[arg(short = 'p', long = "preset")]
    preset: Option<String>,

    /// List the built-in figures
    #[arg(long = "list")]
    list: bool,

    /// Directory relative image paths are resolved against
    #[arg(short = 'd', long = "data-dir")]
    data_dir: Option<PathBuf>,

    /// Write the composite here instead of the figure's output path
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Fail on unreadable images instead of substituting black placeholders
    #[arg(long = "strict")]
    strict: bool,

    /// TTF/OTF font for the labels (defaults to the bundled DejaVu Sans)
    #[arg(long = "font")]
    font: Option<PathBuf>,

    /// Print the resolved figure description as JSON and exit
    #[arg(long = "print")]
    print: bool,

    /// Show the composite in a window; any key closes it
    #[arg(long = "show")]
    show: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn resolve_figure(cli: &Cli) -> Result<FigureSpec, Box<dyn Error>> {
    let spec = if let Some(path) = &cli.figure {
        let spec = FigureSpec::from_path(path)?;
        match &cli.data_dir {
            Some(dir) => spec.with_base_dir(dir),
            None => spec,
        }
    } else if let Some(name) = &cli.preset {
        let dir = cli
            .data_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(presets::DEFAULT_IMAGE_DIR));
        presets::by_name(name)?.with_base_dir(&dir)
    } else {
        return Err("no figure selected".into());
    };

    Ok(match &cli.output {
        Some(output) => FigureSpec {
            output: output.clone(),
            ..spec
        },
        None => spec,
    })
}

#[cfg(feature = "preview")]
fn show(title: &str, composite: &RgbImage) -> Result<(), Box<dyn Error>> {
    cbir_result_grid::preview::show(title, composite)?;
    Ok(())
}

#[cfg(not(feature = "preview"))]
fn show(_title: &str, _composite: &RgbImage) -> Result<(), Box<dyn Error>> {
    tracing::warn!("built without the `preview` feature, --show ignored");
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    if cli.list {
        for name in presets::names() {
            println!("{name}");
        }
        return Ok(());
    }

    let spec = resolve_figure(cli)?;
    if cli.print {
        println!("{}", spec.to_json_pretty()?);
        return Ok(());
    }

    let typeface = match &cli.font {
        Some(path) => Typeface::from_path(path)?,
        None => Typeface::bundled()?,
    };
    let policy = if cli.strict {
        PlaceholderPolicy::Abort
    } else {
        PlaceholderPolicy::Substitute
    };

    let rendered = figure::render(&spec, &typeface, policy)?;
    figure::write_composite(&rendered.image, &spec.output)?;

    let (w, h) = rendered.image.dimensions();
    let written = fs::metadata(&spec.output).map(|m| m.len()).unwrap_or(0);
    println!("Saved to {}", spec.output.display());
    println!("  Size: {w}x{h} pixels ({})", ByteSize::b(written));
    for path in &rendered.placeholders {
        println!("  Placeholder used for {}", path.display());
    }

    if cli.show {
        show(&spec.title, &rendered.image)?;
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
