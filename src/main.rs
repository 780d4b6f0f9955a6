use anyhow::Context;
use clap::{Parser, ValueEnum};
use owo_colors::OwoColorize;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use svg_extrude::{ExtractOptions, FillDefault, extract};

/// Extract fill-grouped shapes and bounds from an SVG file as JSON
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// SVG file to read, or `-` for stdin
    #[arg(value_hint = clap::ValueHint::FilePath)]
    input: PathBuf,

    /// Write JSON here instead of stdout
    #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
    output: Option<PathBuf>,

    /// Colour for paths without a usable fill
    #[arg(long, value_enum, default_value = "black")]
    fill_default: FillArg,

    /// Parametric steps per curve (at least 10)
    #[arg(long, default_value_t = 16)]
    samples: usize,

    /// Maximum segments a single path may produce
    #[arg(long, default_value_t = 1_000_000)]
    max_segments: usize,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Do not report skipped elements on stderr
    #[arg(short, long)]
    quiet: bool,
}

#[derive(ValueEnum, Debug, Copy, Clone)]
enum FillArg {
    Black,
    White,
}

impl From<FillArg> for FillDefault {
    fn from(arg: FillArg) -> Self {
        match arg {
            FillArg::Black => FillDefault::Black,
            FillArg::White => FillDefault::White,
        }
    }
}

fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read SVG from stdin")?;
        return Ok(text);
    }
    fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let svg = read_input(&cli.input)?;

    let options = ExtractOptions {
        fill_default: cli.fill_default.into(),
        curve_samples: cli.samples,
        max_segments_per_path: Some(cli.max_segments),
        ..ExtractOptions::default()
    };
    let extraction = extract(&svg, &options)
        .with_context(|| format!("Failed to extract shapes from {}", cli.input.display()))?;

    if !cli.quiet {
        for diag in &extraction.diagnostics {
            eprintln!(
                "{} path #{}: {}",
                "warning".yellow().bold(),
                diag.source_index,
                diag.issue
            );
        }
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&extraction)?
    } else {
        serde_json::to_string(&extraction)?
    };

    match &cli.output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
