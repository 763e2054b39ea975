//! cdoc — extract, classify, and associate comments from C/C++ sources.
//!
//! Two modes:
//!
//! - **stdin mode**: `cdoc -f json < file.c` — extract from stdin, print
//!   one rendered report to stdout
//! - **file mode**: `cdoc -o docs -f markdown src/*.c include/` — expand
//!   globs and directories, extract every file in parallel, write one
//!   output file per input

mod error;
mod model;
mod parser;
mod render;
mod scanner;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use error::ExtractError;
use model::{FileReport, Style};

#[derive(Parser)]
#[command(
    name = "cdoc",
    about = "Extract and classify comments from C/C++ source files"
)]
struct Cli {
    /// Input files (glob patterns and directories supported). If omitted,
    /// reads from stdin.
    files: Vec<String>,

    /// Output directory (required when files are given)
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Output format: markdown (default), json, text
    #[arg(short = 'f', long, default_value = "markdown")]
    format: String,

    /// Keep only documentation comments (`/** */`, `/*! */`, `///`, `//!`)
    #[arg(long)]
    doc_only: bool,

    /// Filter comments by style. Prefix with ! to exclude.
    /// Can be specified multiple times. E.g. --style '!line'
    #[arg(long)]
    style: Vec<String>,

    /// Number of worker threads for file mode
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Exit nonzero when any file reported extraction errors
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(jobs) = cli.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .context("failed to configure worker threads")?;
    }

    let filters = style_filters(&cli.style)?;

    if cli.files.is_empty() {
        return stdin_mode(&cli, &filters);
    }
    file_mode(&cli, &filters)
}

/// stdin mode: read from stdin, extract, render to stdout.
fn stdin_mode(cli: &Cli, filters: &StyleFilters) -> Result<()> {
    let mut input = Vec::new();
    std::io::stdin()
        .read_to_end(&mut input)
        .context("failed to read stdin")?;

    let mut report = parser::parse_bytes("<stdin>", &input);
    warn_errors(&report);
    filter_comments(&mut report, cli.doc_only, filters);

    let renderer = render::create_renderer(&cli.format)?;
    print!("{}", renderer.render(&report));

    if cli.strict && !report.errors.is_empty() {
        anyhow::bail!("extraction errors in stdin input");
    }
    Ok(())
}

/// file mode: extract every input in parallel, one output file per input.
fn file_mode(cli: &Cli, filters: &StyleFilters) -> Result<()> {
    let output_dir = cli
        .output
        .as_deref()
        .context("--output is required when files are given")?;

    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let input_files = expand_globs(&cli.files)?;
    if input_files.is_empty() {
        anyhow::bail!("no input files matched");
    }

    // Each file's scan is fully independent; results come back in input
    // order.
    let mut reports: Vec<FileReport> = input_files
        .par_iter()
        .map(|path| {
            let file = path.to_string_lossy().to_string();
            match fs::read(path) {
                Ok(bytes) => parser::parse_bytes(&file, &bytes),
                Err(e) => FileReport {
                    file,
                    comments: Vec::new(),
                    errors: vec![ExtractError::Read {
                        message: e.to_string(),
                    }],
                },
            }
        })
        .collect();

    let renderer = render::create_renderer(&cli.format)?;
    let ext = renderer.file_extension();

    let mut failed = false;
    for report in &mut reports {
        warn_errors(report);
        failed |= !report.errors.is_empty();
        filter_comments(report, cli.doc_only, filters);

        // Skip files with nothing to say (e.g. headers without comments).
        if report.comments.is_empty() && report.errors.is_empty() {
            continue;
        }

        let name = derive_output_name(&report.file);
        let out_path = output_dir.join(format!("{}.{}", name, ext));
        fs::write(&out_path, renderer.render(report))
            .with_context(|| format!("failed to write {}", out_path.display()))?;
    }

    if cli.strict && failed {
        anyhow::bail!("extraction errors in one or more files");
    }
    Ok(())
}

/// Parsed `--style` filters: inclusions and `!`-prefixed exclusions.
#[derive(Debug)]
struct StyleFilters {
    include: Vec<Style>,
    exclude: Vec<Style>,
}

fn style_filters(specs: &[String]) -> Result<StyleFilters> {
    let mut filters = StyleFilters {
        include: Vec::new(),
        exclude: Vec::new(),
    };
    for spec in specs {
        let (excluded, name) = match spec.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, spec.as_str()),
        };
        let style = Style::from_name(name).with_context(|| {
            format!(
                "unknown style: {} (use block, line, doxygen-block, qt-block, doxygen-line, qt-line)",
                name
            )
        })?;
        if excluded {
            filters.exclude.push(style);
        } else {
            filters.include.push(style);
        }
    }
    Ok(filters)
}

/// Apply `--doc-only` and `--style` filters to a report's comments.
fn filter_comments(report: &mut FileReport, doc_only: bool, filters: &StyleFilters) {
    report.comments.retain(|c| {
        if doc_only && !c.style.is_doc() {
            return false;
        }
        if !filters.include.is_empty() && !filters.include.contains(&c.style) {
            return false;
        }
        !filters.exclude.contains(&c.style)
    });
}

fn warn_errors(report: &FileReport) {
    for err in &report.errors {
        tracing::warn!(file = %report.file, "{}", err);
    }
    tracing::debug!(
        file = %report.file,
        comments = report.comments.len(),
        "extraction finished"
    );
}

/// Expand glob patterns into a sorted, deduplicated list of input files.
/// Bare directories are scanned (non-recursively) for supported extensions.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && has_supported_extension(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            tracing::warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| parser::SUPPORTED_EXTENSIONS.contains(&ext))
}

/// Output file name for a source path: the file name itself, extension
/// kept so `point.c` and `point.h` cannot collide.
/// "src/point.c" with markdown output becomes "point.c.md".
fn derive_output_name(source: &str) -> String {
    source
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(source)
        .to_string()
}
