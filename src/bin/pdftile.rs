//! CLI binary for pdftile.
//!
//! A thin shim over the library crate that maps CLI flags to `RunConfig`,
//! picks the output directory, and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use pdftile::{
    convert_to_dir, inspect, Layout, PageSelection, ProgressCallback, RunConfig,
    RunProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar across the output images, with a log
/// line per written file. Groups are composed in order, so no out-of-order
/// bookkeeping is needed.
struct CliProgress {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Wall-clock start of the group currently being composed.
    group_started: Mutex<Option<Instant>>,
}

impl CliProgress {
    /// Create a callback whose progress-bar length is set by `on_run_start`
    /// (rasterisation happens first, under the spinner).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Rendering");
        bar.set_message("Rasterising pages…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            group_started: Mutex::new(None),
        })
    }
}

impl RunProgressCallback for CliProgress {
    fn on_run_start(&self, total_groups: usize) {
        // Switch from the spinner to a real bar now that pages are rendered
        // and the output count is known.
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} images  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total_groups as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Compositing");
    }

    fn on_group_start(&self, group_num: usize, total_groups: usize) {
        *self.group_started.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(format!("group {group_num}/{total_groups}"));
    }

    fn on_group_complete(
        &self,
        _group_num: usize,
        _total_groups: usize,
        label: &str,
        width: u32,
        height: u32,
    ) {
        let elapsed_ms = self
            .group_started
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} {:<16} {:<12} {}",
            green("✓"),
            label,
            dim(&format!("{width}x{height}")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, _total_groups: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One PNG per page (default), written to ./output/document_single/
  pdftile document.pdf

  # Two pages side by side per image
  pdftile --layout horizontal document.pdf

  # 2x2 grid, custom output directory
  pdftile --layout grid -o slides/ deck.pdf

  # Specific pages at higher resolution
  pdftile --pages 3-15 --dpi 300 --layout vertical score.pdf

  # Convert straight from a URL
  pdftile --layout grid https://arxiv.org/pdf/1706.03762

  # Inspect PDF metadata, no conversion
  pdftile --inspect-only document.pdf

  # Machine-readable run report
  pdftile --json --layout grid document.pdf > report.json

LAYOUT MODES:
  Mode         Pages/image  Output canvas
  ──────────   ───────────  ─────────────────────────────────────────
  single       1            the page itself
  horizontal   2            pages left-to-right, height = tallest page
  vertical     2            pages top-to-bottom, width = widest page
  grid         4            2x2, cell size taken from the first page;
                            short final groups padded with white cells

  A trailing odd page in horizontal/vertical mode is written as-is,
  unpadded. Grid mode always produces a full 2x2 canvas.

OUTPUT NAMING:
  single mode:  page_1.png, page_2.png, …
  other modes:  pages_1-4.png, pages_5-8.png, … (1-indexed, inclusive)

ENVIRONMENT VARIABLES:
  PDFTILE_LAYOUT          Default layout mode
  PDFTILE_DPI             Default rendering DPI
  PDFTILE_PAGES           Default page selection
  PDFTILE_PASSWORD        PDF password
  PDFIUM_DYNAMIC_LIB_PATH Directory containing libpdfium

SETUP:
  pdftile renders through PDFium. Place the pdfium shared library next to
  the binary or install it system-wide; prebuilt libraries:
  https://github.com/bblanchon/pdfium-binaries
"#;

/// Convert PDF pages to PNG images, optionally tiling several pages per image.
#[derive(Parser, Debug)]
#[command(
    name = "pdftile",
    version,
    about = "Convert PDF pages to PNG images, optionally tiling several pages per image",
    long_about = "Convert PDF documents (local files or URLs) to PNG images. Pages can be \
emitted one per file, combined side by side or stacked in pairs, or tiled four \
at a time onto a 2x2 grid with white padding for short final groups.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write images into this directory instead of ./output/{pdf}_{layout}/.
    #[arg(short, long, env = "PDFTILE_OUTPUT")]
    output: Option<PathBuf>,

    /// Page arrangement per output image.
    #[arg(long, env = "PDFTILE_LAYOUT", value_enum, default_value = "single")]
    layout: LayoutArg,

    /// Pages per output image (1, 2 or 4).
    ///
    /// Each layout supports exactly one value (single=1, horizontal/
    /// vertical=2, grid=4); a mismatched request is ignored with a warning.
    #[arg(long, env = "PDFTILE_PAGES_PER_IMAGE")]
    pages_per_image: Option<usize>,

    /// Rendering DPI (72–400).
    #[arg(long, env = "PDFTILE_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=400))]
    dpi: u32,

    /// Maximum rendered page dimension in pixels.
    #[arg(long, env = "PDFTILE_MAX_PIXELS", default_value_t = 4000)]
    max_pixels: u32,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDFTILE_PAGES", default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDFTILE_PASSWORD")]
    password: Option<String>,

    /// Print a JSON run report (files, metadata, stats) to stdout.
    #[arg(long, env = "PDFTILE_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDFTILE_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFTILE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFTILE_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDFTILE_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LayoutArg {
    Single,
    Horizontal,
    Vertical,
    Grid,
}

impl From<LayoutArg> for Layout {
    fn from(v: LayoutArg) -> Self {
        match v {
            LayoutArg::Single => Layout::Single,
            LayoutArg::Horizontal => Layout::Horizontal,
            LayoutArg::Vertical => Layout::Vertical,
            LayoutArg::Grid => Layout::Grid,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input).await.context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialise metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Reconcile layout and pages-per-image ─────────────────────────────
    let layout: Layout = cli.layout.into();
    let (group_size, warning) = layout.normalize_pages_per_image(cli.pages_per_image);
    if let Some(warning) = warning {
        if !cli.quiet {
            eprintln!("{} {}", cyan("⚠"), warning);
        }
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgress::new_dynamic() as Arc<dyn RunProgressCallback>)
    } else {
        None
    };

    let pages = parse_pages(&cli.pages)?;
    let mut builder = RunConfig::builder()
        .layout(layout)
        .dpi(cli.dpi)
        .max_rendered_pixels(cli.max_pixels)
        .pages(pages)
        .download_timeout_secs(cli.download_timeout);
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_dir(&cli.input, layout));

    if !cli.quiet && !cli.json {
        eprintln!(
            "{} {}",
            cyan("◆"),
            bold(&format!(
                "Layout {layout}, {group_size} page(s) per image → {}",
                output_dir.display()
            ))
        );
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert_to_dir(&cli.input, &output_dir, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        eprintln!(
            "{} {} image(s) from {} page(s)  {}ms  →  {}",
            green("✔"),
            bold(&output.stats.composite_count.to_string()),
            output.stats.rendered_pages,
            output.stats.total_duration_ms,
            bold(&output_dir.display().to_string()),
        );
        eprintln!(
            "   {} render  /  {} compose+write",
            dim(&format!("{}ms", output.stats.render_duration_ms)),
            dim(&format!("{}ms", output.stats.compose_duration_ms)),
        );
    }

    Ok(())
}

/// `./output/{pdf_stem}_{layout}/`, the tool's conventional default.
///
/// Computed once here and passed into the library explicitly; nothing else
/// derives paths from the input name.
fn default_output_dir(input: &str, layout: Layout) -> PathBuf {
    let stem = Path::new(input.trim_end_matches('/'))
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());
    PathBuf::from("output").join(format!("{stem}_{layout}"))
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start.trim().parse().context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!("Invalid page range '{}-{}': start must be <= end", start, end);
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        for &p in &pages {
            if p < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
            }
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_output_dir_uses_stem_and_layout() {
        assert_eq!(
            default_output_dir("docs/deck.pdf", Layout::Grid),
            PathBuf::from("output/deck_grid")
        );
        assert_eq!(
            default_output_dir("https://example.com/papers/attention.pdf", Layout::Single),
            PathBuf::from("output/attention_single")
        );
    }

    #[test]
    fn parse_pages_variants() {
        assert!(matches!(parse_pages("all").unwrap(), PageSelection::All));
        assert!(matches!(
            parse_pages("5").unwrap(),
            PageSelection::Single(5)
        ));
        assert!(matches!(
            parse_pages("3-15").unwrap(),
            PageSelection::Range(3, 15)
        ));
        assert!(matches!(
            parse_pages("1,3,5").unwrap(),
            PageSelection::Set(_)
        ));
        assert!(parse_pages("7-3").is_err());
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("x").is_err());
    }
}
