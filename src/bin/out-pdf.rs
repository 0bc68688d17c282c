//! CLI binary for htmlpdf.
//!
//! A thin shim over the library crate that collects page expressions from the
//! command line and piped stdin, maps flags to `ConversionConfig` and prints
//! results.

use anyhow::{Context, Result};
use clap::Parser;
use htmlpdf::{
    out_pdf, ConfirmCallback, ConversionConfig, ConversionOutput, OutputTarget, PageCollector,
    PageOrientation, PageSize, CREATE_ACTION,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Terminal confirmation ────────────────────────────────────────────────────

/// Asks `y/N` on stderr and reads the answer from the controlling terminal.
///
/// The spinner is suspended while the question is on screen.
struct TerminalConfirm {
    bar: ProgressBar,
}

impl ConfirmCallback for TerminalConfirm {
    fn should_process(&self, target: &Path, action: &str) -> bool {
        self.bar.suspend(|| {
            eprint!(
                "{}\nPerforming the operation \"{}\" on target \"{}\".\n[y] Yes  [N] No (default is \"N\"): ",
                bold("Confirm"),
                action,
                target.display()
            );
            io::stderr().flush().ok();
            read_answer().is_some_and(|a| is_yes(&a))
        })
    }
}

/// One line from the terminal. Stdin may already be consumed by piped pages,
/// so the controlling terminal is opened directly when it exists.
fn read_answer() -> Option<String> {
    let mut line = String::new();
    match open_tty() {
        Some(tty) => io::BufReader::new(tty).read_line(&mut line).ok()?,
        None => io::stdin().lock().read_line(&mut line).ok()?,
    };
    Some(line)
}

#[cfg(unix)]
fn open_tty() -> Option<std::fs::File> {
    std::fs::File::open("/dev/tty").ok()
}

#[cfg(not(unix))]
fn open_tty() -> Option<std::fs::File> {
    None
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Two scans into one A4 portrait PDF
  out-pdf scan1.png scan2.png -o scans.pdf

  # Wildcards expand in lexical order; pages keep argument order
  out-pdf cover.jpg 'pages/p*.png' -o book.pdf -t "My Book"

  # Letter landscape
  out-pdf -s letter -r landscape slides/*.png -o slides.pdf

  # Pipe page paths in, one per line
  ls scans/*.png | out-pdf -o scans.pdf

  # Output path given as a pattern that must match exactly one existing file
  out-pdf p*.png -o 'draft-*.pdf'

  # Path with literal brackets
  out-pdf p*.png --literal-path 'report[final].pdf'

  # Show what would happen, and the HTML that would be printed
  out-pdf --what-if --emit-html p*.png -o out.pdf

PAGE SIZES:
  a5  a4 (default)  a3  b5  b4  jis-b5  jis-b4  letter  legal  ledger

ENVIRONMENT VARIABLES:
  HTMLPDF_CHROME          Path to the Chrome/Chromium executable
  CHROME_PATH             Fallback engine path, honoured when HTMLPDF_CHROME is unset
  OUTPDF_TITLE            Default --title
  OUTPDF_PAGE_SIZE        Default --page-size
  OUTPDF_ORIENTATION      Default --orientation
  RUST_LOG                Overrides the log filter (e.g. htmlpdf=debug)

ENGINE:
  PDFs are printed by a local headless Chrome or Chromium. It is looked up in
  HTMLPDF_CHROME, CHROME_PATH, then PATH, then the usual install locations.
  An existing output file is never overwritten.
"#;

/// Combine page images into a single PDF, one image per page.
#[derive(Parser, Debug)]
#[command(
    name = "out-pdf",
    version,
    about = "Combine page images into a single PDF, one image per page",
    long_about = "Combine page images (PNG, JPEG, anything the engine can display) into a \
single PDF. Each image is scaled down to fit one page of the chosen size and orientation. \
Page paths come from arguments and, when stdin is piped, one per line from stdin.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Page image paths or wildcard patterns, in page order.
    pages: Vec<String>,

    /// Output PDF path. Wildcards must match exactly one existing file.
    #[arg(short = 'o', long = "path", env = "OUTPDF_PATH", conflicts_with = "literal_path")]
    path: Option<String>,

    /// Output PDF path, taken verbatim (no wildcard expansion).
    #[arg(long, env = "OUTPDF_LITERAL_PATH")]
    literal_path: Option<String>,

    /// Document title, inserted verbatim into the HTML <title>.
    #[arg(short, long, env = "OUTPDF_TITLE", default_value = "")]
    title: String,

    /// Physical page size.
    #[arg(short = 's', long, env = "OUTPDF_PAGE_SIZE", value_enum, default_value = "a4")]
    page_size: PageSizeArg,

    /// Page orientation.
    #[arg(short = 'r', long, env = "OUTPDF_ORIENTATION", value_enum, default_value = "portrait")]
    orientation: OrientationArg,

    /// Show what would be written without writing anything.
    #[arg(long, env = "OUTPDF_WHAT_IF")]
    what_if: bool,

    /// Ask for confirmation before writing the PDF.
    #[arg(long, env = "OUTPDF_CONFIRM")]
    confirm: bool,

    /// Print the generated HTML document to stdout.
    #[arg(long, env = "OUTPDF_EMIT_HTML")]
    emit_html: bool,

    /// Output structured JSON (ConversionOutput) to stdout.
    #[arg(long, env = "OUTPDF_JSON", conflicts_with = "emit_html")]
    json: bool,

    /// Chrome/Chromium executable used as the PDF engine.
    #[arg(long, env = "HTMLPDF_CHROME")]
    chrome: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OUTPDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OUTPDF_QUIET")]
    quiet: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "OUTPDF_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum PageSizeArg {
    A5,
    A4,
    A3,
    B5,
    B4,
    #[value(name = "jis-b5", alias = "jisb5")]
    JisB5,
    #[value(name = "jis-b4", alias = "jisb4")]
    JisB4,
    Letter,
    Legal,
    Ledger,
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::A5 => PageSize::A5,
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::A3 => PageSize::A3,
            PageSizeArg::B5 => PageSize::B5,
            PageSizeArg::B4 => PageSize::B4,
            PageSizeArg::JisB5 => PageSize::JisB5,
            PageSizeArg::JisB4 => PageSize::JisB4,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
            PageSizeArg::Ledger => PageSize::Ledger,
        }
    }
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<OrientationArg> for PageOrientation {
    fn from(v: OrientationArg) -> Self {
        match v {
            OrientationArg::Portrait => PageOrientation::Portrait,
            OrientationArg::Landscape => PageOrientation::Landscape,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the spinner is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.what_if;
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

    // ── Collect pages ────────────────────────────────────────────────────
    let piped = (!io::stdin().is_terminal()).then(|| io::stdin().lock());
    let pages = collect_pages(&cli.pages, piped)?;

    // ── Build config ─────────────────────────────────────────────────────
    let bar = if show_progress {
        new_spinner()
    } else {
        ProgressBar::hidden()
    };
    let config = build_config(&cli, &bar)?;

    let target = match (&cli.path, &cli.literal_path) {
        (Some(p), _) => Some(OutputTarget::Path(p.clone())),
        (None, Some(p)) => Some(OutputTarget::LiteralPath(p.clone())),
        (None, None) => None,
    };

    // ── Run conversion ───────────────────────────────────────────────────
    bar.set_message(format!("Printing {} page expression(s)…", pages.len()));
    let result = out_pdf(&pages, target.as_ref(), &config).await;
    bar.finish_and_clear();
    let output = result.context("Conversion failed")?;

    if cli.what_if {
        let target = output
            .output_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<no output path>".to_string());
        eprintln!(
            "What if: Performing the operation \"{}\" on target \"{}\".",
            CREATE_ACTION, target
        );
    }

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if cli.emit_html {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.html.as_bytes())
            .context("Failed to write to stdout")?;
    }

    if !cli.quiet && !cli.json {
        print_summary(&output, cli.what_if);
    }

    Ok(())
}

/// Positional pages first, then one page per non-blank stdin line.
fn collect_pages(args: &[String], piped: Option<impl BufRead>) -> Result<Vec<String>> {
    let mut collector = PageCollector::new();
    collector.extend(args.iter().cloned());
    if let Some(reader) = piped {
        for line in reader.lines() {
            let line = line.context("Failed to read page list from stdin")?;
            let line = line.trim();
            if !line.is_empty() {
                collector.push(line);
            }
        }
    }
    collector.finish().context("No page images given")
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, bar: &ProgressBar) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .title(cli.title.clone())
        .page_size(cli.page_size.into())
        .orientation(cli.orientation.into())
        .dry_run(cli.what_if);

    if cli.confirm {
        builder = builder.confirm(Arc::new(TerminalConfirm { bar: bar.clone() }));
    }
    if let Some(ref chrome) = cli.chrome {
        builder = builder.chrome_path(chrome.clone());
    }

    builder.build().context("Invalid configuration")
}

fn new_spinner() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    bar.set_prefix("out-pdf");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn print_summary(output: &ConversionOutput, what_if: bool) {
    let stats = &output.stats;
    match (&output.output_path, output.written) {
        (Some(path), true) => eprintln!(
            "{}  {} pages  {} bytes  {}ms  →  {}",
            green("✔"),
            stats.page_count,
            output.bytes_written,
            stats.total_duration_ms,
            bold(&path.display().to_string()),
        ),
        _ if what_if => eprintln!(
            "{}  {} pages resolved, nothing written",
            dim("·"),
            stats.page_count
        ),
        _ => eprintln!(
            "{}  {} pages resolved, write skipped",
            yellow("⚠"),
            stats.page_count
        ),
    }
}
