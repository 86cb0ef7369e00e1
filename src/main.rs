use anyhow::Result;
use cercatore::{CercatoreConfig, ExcludeMode, run};
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliExcludeMode {
    Substring,
    Segment,
}

impl From<CliExcludeMode> for ExcludeMode {
    fn from(mode: CliExcludeMode) -> Self {
        match mode {
            CliExcludeMode::Substring => ExcludeMode::Substring,
            CliExcludeMode::Segment => ExcludeMode::Segment,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Sensitive data finder for document folders", long_about = None)]
struct Args {
    /// Directory to scan
    #[arg(long)]
    path: PathBuf,

    /// Maximum file size in MB (larger files are skipped)
    #[arg(long = "max-size")]
    max_size: Option<u64>,

    /// Only report files whose text matches this word or regex (case-insensitive)
    #[arg(long)]
    search: Option<String>,

    /// Base directory for the report_<timestamp> folder
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Add an excluded folder name
    #[arg(long)]
    exclude: Vec<String>,

    /// How excluded folder names are matched
    #[arg(long, value_enum)]
    exclude_mode: Option<CliExcludeMode>,

    /// Worker threads (0 = one per CPU)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// OCR language for images (e.g. "ita")
    #[arg(long)]
    ocr_lang: Option<String>,

    /// Configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Suppress logging and the progress bar
    #[arg(short, long)]
    quiet: bool,
}

fn setup_logging(filter: Option<&str>) {
    let Some(directives) = filter else {
        return;
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directives));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    // 1. Load from file or default
    let loaded = match &args.config {
        Some(path) => CercatoreConfig::load_from_path(path)?,
        None => CercatoreConfig::load_from_file()?,
    };
    let mut config = loaded.unwrap_or_default();

    // 2. Override with CLI args
    config.path = args.path;
    if let Some(o) = args.output {
        config.output = o;
    }
    if let Some(mb) = args.max_size {
        config.max_size_mb = mb;
    }
    if let Some(s) = args.search {
        config.search = Some(s);
    }
    if !args.exclude.is_empty() {
        // CLI exclusions ADD to config exclusions
        config.exclude_folders.extend(args.exclude);
    }
    if let Some(mode) = args.exclude_mode {
        config.exclude_mode = mode.into();
    }
    if let Some(j) = args.jobs {
        config.jobs = j;
    }
    if let Some(lang) = args.ocr_lang {
        config.ocr_language = Some(lang);
    }
    if args.verbose > 0 {
        config.verbose = true;
    }
    if args.quiet {
        config.quiet = true;
    }

    // 3. Logging reflects the merged settings
    setup_logging(config.log_filter(args.verbose));

    run(config)?;
    Ok(())
}
