use anyhow::{Context, Result};
use canvasfit::compose::Processor;
use canvasfit::config::Config;
use canvasfit::logging::{init_subscriber, LogFormat};
use clap::Parser;
use std::path::{Path, PathBuf};

/// Suffix appended to the input's stem when no output path is given.
const OUTPUT_SUFFIX: &str = "_framed.jpg";

/// canvasfit - place a photo on a fixed-size canvas according to a profile
#[derive(Parser, Debug)]
#[command(name = "canvasfit")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the profile file (defaults to $CANVASFIT_CONFIG or profiles.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Profile name to apply
    #[arg(short, long, default_value = "default")]
    profile: String,

    /// Watermark text
    #[arg(short, long, default_value = "")]
    watermark: String,

    /// Output image path (defaults to <input>_framed.jpg next to the input)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    /// Input image
    input: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_format = if args.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_subscriber(log_format)
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to initialize logging")?;

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => {
            let (config, _) = Config::load_default().context("Failed to load configuration")?;
            config
        }
    };
    let processor = Processor::new(config).context("Invalid configuration")?;

    let data = std::fs::read(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let filename = args
        .input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let processed = processor
        .process_bytes(&data, &filename, &args.profile, &args.watermark)
        .with_context(|| format!("Failed to process {}", args.input.display()))?;

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    if let Some(dir) = out.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    std::fs::write(&out, &processed.data)
        .with_context(|| format!("Failed to write {}", out.display()))?;

    tracing::info!(
        input = %args.input.display(),
        output = %out.display(),
        profile = %args.profile,
        width = processed.output_size.0,
        height = processed.output_size.1,
        "Wrote composed image"
    );
    println!("{}", out.display());
    Ok(())
}

/// `<dir>/<stem>_framed.jpg` for an input at `<dir>/<stem>.<ext>`.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = format!("{}{}", stem, OUTPUT_SUFFIX);
    match input.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}
