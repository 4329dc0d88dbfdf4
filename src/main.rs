use chrono::Datelike;
use clap::{Parser, Subcommand};
use decolgen::app::AppInfo;
use decolgen::dialog::{FixedTarget, PromptTarget, SaveRequest, SaveTarget, SuggestedTarget};
use decolgen::edit;
use decolgen::imaging::{ImageBackend, ResampleFilter, RustBackend, TransformParameters};
use decolgen::{config, output};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn version_string() -> &'static str {
    // Called once by clap at startup
    Box::leak(AppInfo::from_build().version.into_boxed_str())
}

#[derive(Parser)]
#[command(name = "decolgen")]
#[command(about = "Adjust images and pad files to an exact byte size")]
#[command(long_about = "\
Adjust images and pad files to an exact byte size

Image edits run in a fixed order:

  resize → blur → sharpen → gamma → contrast → brightness → saturation → invert

Every adjustment left at its default is skipped. The result is encoded in the
format implied by the source extension (.jpg/.jpeg, .png, .gif, .bmp, .tiff;
anything else becomes PNG).

Saved files are suggested next to the source as
{stem}_decolgen_edited{ext} (edits) or {stem}_decolgen_resized{ext} (padding).

Run 'decolgen gen-config' to generate a documented decolgen.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Config file (default: ./decolgen.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

/// Pipeline parameters, as flags or as a JSON request file.
#[derive(clap::Args, Clone)]
struct TransformArgs {
    /// Target width in pixels (default: source width)
    #[arg(long, allow_negative_numbers = true)]
    width: Option<i64>,
    /// Target height in pixels (default: source height)
    #[arg(long, allow_negative_numbers = true)]
    height: Option<i64>,
    /// Resample filter: nearest, linear, catmullrom, lanczos
    #[arg(long, default_value = "catmullrom")]
    filter: String,
    /// Gaussian blur radius, 0..100 (0 = off)
    #[arg(long, default_value_t = 0.0)]
    blur: f64,
    /// Sharpen amount, 0..100 (0 = off)
    #[arg(long, default_value_t = 0.0)]
    sharpen: f64,
    /// Gamma (1.0 = off)
    #[arg(long, default_value_t = 1.0)]
    gamma: f64,
    /// Contrast delta, -100..100
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    contrast: i32,
    /// Brightness delta, -100..100
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    brightness: i32,
    /// Saturation delta, -100..500
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    saturation: i32,
    /// Invert colors
    #[arg(long)]
    invert: bool,
    /// JSON request with the editor form's field names (replaces the flags above)
    #[arg(long, conflicts_with_all = [
        "width", "height", "filter", "blur", "sharpen", "gamma",
        "contrast", "brightness", "saturation", "invert",
    ])]
    request: Option<PathBuf>,
}

/// Where a saved file goes.
#[derive(clap::Args, Clone)]
struct DestinationArgs {
    /// Write to this path
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Ask for the path on stdin (empty answer cancels)
    #[arg(long, conflicts_with = "output")]
    prompt: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show file info for an input
    Open {
        input: PathBuf,
        /// Also print the file content as base64
        #[arg(long)]
        base64: bool,
    },
    /// Render an edit without saving; prints base64 unless --raw is given
    Preview {
        input: PathBuf,
        #[command(flatten)]
        transform: TransformArgs,
        /// Write the encoded bytes to this file instead
        #[arg(long)]
        raw: Option<PathBuf>,
    },
    /// Render an edit and save it
    Edit {
        input: PathBuf,
        #[command(flatten)]
        transform: TransformArgs,
        #[command(flatten)]
        destination: DestinationArgs,
    },
    /// Pad a file with filler bytes up to an exact size
    Pad {
        input: PathBuf,
        /// Target size in bytes
        #[arg(allow_negative_numbers = true)]
        capacity: i64,
        #[command(flatten)]
        destination: DestinationArgs,
    },
    /// Print application name, version, and copyright
    About {
        /// Read metadata from a desktop manifest (JSON) instead of the build
        #[arg(long)]
        manifest: Option<PathBuf>,
    },
    /// Print a stock decolgen.toml with all options documented
    GenConfig,
}

/// The CLI's stand-in for a native save dialog.
enum CliTarget<R, W> {
    Fixed(FixedTarget),
    Suggested(SuggestedTarget),
    Prompt(PromptTarget<R, W>),
}

impl<R: BufRead, W: Write> SaveTarget for CliTarget<R, W> {
    fn choose(&mut self, request: &SaveRequest) -> Option<PathBuf> {
        match self {
            CliTarget::Fixed(t) => t.choose(request),
            CliTarget::Suggested(t) => t.choose(request),
            CliTarget::Prompt(t) => t.choose(request),
        }
    }
}

impl DestinationArgs {
    fn target(&self) -> CliTarget<std::io::StdinLock<'static>, std::io::Stderr> {
        match (&self.output, self.prompt) {
            (Some(path), _) => CliTarget::Fixed(FixedTarget(path.clone())),
            (None, true) => {
                CliTarget::Prompt(PromptTarget::new(std::io::stdin().lock(), std::io::stderr()))
            }
            (None, false) => CliTarget::Suggested(SuggestedTarget),
        }
    }
}

impl TransformArgs {
    fn resolve(
        &self,
        backend: &impl ImageBackend,
        config: &config::EditorConfig,
        input: &Path,
    ) -> Result<TransformParameters, Box<dyn std::error::Error>> {
        if let Some(request) = &self.request {
            let json = std::fs::read_to_string(request)?;
            return Ok(TransformParameters::from_json(&json)?);
        }

        let (width, height) = match (self.width, self.height) {
            (Some(w), Some(h)) => (w, h),
            (w, h) => {
                let (src_w, src_h) = edit::source_dimensions(backend, config, input)?;
                (
                    w.unwrap_or(i64::from(src_w)),
                    h.unwrap_or(i64::from(src_h)),
                )
            }
        };

        Ok(TransformParameters {
            width,
            height,
            filter: ResampleFilter::from(self.filter.clone()),
            blur: self.blur,
            sharpen: self.sharpen,
            gamma: self.gamma,
            contrast: self.contrast,
            brightness: self.brightness,
            saturation: self.saturation,
            invert: self.invert,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => config::load_config_file(path)?,
        None => config::load_config(&std::env::current_dir()?)?,
    };
    let backend = RustBackend::new();

    match cli.command {
        Command::Open { input, base64 } => {
            let opened = edit::open_image(&config, &input)?;
            output::print_file_info(&opened.info);
            if base64 {
                println!("{}", opened.base64);
            }
        }
        Command::Preview {
            input,
            transform,
            raw,
        } => {
            let params = transform.resolve(&backend, &config, &input)?;
            match raw {
                Some(path) => {
                    let bytes = edit::preview(&backend, &config, &input, &params)?;
                    edit::write_output(&config, &path, &bytes)?;
                }
                None => println!(
                    "{}",
                    edit::preview_base64(&backend, &config, &input, &params)?
                ),
            }
        }
        Command::Edit {
            input,
            transform,
            destination,
        } => {
            let params = transform.resolve(&backend, &config, &input)?;
            let outcome = edit::save_edited(
                &backend,
                &config,
                &input,
                &params,
                &mut destination.target(),
            )?;
            // Cancelled is a normal result, not a failure
            output::print_saved(&outcome);
        }
        Command::Pad {
            input,
            capacity,
            destination,
        } => {
            let outcome = edit::pad_file(&config, &input, capacity, &mut destination.target())?;
            output::print_saved(&outcome);
        }
        Command::About { manifest } => {
            let info = match manifest {
                Some(path) => AppInfo::from_manifest_file(&path)?,
                None => AppInfo::from_build(),
            };
            output::print_about(&info, chrono::Local::now().year());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Log to stderr. `RUST_LOG` overrides the `-v` level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
