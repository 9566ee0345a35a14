use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{ArgAction, Parser};

use shadetabler::{MedianCutQuantizer, OutputOptions, ShadeConfig, ShadeType};

#[derive(Parser)]
#[command(name = "shadetabler", version)]
#[command(
    about = "Shade table generator: derive a palette from images and build light/dark shade tables"
)]
#[command(disable_help_flag = true)]
struct Cli {
    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Overwrite existing files, never prompt
    #[arg(short, long)]
    force: bool,

    /// Number of colors saved in the output files [2-256]
    #[arg(short, long, default_value_t = 256)]
    colors: u32,

    /// Number of shades in the shade table [2-256]
    #[arg(short, long, default_value_t = 64)]
    shades: u32,

    /// Type of shade table(s) to generate: light, dark or both
    #[arg(short = 't', long = "type", default_value = "light")]
    shade_type: ShadeType,

    /// High quality quantization
    #[arg(short = 'h', long = "hq")]
    high_quality: bool,

    /// Reserve colors for black and white
    #[arg(short, long)]
    reserve: bool,

    /// Priority of input file colors over generated shades
    #[arg(short, long, default_value_t = 0)]
    priority: u32,

    /// Light shade table filename
    #[arg(short, long, default_value = "shadetable_light.png")]
    light: String,

    /// Dark shade table filename
    #[arg(short, long, default_value = "shadetable_dark.png")]
    dark: String,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Input PNG files
    #[arg(required = true)]
    inputs: Vec<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_target(false)
        .format_timestamp(None)
        .init();

    match generate(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn generate(cli: &Cli) -> anyhow::Result<()> {
    let config = ShadeConfig::new()
        .colors(cli.colors)
        .shades(cli.shades)
        .shade_type(cli.shade_type)
        .high_quality(cli.high_quality)
        .reserve(cli.reserve)
        .priority(cli.priority);
    config.validate().context("invalid options")?;

    let output = OutputOptions::new(&cli.output)
        .light_name(&cli.light)
        .dark_name(&cli.dark)
        .force(cli.force);

    log::info!("ShadeTabler (Shade Table Generator) version {}", env!("CARGO_PKG_VERSION"));

    let mut quantizer = MedianCutQuantizer::default();
    let summary = shadetabler::run(&config, &cli.inputs, &output, &mut quantizer, prompt_overwrite)
        .context("shade table generation failed")?;

    log::info!(
        "Done: {} files written, {} skipped, {} palette entries",
        summary.written.len(),
        summary.skipped.len(),
        summary.palette.len()
    );
    Ok(())
}

/// Ask on stderr; only an answer starting with `y` or `Y` overwrites.
fn prompt_overwrite(path: &Path) -> bool {
    eprint!("File '{}' already exists. Overwrite? [y/N] ", path.display());
    let _ = std::io::stderr().flush();

    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.chars().next(), Some('y' | 'Y'))
}
