//! Command line entry point shared by both binaries

use crate::config::Config;
use crate::preprocessing::{preprocess_file, Variant};
use anyhow::Context;
use clap::{CommandFactory, FromArgMatches, Parser};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(version)]
pub struct Args {
    /// Image to preprocess (any format the decoder recognizes)
    #[arg(allow_hyphen_values = true)]
    pub input: Option<PathBuf>,

    /// Anything after the input path is accepted and ignored
    #[arg(hide = true, num_args = 0.., allow_hyphen_values = true)]
    pub extra: Vec<OsString>,

    /// Log level (trace, debug, info, warn, error); logs go to stderr
    #[arg(long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,
}

/// Binary name for a variant
pub fn program_name(variant: Variant) -> &'static str {
    match variant {
        Variant::Sharpen => "preprocess-sharpen",
        Variant::Adaptive => "preprocess-adaptive",
    }
}

/// Usage line printed on stdout when no input path is given
pub fn usage(variant: Variant) -> String {
    format!("Usage: {} <input_image_path>", program_name(variant))
}

/// Only the adaptive binary treats a missing argument as a failure
pub fn missing_argument_status(variant: Variant) -> u8 {
    match variant {
        Variant::Sharpen => 0,
        Variant::Adaptive => 1,
    }
}

fn about(variant: Variant) -> &'static str {
    match variant {
        Variant::Sharpen => "Binarize an image with Otsu, then sharpen and median-denoise it",
        Variant::Adaptive => {
            "Rotate portrait images and binarize with an adaptive mean threshold"
        }
    }
}

fn decode_failure_message(variant: Variant, path: &Path) -> String {
    match variant {
        Variant::Sharpen => format!("ERROR: Cannot read image: {}", path.display()),
        Variant::Adaptive => format!("Error: Could not read image at {}", path.display()),
    }
}

fn success_message(variant: Variant, output: &Path) -> String {
    match variant {
        Variant::Sharpen => output.display().to_string(),
        Variant::Adaptive => format!("Preprocessed image saved to {}", output.display()),
    }
}

/// Parse arguments, run the variant's pipeline and report on stdout
///
/// Stdout carries only the contract output (path, confirmation, usage or
/// decode error); diagnostics go through tracing on stderr.
pub fn run(variant: Variant) -> anyhow::Result<ExitCode> {
    let matches = Args::command()
        .name(program_name(variant))
        .about(about(variant))
        .get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());
    let config = Config::new(args, variant);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    execute(&config)
}

fn execute(config: &Config) -> anyhow::Result<ExitCode> {
    let variant = config.variant;

    let Some(input) = config.input.as_deref() else {
        println!("{}", usage(variant));
        return Ok(ExitCode::from(missing_argument_status(variant)));
    };

    if !config.ignored_args.is_empty() {
        tracing::debug!(ignored = ?config.ignored_args, "Ignoring extra arguments");
    }
    tracing::info!(variant = variant.as_str(), input = %input.display(), "Starting preprocessing");

    match preprocess_file(input, variant) {
        Ok(output) => {
            println!("{}", success_message(variant, &output));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) if e.is_decode_failure() => {
            tracing::debug!(error = ?e, "Decode failed");
            println!("{}", decode_failure_message(variant, input));
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to preprocess {}", input.display())),
    }
}
