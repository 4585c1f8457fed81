use scan_preprocess::{cli, Variant};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    cli::run(Variant::Adaptive)
}
