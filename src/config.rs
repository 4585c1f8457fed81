use crate::cli::Args;
use crate::preprocessing::Variant;
use std::ffi::OsString;
use std::path::PathBuf;

/// Settings for a single preprocessing run
#[derive(Debug, Clone)]
pub struct Config {
    /// Image to preprocess; `None` when the user gave no argument
    pub input: Option<PathBuf>,
    pub variant: Variant,
    pub log_level: String,
    /// Positional arguments after the input, accepted for compatibility
    pub ignored_args: Vec<OsString>,
}

impl Config {
    pub fn new(args: Args, variant: Variant) -> Self {
        Self {
            input: args.input,
            variant,
            log_level: args.log_level,
            ignored_args: args.extra,
        }
    }
}
