//! Binarize scanned pages ahead of OCR.
//!
//! Each binary decodes one image, runs a fixed filter sequence and writes
//! `<name>_preprocessed.png` next to the input.

pub mod cli;
pub mod config;
pub mod error;
pub mod imagefile;
pub mod preprocessing;

pub use error::PreprocessError;
pub use preprocessing::{preprocess_file, Pipeline, PreprocessingResult, Variant};
