use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreprocessError {
    #[error("Cannot read image: {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Cannot derive output path from {}", .0.display())]
    InvalidPath(PathBuf),

    #[error("Image has no pixels: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("Failed to write {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl PreprocessError {
    /// Decode failures are reported to the user but are not process failures
    pub fn is_decode_failure(&self) -> bool {
        matches!(self, PreprocessError::Decode { .. })
    }
}
