//! Individual preprocessing steps

pub mod blur;
pub mod denoise;
pub mod grayscale;
pub mod rotate;
pub mod sharpen;
pub mod threshold;
