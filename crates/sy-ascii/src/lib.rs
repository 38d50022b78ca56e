//! Frame-to-glyph conversion for syncscii.
//!
//! Redimensionne, normalise puis quantifie une frame en bloc de texte.

pub mod pattern;
pub mod pipeline;
pub mod preprocess;
pub mod render;
pub mod resize;

pub use pipeline::AsciiPipeline;
