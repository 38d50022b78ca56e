//! Video sources for syncscii.
//!
//! Décodage via `ffprobe`/`ffmpeg` en subprocess, frames RGBA sur stdout.

pub mod video;

pub use video::{FfmpegDecoder, VideoInfo};
