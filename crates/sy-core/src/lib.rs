//! Types, traits, and timing logic shared across the syncscii workspace.
//!
//! Ce crate contient le cœur algorithmique : quantification luminance→glyphe,
//! horloge audio partagée, contrôleur de synchronisation A/V et pacing.

pub mod charset;
pub mod clock;
pub mod config;
pub mod error;
pub mod frame;
pub mod pacer;
pub mod sync;
pub mod timing;
pub mod traits;

pub use charset::GlyphRamp;
pub use config::PlayerConfig;
pub use error::PlaybackError;
pub use frame::{Frame, FrameBuffer, LumaGrid};
pub use pacer::{FramePacer, Sleeper, Wake};
pub use sync::{SyncAction, SyncController};
pub use timing::{PlaybackTiming, SessionClock, SyncFactor};
pub use traits::{AudioDevice, Decoder, DisplaySink, PlaybackClock, StatusLine};
