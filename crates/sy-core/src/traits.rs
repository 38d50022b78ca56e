use std::fmt;

use crate::error::PlaybackError;
use crate::frame::Frame;

/// Vue en lecture seule sur l'horloge du périphérique audio.
///
/// Implémenté par : `MediaClock`, `AudioPlayer`.
///
/// # Example
/// ```
/// use sy_core::traits::PlaybackClock;
///
/// struct Fixed(i64);
/// impl PlaybackClock for Fixed {
///     fn position_micros(&self) -> i64 { self.0 }
///     fn duration_micros(&self) -> i64 { 10_000_000 }
///     fn is_running(&self) -> bool { true }
/// }
/// assert_eq!(Fixed(42).position_micros(), 42);
/// ```
pub trait PlaybackClock {
    /// Current playback position, in microseconds.
    fn position_micros(&self) -> i64;

    /// Total track length, in microseconds.
    fn duration_micros(&self) -> i64;

    /// `true` while the device is actively playing.
    fn is_running(&self) -> bool;
}

/// Périphérique audio contrôlable : l'horloge plus start/stop/seek.
///
/// Le périphérique avance sa position de façon indépendante (thread de
/// sortie ou horloge matérielle) ; la boucle de rendu ne fait que lire la
/// position et, occasionnellement, la déplacer vers l'avant.
pub trait AudioDevice: PlaybackClock {
    /// Begin or resume playback.
    fn start(&mut self);

    /// Pause playback, keeping the position.
    fn stop(&mut self);

    /// Release the output stream. Further calls are no-ops.
    fn close(&mut self);

    /// Move the playback position.
    fn set_position_micros(&mut self, micros: i64);
}

/// Fournit des frames décodées, une à la fois, dans l'ordre.
///
/// Implémenté par : `FfmpegDecoder`.
pub trait Decoder {
    /// `true` while frames can still be requested.
    fn is_open(&self) -> bool;

    /// Frame rate reported by the container. May be ≤ 0 or NaN when unknown.
    fn nominal_fps(&self) -> f64;

    /// Total frame count reported by the container. May be ≤ 0 when unknown.
    fn total_frame_count(&self) -> i64;

    /// Retourne la prochaine frame, `Ok(None)` en fin de flux.
    ///
    /// # Errors
    /// Returns [`PlaybackError::DecodeFault`] when a frame cannot be read.
    fn read_next_frame(&mut self) -> Result<Option<Frame>, PlaybackError>;

    /// Release the underlying decoding resources. Idempotent.
    fn release(&mut self);
}

/// Ligne de statut affichée sous chaque frame.
///
/// # Example
/// ```
/// use sy_core::traits::StatusLine;
/// let status = StatusLine { frame: 12, total: 240, elapsed_secs: 0.46, audio_on: true };
/// assert_eq!(status.to_string(), "Frame: 12/240 | Time: 0.5s | Audio: ON");
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatusLine {
    /// Number of frames presented so far, this one included (1-based).
    pub frame: u64,
    /// Total frames, after fallback.
    pub total: u64,
    /// Wall time since the session started.
    pub elapsed_secs: f64,
    /// Whether the session was started with an audio track.
    pub audio_on: bool,
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame: {}/{} | Time: {:.1}s",
            self.frame, self.total, self.elapsed_secs
        )?;
        if self.audio_on {
            f.write_str(" | Audio: ON")?;
        }
        Ok(())
    }
}

/// Destination write-only des frames texte.
///
/// Responsable de l'effacement / redessin du terminal.
pub trait DisplaySink {
    /// Present one text frame and its status line.
    ///
    /// # Errors
    /// Returns the terminal I/O error; the session logs it and keeps playing.
    fn present(&mut self, text: &str, status: &StatusLine) -> std::io::Result<()>;
}
