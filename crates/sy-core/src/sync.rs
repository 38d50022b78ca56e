use crate::timing::SyncFactor;
use crate::traits::AudioDevice;

/// Tolérance de dérive par défaut : 100 ms.
pub const DEFAULT_TOLERANCE_MICROS: i64 = 100_000;

/// Outcome of one correction pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyncAction {
    /// Audio device not running; nothing checked.
    Skipped,
    /// Audio lags by `drift` µs, within tolerance.
    InTolerance {
        /// Lag in microseconds (≥ 0).
        drift: i64,
    },
    /// Audio leads by `lead` µs. Never corrected.
    Ahead {
        /// Lead in microseconds (> 0).
        lead: i64,
    },
    /// Audio lagged beyond tolerance and was pulled forward.
    Seeked {
        /// Position before the seek.
        from: i64,
        /// Expected position the device was moved to.
        to: i64,
    },
}

/// Correcteur périodique de dérive audio/vidéo.
///
/// Sans mémoire entre deux appels en dehors du `SyncFactor` : une dérive
/// inférieure à la tolérance est acceptée indéfiniment. La correction est
/// asymétrique : seul un audio en retard est ramené vers l'avant, la vidéo
/// n'attend jamais l'audio.
///
/// # Example
/// ```
/// use sy_core::sync::{SyncAction, SyncController};
/// use sy_core::timing::{PlaybackTiming, SyncFactor};
///
/// let timing = PlaybackTiming::from_report(24.0, 240);
/// let sync = SyncController::new(SyncFactor::new(12_000_000, &timing), 100_000);
/// assert_eq!(sync.expected_audio_micros(120, 24.0), 6_000_000);
/// assert_eq!(
///     sync.decide(6_000_000, 5_600_000),
///     SyncAction::Seeked { from: 5_600_000, to: 6_000_000 }
/// );
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SyncController {
    factor: SyncFactor,
    tolerance_micros: i64,
}

impl SyncController {
    /// Controller for one session. A negative tolerance is treated as 0.
    #[must_use]
    pub fn new(factor: SyncFactor, tolerance_micros: i64) -> Self {
        Self {
            factor,
            tolerance_micros: tolerance_micros.max(0),
        }
    }

    /// The session's sync factor.
    #[must_use]
    pub fn factor(&self) -> SyncFactor {
        self.factor
    }

    /// Position audio attendue pour la frame `n` : `round(n / fps * factor * 1e6)`.
    #[must_use]
    pub fn expected_audio_micros(&self, frame_index: u64, fps: f64) -> i64 {
        let expected_video_secs = frame_index as f64 / fps;
        let expected_audio_secs = expected_video_secs * self.factor.get();
        (expected_audio_secs * 1_000_000.0).round() as i64
    }

    /// Decision rule, independent of any device.
    #[must_use]
    pub fn decide(&self, expected_micros: i64, actual_micros: i64) -> SyncAction {
        if actual_micros < expected_micros.saturating_sub(self.tolerance_micros) {
            SyncAction::Seeked {
                from: actual_micros,
                to: expected_micros,
            }
        } else if actual_micros > expected_micros {
            SyncAction::Ahead {
                lead: actual_micros - expected_micros,
            }
        } else {
            SyncAction::InTolerance {
                drift: expected_micros - actual_micros,
            }
        }
    }

    /// Vérifie la position audio après la frame `frame_index` et la corrige
    /// vers l'avant si elle accuse trop de retard.
    pub fn correct<A: AudioDevice + ?Sized>(
        &self,
        frame_index: u64,
        fps: f64,
        audio: &mut A,
    ) -> SyncAction {
        if !audio.is_running() {
            return SyncAction::Skipped;
        }
        let expected = self.expected_audio_micros(frame_index, fps);
        let action = self.decide(expected, audio.position_micros());
        if let SyncAction::Seeked { to, .. } = action {
            audio.set_position_micros(to);
        }
        action
    }
}
