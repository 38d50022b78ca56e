use std::time::Instant;

/// Frame rate used when the container reports none.
pub const FALLBACK_FPS: f64 = 24.0;

/// Frame count used when the container reports none.
pub const FALLBACK_FRAMES: u64 = 1;

/// Cadence vidéo nominale, après application des valeurs de repli.
///
/// # Example
/// ```
/// use sy_core::timing::PlaybackTiming;
/// let t = PlaybackTiming::from_report(0.0, -1);
/// assert_eq!(t.fps, 24.0);
/// assert_eq!(t.total_frames, 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackTiming {
    /// Nominal frames per second, > 0.
    pub fps: f64,
    /// Total frames, ≥ 1.
    pub total_frames: u64,
}

impl PlaybackTiming {
    /// Build from what the decoder reports, falling back to 24 fps and 1 frame.
    #[must_use]
    pub fn from_report(fps: f64, total_frames: i64) -> Self {
        let fps = if fps.is_finite() && fps > 0.0 {
            fps
        } else {
            FALLBACK_FPS
        };
        let total_frames = u64::try_from(total_frames)
            .ok()
            .filter(|&n| n > 0)
            .unwrap_or(FALLBACK_FRAMES);
        Self { fps, total_frames }
    }

    /// `total_frames / fps`, en secondes.
    #[must_use]
    pub fn video_duration_secs(&self) -> f64 {
        self.total_frames as f64 / self.fps
    }
}

/// Ratio durée audio / durée vidéo, calculé une fois par session.
///
/// Projette le temps vidéo écoulé sur la timeline audio, de sorte que la
/// dernière frame et la fin de l'audio coïncident même si les durées diffèrent.
///
/// # Example
/// ```
/// use sy_core::timing::{PlaybackTiming, SyncFactor};
/// let timing = PlaybackTiming::from_report(24.0, 240);
/// let factor = SyncFactor::new(12_000_000, &timing);
/// assert!((factor.get() - 1.2).abs() < 1e-12);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SyncFactor(f64);

impl SyncFactor {
    /// Identity mapping: audio and video timelines coincide.
    pub const IDENTITY: Self = Self(1.0);

    /// `audio_duration / video_duration`. Falls back to 1.0 when the ratio is
    /// not a positive finite number (silent or zero-length track).
    #[must_use]
    pub fn new(audio_duration_micros: i64, timing: &PlaybackTiming) -> Self {
        let audio_secs = audio_duration_micros as f64 / 1_000_000.0;
        let ratio = audio_secs / timing.video_duration_secs();
        if ratio.is_finite() && ratio > 0.0 {
            Self(ratio)
        } else {
            log::warn!(
                "SyncFactor invalide ({ratio}) pour audio={audio_secs:.3}s, vidéo={:.3}s, repli sur 1.0",
                timing.video_duration_secs()
            );
            Self::IDENTITY
        }
    }

    /// The ratio, always > 0.
    #[inline]
    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

/// Instant de démarrage de la lecture. Affichage uniquement, jamais utilisé
/// pour les décisions de synchro.
#[derive(Clone, Copy, Debug)]
pub struct SessionClock {
    started: Instant,
}

impl SessionClock {
    /// Start the wall clock now.
    #[must_use]
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Seconds elapsed since [`SessionClock::start`].
    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallbacks_apply_to_non_positive_reports() {
        let t = PlaybackTiming::from_report(-3.0, 0);
        assert_eq!(t.fps, FALLBACK_FPS);
        assert_eq!(t.total_frames, FALLBACK_FRAMES);

        let t = PlaybackTiming::from_report(f64::NAN, 10);
        assert_eq!(t.fps, FALLBACK_FPS);
        assert_eq!(t.total_frames, 10);
    }

    #[test]
    fn reported_values_are_kept() {
        let t = PlaybackTiming::from_report(29.97, 1_800);
        assert!((t.fps - 29.97).abs() < f64::EPSILON);
        assert_eq!(t.total_frames, 1_800);
        assert!((t.video_duration_secs() - 1_800.0 / 29.97).abs() < 1e-9);
    }

    #[test]
    fn sync_factor_is_always_positive() {
        let timing = PlaybackTiming::from_report(24.0, 240);
        assert_eq!(SyncFactor::new(0, &timing), SyncFactor::IDENTITY);
        assert_eq!(SyncFactor::new(-5, &timing), SyncFactor::IDENTITY);
        assert!((SyncFactor::new(5_000_000, &timing).get() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn session_clock_advances() {
        let clock = SessionClock::start();
        assert!(clock.elapsed_secs() >= 0.0);
    }
}
