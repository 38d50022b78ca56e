use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use crate::traits::PlaybackClock;

/// Horloge partagée pour la synchronisation A/V.
///
/// L'audio est le maître : le callback cpal écrit `sample_pos` à chaque buffer.
/// La boucle de rendu lit `position_micros()` et peut la déplacer (seek).
///
/// Tous les champs sont atomiques : zero-alloc, zero-lock, `Send + Sync`.
///
/// # Example
/// ```
/// use sy_core::clock::MediaClock;
/// use sy_core::traits::PlaybackClock;
/// let clock = MediaClock::new(48_000, 96_000);
/// assert!(!clock.is_running());
/// assert_eq!(clock.duration_micros(), 2_000_000);
/// clock.set_running(true);
/// assert!(clock.is_running());
/// ```
pub struct MediaClock {
    /// Position de lecture en samples (mono, source rate).
    sample_pos: AtomicUsize,
    /// Sample rate source.
    sample_rate: AtomicU32,
    /// Longueur totale de la piste en samples.
    total_samples: AtomicUsize,
    /// `true` tant que la sortie joue.
    running: AtomicBool,
}

impl MediaClock {
    /// Crée une horloge arrêtée, position 0.
    #[must_use]
    pub fn new(sample_rate: u32, total_samples: usize) -> Self {
        Self {
            sample_pos: AtomicUsize::new(0),
            sample_rate: AtomicU32::new(sample_rate),
            total_samples: AtomicUsize::new(total_samples),
            running: AtomicBool::new(false),
        }
    }

    /// Position courante en secondes, dérivée de `sample_pos / sample_rate`.
    #[inline]
    #[must_use]
    pub fn pos_secs(&self) -> f64 {
        let rate = self.sample_rate.load(Ordering::Relaxed);
        if rate == 0 {
            return 0.0;
        }
        self.sample_pos.load(Ordering::Relaxed) as f64 / f64::from(rate)
    }

    /// Sample rate source.
    #[inline]
    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate.load(Ordering::Relaxed)
    }

    /// Longueur totale en samples.
    #[inline]
    #[must_use]
    pub fn total_samples(&self) -> usize {
        self.total_samples.load(Ordering::Relaxed)
    }

    /// Position courante en samples.
    #[inline]
    #[must_use]
    pub fn sample_pos(&self) -> usize {
        self.sample_pos.load(Ordering::Relaxed)
    }

    /// Met à jour la position en samples (appelé par le callback cpal).
    #[inline]
    pub fn set_sample_pos(&self, pos: usize) {
        self.sample_pos.store(pos, Ordering::Relaxed);
    }

    /// Avance la position de `from` à `to`, sauf si un seek l'a modifiée entre-temps.
    ///
    /// Retourne `false` si la position n'était plus `from` (le seek gagne).
    ///
    /// # Example
    /// ```
    /// use sy_core::clock::MediaClock;
    /// let clock = MediaClock::new(1_000, 5_000);
    /// assert!(clock.advance(0, 256));
    /// clock.set_sample_pos(4_000);
    /// assert!(!clock.advance(256, 512));
    /// assert_eq!(clock.sample_pos(), 4_000);
    /// ```
    #[inline]
    pub fn advance(&self, from: usize, to: usize) -> bool {
        self.sample_pos
            .compare_exchange(from, to, Ordering::AcqRel, Ordering::Relaxed)
            .is_ok()
    }

    /// Seek to `micros`, clamped to `[0, total]`.
    ///
    /// # Example
    /// ```
    /// use sy_core::clock::MediaClock;
    /// use sy_core::traits::PlaybackClock;
    /// let clock = MediaClock::new(1_000, 5_000);
    /// clock.seek_micros(2_500_000);
    /// assert_eq!(clock.sample_pos(), 2_500);
    /// clock.seek_micros(99_000_000);
    /// assert_eq!(clock.sample_pos(), 5_000);
    /// clock.seek_micros(-3);
    /// assert_eq!(clock.position_micros(), 0);
    /// ```
    pub fn seek_micros(&self, micros: i64) {
        let rate = u64::from(self.sample_rate());
        let micros = u64::try_from(micros).unwrap_or(0);
        let pos = (u128::from(micros) * u128::from(rate) / 1_000_000) as usize;
        self.set_sample_pos(pos.min(self.total_samples()));
    }

    /// Démarre / arrête l'horloge.
    #[inline]
    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Relaxed);
    }

    /// `true` once the position reached the end of the track.
    #[inline]
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.sample_pos() >= self.total_samples()
    }

    fn samples_to_micros(&self, samples: usize) -> i64 {
        let rate = self.sample_rate();
        if rate == 0 {
            return 0;
        }
        (samples as u128 * 1_000_000 / u128::from(rate)) as i64
    }
}

impl PlaybackClock for MediaClock {
    fn position_micros(&self) -> i64 {
        self.samples_to_micros(self.sample_pos())
    }

    fn duration_micros(&self) -> i64 {
        self.samples_to_micros(self.total_samples())
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed) && !self.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_basic_operations() {
        let clock = MediaClock::new(48_000, 480_000);
        assert!(!clock.is_running());
        assert_eq!(clock.sample_pos(), 0);

        clock.set_sample_pos(48_000);
        assert!((clock.pos_secs() - 1.0).abs() < 0.001);
        assert_eq!(clock.position_micros(), 1_000_000);

        clock.set_running(true);
        assert!(clock.is_running());
    }

    #[test]
    fn clock_zero_sample_rate() {
        let clock = MediaClock::new(0, 10);
        assert_eq!(clock.pos_secs(), 0.0);
        assert_eq!(clock.position_micros(), 0);
        assert_eq!(clock.duration_micros(), 0);
    }

    #[test]
    fn finished_clock_is_not_running() {
        let clock = MediaClock::new(100, 100);
        clock.set_running(true);
        clock.set_sample_pos(100);
        assert!(clock.is_finished());
        assert!(!clock.is_running());
    }

    #[test]
    fn seek_round_trips_through_micros() {
        let clock = MediaClock::new(44_100, 44_100 * 20);
        clock.seek_micros(6_600_000);
        assert_eq!(clock.sample_pos(), 291_060);
        assert_eq!(clock.position_micros(), 6_600_000);
    }
}
