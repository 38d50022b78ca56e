use std::time::{Duration, Instant};

use flume::{Receiver, RecvTimeoutError};

/// Why a pacing sleep returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wake {
    /// The full interval elapsed.
    Elapsed,
    /// The user interrupted playback during the sleep.
    Interrupted,
}

/// Suspension interruptible, l'unique point d'annulation de la boucle.
pub trait Sleeper {
    /// Sleep for `duration` unless interrupted first.
    fn sleep(&mut self, duration: Duration) -> Wake;
}

/// Maintient la cadence nominale, net du coût de traitement de chaque frame.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use sy_core::pacer::FramePacer;
/// let pacer = FramePacer::new(24.0);
/// assert_eq!(pacer.frame_delay(), Duration::from_millis(41));
/// assert_eq!(pacer.adjusted_delay(Duration::from_millis(30)), Duration::from_millis(11));
/// assert_eq!(pacer.adjusted_delay(Duration::from_secs(3)), Duration::ZERO);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct FramePacer {
    frame_delay: Duration,
}

impl FramePacer {
    /// `1000 / fps` millisecondes, tronqué à la milliseconde.
    #[must_use]
    pub fn new(fps: f64) -> Self {
        let millis = if fps.is_finite() && fps > 0.0 {
            (1000.0 / fps) as u64
        } else {
            0
        };
        Self {
            frame_delay: Duration::from_millis(millis),
        }
    }

    /// Nominal inter-frame interval.
    #[must_use]
    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    /// `max(0, frame_delay - processing)`. Pas de rattrapage si la frame a
    /// coûté plus que l'intervalle.
    #[must_use]
    pub fn adjusted_delay(&self, processing: Duration) -> Duration {
        self.frame_delay.saturating_sub(processing)
    }

    /// Sleep the residual time for a frame whose processing began at `t0`.
    pub fn pace<S: Sleeper + ?Sized>(&self, t0: Instant, sleeper: &mut S) -> Wake {
        let delay = self.adjusted_delay(t0.elapsed());
        if delay.is_zero() {
            log::trace!("pacer: frame en retard, pas de sommeil");
        }
        sleeper.sleep(delay)
    }
}

/// Sleeper réveillé par un signal d'interruption reçu sur un canal `flume`.
///
/// Un canal déconnecté (aucun émetteur) dégrade en sommeil simple.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use sy_core::pacer::{ChannelSleeper, Sleeper, Wake};
///
/// let (tx, rx) = flume::bounded(1);
/// let mut sleeper = ChannelSleeper::new(rx);
/// assert_eq!(sleeper.sleep(Duration::from_millis(1)), Wake::Elapsed);
/// tx.send(()).unwrap();
/// assert_eq!(sleeper.sleep(Duration::from_secs(60)), Wake::Interrupted);
/// ```
pub struct ChannelSleeper {
    interrupts: Receiver<()>,
}

impl ChannelSleeper {
    /// Wrap the receiving end of an interrupt channel.
    #[must_use]
    pub fn new(interrupts: Receiver<()>) -> Self {
        Self { interrupts }
    }
}

impl Sleeper for ChannelSleeper {
    fn sleep(&mut self, duration: Duration) -> Wake {
        if duration.is_zero() {
            // Même sans attente, un signal déjà reçu doit être honoré.
            return match self.interrupts.try_recv() {
                Ok(()) => Wake::Interrupted,
                Err(_) => Wake::Elapsed,
            };
        }
        match self.interrupts.recv_timeout(duration) {
            Ok(()) => Wake::Interrupted,
            Err(RecvTimeoutError::Timeout) => Wake::Elapsed,
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(duration);
                Wake::Elapsed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjusted_delay_is_never_negative() {
        let pacer = FramePacer::new(60.0);
        for ms in [0u64, 1, 16, 17, 100, 10_000] {
            let d = pacer.adjusted_delay(Duration::from_millis(ms));
            assert!(d <= pacer.frame_delay());
        }
        assert_eq!(pacer.adjusted_delay(Duration::MAX), Duration::ZERO);
    }

    #[test]
    fn frame_delay_truncates_to_millis() {
        assert_eq!(FramePacer::new(30.0).frame_delay(), Duration::from_millis(33));
        assert_eq!(FramePacer::new(29.97).frame_delay(), Duration::from_millis(33));
        assert_eq!(FramePacer::new(1.0).frame_delay(), Duration::from_millis(1000));
        assert_eq!(FramePacer::new(0.0).frame_delay(), Duration::ZERO);
    }

    struct Recorder(Vec<Duration>);

    impl Sleeper for Recorder {
        fn sleep(&mut self, duration: Duration) -> Wake {
            self.0.push(duration);
            Wake::Elapsed
        }
    }

    #[test]
    fn pace_sleeps_at_most_one_frame() {
        let pacer = FramePacer::new(24.0);
        let mut rec = Recorder(Vec::new());
        assert_eq!(pacer.pace(Instant::now(), &mut rec), Wake::Elapsed);
        assert_eq!(rec.0.len(), 1);
        assert!(rec.0[0] <= Duration::from_millis(41));
    }

    #[test]
    fn pending_interrupt_wins_over_zero_delay() {
        let (tx, rx) = flume::bounded(1);
        let mut sleeper = ChannelSleeper::new(rx);
        tx.send(()).unwrap();
        assert_eq!(sleeper.sleep(Duration::ZERO), Wake::Interrupted);
        assert_eq!(sleeper.sleep(Duration::ZERO), Wake::Elapsed);
    }

    #[test]
    fn disconnected_channel_degrades_to_plain_sleep() {
        let (tx, rx) = flume::bounded::<()>(1);
        drop(tx);
        let mut sleeper = ChannelSleeper::new(rx);
        assert_eq!(sleeper.sleep(Duration::from_millis(2)), Wake::Elapsed);
    }
}
