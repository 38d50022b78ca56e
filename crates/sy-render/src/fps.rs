use std::collections::VecDeque;
use std::time::Instant;

/// Compteur FPS par fenêtre glissante sur les frames présentées.
///
/// # Example
/// ```
/// use sy_render::fps::FpsCounter;
/// let mut counter = FpsCounter::new(30);
/// counter.tick();
/// assert!(counter.fps().abs() < f64::EPSILON);
/// ```
pub struct FpsCounter {
    /// Timestamps des dernières N frames.
    timestamps: VecDeque<Instant>,
    window: usize,
    fps: f64,
}

impl FpsCounter {
    /// Create a counter averaging over the last `window` frames (at least 2).
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            timestamps: VecDeque::with_capacity(window + 1),
            window,
            fps: 0.0,
        }
    }

    /// Appeler une fois par frame présentée.
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    fn tick_at(&mut self, now: Instant) {
        self.timestamps.push_back(now);
        if self.timestamps.len() > self.window {
            self.timestamps.pop_front();
        }
        if let Some(&first) = self.timestamps.front() {
            let secs = now.duration_since(first).as_secs_f64();
            if self.timestamps.len() >= 2 && secs > 0.0 {
                self.fps = (self.timestamps.len() - 1) as f64 / secs;
            }
        }
    }

    /// FPS moyen sur la fenêtre.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn steady_ticks_give_nominal_rate() {
        let mut counter = FpsCounter::new(10);
        let t0 = Instant::now();
        for i in 0..25 {
            counter.tick_at(t0 + Duration::from_millis(40 * i));
        }
        assert!((counter.fps() - 25.0).abs() < 0.01, "fps = {}", counter.fps());
    }

    #[test]
    fn window_forgets_old_frames() {
        let mut counter = FpsCounter::new(3);
        let t0 = Instant::now();
        counter.tick_at(t0);
        counter.tick_at(t0 + Duration::from_secs(10));
        counter.tick_at(t0 + Duration::from_millis(10_100));
        counter.tick_at(t0 + Duration::from_millis(10_200));
        assert!((counter.fps() - 10.0).abs() < 0.01);
    }
}
