use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use flume::Receiver;
use sy_core::pacer::{Sleeper, Wake};

/// Granularité max d'un poll : borne la latence de réaction au canal d'interruption.
const POLL_SLICE: Duration = Duration::from_millis(20);

/// `q`, `Esc` ou Ctrl+C : arrêt de la lecture.
///
/// # Example
/// ```
/// use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
/// use sy_render::input::is_quit_key;
/// assert!(is_quit_key(&KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)));
/// assert!(!is_quit_key(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE)));
/// ```
#[must_use]
pub fn is_quit_key(key: &KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    match key.code {
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => key.modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Sleeper pour le mode TUI (terminal en raw mode).
///
/// En raw mode Ctrl+C n'émet plus SIGINT : il arrive comme un événement
/// clavier. Le sommeil poll donc les événements crossterm jusqu'à
/// l'échéance, et surveille aussi le canal d'interruption s'il existe.
pub struct KeyboardSleeper {
    interrupts: Option<Receiver<()>>,
}

impl KeyboardSleeper {
    /// `interrupts` : canal Ctrl+C optionnel, vérifié entre deux polls.
    #[must_use]
    pub fn new(interrupts: Option<Receiver<()>>) -> Self {
        Self { interrupts }
    }

    fn interrupted_by_signal(&self) -> bool {
        self.interrupts
            .as_ref()
            .is_some_and(|rx| rx.try_recv().is_ok())
    }

    /// Consomme les événements en attente pendant au plus `timeout`.
    fn poll_quit(timeout: Duration) -> std::io::Result<bool> {
        if !event::poll(timeout)? {
            return Ok(false);
        }
        // Vider tout ce qui est déjà arrivé
        loop {
            if let Event::Key(key) = event::read()?
                && is_quit_key(&key)
            {
                return Ok(true);
            }
            if !event::poll(Duration::ZERO)? {
                return Ok(false);
            }
        }
    }
}

impl Sleeper for KeyboardSleeper {
    fn sleep(&mut self, duration: Duration) -> Wake {
        let deadline = Instant::now() + duration;
        loop {
            if self.interrupted_by_signal() {
                return Wake::Interrupted;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            match Self::poll_quit(remaining.min(POLL_SLICE)) {
                Ok(true) => return Wake::Interrupted,
                Ok(false) => {}
                Err(e) => {
                    log::warn!("poll clavier impossible: {e}");
                    std::thread::sleep(remaining);
                    return Wake::Elapsed;
                }
            }
            if Instant::now() >= deadline {
                return Wake::Elapsed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_keys() {
        let press = |code, mods| KeyEvent::new(code, mods);
        assert!(is_quit_key(&press(KeyCode::Char('q'), KeyModifiers::NONE)));
        assert!(is_quit_key(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!is_quit_key(&press(KeyCode::Char(' '), KeyModifiers::NONE)));
        assert!(!is_quit_key(&press(KeyCode::Enter, KeyModifiers::NONE)));

        let mut release = press(KeyCode::Char('q'), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert!(!is_quit_key(&release));
    }
}
