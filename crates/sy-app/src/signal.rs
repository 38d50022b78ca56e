use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use flume::{Receiver, Sender};

/// Vrai uniquement pendant une session de lecture.
static ARMED: AtomicBool = AtomicBool::new(false);

/// Code de sortie conventionnel après SIGINT.
const SIGINT_EXIT: i32 = 130;

/// Route Ctrl+C vers la session en cours.
///
/// Pendant une session, le signal est livré sur un canal `flume` et
/// observé par le sommeil du pacer. Hors session (menu, chargement),
/// il termine le processus comme d'habitude.
pub struct InterruptHub {
    tx: Sender<()>,
    rx: Receiver<()>,
}

impl InterruptHub {
    /// Install the process-wide Ctrl+C handler. Call once.
    ///
    /// # Errors
    /// Returns an error if a handler is already installed.
    pub fn install() -> Result<Self> {
        let hub = Self::detached();
        let tx = hub.tx.clone();
        ctrlc::set_handler(move || {
            if ARMED.load(Ordering::SeqCst) {
                let _ = tx.try_send(());
            } else {
                std::process::exit(SIGINT_EXIT);
            }
        })
        .context("Impossible d'installer le handler Ctrl+C")?;
        Ok(hub)
    }

    /// Hub sans handler système : seul [`InterruptHub::trigger`] l'alimente.
    #[must_use]
    pub fn detached() -> Self {
        let (tx, rx) = flume::bounded(1);
        Self { tx, rx }
    }

    /// Arm for one session; disarmed when the guard drops.
    ///
    /// Un signal resté en attente d'une session précédente est purgé.
    #[must_use]
    pub fn arm(&self) -> ArmGuard {
        while self.rx.try_recv().is_ok() {}
        ARMED.store(true, Ordering::SeqCst);
        ArmGuard { _private: () }
    }

    /// Receiving end, for the session's sleeper.
    #[must_use]
    pub fn receiver(&self) -> Receiver<()> {
        self.rx.clone()
    }

    /// Deliver an interrupt as the handler would.
    #[cfg(test)]
    pub fn trigger(&self) {
        let _ = self.tx.try_send(());
    }
}

/// Désarme le handler au drop.
pub struct ArmGuard {
    _private: (),
}

impl ArmGuard {
    #[cfg(test)]
    #[must_use]
    pub fn is_armed(&self) -> bool {
        ARMED.load(Ordering::SeqCst)
    }
}

impl Drop for ArmGuard {
    fn drop(&mut self) {
        ARMED.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arming_purges_stale_interrupts_and_disarms_on_drop() {
        let hub = InterruptHub::detached();
        hub.trigger();
        {
            let guard = hub.arm();
            assert!(guard.is_armed());
            assert!(hub.receiver().try_recv().is_err());
            hub.trigger();
            assert!(hub.receiver().try_recv().is_ok());
        }
        assert!(!ARMED.load(Ordering::SeqCst));
    }
}
