use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::Print;
use crossterm::terminal::{Clear, ClearType};
use crossterm::queue;
use ratatui::DefaultTerminal;
use sy_core::traits::{DisplaySink, StatusLine};

use crate::fps::FpsCounter;
use crate::ui;

/// Sink ratatui : écran alternatif, raw mode, canvas encadré + statut.
///
/// Le terminal est restauré au drop, quel que soit le chemin de sortie.
pub struct TuiSink {
    terminal: DefaultTerminal,
    fps_counter: FpsCounter,
}

impl TuiSink {
    /// Enter the alternate screen and raw mode.
    ///
    /// # Errors
    /// Returns the terminal I/O error if initialization fails.
    pub fn new() -> io::Result<Self> {
        let terminal = ratatui::try_init()?;
        log::debug!("TuiSink: terminal initialisé");
        Ok(Self {
            terminal,
            fps_counter: FpsCounter::new(30),
        })
    }
}

impl DisplaySink for TuiSink {
    fn present(&mut self, text: &str, status: &StatusLine) -> io::Result<()> {
        let Self {
            terminal,
            fps_counter,
        } = self;
        fps_counter.tick();
        terminal.draw(|frame| ui::draw(frame, text, status, fps_counter))?;
        Ok(())
    }
}

impl Drop for TuiSink {
    fn drop(&mut self) {
        ratatui::restore();
        log::debug!("TuiSink: terminal restauré");
    }
}

/// Sink console classique : curseur en haut à gauche, effacement, texte, statut.
///
/// # Example
/// ```
/// use sy_core::traits::{DisplaySink, StatusLine};
/// use sy_render::PlainSink;
///
/// let mut sink = PlainSink::new(Vec::new());
/// let status = StatusLine { frame: 1, total: 2, elapsed_secs: 0.0, audio_on: false };
/// sink.present(" @\n", &status).unwrap();
/// let out = String::from_utf8(sink.into_inner()).unwrap();
/// assert!(out.ends_with(" @\nFrame: 1/2 | Time: 0.0s\n"));
/// ```
pub struct PlainSink<W: Write> {
    out: W,
}

impl<W: Write> PlainSink<W> {
    /// Sortie console vers `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Récupère le writer sous-jacent.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl PlainSink<io::Stdout> {
    /// Sink on standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> DisplaySink for PlainSink<W> {
    fn present(&mut self, text: &str, status: &StatusLine) -> io::Result<()> {
        queue!(
            self.out,
            MoveTo(0, 0),
            Clear(ClearType::All),
            Print(text),
            Print(status),
            Print("\n")
        )?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_sink_clears_then_writes_frame_and_status() {
        let mut sink = PlainSink::new(Vec::new());
        let status = StatusLine {
            frame: 7,
            total: 9,
            elapsed_secs: 1.26,
            audio_on: true,
        };
        sink.present("ab\ncd\n", &status).unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let home = out.find("\x1b[1;1H").unwrap();
        let clear = out.find("\x1b[2J").unwrap();
        let body = out.find("ab\ncd\n").unwrap();
        assert!(home < clear && clear < body);
        assert!(out.ends_with("Frame: 7/9 | Time: 1.3s | Audio: ON\n"));
    }

    struct Failing;

    impl Write for Failing {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "fermé"))
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn plain_sink_reports_write_errors() {
        let mut sink = PlainSink::new(Failing);
        let status = StatusLine {
            frame: 1,
            total: 1,
            elapsed_secs: 0.0,
            audio_on: false,
        };
        assert!(sink.present("x\n", &status).is_err());
    }
}
