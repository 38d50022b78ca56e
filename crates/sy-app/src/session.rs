use std::fmt;
use std::time::Instant;

use sy_ascii::AsciiPipeline;
use sy_core::pacer::{FramePacer, Sleeper, Wake};
use sy_core::sync::{SyncAction, SyncController};
use sy_core::timing::{PlaybackTiming, SessionClock, SyncFactor};
use sy_core::traits::{AudioDevice, Decoder, DisplaySink, StatusLine};

/// Pourquoi la boucle de lecture s'est arrêtée.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EndReason {
    /// Le décodeur n'a plus de frames.
    EndOfStream,
    /// Frame illisible : traité comme une fin de flux.
    DecodeFault(String),
    /// Interruption utilisateur pendant le sommeil du pacer.
    Interrupted,
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EndOfStream => f.write_str("end of stream"),
            Self::DecodeFault(reason) => write!(f, "decode fault ({reason})"),
            Self::Interrupted => f.write_str("interrupted"),
        }
    }
}

/// Bilan d'une session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    /// Frames presented on the display.
    pub frames_presented: u64,
    /// Total frames, after fallback.
    pub total_frames: u64,
    /// Forward seeks applied to the audio device.
    pub seeks: u64,
    /// Why the loop ended.
    pub end: EndReason,
}

impl fmt::Display for SessionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Playback finished: {}/{} frames, {} audio resync(s), {}",
            self.frames_presented, self.total_frames, self.seeks, self.end
        )
    }
}

/// Contexte d'une lecture : pipeline ASCII et tolérance de synchro.
///
/// La session possède la séquence render → sync → present → pace et le
/// teardown ; les ressources (décodeur, audio, affichage, sommeil) sont
/// fournies par l'appelant.
pub struct PlaybackSession {
    pipeline: AsciiPipeline,
    tolerance_micros: i64,
}

impl PlaybackSession {
    /// Session sur une grille `grid_width × grid_height`.
    #[must_use]
    pub fn new(grid_width: u16, grid_height: u16, tolerance_micros: i64) -> Self {
        Self {
            pipeline: AsciiPipeline::new(grid_width, grid_height),
            tolerance_micros,
        }
    }

    /// Run until end of stream, decode fault or interruption.
    ///
    /// Quel que soit le chemin de sortie, l'audio est arrêté puis fermé et
    /// le décodeur libéré avant le retour.
    pub fn run<D, S, P>(
        &mut self,
        decoder: &mut D,
        mut audio: Option<&mut dyn AudioDevice>,
        sink: &mut S,
        sleeper: &mut P,
    ) -> SessionReport
    where
        D: Decoder + ?Sized,
        S: DisplaySink + ?Sized,
        P: Sleeper + ?Sized,
    {
        let timing = PlaybackTiming::from_report(decoder.nominal_fps(), decoder.total_frame_count());
        let factor = audio.as_ref().map_or(SyncFactor::IDENTITY, |a| {
            SyncFactor::new(a.duration_micros(), &timing)
        });
        let sync = SyncController::new(factor, self.tolerance_micros);
        let pacer = FramePacer::new(timing.fps);
        let audio_on = audio.is_some();

        log::info!(
            "Session: {:.3}fps, {} frames, délai {}ms, facteur {:.4}, audio {}",
            timing.fps,
            timing.total_frames,
            pacer.frame_delay().as_millis(),
            factor.get(),
            if audio_on { "ON" } else { "OFF" }
        );

        if let Some(a) = audio.as_deref_mut() {
            a.set_position_micros(0);
            a.start();
        }
        let clock = SessionClock::start();

        let mut frames_presented = 0u64;
        let mut seeks = 0u64;

        let end = loop {
            if !decoder.is_open() {
                break EndReason::EndOfStream;
            }
            let frame = match decoder.read_next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break EndReason::EndOfStream,
                Err(e) => {
                    log::warn!("Lecture interrompue : {e}");
                    break EndReason::DecodeFault(e.to_string());
                }
            };
            let t0 = Instant::now();

            // 1. Rendu
            let text = match self.pipeline.frame_to_text(&frame.buffer) {
                Ok(text) => text,
                Err(e) => {
                    log::warn!("Frame {} inutilisable : {e:#}", frame.index);
                    break EndReason::DecodeFault(format!("{e:#}"));
                }
            };

            // 2. Synchro (index 0-based de la frame courante)
            if let Some(a) = audio.as_deref_mut() {
                let action = sync.correct(frames_presented, timing.fps, a);
                if let SyncAction::Seeked { from, to } = action {
                    seeks += 1;
                    log::debug!("sync frame {frames_presented}: seek {from} → {to} µs");
                } else {
                    log::trace!("sync frame {frames_presented}: {action:?}");
                }
            }

            // 3. Affichage
            frames_presented += 1;
            let status = StatusLine {
                frame: frames_presented,
                total: timing.total_frames,
                elapsed_secs: clock.elapsed_secs(),
                audio_on,
            };
            if let Err(e) = sink.present(&text, &status) {
                log::warn!("Affichage frame {frames_presented} : {e}");
            }

            // 4. Cadence
            if pacer.pace(t0, sleeper) == Wake::Interrupted {
                log::info!("Session interrompue à la frame {frames_presented}");
                break EndReason::Interrupted;
            }
        };

        // Teardown
        if let Some(a) = audio.as_deref_mut() {
            a.stop();
            a.close();
        }
        decoder.release();

        let report = SessionReport {
            frames_presented,
            total_frames: timing.total_frames,
            seeks,
            end,
        };
        log::info!("{report}");
        report
    }
}
