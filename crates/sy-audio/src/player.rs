use std::path::Path;
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use sy_core::clock::MediaClock;
use sy_core::error::PlaybackError;
use sy_core::traits::{AudioDevice, PlaybackClock};

use crate::decode::{self, DecodedAudio};
use crate::error::AudioError;

/// État du callback de sortie : lit la piste mono à partir de la position
/// de l'horloge et la duplique sur chaque canal.
///
/// `step` = fréquence source / fréquence du périphérique. La position reste
/// exprimée en samples source, donc en temps média.
pub struct OutputCursor {
    samples: Arc<Vec<f32>>,
    clock: Arc<MediaClock>,
    channels: usize,
    step: f64,
    frac: f64,
}

impl OutputCursor {
    /// Curseur au début de `samples`, pour un device à `channels` canaux.
    #[must_use]
    pub fn new(
        samples: Arc<Vec<f32>>,
        clock: Arc<MediaClock>,
        channels: usize,
        source_rate: u32,
        device_rate: u32,
    ) -> Self {
        let step = if device_rate == 0 {
            1.0
        } else {
            f64::from(source_rate) / f64::from(device_rate)
        };
        Self {
            samples,
            clock,
            channels: channels.max(1),
            step,
            frac: 0.0,
        }
    }

    /// Remplit un buffer de sortie entrelacé.
    ///
    /// Silence si l'horloge est arrêtée ou en fin de piste. En fin de piste
    /// l'horloge repasse à l'arrêt.
    pub fn fill(&mut self, data: &mut [f32]) {
        if !self.clock.is_running() {
            data.fill(0.0);
            return;
        }
        let total = self.samples.len();
        let start = self.clock.sample_pos();
        let mut pos = start;

        for frame in data.chunks_mut(self.channels) {
            let sample = self.samples.get(pos).copied().unwrap_or(0.0);
            frame.fill(sample);
            if pos < total {
                self.frac += self.step;
                while self.frac >= 1.0 {
                    self.frac -= 1.0;
                    pos += 1;
                }
            }
        }

        // Un seek concurrent a priorité sur l'avance du callback.
        if !self.clock.advance(start, pos.min(total)) {
            self.frac = 0.0;
            return;
        }
        if pos >= total {
            self.clock.set_running(false);
            log::debug!("Audio: fin de piste");
        }
    }
}

/// Lecteur audio fichier : piste décodée en mémoire, jouée via cpal.
///
/// Créé en pause. La position est l'horloge partagée avec le callback de
/// sortie ; `set_position_micros` est un seek borné à la durée de la piste.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use sy_audio::AudioPlayer;
/// use sy_core::traits::{AudioDevice, PlaybackClock};
///
/// let mut player = AudioPlayer::load(Path::new("audio/audio.wav")).unwrap();
/// player.start();
/// println!("{} µs", player.position_micros());
/// player.close();
/// ```
pub struct AudioPlayer {
    clock: Arc<MediaClock>,
    stream: Option<cpal::Stream>,
}

impl AudioPlayer {
    /// Decode `path` and open a paused output stream on the default device.
    ///
    /// # Errors
    /// [`PlaybackError::CannotLoad`] if decoding or output initialization fails.
    pub fn load(path: &Path) -> Result<Self, PlaybackError> {
        Self::open(path).map_err(|e| PlaybackError::CannotLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    fn open(path: &Path) -> Result<Self, AudioError> {
        let DecodedAudio {
            samples,
            sample_rate,
        } = decode::decode_file(path)?;

        let clock = Arc::new(MediaClock::new(sample_rate, samples.len()));
        let samples = Arc::new(samples);

        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let config = device
            .default_output_config()
            .map_err(|e| AudioError::StreamError(e.to_string()))?;
        let output_config: cpal::StreamConfig = config.into();
        let channels = usize::from(output_config.channels);
        let device_rate = output_config.sample_rate.0;

        let mut cursor = OutputCursor::new(
            Arc::clone(&samples),
            Arc::clone(&clock),
            channels,
            sample_rate,
            device_rate,
        );

        let stream = device
            .build_output_stream(
                &output_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| cursor.fill(data),
                |err| {
                    log::error!("Audio output error: {err}");
                },
                None,
            )
            .map_err(|e| AudioError::StreamError(e.to_string()))?;
        stream
            .pause()
            .map_err(|e| AudioError::StreamError(e.to_string()))?;

        log::info!(
            "Audio chargé: {:.1}s @ {sample_rate}Hz → sortie {channels}ch @ {device_rate}Hz",
            clock.duration_micros() as f64 / 1e6
        );

        Ok(Self {
            clock,
            stream: Some(stream),
        })
    }

    /// Horloge partagée avec le callback.
    #[must_use]
    pub fn clock(&self) -> &Arc<MediaClock> {
        &self.clock
    }
}

impl PlaybackClock for AudioPlayer {
    fn position_micros(&self) -> i64 {
        self.clock.position_micros()
    }

    fn duration_micros(&self) -> i64 {
        self.clock.duration_micros()
    }

    fn is_running(&self) -> bool {
        self.stream.is_some() && self.clock.is_running()
    }
}

impl AudioDevice for AudioPlayer {
    fn start(&mut self) {
        let Some(stream) = self.stream.as_ref() else {
            return;
        };
        self.clock.set_running(true);
        if let Err(e) = stream.play() {
            log::warn!("Audio: play impossible: {e}");
            self.clock.set_running(false);
        }
    }

    fn stop(&mut self) {
        self.clock.set_running(false);
        if let Some(stream) = self.stream.as_ref()
            && let Err(e) = stream.pause()
        {
            log::warn!("Audio: pause impossible: {e}");
        }
    }

    fn close(&mut self) {
        if self.stream.is_some() {
            self.stop();
            self.stream = None;
            log::debug!("Audio: stream fermé");
        }
    }

    fn set_position_micros(&mut self, micros: i64) {
        self.clock.seek_micros(micros);
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(
        samples: Vec<f32>,
        channels: usize,
        src: u32,
        dev: u32,
    ) -> (OutputCursor, Arc<MediaClock>) {
        let clock = Arc::new(MediaClock::new(src, samples.len()));
        let c = OutputCursor::new(Arc::new(samples), Arc::clone(&clock), channels, src, dev);
        (c, clock)
    }

    #[test]
    fn paused_clock_outputs_silence() {
        let (mut c, clock) = cursor(vec![0.5; 16], 2, 100, 100);
        let mut out = vec![1.0; 8];
        c.fill(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(clock.sample_pos(), 0);
    }

    #[test]
    fn mono_sample_is_duplicated_to_every_channel() {
        let (mut c, clock) = cursor(vec![0.1, 0.2, 0.3, 0.4], 2, 100, 100);
        clock.set_running(true);
        let mut out = vec![0.0; 4];
        c.fill(&mut out);
        assert_eq!(out, vec![0.1, 0.1, 0.2, 0.2]);
        assert_eq!(clock.sample_pos(), 2);
    }

    #[test]
    fn end_of_track_stops_the_clock() {
        let (mut c, clock) = cursor(vec![0.25; 3], 1, 100, 100);
        clock.set_running(true);
        let mut out = vec![1.0; 5];
        c.fill(&mut out);
        assert_eq!(out, vec![0.25, 0.25, 0.25, 0.0, 0.0]);
        assert_eq!(clock.sample_pos(), 3);
        assert!(!clock.is_running());
    }

    #[test]
    fn slower_source_holds_each_sample() {
        // Source 24 kHz sur sortie 48 kHz : chaque sample joué deux fois
        let (mut c, clock) = cursor(vec![0.1, 0.2, 0.3], 1, 24_000, 48_000);
        clock.set_running(true);
        let mut out = vec![0.0; 4];
        c.fill(&mut out);
        assert_eq!(out, vec![0.1, 0.1, 0.2, 0.2]);
        assert_eq!(clock.sample_pos(), 2);
    }

    #[test]
    fn playback_resumes_from_seek_position() {
        let (mut c, clock) = cursor((0..10).map(|i| i as f32).collect(), 1, 1_000, 1_000);
        clock.set_running(true);
        clock.seek_micros(5_000);
        let mut out = vec![0.0; 2];
        c.fill(&mut out);
        assert_eq!(out, vec![5.0, 6.0]);
        assert_eq!(clock.position_micros(), 7_000);
    }

    #[test]
    fn missing_file_cannot_load() {
        let err = AudioPlayer::load(Path::new("nope/audio.wav")).err().unwrap();
        assert!(matches!(err, PlaybackError::CannotLoad { .. }));
    }
}
