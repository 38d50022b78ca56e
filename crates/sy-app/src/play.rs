use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sy_audio::AudioPlayer;
use sy_core::config::{DisplayMode, PlayerConfig};
use sy_core::error::PlaybackError;
use sy_core::pacer::ChannelSleeper;
use sy_core::traits::AudioDevice;
use sy_render::{KeyboardSleeper, PlainSink, TuiSink};
use sy_source::FfmpegDecoder;

use crate::session::{PlaybackSession, SessionReport};
use crate::signal::InterruptHub;

/// Ce qu'une session doit lire, et comment l'afficher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayRequest {
    pub video: PathBuf,
    /// `None` : lecture vidéo seule.
    pub audio: Option<PathBuf>,
    pub display: DisplayMode,
    pub grid_width: u16,
    pub grid_height: u16,
    pub tolerance_micros: i64,
}

impl PlayRequest {
    /// Vidéo + audio configurés, comme l'entrée "Play video" du menu.
    #[must_use]
    pub fn from_config(config: &PlayerConfig) -> Self {
        Self {
            video: config.video_path.clone(),
            audio: Some(config.audio_path.clone()),
            display: config.display,
            grid_width: config.grid_width,
            grid_height: config.grid_height,
            tolerance_micros: config.tolerance_micros,
        }
    }

    /// Vérifie que chaque fichier demandé existe, vidéo d'abord.
    ///
    /// # Errors
    /// [`PlaybackError::ResourceMissing`] for the first missing path.
    pub fn check_resources(&self) -> Result<(), PlaybackError> {
        let paths = std::iter::once(self.video.as_path()).chain(self.audio.as_deref());
        for path in paths {
            ensure_exists(path)?;
        }
        Ok(())
    }
}

fn ensure_exists(path: &Path) -> Result<(), PlaybackError> {
    if path.exists() {
        Ok(())
    } else {
        Err(PlaybackError::ResourceMissing {
            path: path.display().to_string(),
        })
    }
}

/// Ouvre les ressources, joue une session, puis libère tout.
///
/// # Errors
/// Setup failures ([`PlaybackError::ResourceMissing`], `CannotLoad`,
/// `CannotOpen`) or terminal initialization errors. Nothing is played in
/// that case.
pub fn run_play(request: &PlayRequest, interrupts: &InterruptHub) -> Result<SessionReport> {
    request.check_resources()?;
    println!("Starting playback...");

    // Audio d'abord : un échec ici évite de lancer ffmpeg pour rien.
    let mut audio = match request.audio.as_deref() {
        Some(path) => Some(AudioPlayer::load(path)?),
        None => None,
    };
    let mut decoder = FfmpegDecoder::open(&request.video)?;

    let mut session = PlaybackSession::new(
        request.grid_width,
        request.grid_height,
        request.tolerance_micros,
    );
    let audio_dev = audio.as_mut().map(|a| a as &mut dyn AudioDevice);

    let _armed = interrupts.arm();
    let report = match request.display {
        DisplayMode::Tui => {
            let mut sink = TuiSink::new().context("Initialisation du terminal")?;
            let mut sleeper = KeyboardSleeper::new(Some(interrupts.receiver()));
            session.run(&mut decoder, audio_dev, &mut sink, &mut sleeper)
        }
        DisplayMode::Plain => {
            let mut sink = PlainSink::stdout();
            let mut sleeper = ChannelSleeper::new(interrupts.receiver());
            session.run(&mut decoder, audio_dev, &mut sink, &mut sleeper)
        }
    };
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_video_is_reported_first() {
        let request = PlayRequest {
            video: PathBuf::from("no/such/video.mp4"),
            audio: Some(PathBuf::from("no/such/audio.wav")),
            ..PlayRequest::from_config(&PlayerConfig::default())
        };
        let err = request.check_resources().unwrap_err();
        assert_eq!(err.to_string(), "Fichier introuvable : no/such/video.mp4");
    }

    #[test]
    fn missing_audio_blocks_playback() {
        let video = tempfile::NamedTempFile::new().unwrap();
        let request = PlayRequest {
            video: video.path().to_path_buf(),
            audio: Some(PathBuf::from("no/such/audio.wav")),
            ..PlayRequest::from_config(&PlayerConfig::default())
        };
        assert!(matches!(
            request.check_resources(),
            Err(PlaybackError::ResourceMissing { path }) if path.ends_with("audio.wav")
        ));
        let hub = InterruptHub::detached();
        assert!(run_play(&request, &hub).is_err());
    }

    #[test]
    fn video_only_skips_audio_check() {
        let video = tempfile::NamedTempFile::new().unwrap();
        let request = PlayRequest {
            video: video.path().to_path_buf(),
            audio: None,
            ..PlayRequest::from_config(&PlayerConfig::default())
        };
        assert!(request.check_resources().is_ok());
    }
}
