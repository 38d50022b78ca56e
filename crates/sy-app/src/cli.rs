use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sy_core::config::{DisplayMode, PlayerConfig};

use crate::play::PlayRequest;

/// syncscii : lecteur vidéo ASCII synchronisé sur l'horloge audio.
///
/// Sans sous-commande : menu interactif.
#[derive(Parser, Debug)]
#[command(name = "syncscii", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Lire une vidéo (et sa piste audio) une fois, puis quitter.
    Play(PlayArgs),
    /// Afficher le motif de test des glyphes.
    Pattern,
}

#[derive(Args, Debug, Default)]
pub struct PlayArgs {
    /// Vidéo à lire. Défaut : `[playback] video` de la config.
    #[arg(long)]
    pub video: Option<PathBuf>,

    /// Piste audio. Défaut : `[playback] audio` de la config.
    #[arg(long, conflicts_with = "no_audio")]
    pub audio: Option<PathBuf>,

    /// Lecture vidéo seule, cadencée sur le fps nominal.
    #[arg(long, default_value_t = false)]
    pub no_audio: bool,

    /// Sortie console simple (effacement + impression) au lieu du TUI.
    #[arg(long, default_value_t = false)]
    pub plain: bool,
}

impl PlayArgs {
    /// Applique les overrides CLI à la config.
    #[must_use]
    pub fn request(&self, config: &PlayerConfig) -> PlayRequest {
        let mut request = PlayRequest::from_config(config);
        if let Some(ref video) = self.video {
            request.video.clone_from(video);
        }
        if self.no_audio {
            request.audio = None;
        } else if let Some(ref audio) = self.audio {
            request.audio = Some(audio.clone());
        }
        if self.plain {
            request.display = DisplayMode::Plain;
        }
        request
    }
}
