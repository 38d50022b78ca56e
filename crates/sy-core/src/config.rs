use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::frame::LumaGrid;
use crate::sync::DEFAULT_TOLERANCE_MICROS;

/// Configuration complète du lecteur.
///
/// Lue depuis TOML par sections optionnelles. Chaque champ a une valeur
/// par défaut saine.
///
/// # Example
/// ```
/// use sy_core::config::PlayerConfig;
/// let config = PlayerConfig::default();
/// assert_eq!((config.grid_width, config.grid_height), (80, 30));
/// assert_eq!(config.tolerance_micros, 100_000);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerConfig {
    // === Lecture ===
    /// Fichier vidéo lu par l'entrée "Play video" du menu.
    pub video_path: PathBuf,
    /// Piste audio associée.
    pub audio_path: PathBuf,
    /// Sortie terminal.
    pub display: DisplayMode,

    // === Rendu ===
    /// Largeur de la grille de rendu, en caractères.
    pub grid_width: u16,
    /// Hauteur de la grille de rendu, en caractères.
    pub grid_height: u16,

    // === Synchro ===
    /// Retard audio toléré avant un seek correctif, en microsecondes.
    pub tolerance_micros: i64,
}

/// Terminal output style.
///
/// # Example
/// ```
/// use sy_core::config::DisplayMode;
/// assert!(matches!(DisplayMode::default(), DisplayMode::Tui));
/// ```
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
pub enum DisplayMode {
    /// ratatui alternate screen with a status bar.
    #[default]
    Tui,
    /// Clear-and-print console output.
    Plain,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            video_path: PathBuf::from("video/video.mp4"),
            audio_path: PathBuf::from("audio/audio.wav"),
            display: DisplayMode::Tui,
            grid_width: LumaGrid::DEFAULT_WIDTH,
            grid_height: LumaGrid::DEFAULT_HEIGHT,
            tolerance_micros: DEFAULT_TOLERANCE_MICROS,
        }
    }
}

impl PlayerConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.grid_width = self.grid_width.clamp(8, 400);
        self.grid_height = self.grid_height.clamp(4, 200);
        self.tolerance_micros = self.tolerance_micros.clamp(0, 10_000_000);
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    playback: Option<PlaybackSection>,
    render: Option<RenderSection>,
    sync: Option<SyncSection>,
}

#[derive(Deserialize)]
struct PlaybackSection {
    video: Option<PathBuf>,
    audio: Option<PathBuf>,
    display: Option<DisplayMode>,
}

#[derive(Deserialize)]
struct RenderSection {
    width: Option<u16>,
    height: Option<u16>,
}

#[derive(Deserialize)]
struct SyncSection {
    tolerance_micros: Option<i64>,
}

/// Parse TOML text and merge it over the defaults.
///
/// # Errors
/// Returns an error if the text is not valid TOML for this schema.
///
/// # Example
/// ```
/// use sy_core::config::{parse_config, DisplayMode};
/// let config = parse_config("[playback]\ndisplay = \"Plain\"\n").unwrap();
/// assert_eq!(config.display, DisplayMode::Plain);
/// assert_eq!(config.grid_width, 80);
/// ```
pub fn parse_config(content: &str) -> Result<PlayerConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = PlayerConfig::default();

    if let Some(p) = file.playback {
        if let Some(v) = p.video {
            config.video_path = v;
        }
        if let Some(v) = p.audio {
            config.audio_path = v;
        }
        if let Some(v) = p.display {
            config.display = v;
        }
    }
    if let Some(r) = file.render {
        if let Some(v) = r.width {
            config.grid_width = v;
        }
        if let Some(v) = r.height {
            config.grid_height = v;
        }
    }
    if let Some(v) = file.sync.and_then(|s| s.tolerance_micros) {
        config.tolerance_micros = v;
    }

    config.clamp_all();
    Ok(config)
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
/// ```no_run
/// use sy_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<PlayerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Config invalide : {}", path.display()))
}

/// Charge `path` s'il existe, sinon les défauts.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_or_default(path: &Path) -> Result<PlayerConfig> {
    if path.exists() {
        load_config(path)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            path.display()
        );
        Ok(PlayerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_is_all_defaults() {
        assert_eq!(parse_config("").unwrap(), PlayerConfig::default());
    }

    #[test]
    fn shipped_default_file_matches_defaults() {
        let content = include_str!("../../../config/default.toml");
        assert_eq!(parse_config(content).unwrap(), PlayerConfig::default());
    }

    #[test]
    fn sections_override_defaults() {
        let config = parse_config(
            r#"
[playback]
video = "clips/a.mkv"
audio = "clips/a.flac"

[render]
width = 120

[sync]
tolerance_micros = 40000
"#,
        )
        .unwrap();
        assert_eq!(config.video_path, PathBuf::from("clips/a.mkv"));
        assert_eq!(config.audio_path, PathBuf::from("clips/a.flac"));
        assert_eq!(config.grid_width, 120);
        assert_eq!(config.grid_height, 30);
        assert_eq!(config.tolerance_micros, 40_000);
        assert_eq!(config.display, DisplayMode::Tui);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let config =
            parse_config("[render]\nwidth = 2\nheight = 9000\n[sync]\ntolerance_micros = -5\n")
                .unwrap();
        assert_eq!(config.grid_width, 8);
        assert_eq!(config.grid_height, 200);
        assert_eq!(config.tolerance_micros, 0);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_config("[render\nwidth = ").is_err());
        assert!(parse_config("[render]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn load_from_disk_and_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[playback]\ndisplay = \"Plain\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.display, DisplayMode::Plain);

        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert_eq!(load_or_default(&missing).unwrap(), PlayerConfig::default());
    }
}
