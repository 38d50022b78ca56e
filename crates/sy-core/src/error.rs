use thiserror::Error;

/// Errors a playback session can report.
///
/// Aucune de ces erreurs ne survit à la session : le menu peut toujours en
/// relancer une nouvelle.
///
/// # Example
/// ```
/// use sy_core::error::PlaybackError;
/// let err = PlaybackError::ResourceMissing { path: "video/video.mp4".into() };
/// assert!(err.to_string().contains("video/video.mp4"));
/// ```
#[derive(Error, Debug)]
pub enum PlaybackError {
    /// Video or audio path does not exist. Playback is not attempted.
    #[error("Fichier introuvable : {path}")]
    ResourceMissing {
        /// Path that was not found.
        path: String,
    },

    /// The decoder failed to initialize.
    #[error("Impossible d'ouvrir la vidéo {path} : {reason}")]
    CannotOpen {
        /// Video path.
        path: String,
        /// Underlying cause.
        reason: String,
    },

    /// The audio adapter failed to initialize.
    #[error("Impossible de charger l'audio {path} : {reason}")]
    CannotLoad {
        /// Audio path.
        path: String,
        /// Underlying cause.
        reason: String,
    },

    /// The decoder returned an empty or unreadable frame mid-stream.
    ///
    /// La session traite ce cas comme une fin de flux naturelle.
    #[error("Frame illisible : {0}")]
    DecodeFault(String),
}

impl PlaybackError {
    /// `true` for failures that happen before the playback loop starts.
    #[must_use]
    pub fn is_setup_failure(&self) -> bool {
        !matches!(self, Self::DecodeFault(_))
    }
}
