// Décodage via ffmpeg en subprocess (std::process::Command).
// Prérequis : `ffmpeg` et `ffprobe` accessibles dans PATH.
//
// Architecture :
//   - `probe_video`       : interroge ffprobe (dimensions, fps, nombre de frames)
//   - `spawn_ffmpeg_pipe` : lance ffmpeg → flux raw RGBA sur stdout
//   - `FrameReader`       : découpe le flux en frames indexées
//   - `FfmpegDecoder`     : implémente `Decoder` pour la boucle de lecture

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use sy_core::error::PlaybackError;
use sy_core::frame::{Frame, FrameBuffer};
use sy_core::traits::Decoder;

/// Cap de la résolution de travail : 1920×800@24fps ≈ 142 MB/s sur le pipe,
/// 640×360@24fps ≈ 21 MB/s. La grille de rendu est de toute façon bien plus petite.
pub const MAX_WORK_WIDTH: u32 = 640;

/// See [`MAX_WORK_WIDTH`].
pub const MAX_WORK_HEIGHT: u32 = 360;

/// Métadonnées extraites via ffprobe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    /// Images par seconde (ex: 23.976, 24.0, 30.0). 0.0 si inconnu.
    pub fps: f64,
    /// Nombre de frames annoncé, -1 si inconnu.
    pub frame_count: i64,
}

impl VideoInfo {
    /// Résolution du pipe ffmpeg : native, plafonnée à 640×360.
    ///
    /// # Example
    /// ```
    /// use sy_source::video::VideoInfo;
    /// let info = VideoInfo { width: 1920, height: 1080, fps: 24.0, frame_count: 240 };
    /// assert_eq!(info.work_size(), (640, 360));
    /// ```
    #[must_use]
    pub fn work_size(&self) -> (u32, u32) {
        (
            self.width.min(MAX_WORK_WIDTH),
            self.height.min(MAX_WORK_HEIGHT),
        )
    }
}

/// Parse `r_frame_rate` : "24/1", "30000/1001" ou "25".
///
/// Retourne 0.0 pour un dénominateur nul ou une valeur illisible.
///
/// # Example
/// ```
/// use sy_source::video::parse_frame_rate;
/// assert!((parse_frame_rate("30000/1001") - 29.97).abs() < 0.01);
/// assert_eq!(parse_frame_rate("0/0"), 0.0);
/// ```
#[must_use]
pub fn parse_frame_rate(val: &str) -> f64 {
    let mut parts = val.trim().splitn(2, '/');
    let num: f64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(0.0);
    let den: f64 = parts.next().and_then(|s| s.parse().ok()).unwrap_or(1.0);
    if den > 0.0 && num.is_finite() {
        num / den
    } else {
        0.0
    }
}

/// Parse la sortie `key=value` de ffprobe.
///
/// `nb_frames` absent ou "N/A" : repli sur `round(duration * fps)`, sinon -1.
///
/// # Errors
/// Retourne une erreur si aucune largeur/hauteur valide n'est présente
/// (pas de flux vidéo).
pub fn parse_probe(text: &str) -> Result<VideoInfo> {
    let mut width: Option<u32> = None;
    let mut height: Option<u32> = None;
    let mut fps = 0.0;
    let mut nb_frames: Option<i64> = None;
    let mut duration: Option<f64> = None;

    for line in text.lines() {
        let Some((key, val)) = line.split_once('=') else {
            continue;
        };
        let val = val.trim();
        match key.trim() {
            "width" => width = val.parse().ok(),
            "height" => height = val.parse().ok(),
            "r_frame_rate" => fps = parse_frame_rate(val),
            "nb_frames" => nb_frames = val.parse().ok(),
            "duration" => duration = val.parse().ok().filter(|d: &f64| d.is_finite()),
            _ => {}
        }
    }

    let (Some(width), Some(height)) = (width, height) else {
        anyhow::bail!("aucun flux vidéo (width/height absents)");
    };
    if width == 0 || height == 0 {
        anyhow::bail!("flux vidéo de taille nulle ({width}x{height})");
    }

    let frame_count = match (nb_frames, duration) {
        (Some(n), _) if n > 0 => n,
        (_, Some(d)) if d > 0.0 && fps > 0.0 => (d * fps).round() as i64,
        _ => -1,
    };

    Ok(VideoInfo {
        width,
        height,
        fps,
        frame_count,
    })
}

/// Interroge `ffprobe` pour obtenir les métadonnées du flux vidéo principal.
///
/// # Errors
/// Retourne une erreur si `ffprobe` est introuvable ou si le fichier
/// ne contient aucun flux vidéo décodable.
pub fn probe_video(path: &Path) -> Result<VideoInfo> {
    let path_str = path.to_str().context("Chemin vidéo invalide (non-UTF8)")?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,r_frame_rate,nb_frames:format=duration",
            "-of",
            "default=noprint_wrappers=1",
            "-i",
            path_str,
        ])
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .context(
            "Impossible de lancer ffprobe. Vérifiez que ffprobe est installé et dans le PATH.",
        )?;

    let info = parse_probe(&String::from_utf8_lossy(&output.stdout))
        .with_context(|| format!("ffprobe: {}", path.display()))?;

    log::info!(
        "probe_video: {}x{} @ {:.3}fps, {} frames, {}",
        info.width,
        info.height,
        info.fps,
        info.frame_count,
        path.display()
    );
    Ok(info)
}

/// Lance un processus `ffmpeg` qui écrit des frames RGBA brutes sur stdout.
///
/// Chaque frame = `w × h × 4` bytes (RGBA row-major, sans padding).
/// `-an` supprime l'audio (géré séparément par symphonia).
///
/// # Errors
/// Retourne une erreur si le chemin n'est pas UTF-8 ou si le spawn échoue.
pub fn spawn_ffmpeg_pipe(path: &Path, w: u32, h: u32) -> Result<Child> {
    let path_str = path.to_str().context("Chemin vidéo invalide (non-UTF8)")?;
    // `area` : moyenne des pixels couverts en réduction.
    let scale_filter = format!("scale={w}:{h}:flags=area");

    let child = Command::new("ffmpeg")
        .args([
            "-i",
            path_str,
            "-vf",
            &scale_filter,
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-an",
            "-hide_banner",
            "-loglevel",
            "error",
            "pipe:1",
        ])
        .stdout(Stdio::piped())
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("Impossible de lancer ffmpeg. Vérifiez qu'il est installé et dans le PATH.")?;

    log::debug!("ffmpeg spawné: {w}x{h} depuis {}", path.display());
    Ok(child)
}

/// Lit exactement `buf.len()` bytes depuis `reader`.
///
/// # Errors
/// Retourne `Ok(true)` si lu avec succès, `Ok(false)` sur EOF avant complétion,
/// `Err` sur erreur I/O fatale.
pub fn read_exact_or_eof<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<bool> {
    let mut total = 0usize;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => return Ok(false),
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(true)
}

/// Découpe un flux RGBA brut en frames `width × height` numérotées.
pub struct FrameReader<R> {
    reader: R,
    width: u32,
    height: u32,
    next_index: u64,
}

impl<R: Read> FrameReader<R> {
    /// Lecteur de frames `width × height`, index de départ 0.
    pub fn new(reader: R, width: u32, height: u32) -> Self {
        Self {
            reader,
            width,
            height,
            next_index: 0,
        }
    }

    /// Frames lues jusqu'ici.
    #[must_use]
    pub fn frames_read(&self) -> u64 {
        self.next_index
    }

    /// Prochaine frame, `Ok(None)` sur EOF (y compris une frame tronquée en fin de pipe).
    ///
    /// # Errors
    /// [`PlaybackError::DecodeFault`] on an I/O error mid-stream.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, PlaybackError> {
        let mut buffer = FrameBuffer::new(self.width, self.height);
        if buffer.is_empty() {
            return Err(PlaybackError::DecodeFault(format!(
                "frame vide ({}x{})",
                self.width, self.height
            )));
        }
        match read_exact_or_eof(&mut self.reader, &mut buffer.data) {
            Ok(true) => {
                let frame = Frame {
                    index: self.next_index,
                    buffer,
                };
                self.next_index += 1;
                Ok(Some(frame))
            }
            Ok(false) => Ok(None),
            Err(e) => Err(PlaybackError::DecodeFault(format!(
                "lecture pipe à la frame {}: {e}",
                self.next_index
            ))),
        }
    }
}

/// Décodeur vidéo adossé à un subprocess `ffmpeg`.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use sy_core::traits::Decoder;
/// use sy_source::FfmpegDecoder;
///
/// let mut dec = FfmpegDecoder::open(Path::new("video/video.mp4")).unwrap();
/// while let Ok(Some(frame)) = dec.read_next_frame() {
///     println!("frame {}", frame.index);
/// }
/// dec.release();
/// ```
pub struct FfmpegDecoder {
    info: VideoInfo,
    child: Option<Child>,
    frames: Option<FrameReader<ChildStdout>>,
}

impl FfmpegDecoder {
    /// Probe `path` then start the ffmpeg pipe.
    ///
    /// # Errors
    /// [`PlaybackError::CannotOpen`] if ffprobe/ffmpeg fail or the file has no video stream.
    pub fn open(path: &Path) -> Result<Self, PlaybackError> {
        let cannot_open = |e: anyhow::Error| PlaybackError::CannotOpen {
            path: path.display().to_string(),
            reason: format!("{e:#}"),
        };

        let info = probe_video(path).map_err(cannot_open)?;
        let (w, h) = info.work_size();
        let mut child = spawn_ffmpeg_pipe(path, w, h).map_err(cannot_open)?;
        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(cannot_open(anyhow::anyhow!("stdout ffmpeg indisponible")));
        };

        Ok(Self {
            info,
            child: Some(child),
            frames: Some(FrameReader::new(stdout, w, h)),
        })
    }

    /// Métadonnées du flux.
    #[must_use]
    pub fn info(&self) -> &VideoInfo {
        &self.info
    }

    /// Ferme le pipe puis récupère le statut du process.
    ///
    /// Retourne `Some(false)` si ffmpeg a échoué.
    fn reap(&mut self, kill: bool) -> Option<bool> {
        self.frames = None;
        let mut child = self.child.take()?;
        if kill {
            let _ = child.kill();
        }
        match child.wait() {
            Ok(status) => Some(status.success()),
            Err(e) => {
                log::warn!("ffmpeg: wait impossible: {e}");
                None
            }
        }
    }
}

impl Decoder for FfmpegDecoder {
    fn is_open(&self) -> bool {
        self.frames.is_some()
    }

    fn nominal_fps(&self) -> f64 {
        self.info.fps
    }

    fn total_frame_count(&self) -> i64 {
        self.info.frame_count
    }

    fn read_next_frame(&mut self) -> Result<Option<Frame>, PlaybackError> {
        let Some(frames) = self.frames.as_mut() else {
            return Ok(None);
        };
        match frames.next_frame() {
            Ok(Some(frame)) => Ok(Some(frame)),
            Ok(None) => {
                let read = frames.frames_read();
                log::info!("ffmpeg: EOF après {read} frames");
                // Pipe fermé sans aucune frame : ffmpeg n'a rien pu décoder.
                if self.reap(false) == Some(false) && read == 0 {
                    return Err(PlaybackError::DecodeFault(
                        "ffmpeg s'est terminé en erreur sans produire de frame".into(),
                    ));
                }
                Ok(None)
            }
            Err(e) => {
                self.reap(true);
                Err(e)
            }
        }
    }

    fn release(&mut self) {
        if self.child.is_some() {
            self.reap(true);
            log::debug!("ffmpeg: process libéré");
        }
    }
}

impl Drop for FfmpegDecoder {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn probe_with_frame_count() {
        let text = "width=1280\nheight=720\nr_frame_rate=24/1\nnb_frames=240\nduration=10.000000\n";
        let info = parse_probe(text).unwrap();
        assert_eq!(
            info,
            VideoInfo {
                width: 1280,
                height: 720,
                fps: 24.0,
                frame_count: 240
            }
        );
        assert_eq!(info.work_size(), (640, 360));
    }

    #[test]
    fn probe_falls_back_to_duration() {
        let text = "width=320\nheight=240\nr_frame_rate=25/1\nnb_frames=N/A\nduration=4.04\n";
        let info = parse_probe(text).unwrap();
        assert_eq!(info.frame_count, 101);
        assert_eq!(info.work_size(), (320, 240));
    }

    #[test]
    fn probe_unknown_count_is_negative() {
        let text = "width=320\nheight=240\nr_frame_rate=0/0\nnb_frames=N/A\nduration=N/A\n";
        let info = parse_probe(text).unwrap();
        assert_eq!(info.fps, 0.0);
        assert_eq!(info.frame_count, -1);
    }

    #[test]
    fn probe_without_video_stream_fails() {
        assert!(parse_probe("").is_err());
        assert!(parse_probe("duration=3.0\n").is_err());
        assert!(parse_probe("width=0\nheight=0\n").is_err());
    }

    #[test]
    fn frame_rate_forms() {
        assert_eq!(parse_frame_rate("24/1"), 24.0);
        assert_eq!(parse_frame_rate("25"), 25.0);
        assert_eq!(parse_frame_rate("abc"), 0.0);
        assert_eq!(parse_frame_rate("30/0"), 0.0);
    }

    #[test]
    fn reader_splits_frames_and_stops_on_short_tail() {
        // 2 frames 2×1 complètes + 3 bytes résiduels
        let mut bytes: Vec<u8> = (0..16).collect();
        bytes.extend_from_slice(&[1, 2, 3]);
        let mut reader = FrameReader::new(Cursor::new(bytes), 2, 1);

        let first = reader.next_frame().unwrap().unwrap();
        assert_eq!(first.index, 0);
        assert_eq!(first.buffer.data, (0..8).collect::<Vec<u8>>());
        let second = reader.next_frame().unwrap().unwrap();
        assert_eq!(second.index, 1);
        assert!(reader.next_frame().unwrap().is_none());
        assert_eq!(reader.frames_read(), 2);
    }

    #[test]
    fn reader_maps_io_error_to_decode_fault() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("pipe cassé"))
            }
        }
        let mut reader = FrameReader::new(Broken, 4, 4);
        assert!(matches!(
            reader.next_frame(),
            Err(PlaybackError::DecodeFault(_))
        ));
    }

    #[test]
    fn open_missing_file_is_cannot_open() {
        let err = FfmpegDecoder::open(Path::new("definitely/not/here.mp4"))
            .err()
            .unwrap();
        assert!(matches!(err, PlaybackError::CannotOpen { .. }));
    }
}
