//! Playing saved audio files, through ffplay when available and the default
//! output device otherwise.

#[cfg(feature = "playback")]
pub mod device;

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::{Result, TypecastError};

const FFMPEG_HINT: &str =
    "Install ffmpeg with 'brew install ffmpeg' (Mac), your package manager (Linux) or from https://ffmpeg.org/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackMethod {
    Ffplay,
    Device { name: String },
}

impl std::fmt::Display for PlaybackMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ffplay => write!(f, "ffplay"),
            Self::Device { name } => write!(f, "output device ({name})"),
        }
    }
}

#[derive(Debug)]
enum FfplayFailure {
    NotInstalled,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct AudioPlayer {
    ffplay: OsString,
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self {
            ffplay: OsString::from("ffplay"),
        }
    }
}

impl AudioPlayer {
    /// Use a different program in place of `ffplay`. It is invoked with
    /// ffplay's arguments and fed the audio on stdin.
    pub fn with_ffplay_program(program: impl Into<OsString>) -> Self {
        Self {
            ffplay: program.into(),
        }
    }

    /// Play the file at `path`, blocking the returned future until playback
    /// finishes.
    pub async fn play_file(&self, path: &Path, use_ffmpeg: bool) -> Result<PlaybackMethod> {
        let audio = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TypecastError::io(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
                )
            } else {
                TypecastError::io(path, e)
            }
        })?;

        if use_ffmpeg {
            match self.play_with_ffplay(&audio).await {
                Ok(()) => {
                    info!(path = %path.display(), "Played audio with ffplay");
                    return Ok(PlaybackMethod::Ffplay);
                }
                Err(FfplayFailure::NotInstalled) => {
                    debug!("ffplay not installed, falling back to output device");
                }
                Err(FfplayFailure::Failed(reason)) => {
                    warn!(%reason, "ffplay failed, falling back to output device");
                }
            }
        }

        let method = play_on_device(audio).await?;
        info!(path = %path.display(), %method, "Played audio");
        Ok(method)
    }

    async fn play_with_ffplay(&self, audio: &[u8]) -> std::result::Result<(), FfplayFailure> {
        let mut child = Command::new(&self.ffplay)
            .args(["-autoexit", "-nodisp", "-loglevel", "error", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => FfplayFailure::NotInstalled,
                _ => FfplayFailure::Failed(format!("failed to start ffplay: {e}")),
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // ffplay may stop reading early once it has what it needs.
            if let Err(e) = stdin.write_all(audio).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(FfplayFailure::Failed(format!(
                        "failed to stream audio to ffplay: {e}"
                    )));
                }
            }
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| FfplayFailure::Failed(format!("failed to wait for ffplay: {e}")))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(FfplayFailure::Failed(format!(
                "ffplay exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )))
        }
    }
}

#[cfg(feature = "playback")]
async fn play_on_device(audio: Vec<u8>) -> Result<PlaybackMethod> {
    let name = tokio::task::spawn_blocking(move || device::play_wav_blocking(&audio))
        .await
        .map_err(|e| TypecastError::Playback(format!("playback task failed: {e}")))?
        .map_err(|e| TypecastError::Playback(format!("{e:#}. {FFMPEG_HINT}")))?;
    Ok(PlaybackMethod::Device { name })
}

#[cfg(not(feature = "playback"))]
async fn play_on_device(_audio: Vec<u8>) -> Result<PlaybackMethod> {
    Err(TypecastError::Playback(format!(
        "ffplay is not available and this build has no output device support. {FFMPEG_HINT}"
    )))
}
