//! Persisting synthesized audio under the configured output directory

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tokio::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::error::{Result, TypecastError};
use crate::speech::SynthesizedAudio;

const TEXT_PREFIX_CHARS: usize = 10;
const MAX_NAME_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone)]
pub struct OutputWriter {
    dir: PathBuf,
}

impl OutputWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `audio` to a new file and return its path. The extension always
    /// follows `audio.format`. Existing files are never overwritten; a numeric
    /// suffix is added until the name is free.
    pub async fn write(
        &self,
        voice_id: &str,
        text: &str,
        audio: &SynthesizedAudio,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| TypecastError::io(&self.dir, e))?;

        let stem = file_stem(Local::now(), voice_id, text);
        let extension = audio.format.extension();

        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let name = if attempt == 1 {
                format!("{stem}.{extension}")
            } else {
                format!("{stem}_{attempt}.{extension}")
            };
            let path = self.dir.join(name);

            let file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    debug!(path = %path.display(), "Output name taken, trying next");
                    continue;
                }
                Err(e) => return Err(TypecastError::io(&path, e)),
            };

            persist(file, &path, &audio.data).await?;
            info!(path = %path.display(), bytes = audio.data.len(), "Saved synthesized audio");
            return Ok(path);
        }

        Err(TypecastError::io(
            self.dir.join(format!("{stem}.{extension}")),
            std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "no free output file name",
            ),
        ))
    }
}

/// Write `data` through `out`, the freshly created file at `path`. A failed
/// write removes the file so no truncated audio is left behind.
async fn persist<W>(mut out: W, path: &Path, data: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match out.write_all(data).await {
        Ok(()) => out.flush().await,
        Err(e) => Err(e),
    };
    drop(out);

    if let Err(e) = written {
        if let Err(remove_err) = fs::remove_file(path).await {
            warn!(path = %path.display(), error = %remove_err, "Failed to remove partial output file");
        }
        return Err(TypecastError::io(path, e));
    }
    Ok(())
}

/// `{YYYYMMDD-HHMMSS}_{voice_id}_{first ten characters of text}`
pub fn file_stem(now: DateTime<Local>, voice_id: &str, text: &str) -> String {
    let prefix: String = text.trim().chars().take(TEXT_PREFIX_CHARS).collect();
    format!(
        "{}_{}_{}",
        now.format("%Y%m%d-%H%M%S"),
        sanitize(voice_id),
        sanitize(&prefix)
    )
}

fn sanitize(part: &str) -> String {
    part.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::AudioFormat;
    use chrono::TimeZone;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    /// Accepts nothing, like a full disk
    struct FullDisk;

    impl AsyncWrite for FullDisk {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<std::io::Result<usize>> {
            Poll::Ready(Err(std::io::Error::other("no space left on device")))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    fn audio(format: AudioFormat) -> SynthesizedAudio {
        SynthesizedAudio {
            data: b"audio-bytes".to_vec(),
            format,
        }
    }

    #[test]
    fn test_file_stem_layout() {
        let now = Local.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            file_stem(now, "tc_123", "Hello, world! How are you?"),
            "20250309-140507_tc_123_Hello__wor"
        );
    }

    #[test]
    fn test_file_stem_strips_path_separators() {
        let now = Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let stem = file_stem(now, "../etc", "a/b\\c");
        assert!(!stem.contains('/'));
        assert!(!stem.contains('\\'));
        assert!(!stem.contains(".."));
    }

    #[test]
    fn test_file_stem_keeps_unicode_text() {
        let now = Local.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert!(file_stem(now, "tc", "안녕하세요 반갑습니다").ends_with("_안녕하세요_반갑습니"));
    }

    #[tokio::test]
    async fn test_extension_follows_format() {
        let temp_dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(temp_dir.path());

        let wav = writer
            .write("tc_1", "Hello", &audio(AudioFormat::Wav))
            .await
            .unwrap();
        let mp3 = writer
            .write("tc_1", "Hello", &audio(AudioFormat::Mp3))
            .await
            .unwrap();

        assert_eq!(wav.extension().unwrap(), "wav");
        assert_eq!(mp3.extension().unwrap(), "mp3");
        assert_eq!(std::fs::read(&wav).unwrap(), b"audio-bytes");
    }

    #[tokio::test]
    async fn test_creates_missing_directory() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let writer = OutputWriter::new(&nested);

        let path = writer
            .write("tc_1", "Hi", &audio(AudioFormat::Wav))
            .await
            .unwrap();
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_repeated_calls_never_overwrite() {
        let temp_dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(temp_dir.path());

        let mut paths = Vec::new();
        for _ in 0..3 {
            paths.push(
                writer
                    .write("tc_1", "Same text", &audio(AudioFormat::Wav))
                    .await
                    .unwrap(),
            );
        }

        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 3);
    }

    #[tokio::test]
    async fn test_unwritable_directory_is_io_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, b"x").unwrap();

        let writer = OutputWriter::new(blocker.join("sub"));
        let err = writer
            .write("tc_1", "Hi", &audio(AudioFormat::Wav))
            .await
            .unwrap_err();
        assert!(matches!(err, TypecastError::Io { .. }));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_no_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("partial.wav");
        std::fs::write(&path, b"RI").unwrap();

        let err = persist(FullDisk, &path, b"RIFF-wav-bytes")
            .await
            .unwrap_err();

        match err {
            TypecastError::Io { path: failed, source } => {
                assert_eq!(failed, path);
                assert!(source.to_string().contains("no space left"));
            }
            other => panic!("expected io error, got {other:?}"),
        }
        assert!(!path.exists());
    }
}
