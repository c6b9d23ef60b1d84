//! WAV playback on the default output device using cpal.
//! Decodes with hound and resamples to the device rate if needed.

use std::io::Cursor;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, SampleFormat, SizedSample, Stream, StreamConfig};
use rubato::{FftFixedIn, Resampler};

/// Decoded mono audio
struct MonoAudio {
    samples: Vec<f32>,
    sample_rate: u32,
}

/// Play a WAV file on the default output device and block until it has
/// finished. Returns the device name.
pub fn play_wav_blocking(bytes: &[u8]) -> Result<String> {
    if !bytes.starts_with(b"RIFF") {
        anyhow::bail!("output device playback supports WAV audio only");
    }

    let audio = decode_wav(bytes)?;

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("no output device available")?;
    let name = device.name().unwrap_or_else(|_| "default".to_string());

    let supported_config = device
        .default_output_config()
        .context("failed to get default output config")?;
    let native_rate = supported_config.sample_rate().0;
    let native_channels = supported_config.channels() as usize;
    let sample_format = supported_config.sample_format();
    let config: StreamConfig = supported_config.into();

    let resampled = resample(&audio.samples, audio.sample_rate, native_rate)?;
    let frames = resampled.len();
    let playhead = Arc::new(Playhead::new(expand_to_channels(&resampled, native_channels)));

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, playhead.clone())?,
        SampleFormat::I16 => build_stream::<i16>(&device, &config, playhead.clone())?,
        SampleFormat::U16 => build_stream::<u16>(&device, &config, playhead.clone())?,
        format => anyhow::bail!("unsupported sample format: {:?}", format),
    };

    stream.play().context("failed to start playback stream")?;

    let expected = Duration::from_secs_f64(frames as f64 / native_rate.max(1) as f64);
    let deadline = Instant::now() + expected + Duration::from_secs(2);
    while !playhead.is_done() {
        if Instant::now() > deadline {
            anyhow::bail!("playback did not finish within {:?}", expected);
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    Ok(name)
}

fn decode_wav(bytes: &[u8]) -> Result<MonoAudio> {
    let reader = hound::WavReader::new(Cursor::new(bytes)).context("failed to parse WAV data")?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<_, _>>()
            .context("failed to read WAV samples")?,
        hound::SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<_, _>>()
                .context("failed to read WAV samples")?
        }
    };

    let samples = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();

    Ok(MonoAudio {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Interleaved samples shared with the device callback
struct Playhead {
    samples: Vec<f32>,
    cursor: AtomicUsize,
    done: AtomicBool,
}

impl Playhead {
    fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            cursor: AtomicUsize::new(0),
            done: AtomicBool::new(false),
        }
    }

    /// Hand the next `out.len()` samples to the device, padding with
    /// silence. Done once a callback starts past the last sample.
    fn fill<T: SizedSample + FromSample<f32>>(&self, out: &mut [T]) {
        let start = self.cursor.fetch_add(out.len(), Ordering::AcqRel);
        if start >= self.samples.len() {
            self.done.store(true, Ordering::Release);
        }

        let pending = self.samples.get(start..).unwrap_or_default();
        let source = pending.iter().copied().chain(std::iter::repeat(0.0));
        for (slot, sample) in out.iter_mut().zip(source) {
            *slot = T::from_sample(sample);
        }
    }

    fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

fn build_stream<T>(device: &Device, config: &StreamConfig, playhead: Arc<Playhead>) -> Result<Stream>
where
    T: SizedSample + FromSample<f32> + Send + 'static,
{
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| playhead.fill(data),
            |err| tracing::error!(error = ?err, "playback stream error"),
            None,
        )
        .context("failed to build output stream")
}

const RESAMPLE_CHUNK: usize = 1024;

/// Convert mono audio to `target_rate`. Whole chunks go through the FFT
/// resampler and the tail is zero-padded by `process_partial`; the padding
/// is trimmed so the length follows the rate ratio.
fn resample(samples: &[f32], source_rate: u32, target_rate: u32) -> Result<Vec<f32>> {
    if source_rate == target_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler = FftFixedIn::<f32>::new(
        source_rate as usize,
        target_rate as usize,
        RESAMPLE_CHUNK,
        2,
        1,
    )
    .context("failed to create resampler")?;

    let target_len = (samples.len() as u64 * target_rate as u64 / source_rate as u64) as usize;
    let mut output = Vec::with_capacity(target_len + resampler.output_frames_max());

    let mut chunks = samples.chunks_exact(RESAMPLE_CHUNK);
    for chunk in &mut chunks {
        let frames = resampler.process(&[chunk], None).context("resampling failed")?;
        output.extend(frames.into_iter().flatten());
    }
    let tail = chunks.remainder();
    if !tail.is_empty() {
        let frames = resampler
            .process_partial(Some(&[tail][..]), None)
            .context("resampling failed")?;
        output.extend(frames.into_iter().flatten());
    }

    output.truncate(target_len);
    Ok(output)
}

fn expand_to_channels(samples: &[f32], channels: usize) -> Vec<f32> {
    if channels <= 1 {
        return samples.to_vec();
    }
    samples
        .iter()
        .flat_map(|&sample| std::iter::repeat(sample).take(channels))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wav_bytes(channels: u16, samples: &[i16]) -> Vec<u8> {
        let spec = hound::WavSpec {
            channels,
            sample_rate: 16000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
            for &s in samples {
                writer.write_sample(s).unwrap();
            }
            writer.finalize().unwrap();
        }
        cursor.into_inner()
    }

    #[test]
    fn test_decode_downmixes_stereo() {
        let audio = decode_wav(&wav_bytes(2, &[16384, 0, -16384, -16384])).unwrap();
        assert_eq!(audio.sample_rate, 16000);
        assert_eq!(audio.samples.len(), 2);
        assert!((audio.samples[0] - 0.25).abs() < 1e-4);
        assert!((audio.samples[1] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_rejects_non_wav() {
        let err = play_wav_blocking(b"ID3\x04mp3 data").unwrap_err();
        assert!(err.to_string().contains("WAV"));
    }

    #[test]
    fn test_resample_changes_length_by_ratio() {
        let samples = vec![0.0f32; 16000];
        assert_eq!(resample(&samples, 16000, 48000).unwrap().len(), 48000);
        assert_eq!(resample(&samples[..1500], 16000, 48000).unwrap().len(), 4500);
        assert_eq!(resample(&samples, 16000, 16000).unwrap().len(), 16000);
    }

    #[test]
    fn test_playhead_pads_with_silence_then_finishes() {
        let playhead = Playhead::new(vec![0.5, -0.5, 0.25]);
        let mut out = [1.0f32; 2];

        playhead.fill(&mut out);
        assert_eq!(out, [0.5, -0.5]);
        assert!(!playhead.is_done());

        playhead.fill(&mut out);
        assert_eq!(out, [0.25, 0.0]);
        assert!(!playhead.is_done());

        playhead.fill(&mut out);
        assert_eq!(out, [0.0, 0.0]);
        assert!(playhead.is_done());
    }

    #[test]
    fn test_expand_to_channels() {
        assert_eq!(expand_to_channels(&[0.1, 0.2], 2), vec![0.1, 0.1, 0.2, 0.2]);
    }
}
