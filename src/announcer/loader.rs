//! Fetches sound assets from the configured roots and decodes them to
//! PCM with symphonia.

use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{CODEC_TYPE_NULL, DecoderOptions};
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

use crate::common::errors::SoundError;
use crate::config::SoundsConfig;

/// A fully decoded recording, interleaved f32 PCM.
#[derive(Clone, PartialEq)]
pub struct AudioClip {
    pub sample_rate: u32,
    pub channels: u16,
    pub samples: Vec<f32>,
}

impl AudioClip {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / self.sample_rate as f64)
    }

    pub fn duration_ms(&self) -> i64 {
        self.duration().as_millis() as i64
    }
}

impl std::fmt::Debug for AudioClip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioClip")
            .field("sample_rate", &self.sample_rate)
            .field("channels", &self.channels)
            .field("frames", &self.frames())
            .finish()
    }
}

/// Source of raw asset bytes, keyed by path and the custom flag.
#[async_trait]
pub trait FetchBytes: Send + Sync {
    async fn fetch_bytes(&self, path: &str, custom: bool) -> Result<Vec<u8>, SoundError>;
}

/// Resolves asset paths against the fixed or custom root and returns the
/// raw bytes. Roots may be http(s) bases or directories. Fixed paths
/// already carry their `/sounds/...` prefix; custom paths are bare file
/// names under the custom root.
#[derive(Debug, Clone)]
pub struct SoundFetcher {
    fixed_root: String,
    custom_root: String,
    client: reqwest::Client,
}

impl SoundFetcher {
    pub fn new(sounds: &SoundsConfig) -> Self {
        Self {
            fixed_root: sounds.fixed_root.clone(),
            custom_root: sounds.custom_root.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn resolve(&self, path: &str, custom: bool) -> String {
        let root = if custom {
            &self.custom_root
        } else {
            &self.fixed_root
        };
        join_root(root, path)
    }
}

#[async_trait]
impl FetchBytes for SoundFetcher {
    async fn fetch_bytes(&self, path: &str, custom: bool) -> Result<Vec<u8>, SoundError> {
        let target = self.resolve(path, custom);
        let fetch_err = |reason: String| SoundError::Fetch {
            path: path.to_string(),
            reason,
        };

        if target.starts_with("http://") || target.starts_with("https://") {
            let response = self
                .client
                .get(&target)
                .send()
                .await
                .map_err(|e| fetch_err(e.to_string()))?;
            if !response.status().is_success() {
                return Err(fetch_err(format!("status {}", response.status())));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| fetch_err(e.to_string()))?;
            Ok(bytes.to_vec())
        } else {
            tokio::fs::read(&target)
                .await
                .map_err(|e| fetch_err(e.to_string()))
        }
    }
}

fn join_root(root: &str, path: &str) -> String {
    let trimmed = path.trim_start_matches('/');
    if root.starts_with("http://") || root.starts_with("https://") {
        format!("{}/{}", root.trim_end_matches('/'), trimmed)
    } else {
        Path::new(root).join(trimmed).to_string_lossy().into_owned()
    }
}

pub async fn decode(bytes: Vec<u8>, path: &str) -> Result<AudioClip, SoundError> {
    let owned = path.to_string();
    tokio::task::spawn_blocking(move || decode_clip(bytes, &owned))
        .await
        .map_err(|e| SoundError::Decode {
            path: path.to_string(),
            reason: e.to_string(),
        })?
}

/// Probe, pick the first real audio track and decode every packet.
/// Undecodable packets are skipped; a stream with no usable samples is
/// an error.
pub fn decode_clip(bytes: Vec<u8>, path: &str) -> Result<AudioClip, SoundError> {
    let decode_err = |reason: String| SoundError::Decode {
        path: path.to_string(),
        reason,
    };

    let mss = MediaSourceStream::new(Box::new(Cursor::new(bytes)), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = Path::new(path).extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| decode_err(e.to_string()))?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| decode_err("no audio track found".to_string()))?;

    let track_id = track.id;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| decode_err(e.to_string()))?;

    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(1) as u16;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(Error::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(Error::DecodeError(e)) => {
                debug!("skipping unreadable packet in '{}': {}", path, e);
                continue;
            }
            Err(_) => break,
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(audio_buf) => {
                let spec = *audio_buf.spec();
                sample_rate = spec.rate;
                channels = spec.channels.count() as u16;

                let mut buf = match sample_buf.take() {
                    Some(b) => b,
                    None => SampleBuffer::<f32>::new(audio_buf.capacity() as u64, spec),
                };
                buf.copy_interleaved_ref(audio_buf);
                samples.extend_from_slice(buf.samples());
                sample_buf = Some(buf);
            }
            Err(Error::DecodeError(e)) => {
                debug!("skipping undecodable packet in '{}': {}", path, e);
                continue;
            }
            Err(Error::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
            Err(_) => break,
        }
    }

    if samples.is_empty() {
        return Err(SoundError::EmptyClip(path.to_string()));
    }

    Ok(AudioClip {
        sample_rate,
        channels,
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal PCM WAV container around 16-bit mono samples.
    fn wav_bytes(sample_rate: u32, samples: &[i16]) -> Vec<u8> {
        let data_len = (samples.len() * 2) as u32;
        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVE");
        out.extend_from_slice(b"fmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes());
        out.extend_from_slice(&sample_rate.to_le_bytes());
        out.extend_from_slice(&(sample_rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        for s in samples {
            out.extend_from_slice(&s.to_le_bytes());
        }
        out
    }

    #[test]
    fn clip_duration_follows_frame_count() {
        let clip = AudioClip {
            sample_rate: 48000,
            channels: 2,
            samples: vec![0.0; 96000],
        };
        assert_eq!(clip.frames(), 48000);
        assert_eq!(clip.duration(), Duration::from_secs(1));
        assert_eq!(clip.duration_ms(), 1000);
    }

    #[test]
    fn join_handles_urls_and_directories() {
        assert_eq!(
            join_root("http://hub:2333", "/sounds/numbers/1.mp3"),
            "http://hub:2333/sounds/numbers/1.mp3"
        );
        assert_eq!(
            join_root("https://hub/", "/sounds/other/and.mp3"),
            "https://hub/sounds/other/and.mp3"
        );
        assert_eq!(join_root(".", "/sounds/numbers/1.mp3"), "./sounds/numbers/1.mp3");
        assert_eq!(
            join_root("./sounds/custom", "vecernicek.mp3"),
            "./sounds/custom/vecernicek.mp3"
        );
    }

    #[test]
    fn custom_flag_picks_the_root() {
        let fetcher = SoundFetcher::new(&SoundsConfig {
            fixed_root: "http://hub:2333".to_string(),
            custom_root: "http://hub:2333/sounds/custom".to_string(),
            serve_dir: None,
        });
        assert_eq!(
            fetcher.resolve("/sounds/numbers/1.mp3", false),
            "http://hub:2333/sounds/numbers/1.mp3"
        );
        assert_eq!(
            fetcher.resolve("budicek.mp3", true),
            "http://hub:2333/sounds/custom/budicek.mp3"
        );
    }

    #[tokio::test]
    async fn reads_bytes_from_a_directory_root() {
        let dir = std::env::temp_dir().join(format!("rozhlas-loader-{}", std::process::id()));
        tokio::fs::create_dir_all(dir.join("sounds/other")).await.unwrap();
        tokio::fs::write(dir.join("sounds/other/and.mp3"), b"mp3bytes")
            .await
            .unwrap();

        let fetcher = SoundFetcher::new(&SoundsConfig {
            fixed_root: dir.to_string_lossy().into_owned(),
            custom_root: dir.to_string_lossy().into_owned(),
            serve_dir: None,
        });

        let bytes = fetcher
            .fetch_bytes("/sounds/other/and.mp3", false)
            .await
            .unwrap();
        assert_eq!(bytes, b"mp3bytes");

        let missing = fetcher.fetch_bytes("/sounds/other/nope.mp3", false).await;
        assert!(matches!(missing, Err(SoundError::Fetch { .. })));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[test]
    fn decodes_a_pcm_wav() {
        let samples: Vec<i16> = (0..800).map(|i| if i % 2 == 0 { 8000 } else { -8000 }).collect();
        let clip = decode_clip(wav_bytes(8000, &samples), "/sounds/test/beep.wav").unwrap();

        assert_eq!(clip.sample_rate, 8000);
        assert_eq!(clip.channels, 1);
        assert_eq!(clip.frames(), 800);
        assert_eq!(clip.duration_ms(), 100);
    }

    #[test]
    fn empty_stream_is_an_error() {
        let result = decode_clip(wav_bytes(8000, &[]), "/sounds/test/empty.wav");
        assert!(matches!(result, Err(SoundError::EmptyClip(_))));
    }
}
