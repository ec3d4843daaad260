use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::sleep;

use super::loader::AudioClip;

/// Plays one clip to completion. Interruption happens at the caller,
/// which races `play` against its stop signal.
#[async_trait]
pub trait AudioSink: Send + Sync {
    async fn play(&self, clip: Arc<AudioClip>);
}

/// Sink without an audio device: holds the call for the clip's real
/// duration, in 20 ms slices. Call-alert timing relies on wall-clock
/// playback lengths, so the wait is not optional.
pub struct NullSink;

#[async_trait]
impl AudioSink for NullSink {
    async fn play(&self, clip: Arc<AudioClip>) {
        let slice = Duration::from_millis(20);
        let mut remaining = clip.duration();
        while remaining > Duration::ZERO {
            let step = remaining.min(slice);
            sleep(step).await;
            remaining -= step;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn null_sink_holds_for_the_clip_duration() {
        let clip = Arc::new(AudioClip {
            sample_rate: 8000,
            channels: 1,
            samples: vec![0.0; 1200],
        });
        assert_eq!(clip.duration_ms(), 150);

        let started = tokio::time::Instant::now();
        NullSink.play(clip).await;
        assert_eq!(started.elapsed(), Duration::from_millis(150));
    }
}
