//! Decoded-sound cache keyed by asset path. One load per path is in
//! flight at a time; concurrent callers share it through a cloneable
//! handle. Failures resolve to `None` and are never cached, so the next
//! fetch retries.

use std::collections::HashMap;
use std::sync::Arc;

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use parking_lot::Mutex;
use tracing::warn;

use super::loader::{AudioClip, FetchBytes, decode};
use crate::sounds::catalogue::{all_fixed_tokens, fixed_entry};
use crate::sounds::configurable::EventSoundMap;

pub type SharedLoad = Shared<BoxFuture<'static, Option<Arc<AudioClip>>>>;

/// Resolves to the decoded clip, or `None` when fetching or decoding
/// failed. Cloning is cheap either way.
#[derive(Clone)]
pub enum SoundHandle {
    Ready(Option<Arc<AudioClip>>),
    Loading(SharedLoad),
}

impl SoundHandle {
    pub fn ready(clip: Option<Arc<AudioClip>>) -> Self {
        Self::Ready(clip)
    }

    pub async fn resolve(&self) -> Option<Arc<AudioClip>> {
        match self {
            Self::Ready(clip) => clip.clone(),
            Self::Loading(load) => load.clone().await,
        }
    }
}

impl std::fmt::Debug for SoundHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(Some(_)) => f.write_str("SoundHandle::Ready(clip)"),
            Self::Ready(None) => f.write_str("SoundHandle::Ready(missing)"),
            Self::Loading(_) => f.write_str("SoundHandle::Loading"),
        }
    }
}

pub struct SoundCache {
    buffers: Mutex<HashMap<String, Arc<AudioClip>>>,
    loading: Mutex<HashMap<String, SharedLoad>>,
    fetcher: Arc<dyn FetchBytes>,
}

impl SoundCache {
    pub fn new(fetcher: Arc<dyn FetchBytes>) -> Self {
        Self {
            buffers: Mutex::new(HashMap::new()),
            loading: Mutex::new(HashMap::new()),
            fetcher,
        }
    }

    /// Handle for `path`, starting a shared load on a cold miss. The
    /// in-flight marker is cleared when the load settles, success and
    /// failure alike.
    pub fn fetch(self: &Arc<Self>, path: &str, custom: bool) -> SoundHandle {
        if let Some(clip) = self.buffers.lock().get(path) {
            return SoundHandle::Ready(Some(Arc::clone(clip)));
        }

        let mut loading = self.loading.lock();
        if let Some(load) = loading.get(path) {
            return SoundHandle::Loading(load.clone());
        }

        let cache = Arc::clone(self);
        let owned = path.to_string();
        let load: SharedLoad = async move {
            let clip = match cache.load(&owned, custom).await {
                Ok(clip) => Some(Arc::new(clip)),
                Err(e) => {
                    warn!("failed to load sound '{}': {}", owned, e);
                    None
                }
            };
            if let Some(clip) = &clip {
                cache
                    .buffers
                    .lock()
                    .insert(owned.clone(), Arc::clone(clip));
            }
            cache.loading.lock().remove(&owned);
            clip
        }
        .boxed()
        .shared();

        loading.insert(path.to_string(), load.clone());
        SoundHandle::Loading(load)
    }

    async fn load(&self, path: &str, custom: bool) -> Result<AudioClip, crate::common::errors::SoundError> {
        let bytes = self.fetcher.fetch_bytes(path, custom).await?;
        decode(bytes, path).await
    }

    /// Kick off loads for the whole fixed catalogue and the event's own
    /// sounds without waiting for any of them.
    pub fn preload(self: &Arc<Self>, sounds: &EventSoundMap) {
        for token in all_fixed_tokens() {
            if let Some(entry) = fixed_entry(&token) {
                spawn_resolve(self.fetch(entry.path, false));
            }
        }
        for (_, sound) in sounds.iter() {
            spawn_resolve(self.fetch(&sound.path, true));
        }
    }
}

fn spawn_resolve(handle: SoundHandle) {
    tokio::spawn(async move {
        let _ = handle.resolve().await;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::SoundError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

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

    struct StubFetcher {
        calls: AtomicUsize,
        fail_first: bool,
    }

    impl StubFetcher {
        fn new(fail_first: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_first,
            }
        }
    }

    #[async_trait]
    impl FetchBytes for StubFetcher {
        async fn fetch_bytes(&self, path: &str, _custom: bool) -> Result<Vec<u8>, SoundError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && call == 0 {
                return Err(SoundError::Fetch {
                    path: path.to_string(),
                    reason: "stubbed outage".to_string(),
                });
            }
            Ok(wav_bytes(8000, &[100i16; 400]))
        }
    }

    #[tokio::test]
    async fn second_fetch_hits_the_buffer() {
        let fetcher = Arc::new(StubFetcher::new(false));
        let cache = Arc::new(SoundCache::new(fetcher.clone()));

        let clip = cache.fetch("/sounds/numbers/1.wav", false).resolve().await;
        assert!(clip.is_some());

        let again = cache.fetch("/sounds/numbers/1.wav", false);
        assert!(matches!(again, SoundHandle::Ready(Some(_))));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_fetches_share_one_load() {
        let fetcher = Arc::new(StubFetcher::new(false));
        let cache = Arc::new(SoundCache::new(fetcher.clone()));

        // Neither handle has been polled yet, so the second fetch must
        // find the in-flight marker rather than start its own load.
        let first = cache.fetch("/sounds/other/and.wav", false);
        let second = cache.fetch("/sounds/other/and.wav", false);
        assert!(matches!(second, SoundHandle::Loading(_)));

        let (a, b) = tokio::join!(first.resolve(), second.resolve());
        assert!(a.is_some());
        assert_eq!(a, b);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_retried_not_cached() {
        let fetcher = Arc::new(StubFetcher::new(true));
        let cache = Arc::new(SoundCache::new(fetcher.clone()));

        let miss = cache.fetch("/sounds/other/next_activity.wav", false).resolve().await;
        assert!(miss.is_none());

        let hit = cache.fetch("/sounds/other/next_activity.wav", false).resolve().await;
        assert!(hit.is_some());
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }
}
