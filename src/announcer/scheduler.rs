//! Time-indexed alert table with a single armed timer. Alerts are
//! bucketed by fire timestamp; when the earliest bucket comes due, every
//! bucket at or before now is drained into the playback queue oldest
//! first and the timer is rearmed for whatever remains.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

use super::engine::{Alert, PlaybackEngine};
use crate::common::types::now_ms;

/// Alerts this far in the past still fire immediately; older ones are
/// dropped at schedule time.
pub const GRACE_PERIOD_MS: i64 = 5000;

pub struct Scheduler {
    table: Mutex<BTreeMap<i64, Vec<Arc<Alert>>>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    engine: Arc<PlaybackEngine>,
}

impl Scheduler {
    pub fn new(engine: Arc<PlaybackEngine>) -> Self {
        Self {
            table: Mutex::new(BTreeMap::new()),
            timer: Mutex::new(None),
            engine,
        }
    }

    /// Merge a compiled timestamp map into the table. Entries sharing a
    /// timestamp keep their insertion order within the bucket.
    pub fn schedule(self: &Arc<Self>, alerts: BTreeMap<i64, Alert>) {
        let now = now_ms();
        {
            let mut table = self.table.lock();
            for (fire_at, alert) in alerts {
                if fire_at < now - GRACE_PERIOD_MS {
                    debug!(
                        "discarding alert '{}', {} ms past the grace period",
                        alert.id,
                        now - fire_at
                    );
                    continue;
                }
                table.entry(fire_at).or_default().push(Arc::new(alert));
            }
        }
        self.rearm();
    }

    pub fn clear(self: &Arc<Self>) {
        self.table.lock().clear();
        self.rearm();
    }

    pub fn pending_times(&self) -> Vec<i64> {
        self.table.lock().keys().copied().collect()
    }

    fn timer_armed(&self) -> bool {
        self.timer
            .lock()
            .as_ref()
            .map(|t| !t.is_finished())
            .unwrap_or(false)
    }

    /// Cancel the armed timer and arm a fresh one for the earliest
    /// entry, if any. Keeps the single-timer invariant across schedule,
    /// clear and fire.
    fn rearm(self: &Arc<Self>) {
        let mut timer = self.timer.lock();
        if let Some(task) = timer.take() {
            task.abort();
        }

        let earliest = match self.table.lock().keys().next() {
            Some(&t) => t,
            None => return,
        };

        let delay = (earliest - now_ms()).max(0) as u64;
        debug!("next alert in {} ms", delay);
        let scheduler = Arc::clone(self);
        *timer = Some(tokio::spawn(async move {
            sleep(Duration::from_millis(delay)).await;
            scheduler.fire_due();
        }));
    }

    fn fire_due(self: &Arc<Self>) {
        let due = {
            let mut table = self.table.lock();
            let keep = table.split_off(&(now_ms() + 1));
            std::mem::replace(&mut *table, keep)
        };

        for (_, bucket) in due {
            for alert in bucket {
                self.engine.add_alert(alert);
            }
        }

        self.rearm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::announcer::cache::SoundHandle;
    use crate::announcer::engine::CompiledSound;
    use crate::announcer::loader::AudioClip;
    use crate::announcer::sink::AudioSink;
    use crate::sounds::keys::{PhraseSound, SoundToken};
    use async_trait::async_trait;

    struct RecordingSink {
        played: Mutex<Vec<usize>>,
    }

    impl RecordingSink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                played: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl AudioSink for RecordingSink {
        async fn play(&self, clip: Arc<AudioClip>) {
            self.played.lock().push(clip.frames());
        }
    }

    fn alert(id: &str, frames: usize) -> Alert {
        let clip = Arc::new(AudioClip {
            sample_rate: 8000,
            channels: 1,
            samples: vec![0.0; frames],
        });
        let sound = Arc::new(CompiledSound::new(
            id.to_string(),
            format!("/{}", id),
            SoundToken::Phrase(PhraseSound::And),
            SoundHandle::ready(Some(clip)),
        ));
        Alert::new(id.to_string(), None, vec![sound])
    }

    async fn wait_for(mut cond: impl FnMut() -> bool) {
        for _ in 0..400 {
            if cond() {
                return;
            }
            sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached in time");
    }

    #[tokio::test]
    async fn grace_period_separates_stale_from_late() {
        let sink = RecordingSink::new();
        let engine = Arc::new(PlaybackEngine::new(sink.clone()));
        let scheduler = Arc::new(Scheduler::new(engine.clone()));

        let now = now_ms();
        let mut alerts = BTreeMap::new();
        alerts.insert(now - 10_000, alert("stale", 10));
        alerts.insert(now - 3_000, alert("late", 20));
        scheduler.schedule(alerts);

        wait_for(|| sink.played.lock().len() == 1).await;
        assert_eq!(*sink.played.lock(), vec![20]);
        assert!(scheduler.pending_times().is_empty());

        engine.shutdown();
    }

    #[tokio::test]
    async fn due_buckets_drain_oldest_first() {
        let sink = RecordingSink::new();
        let engine = Arc::new(PlaybackEngine::new(sink.clone()));
        let scheduler = Arc::new(Scheduler::new(engine.clone()));

        let now = now_ms();
        let mut alerts = BTreeMap::new();
        alerts.insert(now - 1_000, alert("newest", 3));
        alerts.insert(now - 3_000, alert("oldest", 1));
        alerts.insert(now - 2_000, alert("middle", 2));
        scheduler.schedule(alerts);

        wait_for(|| sink.played.lock().len() == 3).await;
        assert_eq!(*sink.played.lock(), vec![1, 2, 3]);

        engine.shutdown();
    }

    #[tokio::test]
    async fn same_timestamp_keeps_insertion_order() {
        let sink = RecordingSink::new();
        let engine = Arc::new(PlaybackEngine::new(sink.clone()));
        let scheduler = Arc::new(Scheduler::new(engine.clone()));

        let fire_at = now_ms() + 30;
        let mut first = BTreeMap::new();
        first.insert(fire_at, alert("first", 1));
        let mut second = BTreeMap::new();
        second.insert(fire_at, alert("second", 2));
        scheduler.schedule(first);
        scheduler.schedule(second);

        assert_eq!(scheduler.pending_times(), vec![fire_at]);
        wait_for(|| sink.played.lock().len() == 2).await;
        assert_eq!(*sink.played.lock(), vec![1, 2]);

        engine.shutdown();
    }

    #[tokio::test]
    async fn clear_empties_the_table_and_disarms_the_timer() {
        let engine = Arc::new(PlaybackEngine::new(RecordingSink::new()));
        let scheduler = Arc::new(Scheduler::new(engine.clone()));

        let mut alerts = BTreeMap::new();
        alerts.insert(now_ms() + 60_000, alert("future", 1));
        scheduler.schedule(alerts);
        assert_eq!(scheduler.pending_times().len(), 1);
        assert!(scheduler.timer_armed());

        scheduler.clear();
        assert!(scheduler.pending_times().is_empty());
        assert!(!scheduler.timer_armed());

        engine.shutdown();
    }
}
