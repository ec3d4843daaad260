//! Queue-based alert playback. One loop task owns the queue head; the
//! head is popped only after it finished while playback was still on,
//! so a forced stop leaves it in place for resume or removal.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use rand::{Rng, distributions::Alphanumeric};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error};

use super::cache::{SoundCache, SoundHandle};
use super::sink::AudioSink;
use crate::common::types::ActivityId;
use crate::sounds::builder::SoundSequenceBuilder;
use crate::sounds::configurable::EventSoundMap;
use crate::sounds::keys::SoundToken;

/// Per-sound playback outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Done {
    Pending = 0,
    Done = 1,
    Error = 2,
}

/// One resolved sound of an alert. The audio arrives through `handle`;
/// `active` and `done` track playback progress.
#[derive(Debug)]
pub struct CompiledSound {
    pub content: String,
    pub path: String,
    pub token: SoundToken,
    pub handle: SoundHandle,
    active: AtomicBool,
    done: AtomicU8,
}

impl CompiledSound {
    pub fn new(content: String, path: String, token: SoundToken, handle: SoundHandle) -> Self {
        Self {
            content,
            path,
            token,
            handle,
            active: AtomicBool::new(false),
            done: AtomicU8::new(Done::Pending as u8),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }

    pub fn done(&self) -> Done {
        match self.done.load(Ordering::SeqCst) {
            1 => Done::Done,
            2 => Done::Error,
            _ => Done::Pending,
        }
    }

    fn set_done(&self, done: Done) {
        self.done.store(done as u8, Ordering::SeqCst);
    }
}

/// An ordered batch of sounds played as one announcement.
#[derive(Debug)]
pub struct Alert {
    pub id: String,
    pub activity_id: Option<ActivityId>,
    pub sounds: Vec<Arc<CompiledSound>>,
    active: AtomicBool,
}

impl Alert {
    pub fn new(id: String, activity_id: Option<ActivityId>, sounds: Vec<Arc<CompiledSound>>) -> Self {
        Self {
            id,
            activity_id,
            sounds,
            active: AtomicBool::new(false),
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::SeqCst);
    }
}

pub struct PlaybackEngine {
    queue: Mutex<Vec<Arc<Alert>>>,
    is_playing: AtomicBool,
    current: Mutex<Option<Arc<CompiledSound>>>,
    stop: Notify,
    sink: Arc<dyn AudioSink>,
    loop_task: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackEngine {
    pub fn new(sink: Arc<dyn AudioSink>) -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
            is_playing: AtomicBool::new(false),
            current: Mutex::new(None),
            stop: Notify::new(),
            sink,
            loop_task: Mutex::new(None),
        }
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing.load(Ordering::SeqCst)
    }

    pub fn current_sound(&self) -> Option<Arc<CompiledSound>> {
        self.current.lock().clone()
    }

    pub fn queued_ids(&self) -> Vec<String> {
        self.queue.lock().iter().map(|a| a.id.clone()).collect()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.lock().len()
    }

    /// Append and make sure the loop runs.
    pub fn add_alert(self: &Arc<Self>, alert: Arc<Alert>) {
        debug!("queueing alert '{}' ({} sounds)", alert.id, alert.sounds.len());
        self.queue.lock().push(alert);
        self.start_playing();
    }

    /// Ad-hoc alert outside the schedule, played via the normal queue.
    pub fn play_sounds(
        self: &Arc<Self>,
        name: &str,
        builder: SoundSequenceBuilder,
        sounds: &EventSoundMap,
        cache: &Arc<SoundCache>,
    ) {
        let id = format!("{}-{}", name, random_suffix());
        let cache = Arc::clone(cache);
        let compiled = builder.build(sounds, |path, custom| cache.fetch(path, custom));
        self.add_alert(Arc::new(Alert::new(id, None, compiled)));
    }

    /// Idempotent: does nothing while a loop is already running.
    pub fn start_playing(self: &Arc<Self>) {
        if self.is_playing.swap(true, Ordering::SeqCst) {
            return;
        }
        let engine = Arc::clone(self);
        let task = tokio::spawn(async move { engine.run_loop().await });
        if let Some(old) = self.loop_task.lock().replace(task) {
            // A stopped loop may still be winding down; it must not see
            // the flag set again and resurrect.
            old.abort();
        }
    }

    /// Stop after the current sound is interrupted; the head alert stays
    /// queued.
    pub fn stop_playing(&self) {
        self.is_playing.store(false, Ordering::SeqCst);
        self.stop.notify_waiters();
        if let Some(sound) = self.current.lock().take() {
            sound.set_active(false);
        }
    }

    pub fn stop_and_clear(&self) {
        self.stop_playing();
        self.queue.lock().clear();
    }

    /// Drop an alert by id. Removing the one currently being played
    /// interrupts it and resumes with whatever is queued next.
    pub fn remove_alert(self: &Arc<Self>, id: &str) {
        let active = {
            let queue = self.queue.lock();
            match queue.iter().find(|a| a.id == id) {
                Some(alert) => alert.is_active(),
                None => return,
            }
        };

        debug!("removing alert '{}' (active: {})", id, active);
        if active {
            self.stop_playing();
            self.queue.lock().retain(|a| a.id != id);
            self.start_playing();
        } else {
            self.queue.lock().retain(|a| a.id != id);
        }
    }

    pub fn shutdown(&self) {
        self.stop_and_clear();
        if let Some(task) = self.loop_task.lock().take() {
            task.abort();
        }
    }

    async fn run_loop(self: Arc<Self>) {
        while self.is_playing.load(Ordering::SeqCst) {
            let head = self.queue.lock().first().cloned();
            let Some(alert) = head else {
                sleep(Duration::from_millis(100)).await;
                continue;
            };

            self.play_alert(&alert).await;

            // A stop that landed mid-alert keeps the head queued. The
            // ptr check guards against a removal swapping the head while
            // this task is winding down.
            if self.is_playing.load(Ordering::SeqCst) {
                let mut queue = self.queue.lock();
                if queue.first().is_some_and(|head| Arc::ptr_eq(head, &alert)) {
                    queue.remove(0);
                }
            }
        }
    }

    async fn play_alert(&self, alert: &Alert) {
        debug!("playing alert '{}'", alert.id);
        alert.set_active(true);

        for sound in &alert.sounds {
            if !self.is_playing.load(Ordering::SeqCst) {
                break;
            }

            // Register for the stop signal before any await so a stop
            // during resolve is not missed.
            let stopped = self.stop.notified();
            tokio::pin!(stopped);
            stopped.as_mut().enable();

            sound.set_active(true);
            *self.current.lock() = Some(Arc::clone(sound));

            let resolved = tokio::select! {
                clip = sound.handle.resolve() => clip,
                _ = &mut stopped => {
                    sound.set_active(false);
                    *self.current.lock() = None;
                    alert.set_active(false);
                    return;
                }
            };

            let Some(clip) = resolved else {
                error!("no audio for '{}' ({}), skipping", sound.content, sound.path);
                sound.set_done(Done::Error);
                sound.set_active(false);
                continue;
            };

            tokio::select! {
                _ = self.sink.play(clip) => {
                    sound.set_done(Done::Done);
                    sound.set_active(false);
                }
                _ = &mut stopped => {
                    sound.set_active(false);
                    *self.current.lock() = None;
                    alert.set_active(false);
                    return;
                }
            }
        }

        *self.current.lock() = None;
        alert.set_active(false);
    }
}

impl Drop for PlaybackEngine {
    fn drop(&mut self) {
        if let Some(task) = self.loop_task.lock().take() {
            task.abort();
        }
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .take(3)
        .map(char::from)
        .collect()
}
