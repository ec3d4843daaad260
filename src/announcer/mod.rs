//! The announcer: compiles activities into timed alerts, schedules
//! them, and plays them through the configured sink.

pub mod cache;
pub mod client;
pub mod compiler;
pub mod engine;
pub mod loader;
pub mod scheduler;
pub mod sink;

pub use cache::{SoundCache, SoundHandle};
pub use client::RealtimeClient;
pub use engine::{Alert, CompiledSound, Done, PlaybackEngine};
pub use loader::{AudioClip, FetchBytes, SoundFetcher};
pub use sink::{AudioSink, NullSink};

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::common::errors::SoundError;
use crate::model::{Activity, Event};
use crate::protocol::PlayerControl;
use crate::sounds::builder::SoundSequenceBuilder;
use crate::sounds::configurable::EventSoundMap;
use crate::sounds::keys::ConfigurableSound;
use compiler::AlertCompiler;
use scheduler::Scheduler;

/// Cache, compiler, scheduler and playback engine wired together. The
/// realtime client drives it; tests drive it directly.
pub struct Announcer {
    cache: Arc<SoundCache>,
    engine: Arc<PlaybackEngine>,
    scheduler: Arc<Scheduler>,
    compiler: Mutex<AlertCompiler>,
}

impl Announcer {
    /// Starts with an empty sound map; nothing compiles until an event
    /// supplies one.
    pub fn new(cache: Arc<SoundCache>, sink: Arc<dyn AudioSink>) -> Self {
        let engine = Arc::new(PlaybackEngine::new(sink));
        let scheduler = Arc::new(Scheduler::new(Arc::clone(&engine)));
        Self {
            compiler: Mutex::new(AlertCompiler::new(EventSoundMap::new(), Arc::clone(&cache))),
            cache,
            engine,
            scheduler,
        }
    }

    pub fn engine(&self) -> &Arc<PlaybackEngine> {
        &self.engine
    }

    pub fn scheduler(&self) -> &Arc<Scheduler> {
        &self.scheduler
    }

    pub fn sounds_valid(&self) -> bool {
        self.compiler.lock().sounds().is_valid()
    }

    /// Rebuild the configurable map from the event's assignments and
    /// start warming the cache.
    pub fn set_event_sounds(&self, event: &Event) {
        let sounds = EventSoundMap::from_event(event);
        if let Some(missing) = sounds.missing_required() {
            warn!(
                "event '{}' has no sound for the required role '{}', announcements stay disabled",
                event.name, missing
            );
        }
        self.cache.preload(&sounds);
        *self.compiler.lock() = AlertCompiler::new(sounds, Arc::clone(&self.cache));
    }

    pub async fn compile_and_schedule(&self, activity: &Activity) -> Result<(), SoundError> {
        let compiler = self.compiler.lock().clone();
        let alerts = compiler.compile(activity).await?;
        self.scheduler.schedule(alerts);
        Ok(())
    }

    /// Full rebuild: everything scheduled is dropped, every activity is
    /// recompiled. One failing activity does not block the others.
    pub async fn rebuild_schedule(&self, activities: &[Activity]) {
        self.scheduler.clear();
        for activity in activities {
            if let Err(e) = self.compile_and_schedule(activity).await {
                warn!("skipping activity {} ('{}'): {}", activity.id, activity.name, e);
            }
        }
    }

    pub fn handle_control(&self, control: PlayerControl) {
        match control {
            PlayerControl::StopPlaying => {
                info!("stop requested, interrupting playback and clearing the queue");
                self.engine.stop_and_clear();
            }
            PlayerControl::DelayAnnouncement { delay_minutes } => {
                info!("announcing a delay of {} minutes", delay_minutes);
                let builder = SoundSequenceBuilder::new()
                    .sound(ConfigurableSound::DelayStart)
                    .time(delay_minutes);
                match builder {
                    Ok(builder) => {
                        let builder = builder.sound(ConfigurableSound::DelayEnd);
                        let compiler = self.compiler.lock();
                        self.engine
                            .play_sounds("delay", builder, compiler.sounds(), &self.cache);
                    }
                    Err(e) => warn!("ignoring delay announcement: {}", e),
                }
            }
            PlayerControl::CustomSound { sounds } => {
                info!("playing {} ad-hoc sounds", sounds.len());
                let builder = SoundSequenceBuilder::new().sounds(sounds);
                let compiler = self.compiler.lock();
                self.engine
                    .play_sounds("custom", builder, compiler.sounds(), &self.cache);
            }
        }
    }

    pub fn shutdown(&self) {
        self.scheduler.clear();
        self.engine.shutdown();
    }
}
