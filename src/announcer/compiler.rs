//! Turns activities into timestamped alerts. One announcement per
//! configured lead time, plus the call alert when the activity gathers
//! participants, offset so the call recording ends exactly at the
//! activity's start.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use super::cache::SoundCache;
use super::engine::Alert;
use crate::common::errors::SoundError;
use crate::model::Activity;
use crate::sounds::builder::SoundSequenceBuilder;
use crate::sounds::configurable::EventSoundMap;
use crate::sounds::keys::{ActivityType, ConfigurableSound, PhraseSound};

#[derive(Clone)]
pub struct AlertCompiler {
    sounds: EventSoundMap,
    cache: Arc<SoundCache>,
}

impl AlertCompiler {
    pub fn new(sounds: EventSoundMap, cache: Arc<SoundCache>) -> Self {
        Self { sounds, cache }
    }

    pub fn sounds(&self) -> &EventSoundMap {
        &self.sounds
    }

    /// Compile one activity into its fire-time map. Nothing compiles
    /// while a required sound is unassigned. The caller owns scheduling.
    pub async fn compile(&self, activity: &Activity) -> Result<BTreeMap<i64, Alert>, SoundError> {
        if let Some(missing) = self.sounds.missing_required() {
            return Err(SoundError::InvalidConfiguration { missing });
        }

        let mut alerts = BTreeMap::new();
        let effective_start = activity.effective_start_ms();

        let base = SoundSequenceBuilder::announcement().sound(PhraseSound::NextActivity);
        for &minutes in &activity.alert_times {
            let mut sounds = base
                .clone()
                .sound(activity.activity_type)
                .sound(PhraseSound::StartsIn)
                .time(minutes)?
                .location(&activity.location);
            if !activity.participant_needs.is_empty() {
                sounds = sounds.participant_needs(&activity.participant_needs);
            }
            if !activity.additional_infos.is_empty() {
                sounds = sounds.additional_infos(&activity.additional_infos);
            }

            let fire_at = effective_start - i64::from(minutes) * 60_000;
            alerts.insert(
                fire_at,
                Alert::new(
                    format!("{}-pre-{}", activity.id, minutes),
                    Some(activity.id),
                    sounds.build(&self.sounds, |path, custom| self.cache.fetch(path, custom)),
                ),
            );
        }

        if activity.zvolavanie {
            let call_key = if activity.activity_type == ActivityType::Vecierka {
                ConfigurableSound::Vecernicek
            } else {
                ConfigurableSound::Zvolavacka
            };

            // The alert fires early by the recording's length so the call
            // ends right at the activity start. Without a measurable
            // recording the start time stays undisplaced.
            let mut fire_at = effective_start;
            match self.call_duration_ms(call_key).await {
                Some(duration_ms) => fire_at -= duration_ms,
                None => warn!(
                    "could not measure the call sound for activity {}, using the plain start time",
                    activity.id
                ),
            }

            alerts.insert(
                fire_at,
                Alert::new(
                    format!("{}-zvolavanie", activity.id),
                    Some(activity.id),
                    SoundSequenceBuilder::new()
                        .sound(call_key)
                        .build(&self.sounds, |path, custom| self.cache.fetch(path, custom)),
                ),
            );
        }

        Ok(alerts)
    }

    async fn call_duration_ms(&self, key: ConfigurableSound) -> Option<i64> {
        let sound = self.sounds.get(key)?;
        let clip = self.cache.fetch(&sound.path, true).resolve().await?;
        Some(clip.duration_ms())
    }
}
