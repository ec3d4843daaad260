//! Per-event configurable sounds: role metadata and the resolution map
//! the builder consults at compile time.

use std::collections::HashMap;

use super::keys::ConfigurableSound;
use crate::model::Event;

/// A resolved audio asset: what it says and where it lives.
#[derive(Debug, Clone, PartialEq)]
pub struct Sound {
    pub content: String,
    pub path: String,
}

impl ConfigurableSound {
    /// Announcer-facing label, used as the display content of resolved
    /// configurable sounds.
    pub fn label(&self) -> &'static str {
        match self {
            Self::AlertStart => "Znelka - začiatok hlásenia",
            Self::AlertEnd => "Znelka - koniec hlásenia",
            Self::AdditionalJingle => "Znelka - ďalšie informácie",
            Self::DelayStart => "Znelka - začiatok meškania",
            Self::DelayEnd => "Znelka - koniec meškania",
            Self::Zvolavacka => "Zvolávačka",
            Self::Vecernicek => "Večerníček",
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, Self::AlertStart | Self::Zvolavacka | Self::Vecernicek)
    }

    /// Fallback role used when this one is not assigned on the event.
    pub fn alternate(&self) -> Option<ConfigurableSound> {
        match self {
            Self::DelayStart => Some(Self::AlertStart),
            Self::DelayEnd => Some(Self::AlertEnd),
            _ => None,
        }
    }
}

/// Configurable-key resolution map, rebuilt whenever the active event's
/// sound assignments change.
#[derive(Debug, Clone, Default)]
pub struct EventSoundMap {
    sounds: HashMap<ConfigurableSound, Sound>,
}

impl EventSoundMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_event(event: &Event) -> Self {
        let sounds = event
            .sounds
            .iter()
            .map(|(key, custom)| {
                (
                    *key,
                    Sound {
                        content: key.label().to_string(),
                        path: custom.path.clone(),
                    },
                )
            })
            .collect();
        Self { sounds }
    }

    pub fn insert(&mut self, key: ConfigurableSound, sound: Sound) {
        self.sounds.insert(key, sound);
    }

    pub fn get(&self, key: ConfigurableSound) -> Option<&Sound> {
        self.sounds.get(&key)
    }

    /// All required roles assigned. Compilation refuses to run otherwise.
    pub fn is_valid(&self) -> bool {
        self.missing_required().is_none()
    }

    pub fn missing_required(&self) -> Option<ConfigurableSound> {
        ConfigurableSound::ALL
            .iter()
            .copied()
            .find(|k| k.is_required() && !self.sounds.contains_key(k))
    }

    /// Walk the fallback chain, one hop per unassigned role. The
    /// alternate table is acyclic so this terminates in at most two
    /// steps.
    pub fn resolve(&self, key: ConfigurableSound) -> Option<&Sound> {
        let mut current = key;
        loop {
            if let Some(sound) = self.sounds.get(&current) {
                return Some(sound);
            }
            match current.alternate() {
                Some(next) => current = next,
                None => return None,
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConfigurableSound, &Sound)> {
        self.sounds.iter()
    }
}
