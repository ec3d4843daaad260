pub mod builder;
pub mod catalogue;
pub mod configurable;
pub mod keys;

pub use builder::SoundSequenceBuilder;
pub use configurable::{EventSoundMap, Sound};
pub use keys::{
    ActivityType, AdditionalInfo, ConfigurableSound, LocationSound, NumberSound, ParticipantNeed,
    PhraseSound, SoundToken, StaticLocation,
};
