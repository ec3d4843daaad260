//! Closed key sets for every sound the announcer can speak. Wire values
//! are the serde-renamed identifiers; the spoken Slovak lives in the
//! catalogue entries, not in the keys.

use serde::{Deserialize, Serialize};

/// Recorded number words. Numbers up to nineteen and the tens are single
/// recordings; `TimesOne`/`TimesTwo` are the irregular endings glued onto
/// a tens word ("dvadsať...jeden").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NumberSound {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Eleven,
    Twelve,
    Thirteen,
    Fourteen,
    Fifteen,
    Sixteen,
    Seventeen,
    Eighteen,
    Nineteen,
    Twenty,
    Thirty,
    Forty,
    Fifty,
    Sixty,
    TimesOne,
    TimesTwo,
}

impl NumberSound {
    pub const ALL: &'static [Self] = &[
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Eleven,
        Self::Twelve,
        Self::Thirteen,
        Self::Fourteen,
        Self::Fifteen,
        Self::Sixteen,
        Self::Seventeen,
        Self::Eighteen,
        Self::Nineteen,
        Self::Twenty,
        Self::Thirty,
        Self::Forty,
        Self::Fifty,
        Self::Sixty,
        Self::TimesOne,
        Self::TimesTwo,
    ];
}

/// Fixed connective and jingle-free phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhraseSound {
    HoursOne,
    HoursFew,
    HoursMany,
    MinutesOne,
    MinutesFew,
    MinutesMany,
    And,
    NextActivity,
    StartsIn,
    WillNeed,
    DelayIntro,
    DelayOutro,
    Desiata,
    Olovrant,
    SecondDinner,
    WakeUpStart,
    WakeUpEnd,
}

impl PhraseSound {
    pub const ALL: &'static [Self] = &[
        Self::HoursOne,
        Self::HoursFew,
        Self::HoursMany,
        Self::MinutesOne,
        Self::MinutesFew,
        Self::MinutesMany,
        Self::And,
        Self::NextActivity,
        Self::StartsIn,
        Self::WillNeed,
        Self::DelayIntro,
        Self::DelayOutro,
        Self::Desiata,
        Self::Olovrant,
        Self::SecondDinner,
        Self::WakeUpStart,
        Self::WakeUpEnd,
    ];
}

/// Per-event assignable roles. These resolve through the event's sound
/// map, never through the fixed catalogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurableSound {
    AlertStart,
    AlertEnd,
    AdditionalJingle,
    DelayStart,
    DelayEnd,
    Zvolavacka,
    Vecernicek,
}

impl ConfigurableSound {
    pub const ALL: &'static [Self] = &[
        Self::AlertStart,
        Self::AlertEnd,
        Self::AdditionalJingle,
        Self::DelayStart,
        Self::DelayEnd,
        Self::Zvolavacka,
        Self::Vecernicek,
    ];

    /// Wire key, also used in log and error text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AlertStart => "alert_start",
            Self::AlertEnd => "alert_end",
            Self::AdditionalJingle => "additional_jingle",
            Self::DelayStart => "delay_start",
            Self::DelayEnd => "delay_end",
            Self::Zvolavacka => "zvolavacka",
            Self::Vecernicek => "vecernicek",
        }
    }
}

impl std::fmt::Display for ConfigurableSound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Timetable activity kinds. `WakeUp` has no recording of its own; the
/// wake-up announcement is assembled from `WakeUpStart`/`WakeUpEnd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    WakeUp,
    Rozcvicka,
    Vecierka,
    Breakfast,
    Lunch,
    Dinner,
    GameInside,
    GameOutside,
    Sport,
    Lecture,
    Seminar,
    Vyhodnotenie,
}

impl ActivityType {
    pub const ALL: &'static [Self] = &[
        Self::WakeUp,
        Self::Rozcvicka,
        Self::Vecierka,
        Self::Breakfast,
        Self::Lunch,
        Self::Dinner,
        Self::GameInside,
        Self::GameOutside,
        Self::Sport,
        Self::Lecture,
        Self::Seminar,
        Self::Vyhodnotenie,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParticipantNeed {
    PenPerPerson,
    PaperPerPerson,
    ScarfPerPerson,
    PenPerGroup,
    PaperPerGroup,
    ScarfPerGroup,
    PhysicalForce,
    MentalForce,
    WarmClothes,
    WaterProofClothes,
    SportClothes,
    DestroyClothes,
}

impl ParticipantNeed {
    pub const ALL: &'static [Self] = &[
        Self::PenPerPerson,
        Self::PaperPerPerson,
        Self::ScarfPerPerson,
        Self::PenPerGroup,
        Self::PaperPerGroup,
        Self::ScarfPerGroup,
        Self::PhysicalForce,
        Self::MentalForce,
        Self::WarmClothes,
        Self::WaterProofClothes,
        Self::SportClothes,
        Self::DestroyClothes,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdditionalInfo {
    ChangingShoes,
    SwitchDuties,
    CleanUp,
    ChillMode,
}

impl AdditionalInfo {
    pub const ALL: &'static [Self] = &[
        Self::ChangingShoes,
        Self::SwitchDuties,
        Self::CleanUp,
        Self::ChillMode,
    ];
}

/// Built-in location recordings shipped with the fixed sound tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StaticLocation {
    Canteen,
    MainEntrance,
    Gym,
    BottomFloor,
    Spolocenska,
    Outside,
}

impl StaticLocation {
    pub const ALL: &'static [Self] = &[
        Self::Canteen,
        Self::MainEntrance,
        Self::Gym,
        Self::BottomFloor,
        Self::Spolocenska,
        Self::Outside,
    ];
}

/// Location descriptor carried inline in a token. Locations are event
/// data, not catalogue constants, so the token holds everything needed
/// to speak them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSound {
    pub name: String,
    pub content: String,
    pub path: String,
    pub is_static: bool,
}

/// One semantic unit of an announcement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "key", rename_all = "camelCase")]
pub enum SoundToken {
    Number(NumberSound),
    Phrase(PhraseSound),
    Configurable(ConfigurableSound),
    Activity(ActivityType),
    Need(ParticipantNeed),
    Info(AdditionalInfo),
    StaticLocation(StaticLocation),
    Location(LocationSound),
}

impl From<NumberSound> for SoundToken {
    fn from(v: NumberSound) -> Self {
        Self::Number(v)
    }
}

impl From<PhraseSound> for SoundToken {
    fn from(v: PhraseSound) -> Self {
        Self::Phrase(v)
    }
}

impl From<ConfigurableSound> for SoundToken {
    fn from(v: ConfigurableSound) -> Self {
        Self::Configurable(v)
    }
}

impl From<ActivityType> for SoundToken {
    fn from(v: ActivityType) -> Self {
        Self::Activity(v)
    }
}

impl From<ParticipantNeed> for SoundToken {
    fn from(v: ParticipantNeed) -> Self {
        Self::Need(v)
    }
}

impl From<AdditionalInfo> for SoundToken {
    fn from(v: AdditionalInfo) -> Self {
        Self::Info(v)
    }
}

impl From<StaticLocation> for SoundToken {
    fn from(v: StaticLocation) -> Self {
        Self::StaticLocation(v)
    }
}

impl From<LocationSound> for SoundToken {
    fn from(v: LocationSound) -> Self {
        Self::Location(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configurable_wire_keys_match_display() {
        for key in ConfigurableSound::ALL {
            let json = serde_json::to_string(key).unwrap();
            assert_eq!(json, format!("\"{}\"", key));
        }
    }

    #[test]
    fn token_serialization_is_kind_tagged() {
        let token = SoundToken::Number(NumberSound::TimesOne);
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["kind"], "number");
        assert_eq!(json["key"], "TIMES_ONE");

        let token = SoundToken::Configurable(ConfigurableSound::AlertStart);
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["kind"], "configurable");
        assert_eq!(json["key"], "alert_start");
    }

    #[test]
    fn location_token_round_trips() {
        let token = SoundToken::Location(LocationSound {
            name: "Jedáleň".to_string(),
            content: "v jedáleni".to_string(),
            path: "/sounds/activities/locations/canteen.mp3".to_string(),
            is_static: true,
        });
        let json = serde_json::to_string(&token).unwrap();
        let back: SoundToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
        assert!(json.contains("\"kind\":\"location\""));
        assert!(json.contains("\"isStatic\":true"));
    }
}
