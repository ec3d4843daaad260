//! Assembles announcement token sequences. The builder is a value: every
//! chaining call consumes the receiver and returns an extended copy, so a
//! kept clone is never affected by later calls.

use std::sync::Arc;

use tracing::warn;

use super::catalogue::fixed_entry;
use super::configurable::EventSoundMap;
use super::keys::{ConfigurableSound, LocationSound, NumberSound, PhraseSound, SoundToken};
use crate::announcer::cache::SoundHandle;
use crate::announcer::engine::CompiledSound;
use crate::common::errors::SoundError;
use crate::model::Location;
use crate::sounds::keys::{AdditionalInfo, ParticipantNeed};

#[derive(Debug, Clone, Default)]
pub struct SoundSequenceBuilder {
    tokens: Vec<SoundToken>,
    alert_end: bool,
}

impl SoundSequenceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A full announcement: opens with the alert-start jingle and closes
    /// with alert-end when built.
    pub fn announcement() -> Self {
        Self {
            tokens: vec![SoundToken::Configurable(ConfigurableSound::AlertStart)],
            alert_end: true,
        }
    }

    pub fn sound(mut self, token: impl Into<SoundToken>) -> Self {
        self.tokens.push(token.into());
        self
    }

    pub fn sounds(mut self, tokens: impl IntoIterator<Item = SoundToken>) -> Self {
        self.tokens.extend(tokens);
        self
    }

    /// Spoken form of `value`, valid for 1..=69 only.
    pub fn number(mut self, value: i64) -> Result<Self, SoundError> {
        self.tokens
            .extend(number_tokens(value)?.into_iter().map(SoundToken::Number));
        Ok(self)
    }

    /// "`h` hours and `m` minutes", with Slovak plural grades for the
    /// units. Zero contributes nothing.
    pub fn time(mut self, minutes: u32) -> Result<Self, SoundError> {
        let hours = minutes / 60;
        let rem = minutes % 60;
        let mut tokens: Vec<SoundToken> = Vec::new();

        if hours > 0 {
            tokens.extend(
                number_tokens(hours as i64)?
                    .into_iter()
                    .map(SoundToken::Number),
            );
            tokens.push(SoundToken::Phrase(match hours {
                1 => PhraseSound::HoursOne,
                2..=4 => PhraseSound::HoursFew,
                _ => PhraseSound::HoursMany,
            }));
        }
        if rem > 0 {
            if !tokens.is_empty() {
                tokens.push(SoundToken::Phrase(PhraseSound::And));
            }
            tokens.extend(
                number_tokens(rem as i64)?
                    .into_iter()
                    .map(SoundToken::Number),
            );
            tokens.push(SoundToken::Phrase(match rem {
                1 => PhraseSound::MinutesOne,
                2..=4 => PhraseSound::MinutesFew,
                _ => PhraseSound::MinutesMany,
            }));
        }

        self.tokens.extend(tokens);
        Ok(self)
    }

    /// One synthetic token carrying the location verbatim; locations are
    /// event data and never go through the catalogue or the event map.
    pub fn location(mut self, location: &Location) -> Self {
        self.tokens.push(SoundToken::Location(LocationSound {
            name: location.name.clone(),
            content: location.content.clone(),
            path: location.path.clone(),
            is_static: location.is_static,
        }));
        self
    }

    /// "You will need" followed by the listed items. Callers skip this
    /// for empty lists.
    pub fn participant_needs(mut self, needs: &[ParticipantNeed]) -> Self {
        self.tokens.push(SoundToken::Phrase(PhraseSound::WillNeed));
        self.tokens
            .extend(needs.iter().copied().map(SoundToken::Need));
        self
    }

    /// The additional-info jingle followed by the listed notes.
    pub fn additional_infos(mut self, infos: &[AdditionalInfo]) -> Self {
        self.tokens
            .push(SoundToken::Configurable(ConfigurableSound::AdditionalJingle));
        self.tokens
            .extend(infos.iter().copied().map(SoundToken::Info));
        self
    }

    /// The token sequence as built, including the closing alert-end when
    /// this is an announcement.
    pub fn sequence(&self) -> Vec<SoundToken> {
        let mut tokens = self.tokens.clone();
        if self.alert_end {
            tokens.push(SoundToken::Configurable(ConfigurableSound::AlertEnd));
        }
        tokens
    }

    /// Resolve every token to a playable sound. Configurable keys go
    /// through the event map and its fallback chain; anything that
    /// resolves nowhere is logged and dropped, never fatal. `load` runs
    /// for every resolved token, cached or not; the cache deduplicates.
    pub fn build<F>(self, sounds: &EventSoundMap, mut load: F) -> Vec<Arc<CompiledSound>>
    where
        F: FnMut(&str, bool) -> SoundHandle,
    {
        let tokens = self.sequence();
        let mut out = Vec::with_capacity(tokens.len());

        for token in tokens {
            match &token {
                SoundToken::Location(loc) => {
                    let handle = load(&loc.path, !loc.is_static);
                    out.push(Arc::new(CompiledSound::new(
                        loc.content.clone(),
                        loc.path.clone(),
                        token.clone(),
                        handle,
                    )));
                }
                SoundToken::Configurable(key) => match sounds.resolve(*key) {
                    Some(sound) => {
                        let handle = load(&sound.path, true);
                        out.push(Arc::new(CompiledSound::new(
                            sound.content.clone(),
                            sound.path.clone(),
                            token.clone(),
                            handle,
                        )));
                    }
                    None => {
                        warn!("no sound assigned for configurable key '{}', dropping it", key);
                    }
                },
                _ => match fixed_entry(&token) {
                    Some(entry) => {
                        let handle = load(entry.path, false);
                        out.push(Arc::new(CompiledSound::new(
                            entry.content.to_string(),
                            entry.path.to_string(),
                            token.clone(),
                            handle,
                        )));
                    }
                    None => {
                        warn!("no fixed recording for token {:?}, dropping it", token);
                    }
                },
            }
        }

        out
    }
}

fn digit_token(n: u32) -> Option<NumberSound> {
    Some(match n {
        1 => NumberSound::One,
        2 => NumberSound::Two,
        3 => NumberSound::Three,
        4 => NumberSound::Four,
        5 => NumberSound::Five,
        6 => NumberSound::Six,
        7 => NumberSound::Seven,
        8 => NumberSound::Eight,
        9 => NumberSound::Nine,
        10 => NumberSound::Ten,
        11 => NumberSound::Eleven,
        12 => NumberSound::Twelve,
        13 => NumberSound::Thirteen,
        14 => NumberSound::Fourteen,
        15 => NumberSound::Fifteen,
        16 => NumberSound::Sixteen,
        17 => NumberSound::Seventeen,
        18 => NumberSound::Eighteen,
        19 => NumberSound::Nineteen,
        _ => return None,
    })
}

fn tens_token(n: u32) -> Option<NumberSound> {
    Some(match n {
        20 => NumberSound::Twenty,
        30 => NumberSound::Thirty,
        40 => NumberSound::Forty,
        50 => NumberSound::Fifty,
        60 => NumberSound::Sixty,
        _ => return None,
    })
}

/// Tens word plus ones word, with the irregular ×1/×2 endings after a
/// tens word.
fn number_tokens(value: i64) -> Result<Vec<NumberSound>, SoundError> {
    if !(1..=69).contains(&value) {
        return Err(SoundError::NumberOutOfRange(value));
    }
    let mut n = value as u32;
    let mut out = Vec::with_capacity(2);

    if n >= 20 {
        let tens = n / 10 * 10;
        out.push(tens_token(tens).ok_or(SoundError::NumberOutOfRange(value))?);
        n %= 10;
        if n == 1 {
            out.push(NumberSound::TimesOne);
            n = 0;
        } else if n == 2 {
            out.push(NumberSound::TimesTwo);
            n = 0;
        }
    }
    if n > 0 {
        out.push(digit_token(n).ok_or(SoundError::NumberOutOfRange(value))?);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn stub_loader() -> impl FnMut(&str, bool) -> SoundHandle {
        |_path, _custom| SoundHandle::ready(None)
    }

    fn numbers(value: i64) -> Vec<NumberSound> {
        number_tokens(value).unwrap()
    }

    #[test]
    fn small_numbers_are_single_tokens() {
        assert_eq!(numbers(1), vec![NumberSound::One]);
        assert_eq!(numbers(10), vec![NumberSound::Ten]);
        assert_eq!(numbers(19), vec![NumberSound::Nineteen]);
    }

    #[test]
    fn tens_decomposition_with_irregular_endings() {
        assert_eq!(numbers(20), vec![NumberSound::Twenty]);
        assert_eq!(numbers(21), vec![NumberSound::Twenty, NumberSound::TimesOne]);
        assert_eq!(numbers(22), vec![NumberSound::Twenty, NumberSound::TimesTwo]);
        assert_eq!(numbers(23), vec![NumberSound::Twenty, NumberSound::Three]);
        assert_eq!(numbers(45), vec![NumberSound::Forty, NumberSound::Five]);
        assert_eq!(numbers(61), vec![NumberSound::Sixty, NumberSound::TimesOne]);
        assert_eq!(numbers(69), vec![NumberSound::Sixty, NumberSound::Nine]);
    }

    #[test]
    fn whole_range_follows_the_grouping_rules() {
        for n in 1..=69i64 {
            let tokens = numbers(n);
            if n < 20 || n % 10 == 0 {
                assert_eq!(tokens.len(), 1, "n={}", n);
            } else {
                assert_eq!(tokens.len(), 2, "n={}", n);
            }
            let has_x1 = tokens.contains(&NumberSound::TimesOne);
            let has_x2 = tokens.contains(&NumberSound::TimesTwo);
            assert_eq!(has_x1, n >= 20 && n % 10 == 1, "n={}", n);
            assert_eq!(has_x2, n >= 20 && n % 10 == 2, "n={}", n);
        }
    }

    #[test]
    fn out_of_range_numbers_fail() {
        for n in [0, 70, -5, 100] {
            assert!(matches!(
                SoundSequenceBuilder::new().number(n),
                Err(SoundError::NumberOutOfRange(v)) if v == n
            ));
        }
    }

    #[test]
    fn time_with_hours_and_minutes() {
        let b = SoundSequenceBuilder::new().time(90).unwrap();
        assert_eq!(
            b.sequence(),
            vec![
                SoundToken::Number(NumberSound::One),
                SoundToken::Phrase(PhraseSound::HoursOne),
                SoundToken::Phrase(PhraseSound::And),
                SoundToken::Number(NumberSound::Thirty),
                SoundToken::Phrase(PhraseSound::MinutesMany),
            ]
        );
    }

    #[test]
    fn time_minutes_only_has_no_conjunction() {
        let b = SoundSequenceBuilder::new().time(45).unwrap();
        assert_eq!(
            b.sequence(),
            vec![
                SoundToken::Number(NumberSound::Forty),
                SoundToken::Number(NumberSound::Five),
                SoundToken::Phrase(PhraseSound::MinutesMany),
            ]
        );
    }

    #[test]
    fn time_grades_the_units() {
        let b = SoundSequenceBuilder::new().time(60).unwrap();
        assert_eq!(
            b.sequence(),
            vec![
                SoundToken::Number(NumberSound::One),
                SoundToken::Phrase(PhraseSound::HoursOne),
            ]
        );

        let b = SoundSequenceBuilder::new().time(180).unwrap();
        assert_eq!(
            b.sequence(),
            vec![
                SoundToken::Number(NumberSound::Three),
                SoundToken::Phrase(PhraseSound::HoursFew),
            ]
        );

        let b = SoundSequenceBuilder::new().time(2).unwrap();
        assert_eq!(
            b.sequence(),
            vec![
                SoundToken::Number(NumberSound::Two),
                SoundToken::Phrase(PhraseSound::MinutesFew),
            ]
        );

        let b = SoundSequenceBuilder::new().time(1).unwrap();
        assert_eq!(
            b.sequence(),
            vec![
                SoundToken::Number(NumberSound::One),
                SoundToken::Phrase(PhraseSound::MinutesOne),
            ]
        );
    }

    #[test]
    fn time_zero_adds_nothing() {
        let b = SoundSequenceBuilder::new().time(0).unwrap();
        assert!(b.sequence().is_empty());
    }

    #[test]
    fn announcement_is_bracketed_by_jingles() {
        let b = SoundSequenceBuilder::announcement();
        assert_eq!(
            b.sequence(),
            vec![
                SoundToken::Configurable(ConfigurableSound::AlertStart),
                SoundToken::Configurable(ConfigurableSound::AlertEnd),
            ]
        );
        assert!(SoundSequenceBuilder::new().sequence().is_empty());
    }

    #[test]
    fn kept_clones_are_unaffected_by_later_calls() {
        let base = SoundSequenceBuilder::new().sound(PhraseSound::NextActivity);
        let five = base.clone().number(5).unwrap();
        let seven = base.clone().number(7).unwrap();

        assert_eq!(base.sequence().len(), 1);
        assert_eq!(five.sequence().len(), 2);
        assert_eq!(seven.sequence().len(), 2);
        assert_eq!(five.sequence()[1], SoundToken::Number(NumberSound::Five));
        assert_eq!(seven.sequence()[1], SoundToken::Number(NumberSound::Seven));
    }

    #[test]
    fn build_resolves_fixed_and_location_tokens() {
        let loads: RefCell<Vec<(String, bool)>> = RefCell::new(Vec::new());
        let location = Location {
            id: 3,
            name: "Lúka".to_string(),
            content: "na lúke".to_string(),
            path: "/uploads/luka.mp3".to_string(),
            is_static: false,
        };

        let sounds = SoundSequenceBuilder::new()
            .sound(PhraseSound::NextActivity)
            .location(&location)
            .build(&EventSoundMap::new(), |path, custom| {
                loads.borrow_mut().push((path.to_string(), custom));
                SoundHandle::ready(None)
            });

        assert_eq!(sounds.len(), 2);
        assert_eq!(sounds[0].content, "Najbližší program");
        assert_eq!(sounds[1].content, "na lúke");
        assert_eq!(
            *loads.borrow(),
            vec![
                ("/sounds/other/next_activity.mp3".to_string(), false),
                ("/uploads/luka.mp3".to_string(), true),
            ]
        );
    }

    #[test]
    fn build_drops_unresolvable_tokens() {
        use crate::sounds::keys::ActivityType;

        // No event sounds assigned: alert_start/alert_end cannot resolve,
        // and the wake-up type has no fixed recording.
        let sounds = SoundSequenceBuilder::announcement()
            .sound(ActivityType::WakeUp)
            .sound(PhraseSound::WakeUpStart)
            .build(&EventSoundMap::new(), stub_loader());

        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].content, "Bolo");
    }

    #[test]
    fn build_follows_the_alternate_chain() {
        use crate::sounds::configurable::Sound;

        let mut map = EventSoundMap::new();
        map.insert(
            ConfigurableSound::AlertStart,
            Sound {
                content: "Znelka - začiatok hlásenia".to_string(),
                path: "/custom/start.mp3".to_string(),
            },
        );

        let loads: RefCell<Vec<(String, bool)>> = RefCell::new(Vec::new());
        let sounds = SoundSequenceBuilder::new()
            .sound(ConfigurableSound::DelayStart)
            .sound(ConfigurableSound::DelayEnd)
            .build(&map, |path, custom| {
                loads.borrow_mut().push((path.to_string(), custom));
                SoundHandle::ready(None)
            });

        // delay_start resolved through alert_start; delay_end had no
        // fallback target assigned and was dropped.
        assert_eq!(sounds.len(), 1);
        assert_eq!(sounds[0].path, "/custom/start.mp3");
        assert_eq!(*loads.borrow(), vec![("/custom/start.mp3".to_string(), true)]);
    }
}
