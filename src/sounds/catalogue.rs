//! The fixed sound catalogue: every built-in recording, keyed by token.
//! Paths are relative to the fixed sound root.

use super::keys::{
    ActivityType, AdditionalInfo, NumberSound, ParticipantNeed, PhraseSound, SoundToken,
    StaticLocation,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedEntry {
    pub path: &'static str,
    /// Display text, the spoken phrase.
    pub content: &'static str,
}

const fn entry(path: &'static str, content: &'static str) -> FixedEntry {
    FixedEntry { path, content }
}

pub fn number_entry(key: NumberSound) -> FixedEntry {
    match key {
        NumberSound::One => entry("/sounds/numbers/1.mp3", "1"),
        NumberSound::Two => entry("/sounds/numbers/2.mp3", "2"),
        NumberSound::Three => entry("/sounds/numbers/3.mp3", "3"),
        NumberSound::Four => entry("/sounds/numbers/4.mp3", "4"),
        NumberSound::Five => entry("/sounds/numbers/5.mp3", "5"),
        NumberSound::Six => entry("/sounds/numbers/6.mp3", "6"),
        NumberSound::Seven => entry("/sounds/numbers/7.mp3", "7"),
        NumberSound::Eight => entry("/sounds/numbers/8.mp3", "8"),
        NumberSound::Nine => entry("/sounds/numbers/9.mp3", "9"),
        NumberSound::Ten => entry("/sounds/numbers/10.mp3", "10"),
        NumberSound::Eleven => entry("/sounds/numbers/11.mp3", "11"),
        NumberSound::Twelve => entry("/sounds/numbers/12.mp3", "12"),
        NumberSound::Thirteen => entry("/sounds/numbers/13.mp3", "13"),
        NumberSound::Fourteen => entry("/sounds/numbers/14.mp3", "14"),
        NumberSound::Fifteen => entry("/sounds/numbers/15.mp3", "15"),
        NumberSound::Sixteen => entry("/sounds/numbers/16.mp3", "16"),
        NumberSound::Seventeen => entry("/sounds/numbers/17.mp3", "17"),
        NumberSound::Eighteen => entry("/sounds/numbers/18.mp3", "18"),
        NumberSound::Nineteen => entry("/sounds/numbers/19.mp3", "19"),
        NumberSound::Twenty => entry("/sounds/numbers/20.mp3", "20"),
        NumberSound::Thirty => entry("/sounds/numbers/30.mp3", "30"),
        NumberSound::Forty => entry("/sounds/numbers/40.mp3", "40"),
        NumberSound::Fifty => entry("/sounds/numbers/50.mp3", "50"),
        NumberSound::Sixty => entry("/sounds/numbers/60.mp3", "60"),
        NumberSound::TimesOne => entry("/sounds/numbers/X_1.mp3", "x1"),
        NumberSound::TimesTwo => entry("/sounds/numbers/X_2.mp3", "x2"),
    }
}

pub fn phrase_entry(key: PhraseSound) -> FixedEntry {
    match key {
        PhraseSound::HoursOne => entry("/sounds/other/hours_1.mp3", "hodina"),
        PhraseSound::HoursFew => entry("/sounds/other/hours_2_4.mp3", "hodiny"),
        PhraseSound::HoursMany => entry("/sounds/other/hours_5_plus.mp3", "hodín"),
        PhraseSound::MinutesOne => entry("/sounds/other/minutes_1.mp3", "minúta"),
        PhraseSound::MinutesFew => entry("/sounds/other/minutes_2_4.mp3", "minúty"),
        PhraseSound::MinutesMany => entry("/sounds/other/minutes_5_plus.mp3", "minút"),
        PhraseSound::And => entry("/sounds/other/and.mp3", "a"),
        PhraseSound::NextActivity => {
            entry("/sounds/other/next_activity.mp3", "Najbližší program")
        }
        PhraseSound::StartsIn => entry("/sounds/other/starts_in.mp3", "sa začína o"),
        PhraseSound::WillNeed => {
            entry("/sounds/other/will_need.mp3", "Na programe budete potrebovať")
        }
        PhraseSound::DelayIntro => entry(
            "/sounds/other/delay_intro.mp3",
            "bude meškať so svojím začiatkom",
        ),
        PhraseSound::DelayOutro => entry(
            "/sounds/other/delay_outro.mp3",
            "Ohlásená doba meškania sa môže zmeniť. Za vzniknuté meškanie sa ospravedlňujeme.",
        ),
        PhraseSound::Desiata => {
            entry("/sounds/other/desiata.mp3", "Desiata je pre vás pripravená")
        }
        PhraseSound::Olovrant => {
            entry("/sounds/other/olovrant.mp3", "Olovrant je pre vás pripravený")
        }
        PhraseSound::SecondDinner => entry(
            "/sounds/other/second_dinner.mp3",
            "Druhá večera je pre vás pripravená",
        ),
        PhraseSound::WakeUpStart => entry("/sounds/other/budicek_start.mp3", "Bolo"),
        PhraseSound::WakeUpEnd => {
            entry("/sounds/other/budicek_end.mp3", ", nasleduje budíček.")
        }
    }
}

/// `WakeUp` deliberately has no recording; its announcement is assembled
/// from the wake-up phrases instead.
pub fn activity_entry(key: ActivityType) -> Option<FixedEntry> {
    match key {
        ActivityType::WakeUp => None,
        ActivityType::Rozcvicka => {
            Some(entry("/sounds/activities/types/rozcvicka.mp3", "Rozcvička"))
        }
        ActivityType::Vecierka => {
            Some(entry("/sounds/activities/types/vecierka.mp3", "Večierka"))
        }
        ActivityType::Breakfast => {
            Some(entry("/sounds/activities/types/breakfast.mp3", "Raňajky"))
        }
        ActivityType::Lunch => Some(entry("/sounds/activities/types/lunch.mp3", "Obed")),
        ActivityType::Dinner => Some(entry("/sounds/activities/types/dinner.mp3", "Večera")),
        ActivityType::GameInside => {
            Some(entry("/sounds/activities/types/game_inside.mp3", "Hra na dnu"))
        }
        ActivityType::GameOutside => {
            Some(entry("/sounds/activities/types/game_outside.mp3", "Hra vonku"))
        }
        ActivityType::Sport => Some(entry("/sounds/activities/types/sport.mp3", "Športy")),
        ActivityType::Lecture => {
            Some(entry("/sounds/activities/types/lecture.mp3", "Prednášky"))
        }
        ActivityType::Seminar => {
            Some(entry("/sounds/activities/types/seminar.mp3", "Semináre"))
        }
        ActivityType::Vyhodnotenie => Some(entry(
            "/sounds/activities/types/vyhodnotenie.mp3",
            "Vyhodnotenie",
        )),
    }
}

pub fn static_location_entry(key: StaticLocation) -> FixedEntry {
    match key {
        StaticLocation::Canteen => {
            entry("/sounds/activities/locations/canteen.mp3", "v jedáleni")
        }
        StaticLocation::MainEntrance => entry(
            "/sounds/activities/locations/main_entrance.mp3",
            "pred hl. vchodom",
        ),
        StaticLocation::Gym => entry("/sounds/activities/locations/gym.mp3", "v telocvični"),
        StaticLocation::BottomFloor => entry(
            "/sounds/activities/locations/bottom_floor.mp3",
            "na spodnom poschodí",
        ),
        StaticLocation::Spolocenska => entry(
            "/sounds/activities/locations/spolocenska.mp3",
            "v spoločenskej miestnosti",
        ),
        StaticLocation::Outside => entry("/sounds/activities/locations/outside.mp3", "vonku"),
    }
}

pub fn need_entry(key: ParticipantNeed) -> FixedEntry {
    match key {
        ParticipantNeed::PenPerPerson => {
            entry("/sounds/participant_needs/pen_per_person.mp3", "Pero na osobu")
        }
        ParticipantNeed::PaperPerPerson => entry(
            "/sounds/participant_needs/paper_per_person.mp3",
            "Papier na osobu",
        ),
        ParticipantNeed::ScarfPerPerson => entry(
            "/sounds/participant_needs/scarf_per_person.mp3",
            "Šatka na osobu",
        ),
        ParticipantNeed::PenPerGroup => entry(
            "/sounds/participant_needs/pen_per_group.mp3",
            "Pero na družinku",
        ),
        ParticipantNeed::PaperPerGroup => entry(
            "/sounds/participant_needs/paper_per_group.mp3",
            "Papier na družinku",
        ),
        ParticipantNeed::ScarfPerGroup => entry(
            "/sounds/participant_needs/scarf_per_group.mp3",
            "Šatka na družinku",
        ),
        ParticipantNeed::PhysicalForce => entry(
            "/sounds/participant_needs/physical_force.mp3",
            "Fyzická sila",
        ),
        ParticipantNeed::MentalForce => {
            entry("/sounds/participant_needs/mental_force.mp3", "Mentálna sila")
        }
        ParticipantNeed::WarmClothes => entry(
            "/sounds/participant_needs/warm_clothes.mp3",
            "Teplé oblečenie",
        ),
        ParticipantNeed::WaterProofClothes => entry(
            "/sounds/participant_needs/water_proof_clothes.mp3",
            "Nepremokavé oblečenie",
        ),
        ParticipantNeed::SportClothes => entry(
            "/sounds/participant_needs/sport_clothes.mp3",
            "Športové oblečenie",
        ),
        ParticipantNeed::DestroyClothes => entry(
            "/sounds/participant_needs/destroy_clothes.mp3",
            "Oblečenie na zničenie",
        ),
    }
}

pub fn info_entry(key: AdditionalInfo) -> FixedEntry {
    match key {
        AdditionalInfo::ChangingShoes => {
            entry("/sounds/additional_info/changing_shoes.mp3", "Prezúvanie")
        }
        AdditionalInfo::SwitchDuties => entry(
            "/sounds/additional_info/switch_duties.mp3",
            "Striedanie kroniky/služ. dňa",
        ),
        AdditionalInfo::CleanUp => {
            entry("/sounds/additional_info/clean_up.mp3", "Upracte po sebe")
        }
        AdditionalInfo::ChillMode => {
            entry("/sounds/additional_info/chill_mode.mp3", "Kľudový režim")
        }
    }
}

/// Catalogue lookup for a token. Configurable and inline location tokens
/// resolve elsewhere and return `None` here.
pub fn fixed_entry(token: &SoundToken) -> Option<FixedEntry> {
    match token {
        SoundToken::Number(k) => Some(number_entry(*k)),
        SoundToken::Phrase(k) => Some(phrase_entry(*k)),
        SoundToken::Activity(k) => activity_entry(*k),
        SoundToken::Need(k) => Some(need_entry(*k)),
        SoundToken::Info(k) => Some(info_entry(*k)),
        SoundToken::StaticLocation(k) => Some(static_location_entry(*k)),
        SoundToken::Configurable(_) | SoundToken::Location(_) => None,
    }
}

/// Every token backed by a fixed recording, for preloading.
pub fn all_fixed_tokens() -> impl Iterator<Item = SoundToken> {
    NumberSound::ALL
        .iter()
        .copied()
        .map(SoundToken::Number)
        .chain(PhraseSound::ALL.iter().copied().map(SoundToken::Phrase))
        .chain(
            ActivityType::ALL
                .iter()
                .copied()
                .filter_map(|t| activity_entry(t).map(|_| SoundToken::Activity(t))),
        )
        .chain(ParticipantNeed::ALL.iter().copied().map(SoundToken::Need))
        .chain(AdditionalInfo::ALL.iter().copied().map(SoundToken::Info))
        .chain(
            StaticLocation::ALL
                .iter()
                .copied()
                .map(SoundToken::StaticLocation),
        )
}
