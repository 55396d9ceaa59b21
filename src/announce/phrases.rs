//! Announcement text: phrase keys, phrasebooks and distance formatting.
//!
//! A [`Phrasebook`] maps a [`PhraseKey`] and a locale to a template.
//! Templates use `{distance}`, `{turn}`, `{street}` and `{value}`
//! placeholders. Keys missing from a phrasebook fall back to
//! [`EnglishPhrasebook`].

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{MargaError, Result};
use crate::route::{TurnInstruction, TurnKind};

/// Identifies one translatable phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhraseKey {
    /// "In {distance}, {turn}"
    InDistance,
    /// "In {distance}, {turn} onto {street}"
    InDistanceOntoStreet,
    /// "{turn} now"
    Now,
    /// "{turn} now onto {street}"
    NowOntoStreet,
    /// "{value} meters"
    Meters,
    /// "{value} kilometers"
    Kilometers,
    /// Direction text for a turn kind
    Turn(TurnKind),
    OffRoute,
    Arrived,
}

impl PhraseKey {
    /// All keys, in table order.
    pub const ALL: [PhraseKey; 18] = [
        PhraseKey::InDistance,
        PhraseKey::InDistanceOntoStreet,
        PhraseKey::Now,
        PhraseKey::NowOntoStreet,
        PhraseKey::Meters,
        PhraseKey::Kilometers,
        PhraseKey::Turn(TurnKind::Straight),
        PhraseKey::Turn(TurnKind::SlightLeft),
        PhraseKey::Turn(TurnKind::Left),
        PhraseKey::Turn(TurnKind::SharpLeft),
        PhraseKey::Turn(TurnKind::SlightRight),
        PhraseKey::Turn(TurnKind::Right),
        PhraseKey::Turn(TurnKind::SharpRight),
        PhraseKey::Turn(TurnKind::UTurn),
        PhraseKey::Turn(TurnKind::Roundabout),
        PhraseKey::Turn(TurnKind::Arrive),
        PhraseKey::OffRoute,
        PhraseKey::Arrived,
    ];

    /// Stable identifier used by phrase tables.
    pub fn id(&self) -> &'static str {
        match self {
            PhraseKey::InDistance => "in_distance",
            PhraseKey::InDistanceOntoStreet => "in_distance_onto_street",
            PhraseKey::Now => "now",
            PhraseKey::NowOntoStreet => "now_onto_street",
            PhraseKey::Meters => "meters",
            PhraseKey::Kilometers => "kilometers",
            PhraseKey::Turn(TurnKind::Straight) => "turn_straight",
            PhraseKey::Turn(TurnKind::SlightLeft) => "turn_slight_left",
            PhraseKey::Turn(TurnKind::Left) => "turn_left",
            PhraseKey::Turn(TurnKind::SharpLeft) => "turn_sharp_left",
            PhraseKey::Turn(TurnKind::SlightRight) => "turn_slight_right",
            PhraseKey::Turn(TurnKind::Right) => "turn_right",
            PhraseKey::Turn(TurnKind::SharpRight) => "turn_sharp_right",
            PhraseKey::Turn(TurnKind::UTurn) => "turn_u_turn",
            PhraseKey::Turn(TurnKind::Roundabout) => "turn_roundabout",
            PhraseKey::Turn(TurnKind::Arrive) => "turn_arrive",
            PhraseKey::OffRoute => "off_route",
            PhraseKey::Arrived => "arrived",
        }
    }

    /// Reverse of [`PhraseKey::id`].
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }
}

/// Localization provider.
pub trait Phrasebook: Send {
    /// Template for `key` in `locale`, or `None` if not covered.
    fn template(&self, key: PhraseKey, locale: &str) -> Option<Cow<'_, str>>;
}

/// Built-in English phrases. Answers for every locale.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPhrasebook;

impl EnglishPhrasebook {
    pub fn phrase(key: PhraseKey) -> &'static str {
        match key {
            PhraseKey::InDistance => "In {distance}, {turn}",
            PhraseKey::InDistanceOntoStreet => "In {distance}, {turn} onto {street}",
            PhraseKey::Now => "{turn} now",
            PhraseKey::NowOntoStreet => "{turn} now onto {street}",
            PhraseKey::Meters => "{value} meters",
            PhraseKey::Kilometers => "{value} kilometers",
            PhraseKey::Turn(kind) => match kind {
                TurnKind::Straight => "continue straight",
                TurnKind::SlightLeft => "keep left",
                TurnKind::Left => "turn left",
                TurnKind::SharpLeft => "turn sharp left",
                TurnKind::SlightRight => "keep right",
                TurnKind::Right => "turn right",
                TurnKind::SharpRight => "turn sharp right",
                TurnKind::UTurn => "make a U-turn",
                TurnKind::Roundabout => "enter the roundabout",
                TurnKind::Arrive => "arrive at your destination",
            },
            PhraseKey::OffRoute => "You are off route",
            PhraseKey::Arrived => "You have arrived at your destination",
        }
    }
}

impl Phrasebook for EnglishPhrasebook {
    fn template(&self, key: PhraseKey, _locale: &str) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(Self::phrase(key)))
    }
}

/// Phrase table keyed by locale, then by [`PhraseKey::id`].
///
/// ```toml
/// [nb]
/// turn_left = "sving til venstre"
/// in_distance = "Om {distance}, {turn}"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct PhraseTable {
    locales: HashMap<String, HashMap<String, String>>,
}

impl PhraseTable {
    /// Load a table from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse a table, rejecting unknown phrase ids.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: PhraseTable = toml::from_str(content)?;
        for (locale, phrases) in &table.locales {
            if let Some(id) = phrases.keys().find(|id| PhraseKey::from_id(id).is_none()) {
                return Err(MargaError::Parse(format!(
                    "unknown phrase '{}' in locale '{}'",
                    id, locale
                )));
            }
        }
        Ok(table)
    }

    /// Locales present in the table.
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }
}

impl Phrasebook for PhraseTable {
    fn template(&self, key: PhraseKey, locale: &str) -> Option<Cow<'_, str>> {
        self.locales
            .get(locale)
            .and_then(|phrases| phrases.get(key.id()))
            .map(|t| Cow::Borrowed(t.as_str()))
    }
}

/// Resolve a template, falling back to English.
fn lookup(book: &dyn Phrasebook, key: PhraseKey, locale: &str) -> String {
    match book.template(key, locale) {
        Some(template) => template.into_owned(),
        None => {
            log::debug!("No '{}' phrase for locale '{}', using English", key.id(), locale);
            EnglishPhrasebook::phrase(key).to_string()
        }
    }
}

/// Format a distance for speech.
///
/// Below 100 m to the nearest meter, below 1 km to the nearest 50 m,
/// then kilometers with one decimal below 10 km.
///
/// ```
/// use marga::announce::{EnglishPhrasebook, format_distance};
///
/// assert_eq!(format_distance(&EnglishPhrasebook, "en", 42.4), "42 meters");
/// assert_eq!(format_distance(&EnglishPhrasebook, "en", 430.0), "450 meters");
/// assert_eq!(format_distance(&EnglishPhrasebook, "en", 2340.0), "2.3 kilometers");
/// assert_eq!(format_distance(&EnglishPhrasebook, "en", 12_600.0), "13 kilometers");
/// ```
pub fn format_distance(book: &dyn Phrasebook, locale: &str, distance_m: f64) -> String {
    let distance_m = distance_m.max(0.0);
    let (key, value) = if distance_m < 100.0 {
        (PhraseKey::Meters, format!("{}", distance_m.round() as u64))
    } else if distance_m < 1000.0 {
        // 975+ rounds up to 1000 meters; still spoken in meters
        let rounded = (distance_m / 50.0).round() * 50.0;
        (PhraseKey::Meters, format!("{}", rounded as u64))
    } else {
        let km = distance_m / 1000.0;
        let value = if km < 10.0 {
            format!("{:.1}", km)
        } else {
            format!("{:.0}", km)
        };
        (PhraseKey::Kilometers, value)
    };
    lookup(book, key, locale).replace("{value}", &value)
}

/// Render an instruction announcement.
///
/// `distance_m` of `None` renders the immediate ("now") form.
pub fn render_instruction(
    book: &dyn Phrasebook,
    locale: &str,
    instruction: &TurnInstruction,
    distance_m: Option<f64>,
) -> String {
    let turn = lookup(book, PhraseKey::Turn(instruction.turn_kind), locale);
    let street = instruction.street_name.as_deref().filter(|s| !s.is_empty());

    let key = match (distance_m, street) {
        (Some(_), Some(_)) => PhraseKey::InDistanceOntoStreet,
        (Some(_), None) => PhraseKey::InDistance,
        (None, Some(_)) => PhraseKey::NowOntoStreet,
        (None, None) => PhraseKey::Now,
    };

    let mut text = lookup(book, key, locale).replace("{turn}", &turn);
    if let Some(distance) = distance_m {
        text = text.replace("{distance}", &format_distance(book, locale, distance));
    }
    if let Some(street) = street {
        text = text.replace("{street}", street);
    }
    capitalize_first(&text)
}

/// Render a lifecycle phrase (off route, arrived).
pub fn render_phrase(book: &dyn Phrasebook, locale: &str, key: PhraseKey) -> String {
    capitalize_first(&lookup(book, key, locale))
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
