//! Voice selection
//!
//! Among the voices for a locale, prefer one whose name contains one of a
//! fixed set of male given names, then fall back to any voice for the locale.

use crate::speech::engine::Voice;
use crate::speech::language::Locale;

/// Given names matched case-insensitively against whole words of voice names
pub const PREFERRED_VOICE_NAMES: &[&str] = &[
    "david", "mark", "daniel", "george", "james", "alex", "fred", "thomas", "tarik", "maged",
    "majed", "naayf", "hamed", "male",
];

/// Whether `voice` speaks the locale's language
///
/// Compares primary subtags, so `en-GB`, `en_US` and plain `en` all match English.
pub fn matches_locale(voice: &Voice, locale: Locale) -> bool {
    let primary = voice
        .lang
        .split(|c: char| c == '-' || c == '_')
        .next()
        .unwrap_or_default();
    primary.eq_ignore_ascii_case(locale.language())
}

/// Whether a word of the voice name is a preferred given name
///
/// Words are split on anything that is not alphanumeric, so "Alex" matches
/// "Microsoft Alex - English" but not "Alexandra".
pub fn has_preferred_name(voice: &Voice) -> bool {
    voice
        .name
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .any(|word| {
            PREFERRED_VOICE_NAMES
                .iter()
                .any(|name| word.eq_ignore_ascii_case(name))
        })
}

/// Pick a voice for `locale`
///
/// Returns `None` when no voice speaks the locale; the engine then uses its
/// default voice for the utterance's language.
pub fn select_voice(voices: &[Voice], locale: Locale) -> Option<Voice> {
    let in_locale: Vec<&Voice> = voices
        .iter()
        .filter(|v| matches_locale(v, locale))
        .collect();

    in_locale
        .iter()
        .find(|v| has_preferred_name(v))
        .or_else(|| in_locale.first())
        .map(|v| (*v).clone())
}
