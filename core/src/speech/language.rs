//! Language detection for spoken replies

/// Locale an utterance is spoken in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    /// Arabic (`ar-SA`)
    Arabic,
    /// English (`en-US`), the default
    English,
}

impl Locale {
    /// Full locale tag handed to the engine
    pub fn tag(&self) -> &'static str {
        match self {
            Locale::Arabic => "ar-SA",
            Locale::English => "en-US",
        }
    }

    /// Primary language subtag used to match voices
    pub fn language(&self) -> &'static str {
        match self {
            Locale::Arabic => "ar",
            Locale::English => "en",
        }
    }
}

/// Whether `c` is in the Arabic Unicode block (U+0600–U+06FF)
pub fn is_arabic(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Arabic if any character is Arabic script, English otherwise
pub fn detect_locale(text: &str) -> Locale {
    if text.chars().any(is_arabic) {
        Locale::Arabic
    } else {
        Locale::English
    }
}
