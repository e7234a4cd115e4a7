pub mod mymemory;

use anyhow::Result;

/// Display name and ISO 639-1 code of every language offered when authoring.
pub const SUPPORTED_LANGUAGES: &[(&str, &str)] = &[
    ("English", "en"),
    ("Dutch", "nl"),
    ("Spanish", "es"),
    ("French", "fr"),
    ("German", "de"),
    ("Chinese", "zh"),
    ("Japanese", "ja"),
    ("Russian", "ru"),
    ("Arabic", "ar"),
    ("Portuguese", "pt"),
    ("Hindi", "hi"),
];

const FALLBACK_SOURCE_CODE: &str = "auto";
const FALLBACK_TARGET_CODE: &str = "en";

pub fn language_names() -> Vec<&'static str> {
    SUPPORTED_LANGUAGES.iter().map(|(name, _)| *name).collect()
}

pub fn language_code(name: &str) -> Option<&'static str> {
    SUPPORTED_LANGUAGES
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
}

/// Codes for a translation request. Unknown source languages are detected by
/// the service, unknown targets fall back to English.
pub fn language_pair(source_name: &str, target_name: &str) -> (&'static str, &'static str) {
    (
        language_code(source_name).unwrap_or(FALLBACK_SOURCE_CODE),
        language_code(target_name).unwrap_or(FALLBACK_TARGET_CODE),
    )
}

/// Looks up a translation while a lesson is authored. Not used in practice.
pub trait Translator {
    fn translate(&self, word: &str, source_language: &str, target_language: &str) -> Result<String>;
}
