use serde::{Deserialize, Serialize};

use crate::lesson::{INITIAL_WEIGHT, Origin, WordRecord};
use crate::scheduler::update::MIN_WEIGHT;

/// Column holding the weight. The name predates this crate and existing
/// lesson files use it.
pub const WEIGHT_COLUMN: &str = "quotient";
pub const ORIGINAL_COLUMN: &str = "original";
pub const TRANSLATION_COLUMN: &str = "translation";

/// A lesson row as read from disk. Every field is optional so that a bad row
/// can be reported instead of failing the whole file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct LessonRow {
    #[serde(default)]
    pub original: Option<String>,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default, alias = "weight")]
    pub quotient: Option<String>,
    #[serde(default)]
    pub source_language: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StoredRow<'a> {
    pub original: &'a str,
    pub translation: &'a str,
    pub quotient: f64,
    pub source_language: &'a str,
    pub target_language: &'a str,
}

impl<'a> From<&'a WordRecord> for StoredRow<'a> {
    fn from(word: &'a WordRecord) -> Self {
        Self {
            original: &word.original,
            translation: &word.translation,
            quotient: word.weight,
            source_language: &word.source_language,
            target_language: &word.target_language,
        }
    }
}

fn required(field: Option<String>, name: &str) -> Result<String, String> {
    match field {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(format!("missing {name}")),
    }
}

pub fn parse_weight(raw: Option<&str>) -> Result<f64, String> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(INITIAL_WEIGHT),
        Some(raw) => raw,
    };
    let weight: f64 = raw
        .parse()
        .map_err(|_| format!("weight {raw:?} is not a number"))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(format!("weight {raw:?} is out of range"));
    }
    // Zero is what repeated halving leaves behind in older files.
    Ok(weight.max(MIN_WEIGHT))
}

impl LessonRow {
    pub fn into_record(self, origin: Origin) -> Result<WordRecord, String> {
        let weight = parse_weight(self.quotient.as_deref())?;
        Ok(WordRecord {
            original: required(self.original, ORIGINAL_COLUMN)?,
            translation: required(self.translation, TRANSLATION_COLUMN)?,
            weight,
            source_language: required(self.source_language, "source_language")?,
            target_language: required(self.target_language, "target_language")?,
            origin: Some(origin),
        })
    }
}
