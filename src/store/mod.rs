pub mod csv_store;
pub mod schema;

use anyhow::Result;

use crate::lesson::WordRecord;

/// A stored row that could not be turned into a `WordRecord`.
#[derive(Clone, Debug, PartialEq)]
pub struct RejectedRow {
    pub lesson: String,
    /// 1-based data row, not counting the header line.
    pub row: usize,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    pub records: Vec<WordRecord>,
    pub rejected: Vec<RejectedRow>,
}

pub trait LessonStore {
    fn sources(&self) -> Result<Vec<String>>;

    fn lessons(&self, source: &str) -> Result<Vec<String>>;

    /// Load and concatenate the given lessons of `source`. Every returned
    /// record carries its `Origin`.
    fn load(&self, source: &str, lessons: &[String]) -> Result<LoadReport>;

    fn save_lesson(&self, source: &str, title: &str, words: &[WordRecord]) -> Result<()>;

    /// Write `record.weight` back to the row it was loaded from.
    fn persist(&self, record: &WordRecord) -> Result<()>;
}
