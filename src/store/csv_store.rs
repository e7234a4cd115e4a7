use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow, bail};

use crate::lesson::{Origin, WordRecord};
use crate::store::schema::{
    LessonRow, ORIGINAL_COLUMN, StoredRow, TRANSLATION_COLUMN, WEIGHT_COLUMN,
};
use crate::store::{LessonStore, LoadReport, RejectedRow};

const LESSON_EXTENSION: &str = "csv";

/// One directory per source, one CSV file per lesson:
/// `<base_dir>/<source>/<lesson>.csv`.
#[derive(Clone, Debug)]
pub struct CsvLessonStore {
    base_dir: PathBuf,
}

impl CsvLessonStore {
    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)
            .with_context(|| format!("cannot create data dir {}", base_dir.display()))?;
        Ok(Self { base_dir })
    }

    fn source_dir(&self, source: &str) -> Result<PathBuf> {
        Ok(self.base_dir.join(path_component(source)?))
    }

    fn lesson_path(&self, source: &str, lesson: &str) -> Result<PathBuf> {
        let file = format!("{}.{LESSON_EXTENSION}", path_component(lesson)?);
        Ok(self.source_dir(source)?.join(file))
    }

    fn write_atomically(
        path: &Path,
        rows: impl FnOnce(&mut csv::Writer<fs::File>) -> Result<()>,
    ) -> Result<()> {
        let tmp_path = path.with_extension("csv.tmp");
        let file = fs::File::create(&tmp_path)?;
        let mut writer = csv::WriterBuilder::new().flexible(true).from_writer(file);

        let written = rows(&mut writer).and_then(|()| {
            writer.flush()?;
            let file = writer
                .into_inner()
                .map_err(|e| anyhow!("cannot flush {}: {}", tmp_path.display(), e.error()))?;
            file.sync_all()?;
            Ok(())
        });
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        fs::rename(&tmp_path, path)?;
        Ok(())
    }

    fn load_lesson(&self, source: &str, lesson: &str, report: &mut LoadReport) -> Result<()> {
        let path = self.lesson_path(source, lesson)?;
        if !path.exists() {
            log::warn!("lesson {} does not exist, skipping", path.display());
            return Ok(());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("cannot open {}", path.display()))?;

        let origin = Origin::new(source, lesson);
        for (idx, row) in reader.deserialize::<LessonRow>().enumerate() {
            let parsed = row
                .map_err(|e| e.to_string())
                .and_then(|row| row.into_record(origin.clone()));
            match parsed {
                Ok(record) => report.records.push(record),
                Err(reason) => {
                    log::warn!("{source}/{lesson} row {}: {reason}", idx + 1);
                    report.rejected.push(RejectedRow {
                        lesson: lesson.to_string(),
                        row: idx + 1,
                        reason,
                    });
                }
            }
        }
        Ok(())
    }
}

impl LessonStore for CsvLessonStore {
    fn sources(&self) -> Result<Vec<String>> {
        let mut sources: Vec<String> = fs::read_dir(&self.base_dir)?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_dir())
            .filter_map(|e| e.file_name().to_str().map(str::to_string))
            .collect();
        sources.sort();
        Ok(sources)
    }

    fn lessons(&self, source: &str) -> Result<Vec<String>> {
        let dir = self.source_dir(source)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut lessons: Vec<String> = fs::read_dir(&dir)?
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|x| x.to_str()) == Some(LESSON_EXTENSION))
            .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
            .collect();
        lessons.sort();
        Ok(lessons)
    }

    fn load(&self, source: &str, lessons: &[String]) -> Result<LoadReport> {
        let mut report = LoadReport::default();
        for lesson in lessons {
            self.load_lesson(source, lesson, &mut report)?;
        }
        log::info!(
            "loaded {} words from {} lesson(s) of {source} ({} rejected)",
            report.records.len(),
            lessons.len(),
            report.rejected.len()
        );
        Ok(report)
    }

    /// New names are sanitized; listing returns them as they end up on disk.
    fn save_lesson(&self, source: &str, title: &str, words: &[WordRecord]) -> Result<()> {
        let (source, title) = (sanitize_name(source), sanitize_name(title));
        fs::create_dir_all(self.source_dir(&source)?)?;
        let path = self.lesson_path(&source, &title)?;
        Self::write_atomically(&path, |writer| {
            for word in words {
                writer.serialize(StoredRow::from(word))?;
            }
            Ok(())
        })
        .with_context(|| format!("cannot save lesson {}", path.display()))
    }

    /// Rewrites the whole lesson file, keeping every other row and column
    /// untouched. Only the first row matching `(original, translation)` moves.
    fn persist(&self, record: &WordRecord) -> Result<()> {
        let Some(origin) = &record.origin else {
            bail!("record {:?} has no origin", record.original);
        };
        let path = self.lesson_path(&origin.source, &origin.lesson)?;
        if !path.exists() {
            bail!("lesson file {} no longer exists", path.display());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&path)?;
        let mut headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h == name);
        let (Some(original_col), Some(translation_col)) =
            (column(ORIGINAL_COLUMN), column(TRANSLATION_COLUMN))
        else {
            bail!("lesson file {} has no original/translation columns", path.display());
        };
        let weight_col = column(WEIGHT_COLUMN);

        let mut rows: Vec<csv::StringRecord> = reader.records().collect::<Result<_, _>>()?;
        let target = rows.iter().position(|row| {
            row.get(original_col) == Some(record.original.as_str())
                && row.get(translation_col) == Some(record.translation.as_str())
        });
        let Some(target) = target else {
            bail!(
                "{:?} / {:?} not found in {}",
                record.original,
                record.translation,
                path.display()
            );
        };

        let weight = record.weight.to_string();
        let weight_col = match weight_col {
            Some(col) => col,
            None => {
                headers.push_field(WEIGHT_COLUMN);
                headers.len() - 1
            }
        };
        for (idx, row) in rows.iter_mut().enumerate() {
            let mut fields: Vec<String> = row.iter().map(str::to_string).collect();
            if fields.len() < headers.len() {
                fields.resize(headers.len(), String::new());
            }
            if idx == target {
                fields[weight_col] = weight.clone();
            }
            *row = csv::StringRecord::from(fields);
        }

        Self::write_atomically(&path, |writer| {
            writer.write_record(&headers)?;
            for row in &rows {
                writer.write_record(row)?;
            }
            Ok(())
        })?;
        log::debug!(
            "persisted weight {weight} for {:?} in {}/{}",
            record.original,
            origin.source,
            origin.lesson
        );
        Ok(())
    }
}

/// Names read back from disk are opened verbatim, provided they cannot
/// leave their parent directory.
fn path_component(name: &str) -> Result<&str> {
    if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\', '\0']) {
        bail!("{name:?} is not a usable source or lesson name");
    }
    Ok(name)
}

/// Map a source or lesson name onto a single safe path component.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.' | ' ') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.chars().all(|c| c == '.') {
        "_".repeat(cleaned.len().max(1))
    } else {
        cleaned
    }
}
