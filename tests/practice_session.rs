use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tempfile::TempDir;
use vokab::lesson::WordRecord;
use vokab::scheduler::{
    Direction, Persistence, PracticeMode, Scheduler, SchedulerError, TurnContext, Verdict,
};
use vokab::store::LessonStore;
use vokab::store::csv_store::CsvLessonStore;

const ANIMALS: &str = "\
original,translation,quotient,source_language,target_language
hond,dog,1,Dutch,English
kat,cat,1,Dutch,English
paard,horse,4,Dutch,English
";

fn write_lesson(base: &Path, source: &str, lesson: &str, content: &str) {
    let dir = base.join(source);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(format!("{lesson}.csv")), content).unwrap();
}

fn open_store() -> (TempDir, CsvLessonStore) {
    let dir = TempDir::new().unwrap();
    let store = CsvLessonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

fn weights_on_disk(store: &CsvLessonStore, source: &str, lesson: &str) -> HashMap<String, f64> {
    store
        .load(source, &[lesson.to_string()])
        .unwrap()
        .records
        .into_iter()
        .map(|r| (r.original, r.weight))
        .collect()
}

#[test]
fn answers_are_written_back_to_the_lesson_file() {
    let (dir, store) = open_store();
    write_lesson(dir.path(), "Basics", "Animals", ANIMALS);

    let report = store.load("Basics", &["Animals".to_string()]).unwrap();
    assert_eq!(report.records.len(), 3);
    assert!(report.rejected.is_empty());

    let mut scheduler = Scheduler::seeded(store.clone(), 42);
    scheduler.load_working_set(report.records, PracticeMode::Standard);
    let mut ctx = TurnContext::new();

    let mut expected: HashMap<String, f64> = [("hond", 1.0), ("kat", 1.0), ("paard", 4.0)]
        .into_iter()
        .map(|(w, q)| (w.to_string(), q))
        .collect();

    for turn in 0..30 {
        let prompt = scheduler.draw_next(&mut ctx).unwrap();
        assert_eq!(prompt.direction, Direction::Forward);
        let word = scheduler.words()[prompt.index].clone();
        let scored = if turn % 3 == 0 {
            scheduler.skip(&mut ctx).unwrap()
        } else {
            scheduler.submit_answer(&mut ctx, &word.translation).unwrap()
        };
        assert_eq!(scored.persistence, Persistence::Written);
        assert_eq!(scored.expected, word.translation);

        let factor = if scored.correct { 0.5 } else { 2.0 };
        let entry = expected.get_mut(&word.original).unwrap();
        *entry *= factor;
        assert_eq!(scored.weight, *entry);
    }

    assert_eq!(ctx.answered, 30);
    assert_eq!(weights_on_disk(&store, "Basics", "Animals"), expected);
}

#[test]
fn quarantined_rows_survive_a_rewrite() {
    let (dir, store) = open_store();
    let content = "\
original,translation,quotient,source_language,target_language,notes
hond,dog,1,Dutch,English,pet
,missing,1,Dutch,English,
vis,fish,lots,Dutch,English,
";
    write_lesson(dir.path(), "Basics", "Mixed", content);

    let report = store.load("Basics", &["Mixed".to_string()]).unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.rejected.len(), 2);
    assert_eq!(report.rejected[0].row, 2);
    assert_eq!(report.rejected[1].row, 3);

    let mut scheduler = Scheduler::seeded(store.clone(), 1);
    scheduler.load_working_set(report.records, PracticeMode::Standard);
    let mut ctx = TurnContext::new();
    scheduler.draw_next(&mut ctx).unwrap();
    let scored = scheduler.submit_answer(&mut ctx, "  DOG ").unwrap();
    assert_eq!(scored.verdict, Verdict::Correct);
    assert_eq!(scored.persistence, Persistence::Written);

    let rewritten = fs::read_to_string(dir.path().join("Basics/Mixed.csv")).unwrap();
    let lines: Vec<&str> = rewritten.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[1], "hond,dog,0.5,Dutch,English,pet");
    assert!(lines[2].contains("missing"));
    assert!(lines[3].contains("lots"));
}

#[test]
fn lessons_from_several_files_share_one_working_set() {
    let (dir, store) = open_store();
    write_lesson(dir.path(), "Basics", "Animals", ANIMALS);
    store
        .save_lesson(
            "Basics",
            "Food",
            &[WordRecord::new("brood", "bread", "Dutch", "English")],
        )
        .unwrap();

    assert_eq!(
        store.lessons("Basics").unwrap(),
        vec!["Animals".to_string(), "Food".to_string()]
    );
    let report = store
        .load("Basics", &["Animals".to_string(), "Food".to_string()])
        .unwrap();
    assert_eq!(report.records.len(), 4);

    let mut scheduler = Scheduler::seeded(store.clone(), 9);
    scheduler.load_working_set(report.records, PracticeMode::Ultra);
    let mut ctx = TurnContext::new();
    let mut directions = Vec::new();
    while ctx.answered < 40 {
        let prompt = scheduler.draw_next(&mut ctx).unwrap();
        directions.push(prompt.direction);
        let word = &scheduler.words()[prompt.index];
        let answer = prompt.direction.expected(word).to_string();
        let scored = scheduler.submit_answer(&mut ctx, &answer).unwrap();
        assert!(scored.correct);
    }
    assert!(directions.contains(&Direction::Forward));
    assert!(directions.contains(&Direction::Reverse));

    let food = weights_on_disk(&store, "Basics", "Food");
    let animals = weights_on_disk(&store, "Basics", "Animals");
    let halvings = |w: f64, start: f64| (start / w).log2().round() as usize;
    let total = halvings(food["brood"], 1.0)
        + halvings(animals["hond"], 1.0)
        + halvings(animals["kat"], 1.0)
        + halvings(animals["paard"], 4.0);
    assert_eq!(total, 40);
}

#[test]
fn deleted_lesson_file_is_reported_but_weight_kept() {
    let (dir, store) = open_store();
    write_lesson(dir.path(), "Basics", "Animals", ANIMALS);
    let report = store.load("Basics", &["Animals".to_string()]).unwrap();

    let mut scheduler = Scheduler::seeded(store.clone(), 3);
    scheduler.load_working_set(report.records, PracticeMode::Standard);
    fs::remove_file(dir.path().join("Basics/Animals.csv")).unwrap();

    let mut ctx = TurnContext::new();
    let prompt = scheduler.draw_next(&mut ctx).unwrap();
    let before = scheduler.words()[prompt.index].weight;
    let scored = scheduler.submit_answer(&mut ctx, "not it").unwrap();
    assert!(matches!(scored.persistence, Persistence::Failed(_)));
    assert_eq!(scheduler.words()[prompt.index].weight, before * 2.0);

    // The session carries on.
    assert!(scheduler.draw_next(&mut ctx).is_ok());
}

#[test]
fn empty_selection_cannot_be_practiced() {
    let (dir, store) = open_store();
    write_lesson(
        dir.path(),
        "Basics",
        "Empty",
        "original,translation,quotient,source_language,target_language\n",
    );
    let report = store.load("Basics", &["Empty".to_string()]).unwrap();
    let mut scheduler = Scheduler::seeded(store, 0);
    scheduler.load_working_set(report.records, PracticeMode::Standard);
    let mut ctx = TurnContext::new();
    assert_eq!(
        scheduler.draw_next(&mut ctx),
        Err(SchedulerError::EmptyWorkingSet)
    );
    assert!(ctx.is_idle());
}

#[test]
fn lessons_with_punctuated_names_are_practiced_and_written_back() {
    let (dir, store) = open_store();
    write_lesson(dir.path(), "Teach Yourself (Dutch)", "Lesson (1), part 'a'", ANIMALS);

    let sources = store.sources().unwrap();
    assert_eq!(sources, vec!["Teach Yourself (Dutch)".to_string()]);
    let lessons = store.lessons(&sources[0]).unwrap();
    assert_eq!(lessons, vec!["Lesson (1), part 'a'".to_string()]);

    let report = store.load(&sources[0], &lessons).unwrap();
    assert_eq!(report.records.len(), 3);

    let mut scheduler = Scheduler::seeded(store.clone(), 5);
    scheduler.load_working_set(report.records, PracticeMode::Standard);
    let mut ctx = TurnContext::new();
    let prompt = scheduler.draw_next(&mut ctx).unwrap();
    let word = scheduler.words()[prompt.index].clone();
    let scored = scheduler.submit_answer(&mut ctx, &word.translation).unwrap();
    assert_eq!(scored.persistence, Persistence::Written);

    let on_disk = weights_on_disk(&store, &sources[0], &lessons[0]);
    assert_eq!(on_disk[&word.original], word.weight * 0.5);
}
