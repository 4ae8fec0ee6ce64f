//! Question bank seeding
//!
//! Seeding runs once at startup, before the transport accepts requests. It
//! only writes when the store is empty, so running it on every boot never
//! duplicates records.
//!
//! The emptiness check and the inserts are not atomic across processes. Two
//! processes seeding the same data directory at once can both see an empty
//! store.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::question::{NewQuestion, ValidationError};
use crate::store::{QuestionStore, StoreResult};

/// Errors loading a seed file
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Seed file {0} contains no questions")]
    Empty(PathBuf),

    #[error("Seed question {index} is invalid: {source}")]
    InvalidQuestion {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

/// What a seeding pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// The store was empty and this many questions were inserted
    Seeded(usize),
    /// The store already held this many questions; nothing was written
    AlreadySeeded(usize),
}

/// The built-in question set
pub fn reference_questions() -> Vec<NewQuestion> {
    vec![
        NewQuestion::new(
            "What is the capital of France?",
            ["Paris", "London", "Berlin", "Madrid"],
            "Paris",
        ),
        NewQuestion::new(
            "Which planet is known as the Red Planet?",
            ["Earth", "Mars", "Jupiter", "Saturn"],
            "Mars",
        ),
        NewQuestion::new(
            "Who wrote 'Romeo and Juliet'?",
            ["Shakespeare", "Hemingway", "Tolstoy", "Dickens"],
            "Shakespeare",
        ),
    ]
}

/// Loads a JSON array of questions. Every entry is validated up front.
pub fn load_seed_file(path: &Path) -> Result<Vec<NewQuestion>, SeedError> {
    let content = fs::read_to_string(path).map_err(|source| SeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let questions: Vec<NewQuestion> =
        serde_json::from_str(&content).map_err(|source| SeedError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if questions.is_empty() {
        return Err(SeedError::Empty(path.to_path_buf()));
    }

    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|source| SeedError::InvalidQuestion { index, source })?;
    }

    Ok(questions)
}

/// Inserts `questions` in order if, and only if, the store is empty.
///
/// The set goes to the store as one batch, so a bad entry or a failed write
/// leaves the bank empty and the next boot seeds it again.
pub fn seed_if_empty(
    store: &dyn QuestionStore,
    questions: Vec<NewQuestion>,
) -> StoreResult<SeedOutcome> {
    let existing = store.len()?;
    if existing > 0 {
        info!(existing, "question bank already seeded");
        return Ok(SeedOutcome::AlreadySeeded(existing));
    }

    let count = store.insert_all(questions)?.len();

    info!(count, "seeded question bank");
    Ok(SeedOutcome::Seeded(count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{InMemoryQuestionStore, StoreError};
    use tempfile::TempDir;

    #[test]
    fn test_reference_questions_are_valid() {
        let questions = reference_questions();
        assert_eq!(questions.len(), 3);
        for q in &questions {
            assert_eq!(q.validate(), Ok(()));
        }
    }

    #[test]
    fn test_seed_is_idempotent() {
        let store = InMemoryQuestionStore::new();

        let first = seed_if_empty(&store, reference_questions()).unwrap();
        let second = seed_if_empty(&store, reference_questions()).unwrap();

        assert_eq!(first, SeedOutcome::Seeded(3));
        assert_eq!(second, SeedOutcome::AlreadySeeded(3));
        assert_eq!(store.len().unwrap(), 3);
    }

    #[test]
    fn test_invalid_set_inserts_nothing() {
        let store = InMemoryQuestionStore::new();
        let mut questions = reference_questions();
        questions.push(NewQuestion::new("Broken", ["a", "b"], "c"));

        let result = seed_if_empty(&store, questions);

        assert!(matches!(result, Err(StoreError::Invalid(_))));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_load_seed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seed.json");
        fs::write(
            &path,
            r#"[{"question": "2 + 2?", "options": ["3", "4"], "answer": "4"}]"#,
        )
        .unwrap();

        let questions = load_seed_file(&path).unwrap();
        assert_eq!(questions, vec![NewQuestion::new("2 + 2?", ["3", "4"], "4")]);
    }

    #[test]
    fn test_load_seed_file_rejects_empty_array() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seed.json");
        fs::write(&path, "[]").unwrap();

        assert!(matches!(load_seed_file(&path), Err(SeedError::Empty(_))));
    }

    #[test]
    fn test_load_seed_file_reports_bad_entry() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("seed.json");
        fs::write(
            &path,
            r#"[
                {"question": "ok", "options": ["a", "b"], "answer": "a"},
                {"question": "bad", "options": ["a"], "answer": "a"}
            ]"#,
        )
        .unwrap();

        match load_seed_file(&path) {
            Err(SeedError::InvalidQuestion { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected invalid question, got {:?}", other),
        }
    }
}
