//! Durable question store backed by an append-only record file
//!
//! - Records are appended and fsynced before the insert is acknowledged
//! - A batch is written as one buffer with one fsync
//! - A failed append is truncated back to the last acknowledged length
//! - The whole file is replayed on open and every checksum is verified
//! - A duplicate id on replay is treated as corruption
//! - The next id is one past the highest id on disk, so ids survive restarts
//!   without reuse

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, error, warn};

use super::errors::{StoreError, StoreResult};
use super::reader::RecordReader;
use super::record::QuestionRecord;
use super::QuestionStore;
use crate::question::{NewQuestion, Question, QuestionId};

const DATA_SUBDIR: &str = "data";
const RECORD_FILE: &str = "questions.dat";

/// Append target for encoded record frames
pub(crate) trait RecordSink: Send + Sync {
    fn len(&self) -> io::Result<u64>;
    fn append(&mut self, bytes: &[u8]) -> io::Result<()>;
    fn sync(&mut self) -> io::Result<()>;
    fn truncate(&mut self, len: u64) -> io::Result<()>;
}

impl RecordSink for File {
    fn len(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.write_all(bytes)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }

    fn truncate(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }
}

struct FileState {
    sink: Box<dyn RecordSink>,
    questions: BTreeMap<QuestionId, Question>,
    next_id: u64,
    /// Set when a rollback failed; the file tail can no longer be trusted
    write_fault: Option<String>,
}

impl FileState {
    /// Persists `questions` as one append and then indexes them.
    fn append(&mut self, questions: &[Question]) -> StoreResult<()> {
        if let Some(reason) = &self.write_fault {
            return Err(StoreError::WritesDisabled(reason.clone()));
        }
        if questions.is_empty() {
            return Ok(());
        }

        let mut frames = Vec::new();
        for question in questions {
            frames.extend(QuestionRecord::new(question.clone()).serialize()?);
        }

        self.write_durably(&frames)?;

        for question in questions {
            self.questions.insert(question.id, question.clone());
        }
        self.next_id += questions.len() as u64;

        Ok(())
    }

    /// Appends and fsyncs `frames`. On failure the file is cut back to its
    /// previous length so no partial or unacknowledged frame survives.
    fn write_durably(&mut self, frames: &[u8]) -> StoreResult<()> {
        let committed_len = self
            .sink
            .len()
            .map_err(|e| StoreError::io("Failed to read record file length", e))?;

        let written = self.sink.append(frames).and_then(|()| self.sink.sync());
        let Err(write_err) = written else {
            return Ok(());
        };

        match self
            .sink
            .truncate(committed_len)
            .and_then(|()| self.sink.sync())
        {
            Ok(()) => warn!(
                error = %write_err,
                committed_len,
                "rolled back failed record append"
            ),
            Err(rollback_err) => {
                error!(
                    error = %write_err,
                    rollback_error = %rollback_err,
                    committed_len,
                    "failed to roll back record append, disabling writes"
                );
                self.write_fault = Some(format!(
                    "rollback to {} bytes failed: {}",
                    committed_len, rollback_err
                ));
            }
        }

        Err(StoreError::io("Failed to append question records", write_err))
    }
}

/// Question store persisted under `<data_dir>/data/questions.dat`
pub struct FileQuestionStore {
    path: PathBuf,
    state: RwLock<FileState>,
}

impl FileQuestionStore {
    /// Opens or creates the record file under `data_dir` and replays it.
    ///
    /// # Errors
    ///
    /// - `StoreError::Io` if the directory or file cannot be created
    /// - `StoreError::Corruption` if any existing record fails verification
    pub fn open(data_dir: &Path) -> StoreResult<Self> {
        Self::open_with(data_dir, |file| file)
    }

    /// Like [`open`](Self::open), with every append routed through the sink
    /// built by `wrap`.
    pub(crate) fn open_with<S, F>(data_dir: &Path, wrap: F) -> StoreResult<Self>
    where
        S: RecordSink + 'static,
        F: FnOnce(File) -> S,
    {
        let data_subdir = data_dir.join(DATA_SUBDIR);
        let path = data_subdir.join(RECORD_FILE);

        fs::create_dir_all(&data_subdir).map_err(|e| {
            StoreError::io(
                format!("Failed to create data directory: {}", data_subdir.display()),
                e,
            )
        })?;

        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                StoreError::io(format!("Failed to open record file: {}", path.display()), e)
            })?;

        let questions = Self::replay(&path)?;
        let next_id = questions.keys().next_back().map_or(1, |id| id.0 + 1);

        debug!(
            path = %path.display(),
            questions = questions.len(),
            next_id,
            "replayed question records"
        );

        Ok(Self {
            path,
            state: RwLock::new(FileState {
                sink: Box::new(wrap(file)),
                questions,
                next_id,
                write_fault: None,
            }),
        })
    }

    /// Rebuilds the in-memory index from every record on disk.
    fn replay(path: &Path) -> StoreResult<BTreeMap<QuestionId, Question>> {
        let mut reader = RecordReader::open(path)?;
        let mut questions = BTreeMap::new();

        loop {
            let offset = reader.current_offset();
            let Some(record) = reader.read_next()? else {
                break;
            };

            let id = record.question.id;
            if questions.insert(id, record.question).is_some() {
                return Err(StoreError::corruption_at_offset(
                    offset,
                    format!("Duplicate question id {}", id),
                ));
            }
        }

        Ok(questions)
    }

    /// Returns the path to the record file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionStore for FileQuestionStore {
    fn insert(&self, question: NewQuestion) -> StoreResult<Question> {
        question.validate()?;

        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let stored = question.into_question(QuestionId(state.next_id));
        state.append(std::slice::from_ref(&stored))?;

        Ok(stored)
    }

    fn insert_all(&self, questions: Vec<NewQuestion>) -> StoreResult<Vec<Question>> {
        for question in &questions {
            question.validate()?;
        }

        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let first_id = state.next_id;
        let stored: Vec<Question> = questions
            .into_iter()
            .zip(first_id..)
            .map(|(question, id)| question.into_question(QuestionId(id)))
            .collect();
        state.append(&stored)?;

        Ok(stored)
    }

    fn get_by_id(&self, id: QuestionId) -> StoreResult<Option<Question>> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.questions.get(&id).cloned())
    }

    fn list_all(&self) -> StoreResult<Vec<Question>> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.questions.values().cloned().collect())
    }

    fn len(&self) -> StoreResult<usize> {
        let state = self.state.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(state.questions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::{reference_questions, seed_if_empty, SeedOutcome};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn yes_no(prompt: &str) -> NewQuestion {
        NewQuestion::new(prompt, ["yes", "no"], "no")
    }

    /// One-shot failures armed by a test. Each flag clears when it fires.
    #[derive(Default)]
    struct Faults {
        partial_write: bool,
        fail_sync: bool,
        fail_truncate: bool,
    }

    struct FaultySink {
        file: File,
        faults: Arc<Mutex<Faults>>,
    }

    impl RecordSink for FaultySink {
        fn len(&self) -> io::Result<u64> {
            RecordSink::len(&self.file)
        }

        fn append(&mut self, bytes: &[u8]) -> io::Result<()> {
            let partial = std::mem::take(&mut self.faults.lock().unwrap().partial_write);
            if partial {
                self.file.write_all(&bytes[..bytes.len() / 2])?;
                return Err(io::Error::new(io::ErrorKind::Other, "No space left on device"));
            }
            self.file.write_all(bytes)
        }

        fn sync(&mut self) -> io::Result<()> {
            if std::mem::take(&mut self.faults.lock().unwrap().fail_sync) {
                return Err(io::Error::new(io::ErrorKind::Other, "fsync failed"));
            }
            self.file.sync_all()
        }

        fn truncate(&mut self, len: u64) -> io::Result<()> {
            if std::mem::take(&mut self.faults.lock().unwrap().fail_truncate) {
                return Err(io::Error::new(io::ErrorKind::Other, "read-only file system"));
            }
            self.file.set_len(len)
        }
    }

    fn open_faulty(dir: &Path) -> (FileQuestionStore, Arc<Mutex<Faults>>) {
        let faults = Arc::new(Mutex::new(Faults::default()));
        let handle = Arc::clone(&faults);
        let store =
            FileQuestionStore::open_with(dir, move |file| FaultySink { file, faults: handle })
                .unwrap();
        (store, faults)
    }

    fn file_len(store: &FileQuestionStore) -> u64 {
        fs::metadata(store.path()).unwrap().len()
    }

    #[test]
    fn test_open_creates_directories() {
        let temp_dir = TempDir::new().unwrap();
        let data_path = temp_dir.path().join("data");
        assert!(!data_path.exists());

        let store = FileQuestionStore::open(temp_dir.path()).unwrap();

        assert!(data_path.join("questions.dat").exists());
        assert_eq!(store.path(), data_path.join("questions.dat"));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_insert_is_visible_after_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = FileQuestionStore::open(temp_dir.path()).unwrap();
            store.insert(yes_no("first")).unwrap();
            store.insert(yes_no("second")).unwrap();
        }

        let store = FileQuestionStore::open(temp_dir.path()).unwrap();
        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].question, "second");
        assert_eq!(all[1].answer, "no");
    }

    #[test]
    fn test_ids_continue_after_reopen() {
        let temp_dir = TempDir::new().unwrap();

        {
            let store = FileQuestionStore::open(temp_dir.path()).unwrap();
            store.insert(yes_no("first")).unwrap();
        }

        let store = FileQuestionStore::open(temp_dir.path()).unwrap();
        let second = store.insert(yes_no("second")).unwrap();
        assert_eq!(second.id, QuestionId(2));
    }

    #[test]
    fn test_invalid_insert_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileQuestionStore::open(temp_dir.path()).unwrap();

        let result = store.insert(NewQuestion::new("", ["yes", "no"], "yes"));
        assert!(matches!(result, Err(StoreError::Invalid(_))));
        assert_eq!(fs::metadata(store.path()).unwrap().len(), 0);
    }

    #[test]
    fn test_failed_sync_rolls_back_record() {
        let temp_dir = TempDir::new().unwrap();

        {
            let (store, faults) = open_faulty(temp_dir.path());
            faults.lock().unwrap().fail_sync = true;

            let result = store.insert(yes_no("lost"));
            assert!(matches!(result, Err(StoreError::Io { .. })));
            assert_eq!(file_len(&store), 0);
            assert!(store.is_empty().unwrap());

            let kept = store.insert(yes_no("kept")).unwrap();
            assert_eq!(kept.id, QuestionId(1));
        }

        let store = FileQuestionStore::open(temp_dir.path()).unwrap();
        let all = store.list_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].question, "kept");
    }

    #[test]
    fn test_partial_write_is_truncated() {
        let temp_dir = TempDir::new().unwrap();

        {
            let (store, faults) = open_faulty(temp_dir.path());
            store.insert(yes_no("first")).unwrap();
            let committed = file_len(&store);

            faults.lock().unwrap().partial_write = true;
            assert!(store.insert(yes_no("torn")).is_err());
            assert_eq!(file_len(&store), committed);

            let third = store.insert(yes_no("third")).unwrap();
            assert_eq!(third.id, QuestionId(2));
        }

        let store = FileQuestionStore::open(temp_dir.path()).unwrap();
        let prompts: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|q| q.question)
            .collect();
        assert_eq!(prompts, vec!["first", "third"]);
    }

    #[test]
    fn test_failed_rollback_disables_writes() {
        let temp_dir = TempDir::new().unwrap();
        let (store, faults) = open_faulty(temp_dir.path());
        {
            let mut faults = faults.lock().unwrap();
            faults.fail_sync = true;
            faults.fail_truncate = true;
        }

        assert!(matches!(
            store.insert(yes_no("first")),
            Err(StoreError::Io { .. })
        ));
        assert!(matches!(
            store.insert(yes_no("second")),
            Err(StoreError::WritesDisabled(_))
        ));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_insert_all_writes_nothing_on_failure() {
        let temp_dir = TempDir::new().unwrap();
        let (store, faults) = open_faulty(temp_dir.path());
        let batch = || vec![yes_no("a"), yes_no("b"), yes_no("c")];

        faults.lock().unwrap().partial_write = true;
        assert!(store.insert_all(batch()).is_err());
        assert_eq!(file_len(&store), 0);
        assert!(store.is_empty().unwrap());

        let ids: Vec<QuestionId> = store
            .insert_all(batch())
            .unwrap()
            .into_iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec![QuestionId(1), QuestionId(2), QuestionId(3)]);
    }

    #[test]
    fn test_failed_seed_can_be_retried() {
        let temp_dir = TempDir::new().unwrap();

        {
            let (store, faults) = open_faulty(temp_dir.path());
            faults.lock().unwrap().fail_sync = true;

            assert!(seed_if_empty(&store, reference_questions()).is_err());
            assert!(store.is_empty().unwrap());
        }

        let store = FileQuestionStore::open(temp_dir.path()).unwrap();
        assert!(store.is_empty().unwrap());
        assert_eq!(
            seed_if_empty(&store, reference_questions()).unwrap(),
            SeedOutcome::Seeded(3)
        );

        let reopened = FileQuestionStore::open(temp_dir.path()).unwrap();
        assert_eq!(reopened.len().unwrap(), 3);
    }
}
