//! Question storage
//!
//! The store exclusively owns every question record. Two implementations are
//! provided:
//!
//! - [`InMemoryQuestionStore`]: process-lifetime storage, used for tests and
//!   for deployments without a data directory
//! - [`FileQuestionStore`]: append-only record file under
//!   `<data_dir>/data/questions.dat`, replayed into memory on open
//!
//! # Design Principles
//!
//! - Append-only (no endpoint updates or deletes questions)
//! - Checksum-verified on every replay
//! - Ids assigned monotonically and never reused
//! - Reads are shared, inserts are exclusive
//! - Batch inserts are all-or-nothing

mod checksum;
mod errors;
mod file;
mod memory;
mod reader;
mod record;

pub use checksum::compute_checksum;
pub use errors::{StoreError, StoreResult};
pub use file::FileQuestionStore;
pub use memory::InMemoryQuestionStore;
pub use reader::RecordReader;
pub use record::QuestionRecord;

use crate::question::{NewQuestion, Question, QuestionId};

/// Storage operations needed by seeding and the quiz service
pub trait QuestionStore: Send + Sync {
    /// Validate, assign the next id, and persist a question.
    fn insert(&self, question: NewQuestion) -> StoreResult<Question>;

    /// Insert a batch as one unit. Either every question is stored with
    /// consecutive ids, or none is and no id is consumed.
    fn insert_all(&self, questions: Vec<NewQuestion>) -> StoreResult<Vec<Question>>;

    /// Primary key lookup. `Ok(None)` means the id does not exist.
    fn get_by_id(&self, id: QuestionId) -> StoreResult<Option<Question>>;

    /// Full scan in ascending id order
    fn list_all(&self) -> StoreResult<Vec<Question>>;

    /// Number of stored questions
    fn len(&self) -> StoreResult<usize>;

    fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}
