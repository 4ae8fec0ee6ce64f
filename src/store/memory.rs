//! In-memory question store

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::errors::{StoreError, StoreResult};
use super::QuestionStore;
use crate::question::{NewQuestion, Question, QuestionId};

#[derive(Debug)]
struct MemoryState {
    questions: BTreeMap<QuestionId, Question>,
    next_id: u64,
}

/// Question store that lives for the lifetime of the process
#[derive(Debug)]
pub struct InMemoryQuestionStore {
    state: RwLock<MemoryState>,
}

impl InMemoryQuestionStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(MemoryState {
                questions: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for InMemoryQuestionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionStore for InMemoryQuestionStore {
    fn insert(&self, question: NewQuestion) -> StoreResult<Question> {
        question.validate()?;

        let mut state = self.state.write().map_err(|_| StoreError::LockPoisoned)?;
        let id = QuestionId(state.next_id);
        let stored = question.into_question(id);

        state.questions.insert(id, stored.clone());
        state.next_id += 1;

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

        for question in &stored {
            state.questions.insert(question.id, question.clone());
        }
        state.next_id += stored.len() as u64;

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
