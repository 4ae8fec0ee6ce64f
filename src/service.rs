//! Quiz query service
//!
//! Read-only business logic over a [`QuestionStore`]. The service never
//! mutates the store and never hands out a record's answer.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use crate::question::{QuestionId, QuestionView};
use crate::store::{QuestionStore, StoreError};

/// Result type for quiz operations
pub type QuizResult<T> = Result<T, QuizError>;

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Question {0} not found")]
    QuestionNotFound(QuestionId),

    #[error("No questions available")]
    NoQuestionsAvailable,

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

pub struct QuizService {
    store: Arc<dyn QuestionStore>,
}

impl QuizService {
    pub fn new(store: Arc<dyn QuestionStore>) -> Self {
        Self { store }
    }

    /// All questions without answers. Empty when the store is empty.
    pub fn list_questions(&self) -> QuizResult<Vec<QuestionView>> {
        let questions = self.store.list_all()?;
        Ok(questions.iter().map(QuestionView::from).collect())
    }

    /// Whether `submitted` exactly matches the stored answer for `id`.
    ///
    /// Comparison is case-sensitive and untrimmed. A missing submission is
    /// simply incorrect.
    pub fn check_answer(&self, id: QuestionId, submitted: Option<&str>) -> QuizResult<bool> {
        let question = self
            .store
            .get_by_id(id)?
            .ok_or(QuizError::QuestionNotFound(id))?;

        Ok(question.is_correct(submitted))
    }

    /// One question drawn uniformly at random.
    pub fn random_question(&self) -> QuizResult<QuestionView> {
        self.random_question_with(&mut rand::thread_rng())
    }

    /// Same as [`random_question`](Self::random_question) with a caller-supplied RNG.
    pub fn random_question_with<R: Rng + ?Sized>(&self, rng: &mut R) -> QuizResult<QuestionView> {
        let questions = self.store.list_all()?;
        questions
            .choose(rng)
            .map(QuestionView::from)
            .ok_or(QuizError::NoQuestionsAvailable)
    }
}
