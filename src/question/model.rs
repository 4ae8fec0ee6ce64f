//! Question record types

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::ValidationError;

/// Minimum number of options a question must offer
pub const MIN_OPTIONS: usize = 2;

/// Store-assigned primary key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u64);

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A stored question, including its answer.
///
/// This type is serialized only into the store's record file. Anything sent
/// to clients goes through [`QuestionView`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl Question {
    /// Client-facing projection without the answer
    pub fn view(&self) -> QuestionView {
        QuestionView {
            id: self.id,
            question: self.question.clone(),
            options: self.options.clone(),
        }
    }

    /// Exact, case-sensitive comparison. An absent submission never matches.
    pub fn is_correct(&self, submitted: Option<&str>) -> bool {
        submitted.map_or(false, |answer| answer == self.answer)
    }
}

/// A question that has not been assigned an id yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl NewQuestion {
    pub fn new<I, S>(question: impl Into<String>, options: I, answer: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            question: question.into(),
            options: options.into_iter().map(Into::into).collect(),
            answer: answer.into(),
        }
    }

    /// Checks the record invariants before it reaches a store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }

        if self.options.len() < MIN_OPTIONS {
            return Err(ValidationError::TooFewOptions {
                min: MIN_OPTIONS,
                got: self.options.len(),
            });
        }

        let mut seen = HashSet::with_capacity(self.options.len());
        for (index, option) in self.options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(ValidationError::EmptyOption(index));
            }
            if !seen.insert(option.as_str()) {
                return Err(ValidationError::DuplicateOption(option.clone()));
            }
        }

        if !seen.contains(self.answer.as_str()) {
            return Err(ValidationError::AnswerNotInOptions(self.answer.clone()));
        }

        Ok(())
    }

    /// Attaches a store-assigned id. Callers validate first.
    pub(crate) fn into_question(self, id: QuestionId) -> Question {
        Question {
            id,
            question: self.question,
            options: self.options,
            answer: self.answer,
        }
    }
}

/// Projection of a [`Question`] returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<String>,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        question.view()
    }
}
