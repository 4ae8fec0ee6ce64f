//! Question validation errors

use thiserror::Error;

/// Reasons a [`NewQuestion`](super::NewQuestion) is rejected before storage
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Question text must not be empty")]
    EmptyQuestion,

    #[error("At least {min} options are required, got {got}")]
    TooFewOptions { min: usize, got: usize },

    #[error("Option {0} is empty")]
    EmptyOption(usize),

    #[error("Duplicate option: {0}")]
    DuplicateOption(String),

    #[error("Answer '{0}' is not one of the options")]
    AnswerNotInOptions(String),
}
