//! Question model
//!
//! A question is the only entity in the quiz bank. Records are created by the
//! seeding routine and never mutated afterwards.
//!
//! # Invariants
//!
//! - Ids are assigned by the store, monotonically, and never reused
//! - Options keep their original order
//! - The answer is one of the options and never leaves the server

mod errors;
mod model;

pub use errors::ValidationError;
pub use model::{NewQuestion, Question, QuestionId, QuestionView, MIN_OPTIONS};
