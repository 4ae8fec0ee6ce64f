//! quizd - A small multiple-choice quiz backend
//!
//! Stores a bank of questions, serves them without their answers, and checks
//! submitted answers over HTTP.

pub mod cli;
pub mod http_server;
pub mod logging;
pub mod question;
pub mod seed;
pub mod service;
pub mod store;
