//! Mock-interview sessions: a fixed question script with pluggable answer
//! scoring and an aggregate report on finish.

pub mod evaluator;
pub mod flow;
pub mod handlers;
pub mod models;

pub use evaluator::{AnswerEvaluator, FixedAnswerEvaluator};
