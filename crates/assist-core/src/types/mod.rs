//! Runtime value types supplied by callers at evaluation time

pub mod answer;
pub mod decimal;

pub use answer::{Answer, AnswerSet};
pub use decimal::{parse_decimal, round_half_up};
