//! Answer values for data elements
//!
//! An [`AnswerSet`] maps data-element ids to what the user entered or selected.
//! Integer, numeric and global elements carry a single value; choice elements carry
//! one value and multi-choice elements carry a list of selected option values.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The answer given for one data element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, from = "RawAnswer")]
pub enum Answer {
    /// A scalar answer (integer, numeric, global, choice)
    Single(String),
    /// Selected values of a multi-choice element
    Multiple(Vec<String>),
}

impl Answer {
    /// Blank scalars and empty selections count as "no answer".
    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Single(value) => value.trim().is_empty(),
            Answer::Multiple(values) => values.iter().all(|v| v.trim().is_empty()),
        }
    }

    /// All non-blank values of this answer in order
    pub fn values(&self) -> Vec<&str> {
        match self {
            Answer::Single(value) if value.trim().is_empty() => Vec::new(),
            Answer::Single(value) => vec![value.as_str()],
            Answer::Multiple(values) => values
                .iter()
                .map(String::as_str)
                .filter(|v| !v.trim().is_empty())
                .collect(),
        }
    }

    /// The scalar value, if this is a single answer
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Answer::Single(value) => Some(value.as_str()),
            Answer::Multiple(_) => None,
        }
    }

    /// Whether `value` is one of the answered values (case-sensitive)
    pub fn contains_value(&self, value: &str) -> bool {
        self.values().iter().any(|v| *v == value)
    }

    /// Number of selected values
    pub fn count(&self) -> usize {
        self.values().len()
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Single(value.to_string())
    }
}

impl From<String> for Answer {
    fn from(value: String) -> Self {
        Answer::Single(value)
    }
}

impl From<i64> for Answer {
    fn from(value: i64) -> Self {
        Answer::Single(value.to_string())
    }
}

impl From<f64> for Answer {
    fn from(value: f64) -> Self {
        Answer::Single(value.to_string())
    }
}

impl From<Vec<&str>> for Answer {
    fn from(values: Vec<&str>) -> Self {
        Answer::Multiple(values.into_iter().map(str::to_string).collect())
    }
}

impl From<Vec<String>> for Answer {
    fn from(values: Vec<String>) -> Self {
        Answer::Multiple(values)
    }
}

/// Wire shape accepted when deserializing answers: JSON strings, numbers,
/// booleans, or arrays of those.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswer {
    Scalar(RawScalar),
    List(Vec<RawScalar>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawScalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl From<RawScalar> for String {
    fn from(raw: RawScalar) -> Self {
        match raw {
            RawScalar::Text(s) => s,
            RawScalar::Number(n) => n.to_string(),
            RawScalar::Bool(b) => b.to_string(),
        }
    }
}

impl From<RawAnswer> for Answer {
    fn from(raw: RawAnswer) -> Self {
        match raw {
            RawAnswer::Scalar(scalar) => Answer::Single(scalar.into()),
            RawAnswer::List(items) => Answer::Multiple(items.into_iter().map(String::from).collect()),
        }
    }
}

/// Mapping from data-element id to answer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    answers: HashMap<String, Answer>,
}

impl AnswerSet {
    /// Create an empty answer set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an answer (builder style)
    pub fn with(mut self, element_id: impl Into<String>, answer: impl Into<Answer>) -> Self {
        self.insert(element_id, answer);
        self
    }

    /// Add or replace an answer
    pub fn insert(&mut self, element_id: impl Into<String>, answer: impl Into<Answer>) {
        self.answers.insert(element_id.into(), answer.into());
    }

    /// Drop an element's answer
    pub fn remove(&mut self, element_id: &str) -> Option<Answer> {
        self.answers.remove(element_id)
    }

    /// Raw answer for an element, blank or not
    pub fn get(&self, element_id: &str) -> Option<&Answer> {
        self.answers.get(element_id)
    }

    /// The answer for an element, ignoring blank answers
    pub fn answered(&self, element_id: &str) -> Option<&Answer> {
        self.answers.get(element_id).filter(|a| !a.is_empty())
    }

    /// Whether the element has a non-blank answer
    pub fn has_answer(&self, element_id: &str) -> bool {
        self.answered(element_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Answer)> {
        self.answers.iter()
    }

    /// Copy of this set with `extra` answers layered on top.
    ///
    /// Entries in `extra` replace existing answers for the same element.
    pub fn overlay<I>(&self, extra: I) -> AnswerSet
    where
        I: IntoIterator<Item = (String, Answer)>,
    {
        let mut merged = self.clone();
        merged.answers.extend(extra);
        merged
    }
}

impl FromIterator<(String, Answer)> for AnswerSet {
    fn from_iter<T: IntoIterator<Item = (String, Answer)>>(iter: T) -> Self {
        Self {
            answers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_answers_are_empty() {
        assert!(Answer::from("  ").is_empty());
        assert!(Answer::Multiple(vec![]).is_empty());
        assert!(Answer::from(vec!["", " "]).is_empty());
        assert!(!Answer::from("0").is_empty());
    }

    #[test]
    fn test_answer_values_and_contains() {
        let answer = Answer::from(vec!["a", "", "b"]);
        assert_eq!(answer.values(), vec!["a", "b"]);
        assert_eq!(answer.count(), 2);
        assert!(answer.contains_value("b"));
        assert!(!answer.contains_value("B"));
        assert_eq!(answer.as_single(), None);
    }

    #[test]
    fn test_answer_set_deserializes_json_shapes() {
        let answers: AnswerSet = serde_json::from_str(
            r#"{"size": 3.14, "count": 5, "flag": "yes", "sites": ["left", "right"], "seen": true}"#,
        )
        .unwrap();

        assert_eq!(answers.get("size"), Some(&Answer::Single("3.14".to_string())));
        assert_eq!(answers.get("count"), Some(&Answer::Single("5".to_string())));
        assert_eq!(answers.get("flag"), Some(&Answer::Single("yes".to_string())));
        assert_eq!(answers.get("seen"), Some(&Answer::Single("true".to_string())));
        assert_eq!(
            answers.get("sites"),
            Some(&Answer::Multiple(vec!["left".to_string(), "right".to_string()]))
        );
    }

    #[test]
    fn test_answer_serializes_untagged() {
        let answers = AnswerSet::new().with("sites", vec!["left"]);
        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"sites":["left"]}"#);
    }

    #[test]
    fn test_answered_ignores_blank() {
        let answers = AnswerSet::new().with("a", "").with("b", "x");
        assert!(answers.get("a").is_some());
        assert!(!answers.has_answer("a"));
        assert!(answers.has_answer("b"));
        assert!(!answers.has_answer("missing"));
    }

    #[test]
    fn test_overlay_replaces_existing() {
        let base = AnswerSet::new().with("a", "1").with("b", "2");
        let merged = base.overlay(vec![("b".to_string(), Answer::from("3"))]);
        assert_eq!(merged.get("a"), Some(&Answer::from("1")));
        assert_eq!(merged.get("b"), Some(&Answer::from("3")));
        assert_eq!(base.get("b"), Some(&Answer::from("2")));
    }
}
