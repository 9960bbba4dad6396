//! Condition evaluation against an answer set

use assist_core::ast::{Comparison, ComparisonOp, Condition};
use assist_core::types::parse_decimal;
use assist_core::{Answer, AnswerSet, TypeMismatch};
use bigdecimal::BigDecimal;

pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Evaluate `condition` inside a decision point scoped to `scope`.
    ///
    /// Comparisons without an element of their own compare against `scope`.
    /// An unanswered scope makes the whole condition false, as does an
    /// unanswered element at any leaf. Numeric comparisons that cannot parse
    /// both sides push a [`TypeMismatch`] and count as false.
    pub fn evaluate(
        condition: &Condition,
        scope: Option<&str>,
        answers: &AnswerSet,
        mismatches: &mut Vec<TypeMismatch>,
    ) -> bool {
        if let Some(scope_id) = scope {
            if !answers.has_answer(scope_id) {
                tracing::debug!("Scope element '{}' has no answer, condition is false", scope_id);
                return false;
            }
        }
        Self::evaluate_condition(condition, scope, answers, mismatches)
    }

    fn evaluate_condition(
        condition: &Condition,
        scope: Option<&str>,
        answers: &AnswerSet,
        mismatches: &mut Vec<TypeMismatch>,
    ) -> bool {
        match condition {
            Condition::And(children) => {
                for child in children {
                    if !Self::evaluate_condition(child, scope, answers, mismatches) {
                        return false;
                    }
                }
                true
            }
            Condition::Or(children) => {
                for child in children {
                    if Self::evaluate_condition(child, scope, answers, mismatches) {
                        return true;
                    }
                }
                false
            }
            Condition::Not(children) => {
                for child in children {
                    if Self::evaluate_condition(child, scope, answers, mismatches) {
                        return false;
                    }
                }
                true
            }
            Condition::Compare(comparison) => {
                let result = Self::evaluate_comparison(comparison, scope, answers, mismatches);
                tracing::debug!("Comparison {:?} in scope {:?}: {}", comparison, scope, result);
                result
            }
            Condition::HasAnyNChoices {
                element_id,
                minimum_choices,
            } => answers
                .answered(element_id)
                .map(|answer| answer.count() >= *minimum_choices)
                .unwrap_or(false),
            Condition::Contains {
                element_id,
                operand,
            } => match answers.answered(element_id) {
                Some(Answer::Single(value)) => value.contains(operand.as_str()),
                Some(answer) => answer.contains_value(operand),
                None => false,
            },
            Condition::ChoiceRef {
                element_id,
                choice_value,
            } => answers
                .answered(element_id)
                .map(|answer| answer.contains_value(choice_value))
                .unwrap_or(false),
        }
    }

    fn evaluate_comparison(
        comparison: &Comparison,
        scope: Option<&str>,
        answers: &AnswerSet,
        mismatches: &mut Vec<TypeMismatch>,
    ) -> bool {
        let Some(element_id) = comparison.target(scope) else {
            return false;
        };
        let Some(answer) = answers.answered(element_id) else {
            return false;
        };

        if comparison.op == ComparisonOp::Equal {
            return answer.contains_value(&comparison.operand);
        }

        let mismatch = |value: &str| TypeMismatch {
            element_id: element_id.to_string(),
            answer: value.to_string(),
            operator: comparison.op.symbol().to_string(),
            operand: comparison.operand.clone(),
        };

        let Some(operand) = parse_decimal(&comparison.operand) else {
            tracing::warn!("Non-numeric operand '{}' for element '{}'", comparison.operand, element_id);
            mismatches.push(mismatch(&answer.values().join(", ")));
            return false;
        };

        // with several selections, any one satisfying the comparison is enough
        let mut matched = false;
        for value in answer.values() {
            match parse_decimal(value) {
                Some(number) => {
                    if compare(&number, comparison.op, &operand) {
                        matched = true;
                        break;
                    }
                }
                None => {
                    tracing::warn!("Non-numeric answer '{}' for element '{}'", value, element_id);
                    mismatches.push(mismatch(value));
                }
            }
        }
        matched
    }
}

fn compare(left: &BigDecimal, op: ComparisonOp, right: &BigDecimal) -> bool {
    match op {
        ComparisonOp::Equal => left == right,
        ComparisonOp::GreaterThan => left > right,
        ComparisonOp::LessThan => left < right,
        ComparisonOp::GreaterOrEqual => left >= right,
        ComparisonOp::LessOrEqual => left <= right,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(condition: &Condition, scope: Option<&str>, answers: &AnswerSet) -> bool {
        let mut mismatches = Vec::new();
        ConditionEvaluator::evaluate(condition, scope, answers, &mut mismatches)
    }

    #[test]
    fn test_numeric_comparisons_use_scope() {
        let answers = AnswerSet::new().with("E1", 5i64);
        assert!(eval(&Condition::greater_than("3"), Some("E1"), &answers));
        assert!(!eval(&Condition::less_than("3"), Some("E1"), &answers));
        assert!(eval(&Condition::greater_or_equal("5"), Some("E1"), &answers));
        assert!(eval(&Condition::less_or_equal("5.0"), Some("E1"), &answers));
    }

    #[test]
    fn test_explicit_element_overrides_scope() {
        let answers = AnswerSet::new().with("E1", 5i64).with("E2", 1i64);
        let condition = Condition::Compare(Comparison::new(ComparisonOp::GreaterThan, "3").on("E2"));
        assert!(!eval(&condition, Some("E1"), &answers));
    }

    #[test]
    fn test_decimal_comparison_is_exact() {
        let answers = AnswerSet::new().with("size", "0.30");
        assert!(eval(&Condition::greater_or_equal("0.3"), Some("size"), &answers));
        assert!(!eval(&Condition::greater_than("0.3"), Some("size"), &answers));
    }

    #[test]
    fn test_type_mismatch_recorded_and_false() {
        let answers = AnswerSet::new().with("E1", "large");
        let mut mismatches = Vec::new();
        let result = ConditionEvaluator::evaluate(
            &Condition::greater_than("3"),
            Some("E1"),
            &answers,
            &mut mismatches,
        );
        assert!(!result);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].element_id, "E1");
        assert_eq!(mismatches[0].answer, "large");
        assert_eq!(mismatches[0].operator, ">");
    }

    #[test]
    fn test_huge_exponent_is_a_mismatch() {
        let answers = AnswerSet::new().with("E1", "1e2000000");
        let mut mismatches = Vec::new();
        let result = ConditionEvaluator::evaluate(
            &Condition::greater_than("3"),
            Some("E1"),
            &answers,
            &mut mismatches,
        );
        assert!(!result);
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].answer, "1e2000000");
    }

    #[test]
    fn test_unanswered_scope_is_false_even_under_not() {
        let answers = AnswerSet::new();
        let condition = Condition::Not(vec![Condition::equal("x")]);
        assert!(!eval(&condition, Some("E1"), &answers));
        assert!(eval(&condition, None, &answers));
    }

    #[test]
    fn test_equal_is_case_sensitive_membership() {
        let single = AnswerSet::new().with("c", "Solid");
        assert!(!eval(&Condition::equal("solid"), Some("c"), &single));

        let multiple = AnswerSet::new().with("c", vec!["a", "b"]);
        assert!(eval(&Condition::equal("b"), Some("c"), &multiple));
        assert!(!eval(&Condition::equal("a, b"), Some("c"), &multiple));
    }

    #[test]
    fn test_contains_substring_or_membership() {
        let single = AnswerSet::new().with("note", "left upper lobe");
        assert!(eval(&Condition::contains("note", "upper"), None, &single));

        let multiple = AnswerSet::new().with("foci", vec!["punctate", "peripheral"]);
        assert!(eval(&Condition::contains("foci", "punctate"), None, &multiple));
        assert!(!eval(&Condition::contains("foci", "punct"), None, &multiple));
    }

    #[test]
    fn test_has_any_n_choices() {
        let two = AnswerSet::new().with("E4", vec!["a", "b"]);
        let one = AnswerSet::new().with("E4", vec!["a"]);
        let condition = Condition::has_any_n_choices("E4", 2);
        assert!(eval(&condition, None, &two));
        assert!(!eval(&condition, None, &one));
        assert!(!eval(&condition, None, &AnswerSet::new()));
    }

    #[test]
    fn test_and_short_circuits_before_mismatch() {
        let answers = AnswerSet::new().with("a", "1").with("b", "text");
        let condition = Condition::And(vec![
            Condition::choice("a", "2"),
            Condition::Compare(Comparison::new(ComparisonOp::GreaterThan, "1").on("b")),
        ]);
        let mut mismatches = Vec::new();
        assert!(!ConditionEvaluator::evaluate(&condition, None, &answers, &mut mismatches));
        assert!(mismatches.is_empty());
    }

    #[test]
    fn test_or_and_not() {
        let answers = AnswerSet::new().with("c", "cystic");
        let either = Condition::Or(vec![Condition::equal("cystic"), Condition::equal("spongiform")]);
        assert!(eval(&either, Some("c"), &answers));

        let neither = Condition::Not(vec![Condition::equal("solid"), Condition::equal("mixed")]);
        assert!(eval(&neither, Some("c"), &answers));
    }
}
