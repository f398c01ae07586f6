//! Answer scoring.
//!
//! A question contributes one point when an option is selected and the text
//! at the selected position equals the question's answer text. Unanswered,
//! mismatched and out-of-range selections contribute nothing.

use std::collections::BTreeMap;

use crate::model::Question;

/// Selected option position keyed by question position, both 0-based.
pub type AnswerSelection = BTreeMap<usize, usize>;

/// Points earned by a single question (0 or 1).
pub fn contribution(question: &Question, selected: Option<usize>) -> u32 {
    match selected.and_then(|i| question.options.get(i)) {
        Some(option) if *option == question.answer => 1,
        _ => 0,
    }
}

/// Total score over all questions, in their original order.
pub fn score(questions: &[Question], answers: &AnswerSelection) -> u32 {
    questions
        .iter()
        .enumerate()
        .map(|(idx, q)| contribution(q, answers.get(&idx).copied()))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], answer: &str) -> Question {
        Question {
            prompt: "?".into(),
            options: options.iter().map(|s| s.to_string()).collect(),
            answer: answer.into(),
        }
    }

    #[test]
    fn contribution_compares_option_text() {
        let q = question(&["A", "B", "C"], "B");
        assert_eq!(contribution(&q, Some(1)), 1);
        assert_eq!(contribution(&q, Some(0)), 0);
        assert_eq!(contribution(&q, None), 0);
    }

    #[test]
    fn out_of_range_selection_scores_zero() {
        let q = question(&["A", "B"], "B");
        assert_eq!(contribution(&q, Some(7)), 0);
    }

    #[test]
    fn all_correct() {
        let questions = vec![
            question(&["1", "2"], "2"),
            question(&["x", "y", "z"], "x"),
            question(&["yes", "no"], "no"),
        ];
        let answers = AnswerSelection::from([(0, 1), (1, 0), (2, 1)]);
        assert_eq!(score(&questions, &answers), 3);
    }

    #[test]
    fn mixed_answers() {
        let questions = vec![
            question(&["1", "2"], "2"),
            question(&["x", "y", "z"], "x"),
            question(&["yes", "no"], "no"),
        ];
        // q0 correct, q1 wrong, q2 unanswered
        let answers = AnswerSelection::from([(0, 1), (1, 2)]);
        assert_eq!(score(&questions, &answers), 1);
    }

    #[test]
    fn zero_questions_scores_zero() {
        assert_eq!(score(&[], &AnswerSelection::new()), 0);
        assert_eq!(score(&[], &AnswerSelection::from([(0, 0)])), 0);
    }

    #[test]
    fn answer_missing_from_options_never_scores() {
        let q = question(&["A", "B"], "C");
        assert_eq!(contribution(&q, Some(0)), 0);
        assert_eq!(contribution(&q, Some(1)), 0);
    }
}
