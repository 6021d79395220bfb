use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::domain::Question;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Grade {
    pub correct: bool,
    pub right_answers: Vec<String>,
    pub submitted_answers: Vec<String>,
}

/// Grades submitted answer texts against a question.
///
/// Submitted values are matched to choices by exact text; the answer is
/// correct only when the matched indices equal the right answer set. There
/// is no partial credit, so a missing or an extra choice both fail.
pub fn grade(question: &Question, submitted: &[String]) -> Grade {
    let submitted_indices: BTreeSet<u8> = question
        .numbered_answers()
        .filter(|(_, text)| submitted.iter().any(|s| s == text))
        .map(|(i, _)| i)
        .collect();

    let correct = &submitted_indices == question.right_answers().indices();

    Grade {
        correct,
        right_answers: question.right_answer_texts(),
        submitted_answers: submitted.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn question_a() -> Question {
        Question::new("math", "Even numbers", strings(&["2", "3", "4", "5"]), "1,3")
            .expect("valid question")
    }

    fn question_b() -> Question {
        Question::new("math", "Pick x", strings(&["x", "y"]), "1").expect("valid question")
    }

    #[test]
    fn exact_set_is_correct() {
        let grade = grade(&question_a(), &strings(&["2", "4"]));

        assert!(grade.correct);
        assert_eq!(grade.right_answers, strings(&["2", "4"]));
        assert_eq!(grade.submitted_answers, strings(&["2", "4"]));
    }

    #[test]
    fn order_and_duplicates_do_not_matter() {
        assert!(grade(&question_a(), &strings(&["4", "2", "4"])).correct);
    }

    #[test]
    fn subset_superset_and_disjoint_are_wrong() {
        let question = question_a();

        assert!(!grade(&question, &strings(&["2"])).correct);
        assert!(!grade(&question, &strings(&["2", "3", "4"])).correct);
        assert!(!grade(&question, &strings(&["3", "5"])).correct);
        assert!(!grade(&question, &[]).correct);
    }

    #[test]
    fn superset_of_single_answer_is_wrong() {
        let grade = grade(&question_b(), &strings(&["x", "y"]));

        assert!(!grade.correct);
        assert_eq!(grade.right_answers, strings(&["x"]));
        assert_eq!(grade.submitted_answers, strings(&["x", "y"]));
    }

    #[test]
    fn text_matching_no_choice_adds_no_index() {
        assert!(grade(&question_b(), &strings(&["x", "z"])).correct);
        assert!(!grade(&question_b(), &strings(&["z"])).correct);
    }

    #[test]
    fn matching_is_exact() {
        assert!(!grade(&question_b(), &strings(&["X"])).correct);
        assert!(!grade(&question_b(), &strings(&[" x"])).correct);
    }
}
