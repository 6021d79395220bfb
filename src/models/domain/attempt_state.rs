use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

/// Session key under which the single in-progress attempt lives.
pub const ATTEMPT_SESSION_KEY: &str = "quiz_attempt";

/// Which end of the remaining ids the next question is taken from.
///
/// `PopBack` reproduces the historical behaviour: ids are stored in question
/// order and served from the end, so a test runs back to front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionOrder {
    #[default]
    PopBack,
    PopFront,
}

impl FromStr for QuestionOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pop_back" | "back" | "reverse" => Ok(QuestionOrder::PopBack),
            "pop_front" | "front" | "in_order" => Ok(QuestionOrder::PopFront),
            other => Err(AppError::ValidationError(format!(
                "Unknown question order '{}'",
                other
            ))),
        }
    }
}

/// Progress of one user's run through a question set. Lives only in the
/// session store and is validated every time it is read back.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct QuizAttemptState {
    pub title: String,
    pub question_set_slug: String,
    pub remaining_question_ids: Vec<String>,
    pub counter: u32,
    pub quantity: u32,
    pub right_count: u32,
    pub wrong_count: u32,
    pub percent_right: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub title: String,
    pub question_set_slug: String,
    pub counter: u32,
    pub quantity: u32,
    pub right_count: u32,
    pub wrong_count: u32,
    pub percent_right: f64,
}

impl QuizAttemptState {
    pub fn start(title: &str, question_set_slug: &str, question_ids: Vec<String>) -> AppResult<Self> {
        if question_ids.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Question set '{}' has no questions",
                question_set_slug
            )));
        }

        Ok(QuizAttemptState {
            title: title.to_string(),
            question_set_slug: question_set_slug.to_string(),
            quantity: question_ids.len() as u32,
            remaining_question_ids: question_ids,
            counter: 0,
            right_count: 0,
            wrong_count: 0,
            percent_right: 0.0,
        })
    }

    /// Checks the relations between the counters; a stored blob that breaks
    /// one of them is not trusted.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.quantity == 0 {
            return Err("quantity is zero".to_string());
        }
        if self.counter as usize + self.remaining_question_ids.len() != self.quantity as usize {
            return Err(format!(
                "counter {} plus {} remaining ids does not match quantity {}",
                self.counter,
                self.remaining_question_ids.len(),
                self.quantity
            ));
        }
        let graded = self.graded();
        if graded > u64::from(self.counter) {
            return Err(format!(
                "{} graded answers for {} served questions",
                graded, self.counter
            ));
        }
        let expected = percent_of(self.right_count, self.quantity);
        if !self.percent_right.is_finite() || (self.percent_right - expected).abs() > 1e-9 {
            return Err(format!(
                "percent {} does not match {} right of {}",
                self.percent_right, self.right_count, self.quantity
            ));
        }
        Ok(())
    }

    fn graded(&self) -> u64 {
        u64::from(self.right_count) + u64::from(self.wrong_count)
    }

    /// Consumes the next question id and counts it as served.
    pub fn take_next(&mut self, order: QuestionOrder) -> Option<String> {
        let next = match order {
            QuestionOrder::PopBack => self.remaining_question_ids.pop(),
            QuestionOrder::PopFront if !self.remaining_question_ids.is_empty() => {
                Some(self.remaining_question_ids.remove(0))
            }
            QuestionOrder::PopFront => None,
        };

        if next.is_some() {
            self.counter += 1;
        }
        next
    }

    /// A served question has not been answered yet.
    pub fn awaiting_answer(&self) -> bool {
        self.graded() < u64::from(self.counter)
    }

    /// Applies a graded answer. Returns `false` when there is no served,
    /// unanswered question to attribute it to.
    pub fn record_answer(&mut self, correct: bool) -> bool {
        if !self.awaiting_answer() {
            return false;
        }

        if correct {
            self.right_count += 1;
            self.percent_right = percent_of(self.right_count, self.quantity);
        } else {
            self.wrong_count += 1;
        }
        true
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            title: self.title.clone(),
            question_set_slug: self.question_set_slug.clone(),
            counter: self.counter,
            quantity: self.quantity,
            right_count: self.right_count,
            wrong_count: self.wrong_count,
            percent_right: self.percent_right,
        }
    }
}

fn percent_of(right_count: u32, quantity: u32) -> f64 {
    if quantity == 0 {
        return 0.0;
    }
    100.0 * f64::from(right_count) / f64::from(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn start_requires_questions() {
        assert!(QuizAttemptState::start("Math", "math", vec![]).is_err());

        let state = QuizAttemptState::start("Math", "math", ids(&["a", "b"])).expect("start");
        assert_eq!(state.quantity, 2);
        assert_eq!(state.counter, 0);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn pop_back_serves_from_the_end() {
        let mut state = QuizAttemptState::start("Math", "math", ids(&["a", "b", "c"])).expect("start");

        assert_eq!(state.take_next(QuestionOrder::PopBack).as_deref(), Some("c"));
        assert_eq!(state.take_next(QuestionOrder::PopBack).as_deref(), Some("b"));
        assert_eq!(state.counter, 2);
        assert_eq!(state.remaining_question_ids, ids(&["a"]));
    }

    #[test]
    fn pop_front_serves_in_stored_order() {
        let mut state = QuizAttemptState::start("Math", "math", ids(&["a", "b"])).expect("start");

        assert_eq!(state.take_next(QuestionOrder::PopFront).as_deref(), Some("a"));
        assert_eq!(state.take_next(QuestionOrder::PopFront).as_deref(), Some("b"));
        assert_eq!(state.take_next(QuestionOrder::PopFront), None);
        assert_eq!(state.counter, 2);
    }

    #[test]
    fn record_answer_only_counts_served_questions() {
        let mut state = QuizAttemptState::start("Math", "math", ids(&["a", "b"])).expect("start");

        assert!(!state.record_answer(true));
        state.take_next(QuestionOrder::PopBack);
        assert!(state.record_answer(true));
        assert!(!state.record_answer(false));

        assert_eq!(state.right_count, 1);
        assert_eq!(state.wrong_count, 0);
        assert_eq!(state.percent_right, 50.0);
    }

    #[test]
    fn wrong_answer_keeps_percent() {
        let mut state = QuizAttemptState::start("Math", "math", ids(&["a", "b", "c", "d"])).expect("start");
        state.take_next(QuestionOrder::PopBack);
        state.record_answer(true);
        state.take_next(QuestionOrder::PopBack);
        state.record_answer(false);

        assert_eq!(state.percent_right, 25.0);
        assert_eq!(state.wrong_count, 1);
    }

    #[test]
    fn invariants_catch_tampered_counters() {
        let mut state = QuizAttemptState::start("Math", "math", ids(&["a", "b"])).expect("start");
        state.counter = 1;
        assert!(state.check_invariants().is_err());

        let mut state = QuizAttemptState::start("Math", "math", ids(&["a", "b"])).expect("start");
        state.right_count = 1;
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn invariants_reject_overflowing_counts() {
        let mut state = QuizAttemptState::start("Math", "math", ids(&["a", "b"])).expect("start");
        state.take_next(QuestionOrder::PopBack);
        state.right_count = u32::MAX;
        state.wrong_count = 1;

        assert!(state.check_invariants().is_err());
        assert!(!state.awaiting_answer());
    }

    #[test]
    fn invariants_reject_stale_percent() {
        let mut state = QuizAttemptState::start("Math", "math", ids(&["a", "b"])).expect("start");
        state.take_next(QuestionOrder::PopBack);
        state.record_answer(true);
        assert!(state.check_invariants().is_ok());

        state.percent_right = 100.0;
        assert!(state.check_invariants().is_err());
    }

    #[test]
    fn question_order_parses_config_values() {
        assert_eq!("pop_back".parse::<QuestionOrder>().ok(), Some(QuestionOrder::PopBack));
        assert_eq!("POP_FRONT".parse::<QuestionOrder>().ok(), Some(QuestionOrder::PopFront));
        assert!("random".parse::<QuestionOrder>().is_err());
    }
}
