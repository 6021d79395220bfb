use std::collections::BTreeSet;

use async_graphql::SimpleObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

pub const MAX_ANSWERS: usize = 4;

const DIGITS_ONLY_MSG: &str = "Use only digits in the right answers of a question";
const CHECK_RIGHT_ANSWERS_MSG: &str = "Check the number and values of the specified right answers";

/// 1-based indices of the correct choices of a question.
///
/// Always non-empty and a proper subset of the question's choices; the only way
/// to build one is [`CorrectAnswers::new`], which checks both.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CorrectAnswers(BTreeSet<u8>);

impl CorrectAnswers {
    pub fn new(indices: impl IntoIterator<Item = u8>, answer_count: usize) -> AppResult<Self> {
        let indices: BTreeSet<u8> = indices.into_iter().collect();

        let in_range = indices
            .iter()
            .all(|&i| i >= 1 && (i as usize) <= answer_count);

        if indices.is_empty() || !in_range || indices.len() >= answer_count {
            log::info!("Rejected right answers {:?} for {} choices", indices, answer_count);
            return Err(AppError::ValidationError(CHECK_RIGHT_ANSWERS_MSG.to_string()));
        }

        Ok(Self(indices))
    }

    /// Parses the admin form encoding: comma separated digits, whitespace
    /// ignored, empty items skipped (`"1, 3,"`).
    pub fn parse(raw: &str, answer_count: usize) -> AppResult<Self> {
        let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

        let indices = compact
            .split(',')
            .filter(|item| !item.is_empty())
            .map(|item| item.parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| {
                log::info!("Rejected non-numeric right answers '{}'", raw);
                AppError::ValidationError(DIGITS_ONLY_MSG.to_string())
            })?;

        Self::new(indices, answer_count)
    }

    pub fn contains(&self, index: u8) -> bool {
        self.0.contains(&index)
    }

    pub fn indices(&self) -> &BTreeSet<u8> {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Stored shape of a question. Loaded records are promoted to [`Question`]
/// through `TryFrom`, so an invalid document never reaches grading.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct QuestionRecord {
    pub id: String,
    pub question_set_id: String,
    #[serde(default)]
    pub position: i64,
    pub text: String,
    pub answers: Vec<String>,
    pub right_answers: Vec<u8>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    pub id: String,
    pub question_set_id: String,
    /// Place within the set; questions are collected in ascending order.
    pub position: i64,
    pub text: String,
    answers: Vec<String>,
    right_answers: CorrectAnswers,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Question {
    /// Builds a question from up to four answer slots. Blank slots are dropped,
    /// so the right answer indices refer to the remaining answers in order.
    pub fn new(
        question_set_id: &str,
        text: &str,
        answers: Vec<String>,
        right_answers: &str,
    ) -> AppResult<Self> {
        let answers = compact_answers(answers)?;
        let right_answers = CorrectAnswers::parse(right_answers, answers.len())?;
        let now = Utc::now();

        Ok(Question {
            id: Uuid::new_v4().to_string(),
            question_set_id: question_set_id.to_string(),
            position: 0,
            text: text.to_string(),
            answers,
            right_answers,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    pub fn right_answers(&self) -> &CorrectAnswers {
        &self.right_answers
    }

    /// `(index, text)` pairs with 1-based indices.
    pub fn numbered_answers(&self) -> impl Iterator<Item = (u8, &str)> {
        self.answers
            .iter()
            .enumerate()
            .map(|(i, text)| (i as u8 + 1, text.as_str()))
    }

    pub fn right_answer_texts(&self) -> Vec<String> {
        self.numbered_answers()
            .filter(|(i, _)| self.right_answers.contains(*i))
            .map(|(_, text)| text.to_string())
            .collect()
    }
}

fn compact_answers(answers: Vec<String>) -> AppResult<Vec<String>> {
    let answers: Vec<String> = answers
        .into_iter()
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
        .collect();

    if answers.len() > MAX_ANSWERS {
        return Err(AppError::ValidationError(format!(
            "A question can have at most {} answers",
            MAX_ANSWERS
        )));
    }

    Ok(answers)
}

impl TryFrom<QuestionRecord> for Question {
    type Error = AppError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        let answers = compact_answers(record.answers)?;
        let right_answers = CorrectAnswers::new(record.right_answers, answers.len())?;

        Ok(Question {
            id: record.id,
            question_set_id: record.question_set_id,
            position: record.position,
            text: record.text,
            answers,
            right_answers,
            is_active: record.is_active,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        QuestionRecord {
            id: question.id,
            question_set_id: question.question_set_id,
            position: question.position,
            text: question.text,
            answers: question.answers,
            right_answers: question.right_answers.0.into_iter().collect(),
            is_active: question.is_active,
            created_at: question.created_at,
            updated_at: question.updated_at,
        }
    }
}

/// A question as shown to someone taking the test: no right answers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, SimpleObject)]
pub struct QuestionView {
    pub id: String,
    pub text: String,
    pub answers: Vec<String>,
    pub multiple_choice: bool,
}

impl From<&Question> for QuestionView {
    fn from(question: &Question) -> Self {
        QuestionView {
            id: question.id.clone(),
            text: question.text.clone(),
            answers: question.answers.clone(),
            multiple_choice: question.right_answers.len() > 1,
        }
    }
}
