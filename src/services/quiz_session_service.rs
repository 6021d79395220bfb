use std::sync::Arc;

use serde::Serialize;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        attempt_state::ATTEMPT_SESSION_KEY, ProgressSnapshot, QuestionView, QuizAttemptState,
    },
    repositories::{QuestionRepository, QuestionSetRepository},
    services::grading::{self, Grade},
    session::SessionStore,
};

pub use crate::models::domain::QuestionOrder;

/// Result of asking for the next question of an attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum QuizStep {
    Question {
        question: QuestionView,
        progress: ProgressSnapshot,
    },
    /// Every question was served; the attempt has been removed from the session.
    Complete { progress: ProgressSnapshot },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GradedAnswer {
    #[serde(flatten)]
    pub grade: Grade,
    /// Whether the answer was counted towards the attempt in the session.
    pub recorded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<ProgressSnapshot>,
}

fn session_error(err: AppError) -> AppError {
    match err {
        AppError::SessionError(_) => err,
        other => AppError::SessionError(other.to_string()),
    }
}

/// Hands out the questions of a set one at a time and keeps score, with the
/// session store as the only record of an attempt in progress.
pub struct QuizSessionService {
    question_sets: Arc<dyn QuestionSetRepository>,
    questions: Arc<dyn QuestionRepository>,
    sessions: Arc<dyn SessionStore>,
    order: QuestionOrder,
}

impl QuizSessionService {
    pub fn new(
        question_sets: Arc<dyn QuestionSetRepository>,
        questions: Arc<dyn QuestionRepository>,
        sessions: Arc<dyn SessionStore>,
        order: QuestionOrder,
    ) -> Self {
        Self {
            question_sets,
            questions,
            sessions,
            order,
        }
    }

    /// Reads the attempt of a session. A blob that does not parse or breaks the
    /// counter invariants is dropped and reported as absent.
    pub async fn load_attempt(&self, session_id: &str) -> AppResult<Option<QuizAttemptState>> {
        let Some(value) = self
            .sessions
            .get(session_id, ATTEMPT_SESSION_KEY)
            .await
            .map_err(session_error)?
        else {
            return Ok(None);
        };

        let state = serde_json::from_value::<QuizAttemptState>(value)
            .map_err(|e| e.to_string())
            .and_then(|state| state.check_invariants().map(|_| state));

        match state {
            Ok(state) => Ok(Some(state)),
            Err(reason) => {
                log::warn!("Discarding invalid quiz attempt of session {}: {}", session_id, reason);
                self.sessions
                    .delete(session_id, ATTEMPT_SESSION_KEY)
                    .await
                    .map_err(session_error)?;
                Ok(None)
            }
        }
    }

    async fn save_attempt(&self, session_id: &str, state: &QuizAttemptState) -> AppResult<()> {
        let value = serde_json::to_value(state)?;
        self.sessions
            .set(session_id, ATTEMPT_SESSION_KEY, value)
            .await
            .map_err(session_error)
    }

    /// Returns the attempt stored for the session, or starts one for `slug`.
    ///
    /// A stored attempt is resumed as is, even when it belongs to another set:
    /// a session holds one attempt until it completes or is abandoned.
    pub async fn start_or_resume(&self, session_id: &str, slug: &str) -> AppResult<QuizAttemptState> {
        if let Some(state) = self.load_attempt(session_id).await? {
            log::debug!(
                "Resuming attempt at '{}' for session {} ({} of {} served)",
                state.question_set_slug,
                session_id,
                state.counter,
                state.quantity
            );
            return Ok(state);
        }

        let question_set = self
            .question_sets
            .find_by_slug(slug)
            .await?
            .filter(|set| set.is_active)
            .ok_or_else(|| AppError::NotFound(format!("Question set '{}' not found", slug)))?;

        let ids = self.questions.list_ids_for_set(&question_set.id).await?;
        let state = QuizAttemptState::start(&question_set.title, &question_set.slug, ids)?;
        self.save_attempt(session_id, &state).await?;

        log::info!(
            "Started attempt at '{}' with {} questions for session {}",
            state.question_set_slug,
            state.quantity,
            session_id
        );
        Ok(state)
    }

    /// Serves the next question, or completes the attempt when none are left.
    pub async fn next_question(&self, session_id: &str, slug: &str) -> AppResult<QuizStep> {
        let mut state = self.start_or_resume(session_id, slug).await?;

        let Some(question_id) = state.take_next(self.order) else {
            self.sessions
                .delete(session_id, ATTEMPT_SESSION_KEY)
                .await
                .map_err(session_error)?;

            log::info!(
                "Completed attempt at '{}' for session {}: {}/{} right",
                state.question_set_slug,
                session_id,
                state.right_count,
                state.quantity
            );
            return Ok(QuizStep::Complete {
                progress: state.snapshot(),
            });
        };

        // Consumed before the lookup so a question removed mid-attempt is skipped
        // on the next request instead of failing forever.
        self.save_attempt(session_id, &state).await?;

        let question = self
            .questions
            .find_by_id(&question_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question '{}' not found", question_id)))?;

        Ok(QuizStep::Question {
            question: QuestionView::from(&question),
            progress: state.snapshot(),
        })
    }

    /// Grades an answer and counts it towards the session's attempt.
    ///
    /// A missing question is `NotFound`. Any other failure is logged and
    /// reported as `TryAgain`; the stored attempt is only written once, after
    /// the new counters are known, so a failure never leaves it half updated.
    pub async fn grade_answer(
        &self,
        session_id: &str,
        question_id: &str,
        submitted: &[String],
    ) -> AppResult<GradedAnswer> {
        let question = match self.questions.find_by_id(question_id).await {
            Ok(Some(question)) => question,
            Ok(None) => {
                return Err(AppError::NotFound(format!(
                    "Question '{}' not found",
                    question_id
                )))
            }
            Err(err) => {
                log::error!("Failed to load question {} for grading: {}", question_id, err);
                return Err(AppError::TryAgain);
            }
        };

        let grade = grading::grade(&question, submitted);

        let state = self.load_attempt(session_id).await.map_err(|err| {
            log::error!("Failed to read attempt of session {}: {}", session_id, err);
            AppError::TryAgain
        })?;

        let Some(mut state) = state else {
            log::debug!("Graded question {} outside of an attempt", question_id);
            return Ok(GradedAnswer {
                grade,
                recorded: false,
                progress: None,
            });
        };

        let recorded = state.record_answer(grade.correct);
        if recorded {
            self.save_attempt(session_id, &state).await.map_err(|err| {
                log::error!("Failed to store graded answer of session {}: {}", session_id, err);
                AppError::TryAgain
            })?;
        } else {
            log::debug!(
                "Answer to {} not recorded: no served question is awaiting an answer",
                question_id
            );
        }

        Ok(GradedAnswer {
            grade,
            recorded,
            progress: Some(state.snapshot()),
        })
    }

    /// Drops any attempt in progress for the session.
    pub async fn abandon(&self, session_id: &str) -> AppResult<()> {
        self.sessions
            .delete(session_id, ATTEMPT_SESSION_KEY)
            .await
            .map_err(session_error)
    }

    /// Drops attempts nobody touched within the session TTL.
    pub async fn purge_expired_sessions(&self) -> AppResult<u64> {
        let removed = self.sessions.delete_expired().await.map_err(session_error)?;
        if removed > 0 {
            log::info!("Removed {} expired session entries", removed);
        }
        Ok(removed)
    }
}
