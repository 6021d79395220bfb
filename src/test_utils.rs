use std::sync::Arc;

use crate::{
    app_state::{AppState, Repositories},
    config::Config,
    repositories::{
        card_repository::MockCardRepository, category_repository::MockCategoryRepository,
        order_repository::MockOrderRepository, question_repository::MockQuestionRepository,
        question_set_repository::MockQuestionSetRepository,
        user_repository::MockUserRepository,
    },
    services::LogMailer,
    session::InMemorySessionStore,
};

pub mod fixtures {
    use crate::models::domain::{Category, Question, QuestionSet};

    pub fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Active category with the slug of its title.
    pub fn category(title: &str) -> Category {
        let mut category = Category::new(title, "");
        category.slug = crate::services::slug::slugify(title);
        category
    }

    /// Active question set with the slug of its title.
    pub fn question_set(category_id: &str, title: &str) -> QuestionSet {
        let mut set = QuestionSet::new(category_id, title);
        set.slug = crate::services::slug::slugify(title);
        set
    }

    /// The two questions of the "Math" test: `{1,3}` of four and `{1}` of two.
    pub fn math_questions(set_id: &str) -> Vec<Question> {
        let mut even = Question::new(set_id, "Even numbers", strings(&["2", "3", "4", "5"]), "1,3")
            .expect("valid question");
        even.position = 0;
        let mut pick = Question::new(set_id, "Pick x", strings(&["x", "y"]), "1")
            .expect("valid question");
        pick.position = 1;
        vec![even, pick]
    }
}

/// Mock repositories with no expectations, to be filled in per test.
pub struct MockRepositories {
    pub categories: MockCategoryRepository,
    pub question_sets: MockQuestionSetRepository,
    pub questions: MockQuestionRepository,
    pub cards: MockCardRepository,
    pub orders: MockOrderRepository,
    pub users: MockUserRepository,
}

impl MockRepositories {
    pub fn new() -> Self {
        Self {
            categories: MockCategoryRepository::new(),
            question_sets: MockQuestionSetRepository::new(),
            questions: MockQuestionRepository::new(),
            cards: MockCardRepository::new(),
            orders: MockOrderRepository::new(),
            users: MockUserRepository::new(),
        }
    }

    pub fn into_state(self) -> AppState {
        let repositories = Repositories {
            categories: Arc::new(self.categories),
            question_sets: Arc::new(self.question_sets),
            questions: Arc::new(self.questions),
            cards: Arc::new(self.cards),
            orders: Arc::new(self.orders),
            users: Arc::new(self.users),
        };

        AppState::from_parts(
            Config::test_config(),
            repositories,
            Arc::new(InMemorySessionStore::default()),
            Arc::new(LogMailer),
        )
    }
}

pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents an error (4xx or 5xx)
    pub fn assert_error_status(status: StatusCode) {
        assert!(
            status.is_client_error() || status.is_server_error(),
            "Expected error status, got: {}",
            status
        );
    }

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::*;

    #[test]
    fn test_fixtures_math_questions() {
        let set = question_set("cat-1", "Math");
        let questions = math_questions(&set.id);

        assert_eq!(set.slug, "math");
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].right_answer_texts(), strings(&["2", "4"]));
    }
}
