pub mod account_service;
pub mod catalog_service;
pub mod grading;
pub mod mailer;
pub mod quiz_session_service;
pub mod slug;

pub use account_service::AccountService;
pub use catalog_service::{CatalogKind, CatalogService};
pub use mailer::{LogMailer, Mailer};
pub use quiz_session_service::{GradedAnswer, QuizSessionService, QuizStep};
