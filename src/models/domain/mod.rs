pub mod attempt_state;
pub mod card;
pub mod category;
pub mod order;
pub mod question;
pub mod question_set;
pub mod user;
pub use attempt_state::{ProgressSnapshot, QuestionOrder, QuizAttemptState};
pub use card::{Card, CardStatus};
pub use category::Category;
pub use order::Order;
pub use question::{CorrectAnswers, Question, QuestionView};
pub use question_set::QuestionSet;
pub use user::{User, UserRole};
