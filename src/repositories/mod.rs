pub mod card_repository;
pub mod category_repository;
pub mod order_repository;
pub mod question_repository;
pub mod question_set_repository;
pub mod user_repository;

pub use card_repository::{CardRepository, MongoCardRepository};
pub use category_repository::{CategoryRepository, MongoCategoryRepository};
pub use order_repository::{MongoOrderRepository, OrderRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use question_set_repository::{MongoQuestionSetRepository, QuestionSetRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
