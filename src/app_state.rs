use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::{Config, SessionBackend},
    db::Database,
    errors::AppResult,
    repositories::{
        CardRepository, CategoryRepository, MongoCardRepository, MongoCategoryRepository,
        MongoOrderRepository, MongoQuestionRepository, MongoQuestionSetRepository,
        MongoUserRepository, OrderRepository, QuestionRepository, QuestionSetRepository,
        UserRepository,
    },
    services::{AccountService, CatalogService, LogMailer, Mailer, QuizSessionService},
    session::{InMemorySessionStore, MongoSessionStore, SessionStore},
};

/// Storage behind the services, one handle per collection.
#[derive(Clone)]
pub struct Repositories {
    pub categories: Arc<dyn CategoryRepository>,
    pub question_sets: Arc<dyn QuestionSetRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub cards: Arc<dyn CardRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub users: Arc<dyn UserRepository>,
}

#[derive(Clone)]
pub struct AppState {
    pub quiz_service: Arc<QuizSessionService>,
    pub catalog_service: Arc<CatalogService>,
    pub account_service: Arc<AccountService>,
    pub jwt_service: JwtService,
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let categories = MongoCategoryRepository::new(&db);
        categories.ensure_indexes().await?;
        let question_sets = MongoQuestionSetRepository::new(&db);
        question_sets.ensure_indexes().await?;
        let questions = MongoQuestionRepository::new(&db);
        questions.ensure_indexes().await?;
        let cards = MongoCardRepository::new(&db);
        cards.ensure_indexes().await?;
        let orders = MongoOrderRepository::new(&db);
        orders.ensure_indexes().await?;
        let users = MongoUserRepository::new(&db);
        users.ensure_indexes().await?;

        let sessions: Arc<dyn SessionStore> = match config.session_backend {
            SessionBackend::Mongo => {
                let store = MongoSessionStore::new(&db, config.session_ttl_hours);
                store.ensure_indexes().await?;
                Arc::new(store)
            }
            SessionBackend::Memory => {
                log::warn!("Using in-memory session storage; attempts are lost on restart");
                Arc::new(InMemorySessionStore::new(config.session_ttl_hours))
            }
        };

        let repositories = Repositories {
            categories: Arc::new(categories),
            question_sets: Arc::new(question_sets),
            questions: Arc::new(questions),
            cards: Arc::new(cards),
            orders: Arc::new(orders),
            users: Arc::new(users),
        };

        let mut state = Self::from_parts(config, repositories, sessions, Arc::new(LogMailer));
        state.db = Some(db);
        Ok(state)
    }

    /// Wires the services over the given storage without touching MongoDB.
    pub fn from_parts(
        config: Config,
        repositories: Repositories,
        sessions: Arc<dyn SessionStore>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        let quiz_service = Arc::new(QuizSessionService::new(
            repositories.question_sets.clone(),
            repositories.questions.clone(),
            sessions,
            config.question_order,
        ));

        let catalog_service = Arc::new(CatalogService::new(
            repositories.categories,
            repositories.question_sets,
            repositories.questions,
            repositories.cards,
            repositories.orders,
        ));

        let account_service = Arc::new(AccountService::new(
            repositories.users,
            mailer,
            jwt_service.clone(),
            &config.domain_name,
            &config.email_host_user,
        ));

        Self {
            quiz_service,
            catalog_service,
            account_service,
            jwt_service,
            db: None,
            config: Arc::new(config),
        }
    }
}
