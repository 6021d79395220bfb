#![allow(dead_code)]

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use testquiz_server::{
    app_state::{AppState, Repositories},
    config::Config,
    errors::{AppError, AppResult},
    models::domain::{Card, Category, Order, Question, QuestionSet, User},
    repositories::{
        CardRepository, CategoryRepository, OrderRepository, QuestionRepository,
        QuestionSetRepository, UserRepository,
    },
    services::{mailer::Email, Mailer},
    session::InMemorySessionStore,
};

fn page<T: Clone>(items: &[T], offset: i64, limit: i64) -> Vec<T> {
    let start = offset.max(0) as usize;
    let end = (start + limit.max(0) as usize).min(items.len());

    if start >= items.len() {
        vec![]
    } else {
        items[start..end].to_vec()
    }
}

#[derive(Default)]
pub struct InMemoryCategoryRepository {
    categories: RwLock<HashMap<String, Category>>,
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, category: Category) -> AppResult<Category> {
        let mut categories = self.categories.write().await;
        if categories.values().any(|c| c.slug == category.slug) {
            return Err(AppError::AlreadyExists(format!("Category slug '{}'", category.slug)));
        }
        categories.insert(category.id.clone(), category.clone());
        Ok(category)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Category>> {
        Ok(self.categories.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<Category>> {
        let categories = self.categories.read().await;
        Ok(categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list_active(&self) -> AppResult<Vec<Category>> {
        let categories = self.categories.read().await;
        let mut items: Vec<_> = categories.values().filter(|c| c.is_active).cloned().collect();
        items.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(items)
    }

    async fn update(&self, category: Category) -> AppResult<Category> {
        let mut categories = self.categories.write().await;
        if !categories.contains_key(&category.id) {
            return Err(AppError::NotFound(format!("Category '{}' not found", category.id)));
        }
        categories.insert(category.id.clone(), category.clone());
        Ok(category)
    }
}

#[derive(Default)]
pub struct InMemoryQuestionSetRepository {
    sets: RwLock<HashMap<String, QuestionSet>>,
}

#[async_trait]
impl QuestionSetRepository for InMemoryQuestionSetRepository {
    async fn create(&self, question_set: QuestionSet) -> AppResult<QuestionSet> {
        let mut sets = self.sets.write().await;
        if sets.values().any(|s| s.slug == question_set.slug) {
            return Err(AppError::AlreadyExists(format!("Question set slug '{}'", question_set.slug)));
        }
        sets.insert(question_set.id.clone(), question_set.clone());
        Ok(question_set)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<QuestionSet>> {
        Ok(self.sets.read().await.get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> AppResult<Option<QuestionSet>> {
        let sets = self.sets.read().await;
        Ok(sets.values().find(|s| s.slug == slug).cloned())
    }

    async fn list_by_category(&self, category_id: &str, active_only: bool) -> AppResult<Vec<QuestionSet>> {
        let sets = self.sets.read().await;
        let mut items: Vec<_> = sets
            .values()
            .filter(|s| s.category_id == category_id && (!active_only || s.is_active))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(items)
    }

    async fn list_active(&self) -> AppResult<Vec<QuestionSet>> {
        let sets = self.sets.read().await;
        let mut items: Vec<_> = sets.values().filter(|s| s.is_active).cloned().collect();
        items.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(items)
    }

    async fn update(&self, question_set: QuestionSet) -> AppResult<QuestionSet> {
        let mut sets = self.sets.write().await;
        if !sets.contains_key(&question_set.id) {
            return Err(AppError::NotFound(format!("Question set '{}' not found", question_set.id)));
        }
        sets.insert(question_set.id.clone(), question_set.clone());
        Ok(question_set)
    }
}

#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: RwLock<HashMap<String, Question>>,
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn list_ids_for_set(&self, question_set_id: &str) -> AppResult<Vec<String>> {
        let questions = self.questions.read().await;
        let mut items: Vec<_> = questions
            .values()
            .filter(|q| q.question_set_id == question_set_id && q.is_active)
            .collect();
        items.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.id.cmp(&b.id)));
        Ok(items.into_iter().map(|q| q.id.clone()).collect())
    }

    async fn count_for_set(&self, question_set_id: &str) -> AppResult<u64> {
        let questions = self.questions.read().await;
        Ok(questions
            .values()
            .filter(|q| q.question_set_id == question_set_id)
            .count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryCardRepository {
    cards: RwLock<HashMap<String, Card>>,
}

#[async_trait]
impl CardRepository for InMemoryCardRepository {
    async fn create(&self, card: Card) -> AppResult<Card> {
        let mut cards = self.cards.write().await;
        if cards.values().any(|c| c.slug == card.slug || c.title == card.title) {
            return Err(AppError::AlreadyExists(format!("Card '{}'", card.title)));
        }
        cards.insert(card.id.clone(), card.clone());
        Ok(card)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Card>> {
        Ok(self.cards.read().await.get(id).cloned())
    }

    async fn find_by_title(&self, title: &str) -> AppResult<Option<Card>> {
        let cards = self.cards.read().await;
        Ok(cards.values().find(|c| c.title == title).cloned())
    }

    async fn list_cards(&self, offset: i64, limit: i64) -> AppResult<(Vec<Card>, i64)> {
        let cards = self.cards.read().await;
        let mut items: Vec<_> = cards.values().cloned().collect();
        items.sort_by(|a, b| {
            b.expiration_date
                .cmp(&a.expiration_date)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok((page(&items, offset, limit), items.len() as i64))
    }

    async fn update(&self, card: Card) -> AppResult<Card> {
        let mut cards = self.cards.write().await;
        if !cards.contains_key(&card.id) {
            return Err(AppError::NotFound(format!("Card '{}' not found", card.id)));
        }
        cards.insert(card.id.clone(), card.clone());
        Ok(card)
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: RwLock<Vec<Order>>,
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn create(&self, order: Order) -> AppResult<Order> {
        self.orders.write().await.push(order.clone());
        Ok(order)
    }

    async fn list_for_card(&self, card_title: &str) -> AppResult<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut items: Vec<_> = orders
            .iter()
            .filter(|o| o.card_title == card_title)
            .cloned()
            .collect();
        items.sort_by(|a, b| b.use_time.cmp(&a.use_time));
        Ok(items)
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) || users.values().any(|u| u.email == user.email) {
            return Err(AppError::AlreadyExists(format!("User '{}'", user.username)));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.username) {
            return Err(AppError::NotFound(format!("User '{}' not found", user.username)));
        }
        users.insert(user.username.clone(), user.clone());
        Ok(user)
    }

    async fn delete(&self, username: &str) -> AppResult<()> {
        self.users
            .write()
            .await
            .remove(username)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("User '{}' not found", username)))
    }
}

/// Keeps every message instead of delivering it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: RwLock<Vec<Email>>,
}

impl RecordingMailer {
    pub async fn sent(&self) -> Vec<Email> {
        self.sent.read().await.clone()
    }

    /// The last URL mailed to `to` that starts with `prefix`.
    pub async fn last_link(&self, to: &str, prefix: &str) -> Option<String> {
        let sent = self.sent.read().await;
        sent.iter()
            .rev()
            .filter(|email| email.to == to)
            .find_map(|email| {
                email
                    .body
                    .split_whitespace()
                    .find(|word| word.starts_with(prefix))
                    .map(str::to_string)
            })
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> AppResult<()> {
        self.sent.write().await.push(email);
        Ok(())
    }
}

/// In-memory storage shared between a test and the app under test.
#[derive(Clone)]
pub struct TestStorage {
    pub categories: Arc<InMemoryCategoryRepository>,
    pub question_sets: Arc<InMemoryQuestionSetRepository>,
    pub questions: Arc<InMemoryQuestionRepository>,
    pub cards: Arc<InMemoryCardRepository>,
    pub orders: Arc<InMemoryOrderRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub sessions: Arc<InMemorySessionStore>,
    pub mailer: Arc<RecordingMailer>,
}

impl TestStorage {
    pub fn new() -> Self {
        Self {
            categories: Arc::new(InMemoryCategoryRepository::default()),
            question_sets: Arc::new(InMemoryQuestionSetRepository::default()),
            questions: Arc::new(InMemoryQuestionRepository::default()),
            cards: Arc::new(InMemoryCardRepository::default()),
            orders: Arc::new(InMemoryOrderRepository::default()),
            users: Arc::new(InMemoryUserRepository::default()),
            sessions: Arc::new(InMemorySessionStore::default()),
            mailer: Arc::new(RecordingMailer::default()),
        }
    }

    pub fn app_state(&self, config: Config) -> AppState {
        let repositories = Repositories {
            categories: self.categories.clone(),
            question_sets: self.question_sets.clone(),
            questions: self.questions.clone(),
            cards: self.cards.clone(),
            orders: self.orders.clone(),
            users: self.users.clone(),
        };

        AppState::from_parts(config, repositories, self.sessions.clone(), self.mailer.clone())
    }
}
