use std::{str::FromStr, sync::Arc};

use chrono::Utc;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{Card, Category, Order, Question, QuestionSet},
        dto::request::{
            CreateCardRequest, CreateCategoryRequest, CreateOrderRequest, CreateQuestionRequest,
            CreateQuestionSetRequest, PaginationParams,
        },
    },
    repositories::{
        CardRepository, CategoryRepository, OrderRepository, QuestionRepository,
        QuestionSetRepository,
    },
    services::slug::save_with_unique_slug,
};

/// Records that are soft deleted by flipping their active flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CatalogKind {
    Category,
    QuestionSet,
    Card,
}

impl FromStr for CatalogKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "categories" => Ok(CatalogKind::Category),
            "question_sets" => Ok(CatalogKind::QuestionSet),
            "cards" => Ok(CatalogKind::Card),
            other => Err(AppError::NotFound(format!("Unknown catalog kind '{}'", other))),
        }
    }
}

/// Parses a decimal amount with at most two fractional digits into kopecks.
pub fn parse_amount(amount: &str) -> AppResult<i64> {
    let invalid = || AppError::ValidationError(format!("Invalid amount '{}'", amount));
    let amount = amount.trim();

    let (negative, digits) = match amount.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, amount),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));

    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() || fraction.len() > 2 || !all_digits(whole) || !all_digits(fraction) {
        return Err(invalid());
    }

    let whole: i64 = whole.parse().map_err(|_| invalid())?;
    let fraction: i64 = format!("{:0<2}", fraction).parse().map_err(|_| invalid())?;
    let minor = whole
        .checked_mul(100)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(invalid)?;

    Ok(if negative { -minor } else { minor })
}

pub struct CatalogService {
    categories: Arc<dyn CategoryRepository>,
    question_sets: Arc<dyn QuestionSetRepository>,
    questions: Arc<dyn QuestionRepository>,
    cards: Arc<dyn CardRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl CatalogService {
    pub fn new(
        categories: Arc<dyn CategoryRepository>,
        question_sets: Arc<dyn QuestionSetRepository>,
        questions: Arc<dyn QuestionRepository>,
        cards: Arc<dyn CardRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            categories,
            question_sets,
            questions,
            cards,
            orders,
        }
    }

    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.categories.list_active().await
    }

    /// An active category with its active question sets.
    pub async fn category_with_sets(&self, slug: &str) -> AppResult<(Category, Vec<QuestionSet>)> {
        let category = self
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_active)
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))?;

        let sets = self.question_sets.list_by_category(&category.id, true).await?;
        Ok((category, sets))
    }

    pub async fn list_question_sets(&self, category_slug: Option<&str>) -> AppResult<Vec<QuestionSet>> {
        match category_slug {
            Some(slug) => Ok(self.category_with_sets(slug).await?.1),
            None => self.question_sets.list_active().await,
        }
    }

    pub async fn question_set(&self, slug: &str) -> AppResult<QuestionSet> {
        self.question_sets
            .find_by_slug(slug)
            .await?
            .filter(|s| s.is_active)
            .ok_or_else(|| AppError::NotFound(format!("Question set '{}' not found", slug)))
    }

    pub async fn list_cards(&self, params: &PaginationParams) -> AppResult<(Vec<Card>, i64)> {
        self.cards.list_cards(params.offset(), params.limit()).await
    }

    pub async fn list_orders(&self, card_title: &str) -> AppResult<Vec<Order>> {
        self.orders.list_for_card(card_title).await
    }

    pub async fn create_category(&self, request: CreateCategoryRequest) -> AppResult<Category> {
        request.validate()?;

        let category = Category::new(&request.title, &request.description);
        let saved = save_with_unique_slug(category, |c| self.categories.create(c)).await?;

        log::info!("Created category '{}' ({})", saved.title, saved.slug);
        Ok(saved)
    }

    pub async fn create_question_set(&self, request: CreateQuestionSetRequest) -> AppResult<QuestionSet> {
        request.validate()?;

        self.categories
            .find_by_id(&request.category_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Category '{}' not found", request.category_id))
            })?;

        let question_set = QuestionSet::new(&request.category_id, &request.title);
        let saved = save_with_unique_slug(question_set, |s| self.question_sets.create(s)).await?;

        log::info!("Created question set '{}' ({})", saved.title, saved.slug);
        Ok(saved)
    }

    pub async fn create_question(&self, request: CreateQuestionRequest) -> AppResult<Question> {
        request.validate()?;

        self.question_sets
            .find_by_id(&request.question_set_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!(
                    "Question set '{}' not found",
                    request.question_set_id
                ))
            })?;

        let mut question = Question::new(
            &request.question_set_id,
            &request.text,
            request.answers,
            &request.right_answers,
        )?;
        question.position = self.questions.count_for_set(&request.question_set_id).await? as i64;

        let saved = self.questions.create(question).await?;
        log::info!(
            "Added question {} to set {} at position {}",
            saved.id,
            saved.question_set_id,
            saved.position
        );
        Ok(saved)
    }

    pub async fn create_card(&self, request: CreateCardRequest) -> AppResult<Card> {
        request.validate()?;

        let mut card = Card::new(&request.title, &request.card_series, &request.card_number);
        if let Some(expiration_date) = request.expiration_date {
            card.expiration_date = expiration_date;
        }
        if let Some(status) = request.card_status {
            card.card_status = status;
        }

        let saved = save_with_unique_slug(card, |c| self.cards.create(c)).await?;
        log::info!("Created card '{}' ({})", saved.title, saved.slug);
        Ok(saved)
    }

    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<Order> {
        request.validate()?;

        let card = self
            .cards
            .find_by_title(&request.card_title)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Card '{}' not found", request.card_title)))?;

        let amount = parse_amount(&request.amount)?;
        let order = Order::new(&card.title, amount, request.use_time.unwrap_or_else(Utc::now));

        let saved = self.orders.create(order).await?;
        log::info!("Recorded order {} of {} on card '{}'", saved.id, saved.amount_display(), card.title);
        Ok(saved)
    }

    /// Flips the active flag of a record and returns the new value.
    pub async fn toggle_active(&self, kind: CatalogKind, id: &str) -> AppResult<bool> {
        let missing = || AppError::NotFound(format!("{:?} '{}' not found", kind, id));
        let now = Utc::now();

        let is_active = match kind {
            CatalogKind::Category => {
                let mut category = self.categories.find_by_id(id).await?.ok_or_else(missing)?;
                category.is_active = !category.is_active;
                category.updated_at = now;
                self.categories.update(category).await?.is_active
            }
            CatalogKind::QuestionSet => {
                let mut set = self.question_sets.find_by_id(id).await?.ok_or_else(missing)?;
                set.is_active = !set.is_active;
                set.updated_at = now;
                self.question_sets.update(set).await?.is_active
            }
            CatalogKind::Card => {
                let mut card = self.cards.find_by_id(id).await?.ok_or_else(missing)?;
                card.is_active = !card.is_active;
                card.updated_at = now;
                self.cards.update(card).await?.is_active
            }
        };

        log::info!("{:?} {} is now {}", kind, id, if is_active { "active" } else { "inactive" });
        Ok(is_active)
    }
}
