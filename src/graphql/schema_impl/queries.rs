use async_graphql::{Context, ErrorExtensions, Object, Result, SimpleObject};

use crate::{
    app_state::AppState,
    models::{
        domain::{Card, Category, QuestionSet},
        dto::request::PaginationParams,
    },
};

#[derive(Debug, SimpleObject)]
pub struct CardPage {
    pub items: Vec<Card>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn categories(&self, ctx: &Context<'_>) -> Result<Vec<Category>> {
        let state = ctx.data::<AppState>()?;
        state
            .catalog_service
            .list_categories()
            .await
            .map_err(|e| e.extend())
    }

    async fn category(&self, ctx: &Context<'_>, slug: String) -> Result<Category> {
        let state = ctx.data::<AppState>()?;
        let (category, _) = state
            .catalog_service
            .category_with_sets(&slug)
            .await
            .map_err(|e| e.extend())?;
        Ok(category)
    }

    /// Active question sets, optionally limited to one category.
    async fn question_sets(
        &self,
        ctx: &Context<'_>,
        category_slug: Option<String>,
    ) -> Result<Vec<QuestionSet>> {
        let state = ctx.data::<AppState>()?;
        state
            .catalog_service
            .list_question_sets(category_slug.as_deref())
            .await
            .map_err(|e| e.extend())
    }

    async fn question_set(&self, ctx: &Context<'_>, slug: String) -> Result<QuestionSet> {
        let state = ctx.data::<AppState>()?;
        state
            .catalog_service
            .question_set(&slug)
            .await
            .map_err(|e| e.extend())
    }

    async fn cards(
        &self,
        ctx: &Context<'_>,
        offset: Option<i64>,
        limit: Option<i64>,
    ) -> Result<CardPage> {
        let state = ctx.data::<AppState>()?;
        let params = PaginationParams { offset, limit };

        let (items, total) = state
            .catalog_service
            .list_cards(&params)
            .await
            .map_err(|e| e.extend())?;
        Ok(CardPage {
            items,
            total,
            offset: params.offset(),
            limit: params.limit(),
        })
    }
}
