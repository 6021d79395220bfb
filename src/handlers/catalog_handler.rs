use actix_web::{get, web, HttpResponse};
use validator::Validate;

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::PaginationParams,
        response::{CardsBody, CategoryBody, Page},
    },
};

#[get("/categories/{slug}")]
async fn category(
    state: web::Data<AppState>,
    slug: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let (category, question_sets) = state.catalog_service.category_with_sets(&slug).await?;

    let title = category.title.clone();
    Ok(HttpResponse::Ok().json(Page::new(
        title,
        CategoryBody {
            category,
            question_sets,
        },
    )))
}

#[get("/cards")]
async fn cards(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    pagination.validate()?;

    let (cards, total) = state.catalog_service.list_cards(&pagination).await?;
    Ok(HttpResponse::Ok().json(Page::new(
        "Cards",
        CardsBody {
            cards,
            total,
            offset: pagination.offset(),
            limit: pagination.limit(),
        },
    )))
}
