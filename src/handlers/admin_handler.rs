use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AdminUser,
    errors::AppError,
    models::dto::{
        request::{
            CreateCardRequest, CreateCategoryRequest, CreateOrderRequest, CreateQuestionRequest,
            CreateQuestionSetRequest,
        },
        response::{OrderDto, Page, ToggleResponse},
    },
    services::CatalogKind,
};

#[post("/admin/categories")]
async fn create_category(
    state: web::Data<AppState>,
    request: web::Json<CreateCategoryRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let category = state.catalog_service.create_category(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(Page::new("New category", category)))
}

#[post("/admin/question_sets")]
async fn create_question_set(
    state: web::Data<AppState>,
    request: web::Json<CreateQuestionSetRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let question_set = state
        .catalog_service
        .create_question_set(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(Page::new("New test", question_set)))
}

#[post("/admin/questions")]
async fn create_question(
    state: web::Data<AppState>,
    request: web::Json<CreateQuestionRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let question = state.catalog_service.create_question(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(Page::new("New question", question)))
}

#[post("/admin/cards")]
async fn create_card(
    state: web::Data<AppState>,
    request: web::Json<CreateCardRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let card = state.catalog_service.create_card(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(Page::new("New card", card)))
}

#[post("/admin/orders")]
async fn create_order(
    state: web::Data<AppState>,
    request: web::Json<CreateOrderRequest>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let order = state.catalog_service.create_order(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(Page::new("New order", OrderDto::from(order))))
}

#[get("/admin/cards/{title}/orders")]
async fn card_orders(
    state: web::Data<AppState>,
    title: web::Path<String>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let orders: Vec<OrderDto> = state
        .catalog_service
        .list_orders(&title)
        .await?
        .into_iter()
        .map(OrderDto::from)
        .collect();
    Ok(HttpResponse::Ok().json(Page::new(
        format!("Orders of {}", title.as_str()),
        serde_json::json!({ "orders": orders }),
    )))
}

/// Soft delete or restore of a category, question set or card.
#[post("/admin/{kind}/{id}/toggle")]
async fn toggle_active(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    _admin: AdminUser,
) -> Result<HttpResponse, AppError> {
    let (kind, id) = path.into_inner();
    let kind: CatalogKind = kind.parse()?;

    let is_active = state.catalog_service.toggle_active(kind, &id).await?;
    Ok(HttpResponse::Ok().json(Page::new(
        if is_active { "Restored" } else { "Deleted" },
        ToggleResponse { id, is_active },
    )))
}
