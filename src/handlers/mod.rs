pub mod account_handler;
pub mod admin_handler;
pub mod catalog_handler;
pub mod graphql_handler;
pub mod health_handler;
pub mod quiz_handler;

use actix_web::web;

/// Registers every route. Expects `AppState`, `JwtService` and the GraphQL
/// `Schema` as app data, and the session cookie middleware around the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(quiz_handler::index)
        .service(quiz_handler::test_body)
        .service(quiz_handler::answer)
        .service(catalog_handler::category)
        .service(catalog_handler::cards)
        .service(account_handler::register)
        .service(account_handler::verify)
        .service(account_handler::login)
        .service(account_handler::password_reset)
        .service(account_handler::password_reset_confirm)
        .service(admin_handler::create_category)
        .service(admin_handler::create_question_set)
        .service(admin_handler::create_question)
        .service(admin_handler::create_card)
        .service(admin_handler::create_order)
        .service(admin_handler::card_orders)
        .service(admin_handler::toggle_active)
        .service(graphql_handler::graphql)
        .service(graphql_handler::graphiql)
        .service(health_handler::health_check)
        .service(health_handler::health_check_ready);
}
