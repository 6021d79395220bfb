use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    cookie::{Cookie, SameSite},
    dev::{forward_ready, Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures::future::LocalBoxFuture;
use uuid::Uuid;

use crate::errors::AppError;

pub const SESSION_COOKIE: &str = "quiz_session";

/// Identifier of the visitor's session, taken from the `quiz_session` cookie.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Gives every request a session id, issuing a new cookie when the request
/// did not carry a valid one.
pub struct SessionCookieMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionCookieMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionCookieMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionCookieMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct SessionCookieMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionCookieMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let existing = req
            .cookie(SESSION_COOKIE)
            .map(|c| c.value().to_string())
            .filter(|value| Uuid::parse_str(value).is_ok());

        let is_new = existing.is_none();
        let session_id = existing.unwrap_or_else(|| Uuid::new_v4().to_string());
        req.extensions_mut().insert(SessionId(session_id.clone()));

        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let mut res = service.call(req).await?;

            if is_new {
                let cookie = Cookie::build(SESSION_COOKIE, session_id)
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .finish();
                if let Err(err) = res.response_mut().add_cookie(&cookie) {
                    log::warn!("Failed to set session cookie: {}", err);
                }
            }

            Ok(res.map_into_left_body())
        })
    }
}

impl FromRequest for SessionId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let session_id = req
            .extensions()
            .get::<SessionId>()
            .cloned()
            .ok_or_else(|| AppError::InternalError("Session middleware not configured".to_string()));

        ready(session_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{get, test, App, HttpResponse};

    #[get("/whoami")]
    async fn whoami(session: SessionId) -> HttpResponse {
        HttpResponse::Ok().body(session.0)
    }

    #[actix_web::test]
    async fn test_new_visitor_gets_cookie() {
        let app = test::init_service(App::new().wrap(SessionCookieMiddleware).service(whoami)).await;

        let req = test::TestRequest::get().uri("/whoami").to_request();
        let resp = test::call_service(&app, req).await;

        let cookie = resp
            .response()
            .cookies()
            .find(|c| c.name() == SESSION_COOKIE)
            .expect("session cookie");
        assert!(Uuid::parse_str(cookie.value()).is_ok());
    }

    #[actix_web::test]
    async fn test_existing_cookie_is_reused() {
        let app = test::init_service(App::new().wrap(SessionCookieMiddleware).service(whoami)).await;
        let id = Uuid::new_v4().to_string();

        let req = test::TestRequest::get()
            .uri("/whoami")
            .cookie(Cookie::new(SESSION_COOKIE, id.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.response().cookies().next().is_none());
        let body = test::read_body(resp).await;
        assert_eq!(body, id.as_str());
    }

    #[actix_web::test]
    async fn test_forged_cookie_is_replaced() {
        let app = test::init_service(App::new().wrap(SessionCookieMiddleware).service(whoami)).await;

        let req = test::TestRequest::get()
            .uri("/whoami")
            .cookie(Cookie::new(SESSION_COOKIE, "not-a-uuid"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        let cookie = resp.response().cookies().next().expect("replacement cookie");
        assert_ne!(cookie.value(), "not-a-uuid");
    }
}
