use std::env;
use secrecy::SecretString;

use crate::models::domain::QuestionOrder;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionBackend {
    Mongo,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub mongo_conn_string: String,
    pub mongo_db_name: String,
    pub web_server_host: String,
    pub web_server_port: u16,
    pub jwt_secret: SecretString,
    pub jwt_expiration_hours: i64,
    pub session_backend: SessionBackend,
    pub session_ttl_hours: i64,
    pub question_order: QuestionOrder,
    pub domain_name: String,
    pub email_host_user: String,
    pub cors_allowed_origin: String,
}

/// Unset means the default order; an unknown value is logged and ignored.
fn question_order_from(value: Option<&str>) -> QuestionOrder {
    match value.map(str::parse::<QuestionOrder>) {
        None => QuestionOrder::default(),
        Some(Ok(order)) => order,
        Some(Err(err)) => {
            log::warn!(
                "Ignoring QUIZ_QUESTION_ORDER: {}; using {:?}",
                err,
                QuestionOrder::default()
            );
            QuestionOrder::default()
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            mongo_conn_string: env::var("MONGO_CONN_STRING")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            mongo_db_name: env::var("MONGO_DB_NAME").unwrap_or_else(|_| "testquiz-local".to_string()),
            web_server_host: env::var("WEB_SERVER_HOST")
                .unwrap_or_else(|_| "localhost".to_string()),
            web_server_port: env::var("WEB_SERVER_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            jwt_secret: SecretString::from(env::var("JWT_SECRET")
                .unwrap_or_else(|_| "dev_secret_key_change_in_production".to_string())),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            session_backend: match env::var("SESSION_BACKEND").as_deref() {
                Ok("memory") => SessionBackend::Memory,
                _ => SessionBackend::Mongo,
            },
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or(24),
            question_order: question_order_from(env::var("QUIZ_QUESTION_ORDER").ok().as_deref()),
            domain_name: env::var("DOMAIN_NAME")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            email_host_user: env::var("EMAIL_HOST_USER")
                .unwrap_or_else(|_| "noreply@localhost".to_string()),
            cors_allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        }
    }

    /// Validate that production-critical configuration is set
    /// Panics if required secrets are using default values
    pub fn validate_for_production(&self) {
        use secrecy::ExposeSecret;

        let jwt_secret = self.jwt_secret.expose_secret();

        if jwt_secret == "dev_secret_key_change_in_production" {
            panic!(
                "FATAL: JWT_SECRET is using default value! Set JWT_SECRET environment variable to a secure random string."
            );
        }

        if jwt_secret.len() < 32 {
            panic!(
                "FATAL: JWT_SECRET is too short ({}). Must be at least 32 characters for security.",
                jwt_secret.len()
            );
        }

        if self.session_backend == SessionBackend::Memory {
            panic!("FATAL: SESSION_BACKEND=memory loses quiz progress on restart and is not shared between instances.");
        }
    }

    pub fn test_config() -> Self {
        Self {
            mongo_conn_string: "mongodb://localhost:27017".to_string(),
            mongo_db_name: "testquiz-test".to_string(),
            web_server_host: "127.0.0.1".to_string(),
            web_server_port: 8080,
            jwt_secret: SecretString::from("test_jwt_secret_key".to_string()),
            jwt_expiration_hours: 1,
            session_backend: SessionBackend::Memory,
            session_ttl_hours: 24,
            question_order: QuestionOrder::PopBack,
            domain_name: "http://testserver".to_string(),
            email_host_user: "quiz@example.com".to_string(),
            cors_allowed_origin: "http://localhost:5173".to_string(),
        }
    }
}
