use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("bad request, wrong data")]
    Integrity(sqlx::Error),

    #[error("invalid format or length of fields")]
    Data(sqlx::Error),

    #[error("database exception occurred")]
    Database(sqlx::Error),

    #[error("failed to write answer cache")]
    CacheWrite(#[source] redis::RedisError),

    #[error("failed to scan answer cache")]
    CacheScan(#[source] redis::RedisError),

    #[error("failed to fetch answer cache entries")]
    CacheFetch(#[source] redis::RedisError),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("jwt error")]
    JWTError(#[from] jsonwebtoken::errors::Error),

    #[error("serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("dotenv error")]
    DotEnvError(#[from] dotenv::Error),
}

// SQLSTATE class 23 covers integrity violations (unique, foreign key,
// not-null), class 22 covers data exceptions (bad value, value too long).
impl From<sqlx::Error> for Error {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(dbe) = &e {
            if let Some(code) = dbe.code() {
                if code.starts_with("23") {
                    log::warn!("integrity error: {}", dbe);
                    return Error::Integrity(e);
                }
                if code.starts_with("22") {
                    log::warn!("data error: {}", dbe);
                    return Error::Data(e);
                }
            }
        }
        log::error!("database error: {}", e);
        Error::Database(e)
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Integrity(_) | Error::Data(_) | Error::BadRequest(_) | Error::SerdeError(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized(_) | Error::JWTError(_) => StatusCode::UNAUTHORIZED,
            Error::Forbidden(_) => StatusCode::FORBIDDEN,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Database(_) | Error::CacheWrite(_) | Error::CacheScan(_) | Error::CacheFetch(_) | Error::DotEnvError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // only the Display message reaches the client, never the source chain
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}
