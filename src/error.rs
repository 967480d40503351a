use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error as ThisError;

use crate::core::models::application::Status;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("http error")]
    ActixError(#[from] actix_web::Error),

    #[error("jwt error")]
    JWTError(#[from] jsonwebtoken::errors::Error),

    #[error("io error: {0}")]
    IOError(#[from] std::io::Error),

    #[error("invalid json: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("invalid multipart payload: {0}")]
    MultipartError(#[from] actix_multipart::MultipartError),

    #[error("authorization error: {0}")]
    CasbinError(#[from] casbin::Error),

    #[error("bussiness error: {0}")]
    BusinessError(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Remarks Required")]
    RemarksRequired,

    #[error("Reason Required")]
    ReasonRequired,

    #[error("cannot {action} an application that is {from}")]
    InvalidTransition { from: Status, action: &'static str },

    #[error("Payload exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Captcha verification failed")]
    CaptchaFailed,

    #[error("{0}")]
    Conflict(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("Permission Denied")]
    PermissionDenied,

    #[error("Network error, please check your connection")]
    Network(String),

    #[error("{message}")]
    Remote { status: u16, message: String },

    #[error("server error: {0}")]
    ServerError(String),

    #[error("configuration error: {0}")]
    ConfigError(String),
}

const UNIQUE_VIOLATION: &str = "23505";

fn is_unique_violation(e: &sqlx::Error) -> bool {
    match e {
        sqlx::Error::Database(db) => db.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::DatabaseError(sqlx::Error::RowNotFound) | Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::DatabaseError(e) if is_unique_violation(e) => StatusCode::CONFLICT,
            Error::ActixError(e) => e.as_response_error().status_code(),
            Error::JWTError(_) | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::PermissionDenied => StatusCode::FORBIDDEN,
            Error::BusinessError(_)
            | Error::Validation(_)
            | Error::RemarksRequired
            | Error::ReasonRequired
            | Error::CaptchaFailed
            | Error::JsonError(_)
            | Error::MultipartError(_) => StatusCode::BAD_REQUEST,
            Error::InvalidTransition { .. } | Error::Conflict(_) => StatusCode::CONFLICT,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::Network(_) => StatusCode::BAD_GATEWAY,
            Error::Remote { status, .. } => StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        let errors = match self {
            Error::Validation(errs) => errs.clone(),
            _ => Vec::new(),
        };
        let message = match self {
            Error::DatabaseError(sqlx::Error::RowNotFound) => "record not found".to_owned(),
            Error::DatabaseError(e) if is_unique_violation(e) => "record already exists".to_owned(),
            Error::DatabaseError(_) | Error::IOError(_) | Error::CasbinError(_) => "Something went wrong".to_owned(),
            e => e.to_string(),
        };
        HttpResponse::build(status).json(ErrorBody { message, errors })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_web::body::to_bytes;

    #[actix_web::test]
    async fn test_validation_error_body() {
        let err = Error::Validation(vec![FieldError::new("whyJoin", "must be at least 50 characters")]);
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["message"], "Validation failed");
        assert_eq!(value["errors"][0]["field"], "whyJoin");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::PermissionDenied.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(Error::RemarksRequired.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::PayloadTooLarge(1024).status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(Error::DatabaseError(sqlx::Error::RowNotFound).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::InvalidTransition {
                from: Status::Pending,
                action: "roll back"
            }
            .status_code(),
            StatusCode::CONFLICT
        );
    }
}
