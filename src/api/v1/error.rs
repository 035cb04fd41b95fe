use crate::api::v1::handler::ApiResponse;
use crate::application_port::{AuthError, TaskError};
use serde::Serialize;
use std::convert::Infallible;
use thiserror::Error;
use tracing::warn;
use warp::http::StatusCode;
use warp::{Rejection, reject};

pub async fn recover_error(err: Rejection) -> Result<impl warp::Reply, Infallible> {
    if let Some(err) = err.find::<ApiErrorCode>() {
        let json = warp::reply::json(&ApiResponse::<()>::err(err.clone(), err.to_string()));
        Ok(warp::reply::with_status(json, err.status()))
    } else if err.find::<warp::reject::MissingHeader>().is_some() {
        // An absent Authorization header gets the same answer as a
        // malformed one.
        let code = ApiErrorCode::Unauthorized;
        let json = warp::reply::json(&ApiResponse::<()>::err(code.clone(), code.to_string()));
        Ok(warp::reply::with_status(json, code.status()))
    } else {
        let json = warp::reply::json(&ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(ApiError {
                code: ApiErrorCode::InternalError,
                message: format!("Unhandled error: {:?}", err),
            }),
        });
        Ok(warp::reply::with_status(
            json,
            StatusCode::INTERNAL_SERVER_ERROR,
        ))
    }
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: ApiErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Error, Serialize)]
pub enum ApiErrorCode {
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Invalid request: {0}")]
    InvalidInput(String),
    #[error("Not authorized")]
    Unauthorized,
    #[error("Task not found")]
    TaskNotFound,
    #[error("Task belongs to another user")]
    Forbidden,
    #[error("Store temporarily unavailable")]
    StoreUnavailable,
    #[error("Internal error")]
    InternalError,
}

impl ApiErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiErrorCode::UsernameTaken => StatusCode::BAD_REQUEST,
            ApiErrorCode::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiErrorCode::TaskNotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ApiErrorCode::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn internal<E: std::fmt::Display>(error: E) -> ApiErrorCode {
        warn!("Internal error: {}", error);
        ApiErrorCode::InternalError
    }
}

impl reject::Reject for ApiErrorCode {}

impl From<AuthError> for ApiErrorCode {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::InvalidCredentials => ApiErrorCode::InvalidCredentials,
            AuthError::InvalidInput(message) => ApiErrorCode::InvalidInput(message),
            AuthError::UserExists => ApiErrorCode::UsernameTaken,
            // Every token-liveness kind collapses to one answer at the
            // boundary; the precise kind goes to the log only.
            e @ (AuthError::TokenInvalid
            | AuthError::TokenExpired
            | AuthError::TokenNotRecognized
            | AuthError::TokenStale
            | AuthError::TokenRevoked
            | AuthError::UserNotFound) => {
                warn!("rejected token: {}", e);
                ApiErrorCode::Unauthorized
            }
            AuthError::Store(e) => {
                warn!("store unavailable: {}", e);
                ApiErrorCode::StoreUnavailable
            }
            AuthError::DuplicateToken => ApiErrorCode::internal("duplicate token record"),
            AuthError::InternalError(e) => ApiErrorCode::internal(e),
        }
    }
}

impl From<TaskError> for ApiErrorCode {
    fn from(error: TaskError) -> Self {
        match error {
            TaskError::NotFound => ApiErrorCode::TaskNotFound,
            TaskError::Forbidden => ApiErrorCode::Forbidden,
            TaskError::Store(e) => {
                warn!("store unavailable: {}", e);
                ApiErrorCode::StoreUnavailable
            }
        }
    }
}
