use super::error::*;
use crate::application_port::{
    AuthService, AuthTokens, AuthenticatedUser, LoginInput, SignupInput, TaskInput, TaskService,
};
use crate::domain_model::{TaskId, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::{self, reject};

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(code: ApiErrorCode, message: impl Into<String>) -> Self {
        ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse;

pub async fn signup(
    body: SignupRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let signup_input = SignupInput {
        username: body.username,
        password: body.password,
    };
    let _user_id = auth_service
        .signup(signup_input)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(SignupResponse)))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: UserId,
    pub auth_tokens: AuthTokens,
}

pub async fn login(
    body: LoginRequest,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let login_input = LoginInput {
        username: body.username,
        password: body.password,
    };
    let login_result = auth_service
        .login(login_input)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    let login_response = LoginResponse {
        user_id: login_result.user_id,
        auth_tokens: login_result.tokens,
    };

    Ok(warp::reply::json(&ApiResponse::ok(login_response)))
}

pub async fn refresh(
    refresh_token: String,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let tokens = auth_service
        .refresh_token(&refresh_token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(tokens)))
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse;

pub async fn logout(
    refresh_token: String,
    auth_service: Arc<dyn AuthService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    auth_service
        .logout(&refresh_token)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(LogoutResponse)))
}

#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub user_id: UserId,
    pub username: String,
}

pub async fn current_user(user: AuthenticatedUser) -> Result<impl warp::Reply, warp::Rejection> {
    Ok(warp::reply::json(&ApiResponse::ok(UserInfoResponse {
        user_id: user.user_id,
        username: user.username,
    })))
}

#[derive(Debug, Deserialize)]
pub struct TaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub done: bool,
}

impl From<TaskRequest> for TaskInput {
    fn from(body: TaskRequest) -> Self {
        TaskInput {
            title: body.title,
            description: body.description,
            done: body.done,
        }
    }
}

pub async fn list_tasks(
    user: AuthenticatedUser,
    task_service: Arc<dyn TaskService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let tasks = task_service
        .list_for_user(user.user_id)
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(tasks)))
}

pub async fn create_task(
    body: TaskRequest,
    user: AuthenticatedUser,
    task_service: Arc<dyn TaskService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let task = task_service
        .create(user.user_id, body.into())
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(task)))
}

pub async fn update_task(
    task_id: uuid::Uuid,
    body: TaskRequest,
    user: AuthenticatedUser,
    task_service: Arc<dyn TaskService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let task = task_service
        .update(user.user_id, TaskId(task_id), body.into())
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(task)))
}

#[derive(Debug, Serialize)]
pub struct DeleteTaskResponse;

pub async fn delete_task(
    task_id: uuid::Uuid,
    user: AuthenticatedUser,
    task_service: Arc<dyn TaskService>,
) -> Result<impl warp::Reply, warp::Rejection> {
    task_service
        .delete(user.user_id, TaskId(task_id))
        .await
        .map_err(ApiErrorCode::from)
        .map_err(reject::custom)?;

    Ok(warp::reply::json(&ApiResponse::ok(DeleteTaskResponse)))
}
