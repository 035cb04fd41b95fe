use super::error::*;
use super::handler;
use crate::application_port::{AuthService, AuthenticatedUser};
use crate::server::Server;
use std::convert::Infallible;
use std::sync::Arc;
use warp::{Filter, http, reject};

pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let signup = warp::post()
        .and(warp::path("signup"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::signup);

    let login = warp::post()
        .and(warp::path("login"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.auth_service.clone()))
        .and_then(handler::login);

    let refresh = warp::post()
        .and(warp::path("token"))
        .and(warp::path("refresh"))
        .and(warp::path::end())
        .and(with_bearer())
        .and(with(server.auth_service.clone()))
        .and_then(handler::refresh);

    let logout = warp::post()
        .and(warp::path("logout"))
        .and(warp::path::end())
        .and(with_bearer())
        .and(with(server.auth_service.clone()))
        .and_then(handler::logout);

    let current_user = warp::get()
        .and(warp::path("users"))
        .and(warp::path("me"))
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and_then(handler::current_user);

    let list_tasks = warp::get()
        .and(warp::path("tasks"))
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.task_service.clone()))
        .and_then(handler::list_tasks);

    let create_task = warp::post()
        .and(warp::path("tasks"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.task_service.clone()))
        .and_then(handler::create_task);

    let update_task = warp::put()
        .and(warp::path("tasks"))
        .and(warp::path::param::<uuid::Uuid>())
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.task_service.clone()))
        .and_then(handler::update_task);

    let delete_task = warp::delete()
        .and(warp::path("tasks"))
        .and(warp::path::param::<uuid::Uuid>())
        .and(warp::path::end())
        .and(with_verification(server.auth_service.clone()))
        .and(with(server.task_service.clone()))
        .and_then(handler::delete_task);

    signup
        .or(login)
        .or(refresh)
        .or(logout)
        .or(current_user)
        .or(list_tasks)
        .or(create_task)
        .or(update_task)
        .or(delete_task)
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}

/// Extracts the raw bearer token without verifying it. The refresh and
/// logout handlers decide for themselves what an acceptable token is.
fn with_bearer() -> impl Filter<Extract = (String,), Error = warp::Rejection> + Clone {
    warp::header::<String>(http::header::AUTHORIZATION.as_ref()).and_then(
        |header: String| async move {
            match header.strip_prefix("Bearer ") {
                Some(token) => Ok(token.to_string()),
                None => Err(reject::custom(ApiErrorCode::Unauthorized)),
            }
        },
    )
}

fn with_verification(
    auth_service: Arc<dyn AuthService>,
) -> impl Filter<Extract = (AuthenticatedUser,), Error = warp::Rejection> + Clone {
    with_bearer().and_then(move |token: String| {
        let auth_service = auth_service.clone();
        async move {
            let user = auth_service
                .verify_token(&token)
                .await
                .map_err(ApiErrorCode::from)
                .map_err(reject::custom)?;
            Ok::<AuthenticatedUser, warp::Rejection>(user)
        }
    })
}
