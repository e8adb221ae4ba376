//! Registration, email verification, and login endpoints.

use super::{valid_email, valid_password};
use crate::auth::{error::AuthError, guard, AuthService};
use axum::{
    extract::Extension,
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;

#[derive(ToSchema, Deserialize, Debug)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct VerifyEmailRequest {
    pub email: String,
    pub code: String,
}

#[derive(ToSchema, Deserialize, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[utoipa::path(
    post,
    path = "/users",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created, verification code emailed"),
        (status = 400, description = "Missing or malformed payload"),
        (status = 500, description = "Registration failed"),
    ),
    tag = "users"
)]
pub async fn register(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let request = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()),
    };

    if !valid_email(&request.email) {
        return (StatusCode::BAD_REQUEST, "Invalid email".to_string());
    }

    if !valid_password(&request.password) {
        return (StatusCode::BAD_REQUEST, "Invalid password".to_string());
    }

    match auth
        .register(&request.username, &request.email, &request.password)
        .await
    {
        Ok(()) => (StatusCode::CREATED, String::new()),
        Err(err) => {
            error!("registration failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

#[utoipa::path(
    post,
    path = "/verify",
    request_body = VerifyEmailRequest,
    responses(
        (status = 204, description = "Email verified"),
        (status = 400, description = "Missing or malformed payload"),
        (status = 500, description = "Verification failed"),
    ),
    tag = "users"
)]
pub async fn verify_email(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<VerifyEmailRequest>>,
) -> impl IntoResponse {
    let request = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()),
    };

    match auth.verify_email(&request.email, &request.code).await {
        Ok(()) => (StatusCode::NO_CONTENT, String::new()),
        Err(err) => {
            warn!("email verification failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful, session cookie set", body = crate::store::users::User, content_type = "application/json"),
        (status = 400, description = "Missing or malformed payload"),
        (status = 500, description = "Login failed"),
    ),
    tag = "users"
)]
pub async fn login(
    auth: Extension<Arc<AuthService>>,
    payload: Option<Json<LoginRequest>>,
) -> Response {
    let request = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload").into_response(),
    };

    match auth.login(&request.email, &request.password).await {
        Ok((user, token)) => {
            let cookie = match guard::session_cookie(&token) {
                Ok(cookie) => cookie,
                Err(err) => {
                    error!("failed to build session cookie: {err}");
                    return (StatusCode::INTERNAL_SERVER_ERROR, "Login failed").into_response();
                }
            };

            let mut headers = HeaderMap::new();
            headers.insert(SET_COOKIE, cookie);

            (StatusCode::OK, headers, Json(user)).into_response()
        }
        Err(err @ AuthError::InvalidCredentials) => {
            warn!(email = %request.email, "login rejected");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
        Err(err) => {
            error!("login failed: {err}");
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}
