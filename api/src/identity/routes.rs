use axum::{
    Json, Router,
    response::IntoResponse,
    routing::{get, patch, post},
};
use axum_extra::extract::CookieJar;
use time::Duration;

use crate::{App, error::ApiRequestError};

use super::{
    AuthUser, AuthenticationError, COOKIE_NAME, models::user::User, profile::edit_profile,
};

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route("/me", get(handle_whoami))
        .route("/logout", post(logout))
        .route("/profile", patch(edit_profile))
}

impl ApiRequestError for AuthenticationError {
    fn status_code(&self) -> axum::http::StatusCode {
        match self {
            AuthenticationError::NoCookie | AuthenticationError::Unauthorized => {
                axum::http::StatusCode::UNAUTHORIZED
            }
        }
    }
}

async fn handle_whoami(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

#[axum::debug_handler]
pub async fn logout() -> impl IntoResponse {
    let auth_cookie = axum_extra::extract::cookie::Cookie::build(COOKIE_NAME)
        .secure(true)
        .http_only(true)
        .max_age(Duration::ZERO)
        .path("/");

    CookieJar::new().add(auth_cookie)
}
