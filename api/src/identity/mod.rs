use axum::http::request::Parts;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::Serialize;

use crate::{
    App,
    error::AppError,
    schema::{sessions, users},
};

use self::models::user::User;

pub mod models;
pub mod profile;
pub mod routes;

pub const COOKIE_NAME: &str = "auth_token";

#[derive(thiserror::Error, Debug)]
pub enum AuthenticationError {
    #[error("Authentication required, but no cookie `{COOKIE_NAME}` found in headers.")]
    NoCookie,

    #[error(
        "Unauthorized, please check if you're logged in by refreshing the \
         page. This could be due to an expired session or token has became invalid."
    )]
    Unauthorized,
}

/// Whoever is making the request. Sessions are issued by the identity
/// provider; this service only resolves them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewer {
    Anonymous,
    User { id: i32, username: String },
}

impl Viewer {
    pub fn user(id: i32, username: impl Into<String>) -> Self {
        Viewer::User {
            id,
            username: username.into(),
        }
    }

    pub fn id(&self) -> Option<i32> {
        match self {
            Viewer::Anonymous => None,
            Viewer::User { id, .. } => Some(*id),
        }
    }
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Viewer::user(user.id, user.username.clone())
    }
}

pub struct MaybeAuthUser(pub Result<User, AuthenticationError>);

impl MaybeAuthUser {
    pub fn viewer(&self) -> Viewer {
        match &self.0 {
            Ok(user) => Viewer::from(user),
            Err(_) => Viewer::Anonymous,
        }
    }
}

impl axum::extract::FromRequestParts<App> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &App) -> Result<Self, Self::Rejection> {
        let jar = axum_extra::extract::cookie::CookieJar::from_headers(&parts.headers);

        let session_token: &str = if let Some(t) = jar.get(COOKIE_NAME) {
            t.value()
        } else {
            return Ok(MaybeAuthUser(Err(AuthenticationError::NoCookie)));
        };

        let now = chrono::Utc::now().naive_utc();
        let mut conn = state.diesel.get().await?;

        let user = sessions::table
            .inner_join(users::table)
            .filter(sessions::token.eq(session_token))
            .filter(sessions::active.eq(true))
            .filter(sessions::expires_at.gt(now))
            .filter(sessions::issued_at.le(now))
            .select(User::as_select())
            .first::<User>(&mut conn)
            .await
            .optional()?;

        if user.is_none() {
            tracing::debug!("Session cookie present but no active session matched");
        }

        Ok(MaybeAuthUser(user.ok_or(AuthenticationError::Unauthorized)))
    }
}

pub struct AuthUser(pub User);

impl axum::extract::FromRequestParts<App> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &App) -> Result<Self, Self::Rejection> {
        let MaybeAuthUser(auth_user) = MaybeAuthUser::from_request_parts(parts, state).await?;

        Ok(AuthUser(auth_user?))
    }
}
