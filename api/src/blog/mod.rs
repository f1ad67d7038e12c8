use axum::http::StatusCode;
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{error::AppError, validation::FieldErrors};

use self::store::StoreError;

pub mod comment;
pub mod feed;
pub mod models;
pub mod pagination;
pub mod policy;
pub mod post;
pub mod respond;
pub mod routes;
pub mod store;

#[cfg(test)]
mod fixtures;

#[derive(thiserror::Error, Debug)]
pub enum BlogError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(FieldErrors),

    #[error("You need to log in to do that")]
    Unauthorized,

    /// The viewer is authenticated but does not own the entity. Carries
    /// where the viewer should be sent instead.
    #[error("You are not the author of this {kind}")]
    Forbidden {
        kind: &'static str,
        redirect: Destination,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<BlogError> for AppError {
    fn from(e: BlogError) -> Self {
        match e {
            BlogError::Validation(fields) => fields.into_app_error(None),
            BlogError::Store(e) => e.into(),
            BlogError::NotFound(_) => (e.to_string(), StatusCode::NOT_FOUND).into(),
            BlogError::Unauthorized => (e.to_string(), StatusCode::UNAUTHORIZED).into(),
            // mutation handlers answer this with a redirect; only reached when a
            // Forbidden escapes through a plain `?`
            BlogError::Forbidden { .. } => (e.to_string(), StatusCode::FORBIDDEN).into(),
        }
    }
}

/// Where a successful (or silently denied) mutation sends the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Destination {
    Profile(String),
    PostDetail(i32),
}

impl Destination {
    pub fn path(&self) -> String {
        match self {
            Destination::Profile(username) => format!("/profile/{username}"),
            Destination::PostDetail(id) => format!("/posts/{id}"),
        }
    }
}

/// A write that went through, and where to go next.
#[derive(Debug, Clone, PartialEq)]
pub struct Mutation<T> {
    pub entity: T,
    pub redirect: Destination,
}

pub fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}
