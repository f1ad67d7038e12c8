//! Turns mutation outcomes into HTTP responses.
//!
//! Ownership failures are answered with the same redirect a successful
//! write would use for the detail page. The services still report them as
//! [`BlogError::Forbidden`]; hiding them is decided only here.

use axum::{
    http::Uri,
    response::{IntoResponse, Redirect, Response},
};
use serde_json::Value;

use crate::{config::ServerConfig, error::AppError};

use super::{BlogError, Destination};

pub fn see_other(destination: &Destination) -> Response {
    Redirect::to(&destination.path()).into_response()
}

pub fn login_redirect(config: &ServerConfig, next: &Uri) -> Response {
    let next: String = url::form_urlencoded::byte_serialize(next.path().as_bytes()).collect();
    Redirect::to(&format!("{}?next={next}", config.login_url)).into_response()
}

pub fn mutation_response(
    result: Result<Destination, BlogError>,
    config: &ServerConfig,
    uri: &Uri,
    input: Option<Value>,
) -> Response {
    match result {
        Ok(destination) => see_other(&destination),
        Err(BlogError::Forbidden { redirect, .. }) => see_other(&redirect),
        Err(BlogError::Unauthorized) => login_redirect(config, uri),
        Err(BlogError::Validation(fields)) => fields.into_app_error(input).into_response(),
        Err(e) => AppError::from(e).into_response(),
    }
}
