#[cfg(debug_assertions)]
use std::collections::HashMap;

use axum::{Json, http::StatusCode, response::IntoResponse};
use diesel_async::pooled_connection::deadpool::PoolError;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug)]
pub enum ServerError {
    DatabaseError(diesel::result::Error),
    PoolError(PoolError),
}

impl Serialize for ServerError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        use serde::ser::SerializeMap;
        let message = match self {
            ServerError::DatabaseError(e) => e.to_string(),
            ServerError::PoolError(e) => e.to_string(),
        };
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("message", &message)?;
        map.end()
    }
}

pub enum AppError {
    ServerError {
        error: ServerError,

        #[cfg(debug_assertions)]
        backtrace: Option<backtrace::Backtrace>,
    },
    RequestError {
        status: StatusCode,
        msg: String,
        fields: Option<Value>,
        input: Option<Value>,
    },
    Unhandled(String),
}

/// Errors that are the caller's fault. Implementors are converted into an
/// [`AppError::RequestError`] carrying their display message.
pub trait ApiRequestError: std::error::Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    code: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    msg: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    input: Option<Value>,

    #[cfg(debug_assertions)]
    #[serde(skip_serializing_if = "Option::is_none")]
    debug_info: Option<HashMap<&'static str, Value>>,
}

impl ErrorResponse {
    fn new(code: impl Into<String>, msg: Option<String>) -> Self {
        ErrorResponse {
            code: code.into(),
            msg,
            fields: None,
            input: None,
            #[cfg(debug_assertions)]
            debug_info: None,
        }
    }
}

fn status_code_name(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("ERR")
        .to_uppercase()
        .replace(' ', "_")
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, error_response) = match self {
            AppError::ServerError {
                error,
                #[cfg(debug_assertions)]
                backtrace,
            } => {
                tracing::error!(error = ?error, "Server error while handling request");

                #[cfg(debug_assertions)]
                let response = {
                    let frames_info = backtrace
                        .as_ref()
                        .map(filter_backtrace)
                        .unwrap_or_default();
                    let mut response =
                        ErrorResponse::new("DATABASE_ERR", Some("Database error".into()));
                    response.debug_info = Some(HashMap::from([
                        (
                            "backtrace",
                            serde_json::to_value(&frames_info).unwrap_or_default(),
                        ),
                        ("error", serde_json::to_value(&error).unwrap_or_default()),
                    ]));
                    response
                };

                #[cfg(not(debug_assertions))]
                let response =
                    ErrorResponse::new("SERVER_ERR", Some("Internal server error".into()));

                (StatusCode::INTERNAL_SERVER_ERROR, response)
            }
            AppError::RequestError {
                status,
                msg,
                fields,
                input,
            } => {
                let mut response = ErrorResponse::new(status_code_name(status), Some(msg));
                response.fields = fields;
                response.input = input;
                (status, response)
            }
            AppError::Unhandled(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse::new("ERR", Some(e)),
            ),
        };

        (status_code, Json(error_response)).into_response()
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(e: diesel::result::Error) -> Self {
        ServerError::DatabaseError(e).into()
    }
}

impl From<PoolError> for AppError {
    fn from(e: PoolError) -> Self {
        ServerError::PoolError(e).into()
    }
}

impl From<ServerError> for AppError {
    fn from(error: ServerError) -> Self {
        AppError::ServerError {
            error,

            #[cfg(debug_assertions)]
            backtrace: Some(backtrace::Backtrace::new()),
        }
    }
}

impl<E: ApiRequestError> From<E> for AppError {
    fn from(e: E) -> Self {
        AppError::RequestError {
            status: e.status_code(),
            msg: e.to_string(),
            fields: None,
            input: None,
        }
    }
}

impl From<(&'static str, StatusCode)> for AppError {
    fn from((msg, status): (&'static str, StatusCode)) -> Self {
        (msg.to_string(), status).into()
    }
}

impl From<(String, StatusCode)> for AppError {
    fn from((msg, status): (String, StatusCode)) -> Self {
        AppError::RequestError {
            status,
            msg,
            fields: None,
            input: None,
        }
    }
}

impl From<&'static str> for AppError {
    fn from(e: &'static str) -> Self {
        AppError::Unhandled(e.into())
    }
}

impl From<String> for AppError {
    fn from(e: String) -> Self {
        AppError::Unhandled(e)
    }
}

#[cfg(debug_assertions)]
#[derive(Serialize, Debug)]
struct FrameInfo {
    name: String,
    loc: String,
}

#[cfg(debug_assertions)]
fn filter_backtrace(backtrace: &backtrace::Backtrace) -> Vec<FrameInfo> {
    const MODULE_PREFIX: &str = concat!(env!("CARGO_PKG_NAME"), "::");
    let mut frames_info: Vec<FrameInfo> = Vec::new();

    for frame in backtrace.frames() {
        for symbol in frame.symbols() {
            if let (Some(name), Some(filename), Some(lineno)) = (
                symbol.name().map(|n| n.to_string()),
                symbol.filename().map(|f| f.to_owned()),
                symbol.lineno(),
            ) {
                if name.contains(MODULE_PREFIX) {
                    frames_info.push(FrameInfo {
                        name,
                        loc: format!("{}:{}", filename.display(), lineno),
                    });
                }
            }
        }
    }

    frames_info
}
