use axum::{Json, extract::State};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use serde::{Deserialize, Serialize};

use crate::{
    App,
    error::AppError,
    schema::users,
    validation::{FieldErrors, clean_text},
};

use super::{
    AuthUser,
    models::user::{ProfileChanges, User},
};

const NAME_MAX_CHARS: usize = 150;
const EMAIL_MAX_CHARS: usize = 254;

#[axum::debug_handler(state = App)]
pub async fn edit_profile(
    State(ctx): State<App>,
    AuthUser(user): AuthUser,
    crate::json::Json(submission): crate::json::Json<ProfileSubmission>,
) -> Result<Json<User>, AppError> {
    let changes = submission
        .validate()
        .map_err(|e| e.into_app_error(serde_json::to_value(&submission).ok()))?;

    let mut conn = ctx.diesel.get().await?;

    let updated = diesel::update(users::table.find(user.id))
        .set(&changes)
        .returning(User::as_returning())
        .get_result(&mut conn)
        .await?;

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Json(updated))
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ProfileSubmission {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    #[serde(default)]
    email: String,
}

impl ProfileSubmission {
    fn validate(&self) -> Result<ProfileChanges, FieldErrors> {
        let mut errors = FieldErrors::new();

        let first_name = clean_text(
            &mut errors,
            "first_name",
            &self.first_name,
            false,
            Some(NAME_MAX_CHARS),
        );
        let last_name = clean_text(
            &mut errors,
            "last_name",
            &self.last_name,
            false,
            Some(NAME_MAX_CHARS),
        );
        let email = clean_text(
            &mut errors,
            "email",
            &self.email,
            false,
            Some(EMAIL_MAX_CHARS),
        )
        .to_lowercase();

        if !email.is_empty() && !email.contains('@') {
            errors.add("email", "Enter a valid email address.");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProfileChanges {
            first_name,
            last_name,
            email,
        })
    }
}
