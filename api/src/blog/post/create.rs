use axum::{extract::State, http::Uri, response::Response};
use chrono::NaiveDateTime;

use crate::{
    App,
    blog::{
        BlogError, Destination, Mutation,
        models::post::Post,
        now,
        respond::mutation_response,
        store::EntityStore,
    },
    identity::{MaybeAuthUser, Viewer},
};

use super::{PostSubmission, validate_post};

pub async fn create_post(
    store: &dyn EntityStore,
    viewer: &Viewer,
    submission: &PostSubmission,
    now: NaiveDateTime,
) -> Result<Mutation<Post>, BlogError> {
    let Viewer::User { id, username } = viewer else {
        return Err(BlogError::Unauthorized);
    };

    let changes = validate_post(store, submission).await?;
    let post = store.create_post(changes.into_new_post(*id, now)).await?;

    tracing::info!(post_id = post.id, viewer_id = id, "Post created");

    Ok(Mutation {
        entity: post,
        redirect: Destination::Profile(username.clone()),
    })
}

#[axum::debug_handler(state = App)]
pub async fn handle_create_post(
    State(ctx): State<App>,
    uri: Uri,
    auth: MaybeAuthUser,
    crate::json::Json(submission): crate::json::Json<PostSubmission>,
) -> Response {
    let result = create_post(ctx.store.as_ref(), &auth.viewer(), &submission, now()).await;

    mutation_response(
        result.map(|m| m.redirect),
        &ctx.config,
        &uri,
        serde_json::to_value(&submission).ok(),
    )
}
