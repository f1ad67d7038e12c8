use axum::{
    extract::{Path, State},
    http::Uri,
    response::Response,
};
use chrono::NaiveDateTime;

use crate::{
    App,
    blog::{
        BlogError, Destination, Mutation,
        models::comment::{Comment, NewComment},
        now,
        respond::mutation_response,
        store::EntityStore,
    },
    identity::{MaybeAuthUser, Viewer},
};

use super::CommentSubmission;

pub async fn create_comment(
    store: &dyn EntityStore,
    post_id: i32,
    viewer: &Viewer,
    submission: &CommentSubmission,
    now: NaiveDateTime,
) -> Result<Mutation<Comment>, BlogError> {
    let Some(viewer_id) = viewer.id() else {
        return Err(BlogError::Unauthorized);
    };

    if store.get_post(post_id).await?.is_none() {
        return Err(BlogError::NotFound("Post"));
    }

    let changes = submission.validate()?;

    let comment = store
        .create_comment(NewComment {
            text: changes.text,
            post_id,
            author_id: viewer_id,
            created_at: now,
        })
        .await?;

    tracing::info!(post_id, comment_id = comment.id, viewer_id, "Comment created");

    Ok(Mutation {
        entity: comment,
        redirect: Destination::PostDetail(post_id),
    })
}

#[axum::debug_handler(state = App)]
pub async fn handle_create_comment(
    State(ctx): State<App>,
    Path(post_id): Path<i32>,
    uri: Uri,
    auth: MaybeAuthUser,
    crate::json::Json(submission): crate::json::Json<CommentSubmission>,
) -> Response {
    let result = create_comment(
        ctx.store.as_ref(),
        post_id,
        &auth.viewer(),
        &submission,
        now(),
    )
    .await;

    mutation_response(
        result.map(|m| m.redirect),
        &ctx.config,
        &uri,
        serde_json::to_value(&submission).ok(),
    )
}
