use axum::{
    extract::{Path, State},
    http::Uri,
    response::Response,
};

use crate::{
    App,
    blog::{
        BlogError, Destination, Mutation, models::comment::Comment, policy::can_mutate,
        respond::mutation_response, store::EntityStore,
    },
    identity::{MaybeAuthUser, Viewer},
};

use super::{CommentSubmission, comment_of_post};

pub async fn edit_comment(
    store: &dyn EntityStore,
    post_id: i32,
    comment_id: i32,
    viewer: &Viewer,
    submission: &CommentSubmission,
) -> Result<Mutation<Comment>, BlogError> {
    let Some(viewer_id) = viewer.id() else {
        return Err(BlogError::Unauthorized);
    };

    let current = comment_of_post(store, post_id, comment_id).await?;

    if !can_mutate(&current, viewer) {
        tracing::warn!(post_id, comment_id, viewer_id, "Comment edit denied, not the author");
        return Err(BlogError::Forbidden {
            kind: "comment",
            redirect: Destination::PostDetail(post_id),
        });
    }

    let changes = submission.validate()?;
    let comment = store
        .update_comment(comment_id, changes)
        .await?
        .ok_or(BlogError::NotFound("Comment"))?;

    tracing::info!(post_id, comment_id, viewer_id, "Comment updated");

    Ok(Mutation {
        entity: comment,
        redirect: Destination::PostDetail(post_id),
    })
}

#[axum::debug_handler(state = App)]
pub async fn handle_edit_comment(
    State(ctx): State<App>,
    Path((post_id, comment_id)): Path<(i32, i32)>,
    uri: Uri,
    auth: MaybeAuthUser,
    crate::json::Json(submission): crate::json::Json<CommentSubmission>,
) -> Response {
    let result = edit_comment(
        ctx.store.as_ref(),
        post_id,
        comment_id,
        &auth.viewer(),
        &submission,
    )
    .await;

    mutation_response(
        result.map(|m| m.redirect),
        &ctx.config,
        &uri,
        serde_json::to_value(&submission).ok(),
    )
}
