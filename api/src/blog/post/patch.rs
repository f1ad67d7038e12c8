use axum::{
    extract::{Path, State},
    http::Uri,
    response::Response,
};

use crate::{
    App,
    blog::{
        BlogError, Destination, Mutation, models::post::Post, policy::can_mutate,
        respond::mutation_response, store::EntityStore,
    },
    identity::{MaybeAuthUser, Viewer},
};

use super::{PostSubmission, validate_post};

pub async fn edit_post(
    store: &dyn EntityStore,
    id: i32,
    viewer: &Viewer,
    submission: &PostSubmission,
) -> Result<Mutation<Post>, BlogError> {
    let Some(viewer_id) = viewer.id() else {
        return Err(BlogError::Unauthorized);
    };

    let current = store
        .get_post(id)
        .await?
        .ok_or(BlogError::NotFound("Post"))?;

    if !can_mutate(&current, viewer) {
        tracing::warn!(post_id = id, viewer_id, "Edit denied, not the author");
        return Err(BlogError::Forbidden {
            kind: "post",
            redirect: Destination::PostDetail(id),
        });
    }

    let changes = validate_post(store, submission).await?;
    let post = store
        .update_post(id, changes)
        .await?
        .ok_or(BlogError::NotFound("Post"))?;

    tracing::info!(post_id = id, viewer_id, "Post updated");

    Ok(Mutation {
        entity: post,
        redirect: Destination::PostDetail(id),
    })
}

#[axum::debug_handler(state = App)]
pub async fn handle_edit_post(
    State(ctx): State<App>,
    Path(id): Path<i32>,
    uri: Uri,
    auth: MaybeAuthUser,
    crate::json::Json(submission): crate::json::Json<PostSubmission>,
) -> Response {
    let result = edit_post(ctx.store.as_ref(), id, &auth.viewer(), &submission).await;

    mutation_response(
        result.map(|m| m.redirect),
        &ctx.config,
        &uri,
        serde_json::to_value(&submission).ok(),
    )
}
