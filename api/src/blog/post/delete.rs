use axum::{
    extract::{Path, State},
    http::Uri,
    response::Response,
};

use crate::{
    App,
    blog::{
        BlogError, Destination, policy::can_mutate, respond::mutation_response,
        store::EntityStore,
    },
    identity::{MaybeAuthUser, Viewer},
};

/// Removes the post together with its comments and sends the author back to
/// their profile.
pub async fn delete_post(
    store: &dyn EntityStore,
    id: i32,
    viewer: &Viewer,
) -> Result<Destination, BlogError> {
    let Some(viewer_id) = viewer.id() else {
        return Err(BlogError::Unauthorized);
    };

    let post = store
        .get_post(id)
        .await?
        .ok_or(BlogError::NotFound("Post"))?;

    if !can_mutate(&post, viewer) {
        tracing::warn!(post_id = id, viewer_id, "Delete denied, not the author");
        return Err(BlogError::Forbidden {
            kind: "post",
            redirect: Destination::PostDetail(id),
        });
    }

    if !store.delete_post(id).await? {
        return Err(BlogError::NotFound("Post"));
    }

    tracing::info!(post_id = id, viewer_id, "Post deleted");

    Ok(Destination::Profile(post.author.username))
}

#[axum::debug_handler(state = App)]
pub async fn handle_delete_post(
    State(ctx): State<App>,
    Path(id): Path<i32>,
    uri: Uri,
    auth: MaybeAuthUser,
) -> Response {
    let result = delete_post(ctx.store.as_ref(), id, &auth.viewer()).await;
    mutation_response(result, &ctx.config, &uri, None)
}
