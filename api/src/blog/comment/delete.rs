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

use super::comment_of_post;

pub async fn delete_comment(
    store: &dyn EntityStore,
    post_id: i32,
    comment_id: i32,
    viewer: &Viewer,
) -> Result<Destination, BlogError> {
    let Some(viewer_id) = viewer.id() else {
        return Err(BlogError::Unauthorized);
    };

    let comment = comment_of_post(store, post_id, comment_id).await?;

    if !can_mutate(&comment, viewer) {
        tracing::warn!(post_id, comment_id, viewer_id, "Comment delete denied, not the author");
        return Err(BlogError::Forbidden {
            kind: "comment",
            redirect: Destination::PostDetail(post_id),
        });
    }

    if !store.delete_comment(comment_id).await? {
        return Err(BlogError::NotFound("Comment"));
    }

    tracing::info!(post_id, comment_id, viewer_id, "Comment deleted");

    Ok(Destination::PostDetail(post_id))
}

#[axum::debug_handler(state = App)]
pub async fn handle_delete_comment(
    State(ctx): State<App>,
    Path((post_id, comment_id)): Path<(i32, i32)>,
    uri: Uri,
    auth: MaybeAuthUser,
) -> Response {
    let result = delete_comment(ctx.store.as_ref(), post_id, comment_id, &auth.viewer()).await;
    mutation_response(result, &ctx.config, &uri, None)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::blog::fixtures::World;

    #[tokio::test]
    async fn test_author_deletes_own_comment() {
        let w = World::new();
        let post = w.public_post(&w.alice).await;
        let comment = w.comment(&post, &w.bob, "bye").await;
        let kept = w.comment(&post, &w.alice, "stays").await;

        let redirect = delete_comment(&w.store, post.id, comment.id, &World::viewer(&w.bob))
            .await
            .unwrap();

        assert_eq!(redirect, Destination::PostDetail(post.id));
        assert!(w.store.comment(comment.id).is_none());
        assert!(w.store.comment(kept.id).is_some());
        assert!(w.store.post(post.id).is_some());
    }

    #[tokio::test]
    async fn test_delete_by_other_user_is_forbidden() {
        let w = World::new();
        let post = w.public_post(&w.alice).await;
        let comment = w.comment(&post, &w.bob, "keep me").await;

        let result = delete_comment(&w.store, post.id, comment.id, &World::viewer(&w.alice)).await;

        assert!(matches!(
            result,
            Err(BlogError::Forbidden {
                redirect: Destination::PostDetail(id),
                ..
            }) if id == post.id
        ));
        assert!(w.store.comment(comment.id).is_some());
    }

    #[tokio::test]
    async fn test_repeated_delete_is_not_found() {
        let w = World::new();
        let post = w.public_post(&w.alice).await;
        let comment = w.comment(&post, &w.bob, "once").await;
        let bob = World::viewer(&w.bob);

        delete_comment(&w.store, post.id, comment.id, &bob)
            .await
            .unwrap();

        assert!(matches!(
            delete_comment(&w.store, post.id, comment.id, &bob).await,
            Err(BlogError::NotFound("Comment"))
        ));
    }
}
