use axum::{
    Json,
    extract::{Path, State},
};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    App,
    blog::{
        BlogError,
        models::{comment::CommentRecord, post::PostRecord},
        now,
        policy::can_view_post,
        store::EntityStore,
    },
    error::AppError,
    identity::{MaybeAuthUser, Viewer},
};

#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: PostRecord,
    pub comment_count: i64,
    pub comments: Vec<CommentRecord>,
}

/// A post the viewer may not see is reported exactly like a missing one.
pub async fn get_post_detail(
    store: &dyn EntityStore,
    id: i32,
    viewer: &Viewer,
    now: NaiveDateTime,
) -> Result<PostDetail, BlogError> {
    let post = store
        .get_post(id)
        .await?
        .filter(|post| can_view_post(post, viewer, now))
        .ok_or(BlogError::NotFound("Post"))?;

    let comments = store.list_comments(id).await?;

    Ok(PostDetail {
        post,
        comment_count: comments.len() as i64,
        comments,
    })
}

#[axum::debug_handler(state = App)]
pub async fn handle_get_post(
    State(ctx): State<App>,
    Path(id): Path<i32>,
    auth: MaybeAuthUser,
) -> Result<Json<PostDetail>, AppError> {
    let detail = get_post_detail(ctx.store.as_ref(), id, &auth.viewer(), now()).await?;
    Ok(Json(detail))
}
