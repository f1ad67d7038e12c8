use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::App;

use super::{
    comment::{
        create::handle_create_comment, delete::handle_delete_comment, patch::handle_edit_comment,
    },
    feed::{get_author_feed, get_category_feed, get_global_feed},
    post::{
        create::handle_create_post, delete::handle_delete_post, get::handle_get_post,
        patch::handle_edit_post,
    },
};

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route("/", get(get_global_feed))
        .route("/category/{slug}", get(get_category_feed))
        .route("/profile/{username}", get(get_author_feed))
        .route("/posts", post(handle_create_post))
        .route(
            "/posts/{id}",
            get(handle_get_post)
                .patch(handle_edit_post)
                .delete(handle_delete_post),
        )
        .route("/posts/{id}/comments", post(handle_create_comment))
        .route(
            "/posts/{id}/comments/{comment_id}",
            patch(handle_edit_comment).delete(handle_delete_comment),
        )
}
