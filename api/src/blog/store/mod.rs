//! Persistence behind the blog.
//!
//! [`EntityStore`] is the only way the feeds and mutations touch storage.
//! [`pg::PgStore`] backs it with PostgreSQL through diesel-async; tests use
//! the in-memory implementation in [`memory`].

use std::collections::HashMap;

use async_trait::async_trait;
use diesel_async::pooled_connection::deadpool::PoolError;

use crate::error::AppError;

use super::{
    models::{
        author::Profile,
        category::Category,
        comment::{Comment, CommentChanges, CommentRecord, NewComment},
        post::{NewPost, Post, PostChanges, PostRecord},
    },
    policy::FeedFilter,
};

#[cfg(test)]
pub mod memory;
pub mod pg;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),

    #[error("could not get a database connection: {0}")]
    Pool(#[from] PoolError),
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Database(e) => e.into(),
            StoreError::Pool(e) => e.into(),
        }
    }
}

/// Which posts a listing wants. Every set field narrows the result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PostQuery {
    pub visibility: Option<FeedFilter>,
    pub category_id: Option<i32>,
    pub author_id: Option<i32>,
}

impl PostQuery {
    pub fn visible(filter: FeedFilter) -> Self {
        PostQuery {
            visibility: Some(filter),
            ..Default::default()
        }
    }

    pub fn in_category(mut self, category_id: i32) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn by_author(author_id: i32) -> Self {
        PostQuery {
            author_id: Some(author_id),
            ..Default::default()
        }
    }
}

/// A slice of an ordered listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError>;

    async fn category_exists(&self, id: i32) -> Result<bool, StoreError>;

    async fn location_exists(&self, id: i32) -> Result<bool, StoreError>;

    async fn profile_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError>;

    async fn get_post(&self, id: i32) -> Result<Option<PostRecord>, StoreError>;

    async fn count_posts(&self, query: &PostQuery) -> Result<i64, StoreError>;

    /// Posts matching `query`, newest `pub_date` first.
    async fn list_posts(
        &self,
        query: &PostQuery,
        window: Window,
    ) -> Result<Vec<PostRecord>, StoreError>;

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError>;

    /// Returns `None` when the post no longer exists.
    async fn update_post(&self, id: i32, changes: PostChanges)
    -> Result<Option<Post>, StoreError>;

    /// Deletes the post and its comments atomically. Returns whether the post
    /// existed.
    async fn delete_post(&self, id: i32) -> Result<bool, StoreError>;

    /// Number of comments per post. Posts without comments are absent from
    /// the map.
    async fn comment_counts(&self, post_ids: &[i32]) -> Result<HashMap<i32, i64>, StoreError>;

    async fn get_comment(&self, id: i32) -> Result<Option<CommentRecord>, StoreError>;

    /// Comments of a post, oldest first.
    async fn list_comments(&self, post_id: i32) -> Result<Vec<CommentRecord>, StoreError>;

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError>;

    async fn update_comment(
        &self,
        id: i32,
        changes: CommentChanges,
    ) -> Result<Option<Comment>, StoreError>;

    async fn delete_comment(&self, id: i32) -> Result<bool, StoreError>;
}
