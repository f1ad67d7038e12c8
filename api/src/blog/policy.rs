//! Who may read a post and who may change a post or comment.
//!
//! Everything here is a pure function of the entity, the viewer and the
//! current time, which callers pass in explicitly.

use chrono::NaiveDateTime;

use crate::identity::Viewer;

use super::models::{
    comment::{Comment, CommentRecord},
    post::{Post, PostRecord},
};

/// An entity that belongs to exactly one user.
pub trait Owned {
    fn author_id(&self) -> i32;
}

impl Owned for Post {
    fn author_id(&self) -> i32 {
        self.author_id
    }
}

impl Owned for PostRecord {
    fn author_id(&self) -> i32 {
        self.post.author_id
    }
}

impl Owned for Comment {
    fn author_id(&self) -> i32 {
        self.author_id
    }
}

impl Owned for CommentRecord {
    fn author_id(&self) -> i32 {
        self.comment.author_id
    }
}

/// The predicate every public listing applies. It has no author bypass: an
/// author's drafts only show up on their profile feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedFilter {
    pub now: NaiveDateTime,
}

impl FeedFilter {
    pub fn matches(&self, record: &PostRecord) -> bool {
        record.post.pub_date <= self.now
            && record.post.is_published
            && record
                .category
                .as_ref()
                .is_some_and(|category| category.is_published)
    }
}

pub fn feed_visibility_filter(now: NaiveDateTime) -> FeedFilter {
    FeedFilter { now }
}

/// Authors always see their own posts. Everyone else needs a published post,
/// dated no later than `now`, in a published category.
pub fn can_view_post(record: &PostRecord, viewer: &Viewer, now: NaiveDateTime) -> bool {
    is_author(record, viewer) || feed_visibility_filter(now).matches(record)
}

pub fn can_mutate<E: Owned + ?Sized>(entity: &E, viewer: &Viewer) -> bool {
    is_author(entity, viewer)
}

fn is_author<E: Owned + ?Sized>(entity: &E, viewer: &Viewer) -> bool {
    viewer.id().is_some_and(|id| id == entity.author_id())
}
