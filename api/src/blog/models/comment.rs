use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use super::author::Author;

#[derive(Queryable, Selectable, Identifiable, Debug, Serialize, Clone, PartialEq)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub id: i32,
    pub text: String,
    pub post_id: i32,
    pub author_id: i32,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub text: String,
    pub post_id: i32,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::comments)]
pub struct CommentChanges {
    pub text: String,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CommentRecord {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: Author,
}
