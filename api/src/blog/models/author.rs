use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

/// The slice of a user that is shown next to their posts and comments.
#[derive(Queryable, Selectable, Debug, Serialize, Clone, PartialEq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Author {
    pub id: i32,
    pub username: String,
}

/// Public profile shown on top of an author feed.
#[derive(Queryable, Selectable, Debug, Serialize, Clone, PartialEq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Profile {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(rename = "joined_at")]
    pub created_at: NaiveDateTime,
}
