use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

use super::{author::Author, category::Category, location::Location};

#[derive(Queryable, Selectable, Identifiable, Debug, Serialize, Clone, PartialEq)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Post {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub author_id: i32,
    pub location_id: Option<i32>,
    pub category_id: Option<i32>,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::posts)]
pub struct NewPost {
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub author_id: i32,
    pub location_id: Option<i32>,
    pub category_id: Option<i32>,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: NaiveDateTime,
}

/// Every field an author may overwrite. `None` clears the column.
#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::posts)]
#[diesel(treat_none_as_null = true)]
pub struct PostChanges {
    pub title: String,
    pub text: String,
    pub pub_date: NaiveDateTime,
    pub location_id: Option<i32>,
    pub category_id: Option<i32>,
    pub image: Option<String>,
    pub is_published: bool,
}

impl PostChanges {
    pub fn into_new_post(self, author_id: i32, created_at: NaiveDateTime) -> NewPost {
        NewPost {
            title: self.title,
            text: self.text,
            pub_date: self.pub_date,
            author_id,
            location_id: self.location_id,
            category_id: self.category_id,
            image: self.image,
            is_published: self.is_published,
            created_at,
        }
    }
}

/// A post together with the rows it references.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct PostRecord {
    #[serde(flatten)]
    pub post: Post,
    pub author: Author,
    pub category: Option<Category>,
    pub location: Option<Location>,
}
