use diesel::prelude::*;
use serde::Serialize;

#[derive(Queryable, Selectable, Identifiable, Debug, Serialize, Clone, PartialEq)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct User {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(AsChangeset, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::users)]
pub struct ProfileChanges {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}
