use std::collections::HashMap;

use async_trait::async_trait;
use diesel::{
    helper_types::{InnerJoin, IntoBoxed, LeftJoin},
    pg::Pg,
    prelude::*,
};
use diesel_async::{
    AsyncConnection, AsyncPgConnection, RunQueryDsl, pooled_connection::deadpool::Pool,
    scoped_futures::ScopedFutureExt,
};

use crate::{
    blog::models::{
        author::{Author, Profile},
        category::Category,
        comment::{Comment, CommentChanges, CommentRecord, NewComment},
        location::Location,
        post::{NewPost, Post, PostChanges, PostRecord},
    },
    schema::{categories, comments, locations, posts, users},
};

use super::{EntityStore, PostQuery, StoreError, Window};

type PostSource =
    LeftJoin<LeftJoin<InnerJoin<posts::table, users::table>, categories::table>, locations::table>;
type BoxedPostRows<'a> = IntoBoxed<'a, PostSource, Pg>;
type PostRow = (Post, Author, Option<Category>, Option<Location>);

pub struct PgStore {
    pool: Pool<AsyncPgConnection>,
}

impl PgStore {
    pub fn new(pool: Pool<AsyncPgConnection>) -> Self {
        PgStore { pool }
    }
}

/// Posts joined with their author, category and location, narrowed by
/// `query`. The category join is a left join so that uncategorized posts
/// stay listable when no visibility filter applies.
fn post_rows<'a>(query: &PostQuery) -> BoxedPostRows<'a> {
    let mut rows = posts::table
        .inner_join(users::table)
        .left_join(categories::table)
        .left_join(locations::table)
        .into_boxed();

    if let Some(filter) = query.visibility {
        rows = rows
            .filter(posts::pub_date.le(filter.now))
            .filter(posts::is_published.eq(true))
            .filter(categories::is_published.eq(true));
    }

    if let Some(category_id) = query.category_id {
        rows = rows.filter(posts::category_id.eq(category_id));
    }

    if let Some(author_id) = query.author_id {
        rows = rows.filter(posts::author_id.eq(author_id));
    }

    rows
}

fn into_record((post, author, category, location): PostRow) -> PostRecord {
    PostRecord {
        post,
        author,
        category,
        location,
    }
}

#[async_trait]
impl EntityStore for PgStore {
    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        let mut conn = self.pool.get().await?;

        Ok(categories::table
            .filter(categories::slug.eq(slug))
            .select(Category::as_select())
            .first(&mut conn)
            .await
            .optional()?)
    }

    async fn category_exists(&self, id: i32) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;

        Ok(
            diesel::select(diesel::dsl::exists(categories::table.find(id)))
                .get_result::<bool>(&mut conn)
                .await?,
        )
    }

    async fn location_exists(&self, id: i32) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;

        Ok(
            diesel::select(diesel::dsl::exists(locations::table.find(id)))
                .get_result::<bool>(&mut conn)
                .await?,
        )
    }

    async fn profile_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError> {
        let mut conn = self.pool.get().await?;

        Ok(users::table
            .filter(users::username.eq(username))
            .select(Profile::as_select())
            .first(&mut conn)
            .await
            .optional()?)
    }

    async fn get_post(&self, id: i32) -> Result<Option<PostRecord>, StoreError> {
        let mut conn = self.pool.get().await?;

        let row = post_rows(&PostQuery::default())
            .filter(posts::id.eq(id))
            .select((
                Post::as_select(),
                Author::as_select(),
                Option::<Category>::as_select(),
                Option::<Location>::as_select(),
            ))
            .first::<PostRow>(&mut conn)
            .await
            .optional()?;

        Ok(row.map(into_record))
    }

    async fn count_posts(&self, query: &PostQuery) -> Result<i64, StoreError> {
        let mut conn = self.pool.get().await?;

        Ok(post_rows(query).count().get_result(&mut conn).await?)
    }

    async fn list_posts(
        &self,
        query: &PostQuery,
        window: Window,
    ) -> Result<Vec<PostRecord>, StoreError> {
        let mut conn = self.pool.get().await?;

        let rows = post_rows(query)
            .select((
                Post::as_select(),
                Author::as_select(),
                Option::<Category>::as_select(),
                Option::<Location>::as_select(),
            ))
            .order((posts::pub_date.desc(), posts::id.desc()))
            .offset(window.offset)
            .limit(window.limit)
            .load::<PostRow>(&mut conn)
            .await?;

        Ok(rows.into_iter().map(into_record).collect())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut conn = self.pool.get().await?;

        Ok(diesel::insert_into(posts::table)
            .values(&post)
            .returning(Post::as_returning())
            .get_result(&mut conn)
            .await?)
    }

    async fn update_post(
        &self,
        id: i32,
        changes: PostChanges,
    ) -> Result<Option<Post>, StoreError> {
        let mut conn = self.pool.get().await?;

        Ok(diesel::update(posts::table.find(id))
            .set(&changes)
            .returning(Post::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?)
    }

    async fn delete_post(&self, id: i32) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;

        // dependents first, so the post never disappears while its comments
        // are still around
        let deleted = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    diesel::delete(comments::table.filter(comments::post_id.eq(id)))
                        .execute(conn)
                        .await?;

                    diesel::delete(posts::table.find(id)).execute(conn).await
                }
                .scope_boxed()
            })
            .await?;

        Ok(deleted > 0)
    }

    async fn comment_counts(&self, post_ids: &[i32]) -> Result<HashMap<i32, i64>, StoreError> {
        if post_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut conn = self.pool.get().await?;

        let counts = comments::table
            .filter(comments::post_id.eq_any(post_ids.to_vec()))
            .group_by(comments::post_id)
            .select((comments::post_id, diesel::dsl::count_star()))
            .load::<(i32, i64)>(&mut conn)
            .await?;

        Ok(counts.into_iter().collect())
    }

    async fn get_comment(&self, id: i32) -> Result<Option<CommentRecord>, StoreError> {
        let mut conn = self.pool.get().await?;

        let row = comments::table
            .inner_join(users::table)
            .filter(comments::id.eq(id))
            .select((Comment::as_select(), Author::as_select()))
            .first::<(Comment, Author)>(&mut conn)
            .await
            .optional()?;

        Ok(row.map(|(comment, author)| CommentRecord { comment, author }))
    }

    async fn list_comments(&self, post_id: i32) -> Result<Vec<CommentRecord>, StoreError> {
        let mut conn = self.pool.get().await?;

        let rows = comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id))
            .select((Comment::as_select(), Author::as_select()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .load::<(Comment, Author)>(&mut conn)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(comment, author)| CommentRecord { comment, author })
            .collect())
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut conn = self.pool.get().await?;

        Ok(diesel::insert_into(comments::table)
            .values(&comment)
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await?)
    }

    async fn update_comment(
        &self,
        id: i32,
        changes: CommentChanges,
    ) -> Result<Option<Comment>, StoreError> {
        let mut conn = self.pool.get().await?;

        Ok(diesel::update(comments::table.find(id))
            .set(&changes)
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?)
    }

    async fn delete_comment(&self, id: i32) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(comments::table.find(id))
            .execute(&mut conn)
            .await?;

        Ok(deleted > 0)
    }
}
