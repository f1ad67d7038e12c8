use std::sync::LazyLock;

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{App, error::AppError};

use super::{
    BlogError,
    models::{author::Profile, category::Category, post::PostRecord},
    now,
    pagination::{PER_PAGE, Page, Paginator},
    policy::feed_visibility_filter,
    store::{EntityStore, PostQuery},
};

static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("slug pattern is valid"));

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct FeedEntry {
    #[serde(flatten)]
    pub post: PostRecord,
    pub comment_count: i64,
}

#[derive(Debug, Serialize)]
pub struct CategoryFeed {
    pub category: Category,
    pub page: Page<FeedEntry>,
}

#[derive(Debug, Serialize)]
pub struct AuthorFeed {
    pub profile: Profile,
    pub page: Page<FeedEntry>,
}

#[derive(Deserialize)]
pub struct PageQuery {
    page: Option<String>,
}

async fn build_page(
    store: &dyn EntityStore,
    query: &PostQuery,
    page: Option<&str>,
) -> Result<Page<FeedEntry>, BlogError> {
    let count = store.count_posts(query).await?;
    let info = Paginator::new(count, PER_PAGE).page(page);
    let records = store.list_posts(query, info.window()).await?;

    let ids: Vec<i32> = records.iter().map(|r| r.post.id).collect();
    let counts = store.comment_counts(&ids).await?;

    let items = records
        .into_iter()
        .map(|post| FeedEntry {
            comment_count: counts.get(&post.post.id).copied().unwrap_or(0),
            post,
        })
        .collect();

    Ok(Page { items, info })
}

pub async fn list_global_feed(
    store: &dyn EntityStore,
    page: Option<&str>,
    now: NaiveDateTime,
) -> Result<Page<FeedEntry>, BlogError> {
    build_page(store, &PostQuery::visible(feed_visibility_filter(now)), page).await
}

pub async fn list_category_feed(
    store: &dyn EntityStore,
    slug: &str,
    page: Option<&str>,
    now: NaiveDateTime,
) -> Result<CategoryFeed, BlogError> {
    if !SLUG.is_match(slug) {
        return Err(BlogError::NotFound("Category"));
    }

    let category = store
        .category_by_slug(slug)
        .await?
        .filter(|c| c.is_published)
        .ok_or(BlogError::NotFound("Category"))?;

    let query = PostQuery::visible(feed_visibility_filter(now)).in_category(category.id);
    let page = build_page(store, &query, page).await?;

    Ok(CategoryFeed { category, page })
}

/// Everything the author has written, drafts and scheduled posts included.
pub async fn list_author_feed(
    store: &dyn EntityStore,
    username: &str,
    page: Option<&str>,
) -> Result<AuthorFeed, BlogError> {
    let profile = store
        .profile_by_username(username)
        .await?
        .ok_or(BlogError::NotFound("User"))?;

    let page = build_page(store, &PostQuery::by_author(profile.id), page).await?;

    Ok(AuthorFeed { profile, page })
}

pub async fn get_global_feed(
    State(ctx): State<App>,
    Query(q): Query<PageQuery>,
) -> Result<Json<Page<FeedEntry>>, AppError> {
    let page = list_global_feed(ctx.store.as_ref(), q.page.as_deref(), now()).await?;
    Ok(Json(page))
}

pub async fn get_category_feed(
    State(ctx): State<App>,
    Path(slug): Path<String>,
    Query(q): Query<PageQuery>,
) -> Result<Json<CategoryFeed>, AppError> {
    let feed = list_category_feed(ctx.store.as_ref(), &slug, q.page.as_deref(), now()).await?;
    Ok(Json(feed))
}

pub async fn get_author_feed(
    State(ctx): State<App>,
    Path(username): Path<String>,
    Query(q): Query<PageQuery>,
) -> Result<Json<AuthorFeed>, AppError> {
    let feed = list_author_feed(ctx.store.as_ref(), &username, q.page.as_deref()).await?;
    Ok(Json(feed))
}
