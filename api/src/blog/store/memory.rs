use std::{
    collections::{BTreeMap, HashMap},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::{
    blog::models::{
        author::{Author, Profile},
        category::Category,
        comment::{Comment, CommentChanges, CommentRecord, NewComment},
        location::Location,
        post::{NewPost, Post, PostChanges, PostRecord},
    },
    identity::models::user::User,
};

use super::{EntityStore, PostQuery, StoreError, Window};

#[derive(Default)]
struct Tables {
    next_id: i32,
    users: BTreeMap<i32, User>,
    categories: BTreeMap<i32, Category>,
    locations: BTreeMap<i32, Location>,
    posts: BTreeMap<i32, Post>,
    comments: BTreeMap<i32, Comment>,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn author(&self, id: i32) -> Author {
        let username = self
            .users
            .get(&id)
            .map(|u| u.username.clone())
            .unwrap_or_default();
        Author { id, username }
    }

    fn post_record(&self, post: &Post) -> PostRecord {
        PostRecord {
            post: post.clone(),
            author: self.author(post.author_id),
            category: post
                .category_id
                .and_then(|id| self.categories.get(&id).cloned()),
            location: post
                .location_id
                .and_then(|id| self.locations.get(&id).cloned()),
        }
    }

    fn comment_record(&self, comment: &Comment) -> CommentRecord {
        CommentRecord {
            comment: comment.clone(),
            author: self.author(comment.author_id),
        }
    }

    fn matching_posts(&self, query: &PostQuery) -> Vec<PostRecord> {
        let mut records: Vec<PostRecord> = self
            .posts
            .values()
            .map(|post| self.post_record(post))
            .filter(|record| query.visibility.is_none_or(|filter| filter.matches(record)))
            .filter(|record| {
                query
                    .category_id
                    .is_none_or(|id| record.post.category_id == Some(id))
            })
            .filter(|record| query.author_id.is_none_or(|id| record.post.author_id == id))
            .collect();

        records.sort_by(|a, b| {
            b.post
                .pub_date
                .cmp(&a.post.pub_date)
                .then(b.post.id.cmp(&a.post.id))
        });

        records
    }
}

/// Keeps every table in memory. Foreign keys behave like the migration's:
/// deleting a category or location nulls the posts' reference.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn add_user(&self, username: &str, created_at: NaiveDateTime) -> User {
        let mut tables = self.write();
        let user = User {
            id: tables.next_id(),
            username: username.into(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            created_at,
        };
        tables.users.insert(user.id, user.clone());
        user
    }

    pub fn add_category(&self, slug: &str, is_published: bool, created_at: NaiveDateTime) -> Category {
        let mut tables = self.write();
        let category = Category {
            id: tables.next_id(),
            title: slug.to_uppercase(),
            description: format!("Posts about {slug}"),
            slug: slug.into(),
            is_published,
            created_at,
        };
        tables.categories.insert(category.id, category.clone());
        category
    }

    pub fn add_location(&self, name: &str, created_at: NaiveDateTime) -> Location {
        let mut tables = self.write();
        let location = Location {
            id: tables.next_id(),
            name: name.into(),
            is_published: true,
            created_at,
        };
        tables.locations.insert(location.id, location.clone());
        location
    }

    pub fn set_category_published(&self, id: i32, is_published: bool) {
        if let Some(category) = self.write().categories.get_mut(&id) {
            category.is_published = is_published;
        }
    }

    pub fn remove_category(&self, id: i32) {
        let mut tables = self.write();
        tables.categories.remove(&id);
        for post in tables.posts.values_mut() {
            if post.category_id == Some(id) {
                post.category_id = None;
            }
        }
    }

    pub fn post(&self, id: i32) -> Option<Post> {
        self.read().posts.get(&id).cloned()
    }

    pub fn comment(&self, id: i32) -> Option<Comment> {
        self.read().comments.get(&id).cloned()
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, StoreError> {
        Ok(self
            .read()
            .categories
            .values()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn category_exists(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.read().categories.contains_key(&id))
    }

    async fn location_exists(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.read().locations.contains_key(&id))
    }

    async fn profile_by_username(&self, username: &str) -> Result<Option<Profile>, StoreError> {
        Ok(self
            .read()
            .users
            .values()
            .find(|u| u.username == username)
            .map(|u| Profile {
                id: u.id,
                username: u.username.clone(),
                first_name: u.first_name.clone(),
                last_name: u.last_name.clone(),
                created_at: u.created_at,
            }))
    }

    async fn get_post(&self, id: i32) -> Result<Option<PostRecord>, StoreError> {
        let tables = self.read();
        Ok(tables.posts.get(&id).map(|post| tables.post_record(post)))
    }

    async fn count_posts(&self, query: &PostQuery) -> Result<i64, StoreError> {
        Ok(self.read().matching_posts(query).len() as i64)
    }

    async fn list_posts(
        &self,
        query: &PostQuery,
        window: Window,
    ) -> Result<Vec<PostRecord>, StoreError> {
        Ok(self
            .read()
            .matching_posts(query)
            .into_iter()
            .skip(window.offset.max(0) as usize)
            .take(window.limit.max(0) as usize)
            .collect())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut tables = self.write();
        let post = Post {
            id: tables.next_id(),
            title: post.title,
            text: post.text,
            pub_date: post.pub_date,
            author_id: post.author_id,
            location_id: post.location_id,
            category_id: post.category_id,
            image: post.image,
            is_published: post.is_published,
            created_at: post.created_at,
        };
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn update_post(
        &self,
        id: i32,
        changes: PostChanges,
    ) -> Result<Option<Post>, StoreError> {
        let mut tables = self.write();
        Ok(tables.posts.get_mut(&id).map(|post| {
            post.title = changes.title;
            post.text = changes.text;
            post.pub_date = changes.pub_date;
            post.location_id = changes.location_id;
            post.category_id = changes.category_id;
            post.image = changes.image;
            post.is_published = changes.is_published;
            post.clone()
        }))
    }

    async fn delete_post(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.write();
        tables.comments.retain(|_, comment| comment.post_id != id);
        Ok(tables.posts.remove(&id).is_some())
    }

    async fn comment_counts(&self, post_ids: &[i32]) -> Result<HashMap<i32, i64>, StoreError> {
        let mut counts = HashMap::new();
        for comment in self.read().comments.values() {
            if post_ids.contains(&comment.post_id) {
                *counts.entry(comment.post_id).or_insert(0) += 1;
            }
        }
        Ok(counts)
    }

    async fn get_comment(&self, id: i32) -> Result<Option<CommentRecord>, StoreError> {
        let tables = self.read();
        Ok(tables
            .comments
            .get(&id)
            .map(|comment| tables.comment_record(comment)))
    }

    async fn list_comments(&self, post_id: i32) -> Result<Vec<CommentRecord>, StoreError> {
        let tables = self.read();
        let mut records: Vec<CommentRecord> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .map(|c| tables.comment_record(c))
            .collect();
        records.sort_by(|a, b| {
            a.comment
                .created_at
                .cmp(&b.comment.created_at)
                .then(a.comment.id.cmp(&b.comment.id))
        });
        Ok(records)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut tables = self.write();
        let comment = Comment {
            id: tables.next_id(),
            text: comment.text,
            post_id: comment.post_id,
            author_id: comment.author_id,
            is_published: true,
            created_at: comment.created_at,
        };
        tables.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn update_comment(
        &self,
        id: i32,
        changes: CommentChanges,
    ) -> Result<Option<Comment>, StoreError> {
        let mut tables = self.write();
        Ok(tables.comments.get_mut(&id).map(|comment| {
            comment.text = changes.text;
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: i32) -> Result<bool, StoreError> {
        Ok(self.write().comments.remove(&id).is_some())
    }
}
