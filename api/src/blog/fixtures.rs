use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::identity::{Viewer, models::user::User};

use super::{
    models::{
        category::Category,
        comment::{Comment, NewComment},
        location::Location,
        post::{NewPost, Post},
    },
    post::PostSubmission,
    store::{EntityStore, memory::MemoryStore},
};

pub fn days(n: i64) -> Duration {
    Duration::try_days(n).unwrap()
}

/// A valid post submission without category or location.
pub fn submission(title: &str) -> PostSubmission {
    PostSubmission {
        title: title.into(),
        text: "Went to the mountains".into(),
        pub_date: "2024-05-31 10:00".into(),
        ..Default::default()
    }
}

/// A store with two users, a published and an unpublished category, and a
/// location. Time is frozen at `now`.
pub struct World {
    pub store: MemoryStore,
    pub now: NaiveDateTime,
    pub alice: User,
    pub bob: User,
    pub travel: Category,
    pub drafts: Category,
    pub moscow: Location,
}

impl World {
    pub fn new() -> Self {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let store = MemoryStore::new();
        let alice = store.add_user("alice", now - days(100));
        let bob = store.add_user("bob", now - days(50));
        let travel = store.add_category("travel", true, now - days(90));
        let drafts = store.add_category("drafts", false, now - days(90));
        let moscow = store.add_location("Moscow", now - days(90));

        World {
            store,
            now,
            alice,
            bob,
            travel,
            drafts,
            moscow,
        }
    }

    pub fn viewer(user: &User) -> Viewer {
        Viewer::from(user)
    }

    pub async fn post(
        &self,
        author: &User,
        category: Option<&Category>,
        pub_date: NaiveDateTime,
        is_published: bool,
    ) -> Post {
        self.store
            .create_post(NewPost {
                title: format!("Post by {}", author.username),
                text: "Some text".into(),
                pub_date,
                author_id: author.id,
                location_id: None,
                category_id: category.map(|c| c.id),
                image: None,
                is_published,
                created_at: self.now - days(1),
            })
            .await
            .unwrap()
    }

    /// A post anyone may see: published, dated yesterday, in `travel`.
    pub async fn public_post(&self, author: &User) -> Post {
        self.post(author, Some(&self.travel), self.now - days(1), true)
            .await
    }

    pub async fn comment(&self, post: &Post, author: &User, text: &str) -> Comment {
        self.store
            .create_comment(NewComment {
                text: text.into(),
                post_id: post.id,
                author_id: author.id,
                created_at: self.now,
            })
            .await
            .unwrap()
    }
}
