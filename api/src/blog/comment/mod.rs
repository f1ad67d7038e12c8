pub mod create;
pub mod delete;
pub mod patch;

use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, clean_text};

use super::{
    BlogError,
    models::comment::{CommentChanges, CommentRecord},
    store::EntityStore,
};

const TEXT_MAX_CHARS: usize = 5000;

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct CommentSubmission {
    #[serde(default)]
    pub text: String,
}

impl CommentSubmission {
    #[cfg(test)]
    pub fn new(text: impl Into<String>) -> Self {
        CommentSubmission { text: text.into() }
    }

    fn validate(&self) -> Result<CommentChanges, BlogError> {
        let mut errors = FieldErrors::new();
        let text = clean_text(&mut errors, "text", &self.text, true, Some(TEXT_MAX_CHARS));

        if !errors.is_empty() {
            return Err(BlogError::Validation(errors));
        }

        Ok(CommentChanges { text })
    }
}

/// Looks a comment up through the post it is addressed by. A comment under
/// another post is treated as missing.
async fn comment_of_post(
    store: &dyn EntityStore,
    post_id: i32,
    comment_id: i32,
) -> Result<CommentRecord, BlogError> {
    store
        .get_comment(comment_id)
        .await?
        .filter(|record| record.comment.post_id == post_id)
        .ok_or(BlogError::NotFound("Comment"))
}
