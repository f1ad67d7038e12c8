pub mod create;
pub mod delete;
pub mod get;
pub mod patch;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::validation::{FieldErrors, REQUIRED, clean_text};

use super::{BlogError, models::post::PostChanges, store::EntityStore};

const TITLE_MAX_CHARS: usize = 256;
const IMAGE_MAX_CHARS: usize = 100;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// What an author submits when writing or rewriting a post. Editing sends
/// the whole post again.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PostSubmission {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub pub_date: String,
    #[serde(default)]
    pub category: Option<i32>,
    #[serde(default)]
    pub location: Option<i32>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "published_by_default")]
    pub is_published: bool,
}

fn published_by_default() -> bool {
    true
}

impl Default for PostSubmission {
    fn default() -> Self {
        PostSubmission {
            title: String::new(),
            text: String::new(),
            pub_date: String::new(),
            category: None,
            location: None,
            image: None,
            is_published: published_by_default(),
        }
    }
}

/// A bare date means midnight of that day.
pub fn parse_pub_date(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

/// Checks every field, including that the referenced category and location
/// exist, and reports all problems at once.
pub async fn validate_post(
    store: &dyn EntityStore,
    submission: &PostSubmission,
) -> Result<PostChanges, BlogError> {
    let mut errors = FieldErrors::new();

    let title = clean_text(
        &mut errors,
        "title",
        &submission.title,
        true,
        Some(TITLE_MAX_CHARS),
    );
    let text = clean_text(&mut errors, "text", &submission.text, true, None);

    let pub_date = if submission.pub_date.trim().is_empty() {
        errors.add("pub_date", REQUIRED);
        None
    } else {
        let parsed = parse_pub_date(&submission.pub_date);
        if parsed.is_none() {
            errors.add("pub_date", "Enter a valid date/time.");
        }
        parsed
    };

    if let Some(id) = submission.category {
        if !store.category_exists(id).await? {
            errors.add("category", "Select a valid choice.");
        }
    }

    if let Some(id) = submission.location {
        if !store.location_exists(id).await? {
            errors.add("location", "Select a valid choice.");
        }
    }

    let image = submission
        .image
        .as_deref()
        .map(|image| clean_text(&mut errors, "image", image, false, Some(IMAGE_MAX_CHARS)))
        .filter(|image| !image.is_empty());

    match pub_date {
        Some(pub_date) if errors.is_empty() => Ok(PostChanges {
            title,
            text,
            pub_date,
            location_id: submission.location,
            category_id: submission.category,
            image,
            is_published: submission.is_published,
        }),
        _ => Err(BlogError::Validation(errors)),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::blog::fixtures::{World, submission};

    #[test]
    fn test_parse_pub_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 31)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();

        assert_eq!(parse_pub_date("2024-05-31T10:30"), Some(expected));
        assert_eq!(parse_pub_date("2024-05-31T10:30:00"), Some(expected));
        assert_eq!(parse_pub_date("2024-05-31 10:30:00"), Some(expected));
        assert_eq!(parse_pub_date(" 2024-05-31 10:30 "), Some(expected));
        assert_eq!(
            parse_pub_date("2024-05-31"),
            NaiveDate::from_ymd_opt(2024, 5, 31).unwrap().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_pub_date("31.05.2024"), None);
        assert_eq!(parse_pub_date("2024-02-30"), None);
    }

    #[test]
    fn test_submission_defaults_to_published() {
        let parsed: PostSubmission =
            serde_json::from_str(r#"{"title":"t","text":"x","pub_date":"2024-01-01"}"#).unwrap();
        assert!(parsed.is_published);
        assert_eq!(parsed.category, None);
    }

    #[tokio::test]
    async fn test_validate_post_accepts_valid_submission() {
        let w = World::new();
        let mut sub = submission("  Mountains ");
        sub.category = Some(w.travel.id);
        sub.location = Some(w.moscow.id);
        sub.image = Some("   ".into());

        let changes = validate_post(&w.store, &sub).await.unwrap();

        assert_eq!(changes.title, "Mountains");
        assert_eq!(changes.category_id, Some(w.travel.id));
        assert_eq!(changes.location_id, Some(w.moscow.id));
        assert_eq!(changes.image, None);
        assert!(changes.is_published);
    }

    #[tokio::test]
    async fn test_validate_post_collects_every_error() {
        let w = World::new();
        let sub = PostSubmission {
            title: "x".repeat(257),
            text: "  ".into(),
            pub_date: "yesterday".into(),
            category: Some(9999),
            location: Some(9998),
            image: Some("i".repeat(101)),
            is_published: true,
        };

        let Err(BlogError::Validation(errors)) = validate_post(&w.store, &sub).await else {
            panic!("expected validation error");
        };

        let fields: Vec<&str> = errors.fields().collect();
        assert_eq!(
            fields,
            vec!["category", "image", "location", "pub_date", "text", "title"]
        );
    }

    #[tokio::test]
    async fn test_validate_post_requires_pub_date() {
        let w = World::new();
        let mut sub = submission("Title");
        sub.pub_date = String::new();

        let Err(BlogError::Validation(errors)) = validate_post(&w.store, &sub).await else {
            panic!("expected validation error");
        };
        assert!(errors.contains("pub_date"));
    }
}
