use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AuthorRef, Category, Location};
use crate::error::DomainResult;
use crate::validation::{MAX_TITLE_LEN, Validator};

/// Post entity - a blog entry, possibly scheduled for later publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    /// Setting this in the future schedules the post.
    pub pub_date: DateTime<Utc>,
    pub author_id: Uuid,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub is_published: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post owned by `author_id`.
    pub fn new(author_id: Uuid, draft: PostDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            text: draft.text,
            pub_date: draft.pub_date,
            author_id,
            category_id: draft.category_id,
            location_id: draft.location_id,
            is_published: draft.is_published,
            image: draft.image,
            created_at: Utc::now(),
        }
    }

    /// Replace the editable fields. The author never changes.
    pub fn apply(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.text = draft.text;
        self.pub_date = draft.pub_date;
        self.category_id = draft.category_id;
        self.location_id = draft.location_id;
        self.is_published = draft.is_published;
        self.image = draft.image;
    }

    /// Time left before a scheduled post goes live, `None` once it has.
    pub fn time_until_publication(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        (self.pub_date > now).then(|| self.pub_date - now)
    }
}

/// Editable post fields as submitted by an author.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub category_id: Option<Uuid>,
    pub location_id: Option<Uuid>,
    pub is_published: bool,
    pub image: Option<String>,
}

impl PostDraft {
    pub fn validate(&self) -> DomainResult<()> {
        let mut v = Validator::new();
        v.not_blank("title", &self.title)
            .max_len("title", &self.title, MAX_TITLE_LEN)
            .not_blank("text", &self.text);
        if let Some(image) = &self.image {
            v.not_blank("image", image);
        }
        v.finish()
    }
}

/// A post together with the rows a listing renders next to it.
#[derive(Debug, Clone)]
pub struct PostDetails {
    pub post: Post,
    pub author: AuthorRef,
    pub category: Option<Category>,
    pub location: Option<Location>,
    pub comment_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> PostDraft {
        PostDraft {
            title: "First snow".to_string(),
            text: "It fell overnight.".to_string(),
            pub_date: Utc::now(),
            category_id: None,
            location_id: None,
            is_published: true,
            image: None,
        }
    }

    #[test]
    fn test_time_until_publication() {
        let now = Utc::now();
        let mut post = Post::new(Uuid::new_v4(), draft());

        post.pub_date = now + TimeDelta::days(2);
        assert_eq!(post.time_until_publication(now), Some(TimeDelta::days(2)));

        post.pub_date = now - TimeDelta::minutes(1);
        assert_eq!(post.time_until_publication(now), None);
    }

    #[test]
    fn test_apply_keeps_author() {
        let author = Uuid::new_v4();
        let mut post = Post::new(author, draft());

        let mut edit = draft();
        edit.title = "Second snow".to_string();
        post.apply(edit);

        assert_eq!(post.author_id, author);
        assert_eq!(post.title, "Second snow");
    }

    #[test]
    fn test_blank_image_reference_rejected() {
        let mut d = draft();
        d.image = Some("  ".to_string());
        assert!(d.validate().is_err());
    }
}
