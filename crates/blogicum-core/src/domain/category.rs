use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainResult;
use crate::validation::{MAX_TITLE_LEN, Validator, is_slug};

/// Thematic section posts are filed under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub title: String,
    /// URL identifier, unique across categories.
    pub slug: String,
    pub description: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(draft: CategoryDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            slug: draft.slug,
            description: draft.description,
            is_published: draft.is_published,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, draft: CategoryDraft) {
        self.title = draft.title;
        self.slug = draft.slug;
        self.description = draft.description;
        self.is_published = draft.is_published;
    }
}

#[derive(Debug, Clone)]
pub struct CategoryDraft {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub is_published: bool,
}

impl CategoryDraft {
    pub fn validate(&self) -> DomainResult<()> {
        Validator::new()
            .not_blank("title", &self.title)
            .max_len("title", &self.title, MAX_TITLE_LEN)
            .check(
                is_slug(&self.slug),
                "slug may contain only latin letters, digits, hyphens and underscores",
            )
            .not_blank("description", &self.description)
            .finish()
    }
}
