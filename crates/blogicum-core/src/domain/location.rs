use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainResult;
use crate::validation::{MAX_TITLE_LEN, Validator};

/// Place a post was written about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub id: Uuid,
    pub name: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new(draft: LocationDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: draft.name,
            is_published: draft.is_published,
            created_at: Utc::now(),
        }
    }

    pub fn apply(&mut self, draft: LocationDraft) {
        self.name = draft.name;
        self.is_published = draft.is_published;
    }
}

#[derive(Debug, Clone)]
pub struct LocationDraft {
    pub name: String,
    pub is_published: bool,
}

impl LocationDraft {
    pub fn validate(&self) -> DomainResult<()> {
        Validator::new()
            .not_blank("name", &self.name)
            .max_len("name", &self.name, MAX_TITLE_LEN)
            .finish()
    }
}
