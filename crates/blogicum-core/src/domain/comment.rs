use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::AuthorRef;
use crate::error::DomainResult;
use crate::validation::Validator;

/// Comment entity - always listed oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author_id: Uuid, text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            post_id,
            author_id,
            text,
            created_at: Utc::now(),
        }
    }
}

pub fn validate_comment_text(text: &str) -> DomainResult<()> {
    Validator::new().not_blank("text", text).finish()
}

#[derive(Debug, Clone)]
pub struct CommentDetails {
    pub comment: Comment,
    pub author: AuthorRef,
}
