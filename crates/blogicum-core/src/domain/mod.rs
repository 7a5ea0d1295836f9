//! Domain entities - the core business objects.

mod category;
mod comment;
mod location;
mod post;
mod user;
mod visibility;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use category::{Category, CategoryDraft};
pub use comment::{Comment, CommentDetails, validate_comment_text};
pub use location::{Location, LocationDraft};
pub use post::{Post, PostDetails, PostDraft};
pub use user::{MIN_PASSWORD_LEN, ProfileChanges, Registration, User};
pub use visibility::{PostQuery, PostVisibility, ensure_author, is_publicly_visible};

/// The slice of a user shown next to their posts and comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRef {
    pub id: Uuid,
    pub username: String,
}

impl From<&User> for AuthorRef {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}
