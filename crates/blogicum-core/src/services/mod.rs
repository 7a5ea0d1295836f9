//! Application services - the operations exposed over HTTP, written against
//! the repository ports so they run on any storage backend.

mod catalog;
mod comments;
mod posts;
mod profiles;

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{AuthorRef, PostDetails, PostVisibility};
use crate::error::{DomainError, DomainResult};
use crate::ports::{
    CategoryRepository, CommentRepository, LocationRepository, PostRepository, UserRepository,
};

pub use catalog::CatalogService;
pub use comments::CommentService;
pub use posts::{PostService, PostView};
pub use profiles::{Profile, ProfileService};

/// Repository handles shared by every service.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub categories: Arc<dyn CategoryRepository>,
    pub locations: Arc<dyn LocationRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
}

/// Load a post the viewer is allowed to read. Hidden posts are reported as
/// missing so their existence does not leak.
pub(crate) async fn find_visible_post(
    repos: &Repositories,
    post_id: Uuid,
    viewer: Option<Uuid>,
) -> DomainResult<PostDetails> {
    let details = repos
        .posts
        .find_details(post_id)
        .await?
        .ok_or_else(|| DomainError::not_found("post", post_id))?;

    let visibility = PostVisibility::for_viewer(viewer, Utc::now());
    if !visibility.permits(&details.post, details.category.as_ref()) {
        return Err(DomainError::not_found("post", post_id));
    }

    Ok(details)
}

pub(crate) async fn find_author(repos: &Repositories, user_id: Uuid) -> DomainResult<AuthorRef> {
    repos
        .users
        .find_by_id(user_id)
        .await?
        .map(|user| AuthorRef::from(&user))
        .ok_or_else(|| DomainError::not_found("user", user_id))
}
