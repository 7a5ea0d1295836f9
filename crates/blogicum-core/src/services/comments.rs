use uuid::Uuid;

use super::{Repositories, find_author, find_visible_post};
use crate::domain::{Comment, CommentDetails, ensure_author, validate_comment_text};
use crate::error::{DomainError, DomainResult};

/// Commenting on posts.
#[derive(Clone)]
pub struct CommentService {
    repos: Repositories,
}

impl CommentService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Comments on a post, oldest first.
    pub async fn list(&self, post_id: Uuid) -> DomainResult<Vec<CommentDetails>> {
        Ok(self.repos.comments.list_for_post(post_id).await?)
    }

    /// Comment on a post the actor can see.
    pub async fn create(
        &self,
        actor: Uuid,
        post_id: Uuid,
        text: String,
    ) -> DomainResult<CommentDetails> {
        validate_comment_text(&text)?;
        find_visible_post(&self.repos, post_id, Some(actor)).await?;
        let author = find_author(&self.repos, actor).await?;

        let comment = self
            .repos
            .comments
            .create(Comment::new(post_id, actor, text))
            .await?;
        tracing::info!(comment_id = %comment.id, post_id = %post_id, "Comment added");

        Ok(CommentDetails { comment, author })
    }

    pub async fn update(
        &self,
        actor: Uuid,
        post_id: Uuid,
        comment_id: Uuid,
        text: String,
    ) -> DomainResult<CommentDetails> {
        let mut comment = self.find(post_id, comment_id).await?;
        ensure_author(actor, comment.author_id, "comment")?;
        validate_comment_text(&text)?;

        comment.text = text;
        let comment = self.repos.comments.update(comment).await?;
        let author = find_author(&self.repos, actor).await?;

        Ok(CommentDetails { comment, author })
    }

    pub async fn delete(&self, actor: Uuid, post_id: Uuid, comment_id: Uuid) -> DomainResult<()> {
        let comment = self.find(post_id, comment_id).await?;
        ensure_author(actor, comment.author_id, "comment")?;

        self.repos.comments.delete(comment_id).await?;
        tracing::info!(comment_id = %comment_id, post_id = %post_id, "Comment deleted");
        Ok(())
    }

    /// A comment addressed through the wrong post is treated as missing.
    async fn find(&self, post_id: Uuid, comment_id: Uuid) -> DomainResult<Comment> {
        self.repos
            .comments
            .find_by_id(comment_id)
            .await?
            .filter(|c| c.post_id == post_id)
            .ok_or_else(|| DomainError::not_found("comment", comment_id))
    }
}
