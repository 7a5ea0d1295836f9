use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use super::{Repositories, find_visible_post};
use crate::domain::{
    Category, CommentDetails, Post, PostDetails, PostDraft, PostQuery, PostVisibility,
    ensure_author,
};
use crate::error::{DomainError, DomainResult};
use crate::pagination::{Page, PageRequest};

/// A post as shown on its own page.
#[derive(Debug, Clone)]
pub struct PostView {
    pub details: PostDetails,
    pub comments: Vec<CommentDetails>,
    /// Set while a scheduled post is still waiting for its `pub_date`.
    pub publishes_in: Option<TimeDelta>,
}

/// Post listings and post authoring.
#[derive(Clone)]
pub struct PostService {
    repos: Repositories,
}

impl PostService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    /// Front page: every publicly visible post.
    pub async fn index(&self, page: PageRequest) -> DomainResult<Page<PostDetails>> {
        let query = PostQuery::new(PostVisibility::Public { now: Utc::now() });
        self.listing(&query, page).await
    }

    /// Publicly visible posts published during `year`.
    pub async fn archive(&self, year: i32, page: PageRequest) -> DomainResult<Page<PostDetails>> {
        let query = PostQuery::new(PostVisibility::Public { now: Utc::now() }).in_year(year);
        if query.year_bounds().is_none() {
            return Err(DomainError::invalid(format!("{year} is not a valid year")));
        }
        self.listing(&query, page).await
    }

    /// Publicly visible posts of a published category.
    pub async fn category_posts(
        &self,
        slug: &str,
        page: PageRequest,
    ) -> DomainResult<(Category, Page<PostDetails>)> {
        let category = self
            .repos
            .categories
            .find_by_slug(slug)
            .await?
            .filter(|c| c.is_published)
            .ok_or_else(|| DomainError::not_found("category", slug))?;

        let query = PostQuery::new(PostVisibility::Public { now: Utc::now() })
            .in_category(category.id);
        let posts = self.listing(&query, page).await?;

        Ok((category, posts))
    }

    pub async fn detail(&self, post_id: Uuid, viewer: Option<Uuid>) -> DomainResult<PostView> {
        let details = find_visible_post(&self.repos, post_id, viewer).await?;
        let comments = self.repos.comments.list_for_post(post_id).await?;
        let publishes_in = details.post.time_until_publication(Utc::now());

        Ok(PostView {
            details,
            comments,
            publishes_in,
        })
    }

    pub async fn create(&self, actor: Uuid, draft: PostDraft) -> DomainResult<PostDetails> {
        draft.validate()?;
        self.check_references(&draft).await?;

        let post = self.repos.posts.create(Post::new(actor, draft)).await?;
        tracing::info!(post_id = %post.id, author_id = %actor, "Post created");

        self.reload(post.id).await
    }

    pub async fn update(
        &self,
        actor: Uuid,
        post_id: Uuid,
        draft: PostDraft,
    ) -> DomainResult<PostDetails> {
        let mut post = find_visible_post(&self.repos, post_id, Some(actor)).await?.post;
        ensure_author(actor, post.author_id, "post")?;

        draft.validate()?;
        self.check_references(&draft).await?;

        post.apply(draft);
        self.repos.posts.update(post).await?;
        tracing::info!(post_id = %post_id, "Post updated");

        self.reload(post_id).await
    }

    /// Delete a post and, with it, its comments.
    pub async fn delete(&self, actor: Uuid, post_id: Uuid) -> DomainResult<()> {
        let post = find_visible_post(&self.repos, post_id, Some(actor)).await?.post;
        ensure_author(actor, post.author_id, "post")?;

        self.repos.posts.delete(post_id).await?;
        tracing::info!(post_id = %post_id, "Post deleted");
        Ok(())
    }

    async fn listing(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> DomainResult<Page<PostDetails>> {
        self.repos.posts.find_page(query, page).await?.ensure_in_range()
    }

    async fn reload(&self, post_id: Uuid) -> DomainResult<PostDetails> {
        self.repos
            .posts
            .find_details(post_id)
            .await?
            .ok_or_else(|| DomainError::Internal(format!("post {post_id} vanished after save")))
    }

    async fn check_references(&self, draft: &PostDraft) -> DomainResult<()> {
        let mut errors = Vec::new();

        if let Some(id) = draft.category_id {
            if self.repos.categories.find_by_id(id).await?.is_none() {
                errors.push(format!("category {id} does not exist"));
            }
        }
        if let Some(id) = draft.location_id {
            if self.repos.locations.find_by_id(id).await?.is_none() {
                errors.push(format!("location {id} does not exist"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DomainError::Validation(errors))
        }
    }
}
