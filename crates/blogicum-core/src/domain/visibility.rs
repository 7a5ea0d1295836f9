//! Who may see a post, and who may change it.
//!
//! A post is publicly visible when it is published, its `pub_date` has
//! passed, and its category (if it has one) is published. Authors always see
//! their own posts. Only the author of a post or comment may edit or delete it.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use uuid::Uuid;

use super::{Category, Post};
use crate::error::{DomainError, DomainResult};

pub fn is_publicly_visible(post: &Post, category: Option<&Category>, now: DateTime<Utc>) -> bool {
    post.is_published && post.pub_date <= now && category.is_none_or(|c| c.is_published)
}

/// Fail with `Forbidden` unless `actor` owns the resource.
pub fn ensure_author(actor: Uuid, owner: Uuid, entity: &'static str) -> DomainResult<()> {
    if actor == owner {
        Ok(())
    } else {
        Err(DomainError::Forbidden(entity))
    }
}

/// Visibility filter applied to post queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostVisibility {
    /// Anonymous readers and public listings.
    Public { now: DateTime<Utc> },
    /// Public posts plus everything written by `author_id`.
    PublicOrAuthor { now: DateTime<Utc>, author_id: Uuid },
    /// No filtering.
    Unrestricted,
}

impl PostVisibility {
    pub fn for_viewer(viewer: Option<Uuid>, now: DateTime<Utc>) -> Self {
        match viewer {
            Some(author_id) => Self::PublicOrAuthor { now, author_id },
            None => Self::Public { now },
        }
    }

    pub fn permits(&self, post: &Post, category: Option<&Category>) -> bool {
        match *self {
            Self::Public { now } => is_publicly_visible(post, category, now),
            Self::PublicOrAuthor { now, author_id } => {
                post.author_id == author_id || is_publicly_visible(post, category, now)
            }
            Self::Unrestricted => true,
        }
    }
}

/// Criteria for a post listing. Results are ordered newest `pub_date` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    pub visibility: PostVisibility,
    pub author_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    /// Calendar year (UTC) of `pub_date`.
    pub year: Option<i32>,
}

impl PostQuery {
    pub fn new(visibility: PostVisibility) -> Self {
        Self {
            visibility,
            author_id: None,
            category_id: None,
            year: None,
        }
    }

    pub fn by_author(mut self, author_id: Uuid) -> Self {
        self.author_id = Some(author_id);
        self
    }

    pub fn in_category(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn in_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Half-open `[start, end)` range covering the requested year.
    pub fn year_bounds(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let year = self.year?;
        let start = Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0).single()?;
        let end = Utc.with_ymd_and_hms(year + 1, 1, 1, 0, 0, 0).single()?;
        Some((start, end))
    }

    pub fn matches(&self, post: &Post, category: Option<&Category>) -> bool {
        self.visibility.permits(post, category)
            && self.author_id.is_none_or(|id| post.author_id == id)
            && self.category_id.is_none_or(|id| post.category_id == Some(id))
            && self.year.is_none_or(|year| post.pub_date.year() == year)
    }
}
