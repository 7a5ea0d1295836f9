use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use super::Repositories;
use crate::domain::{
    PostDetails, PostQuery, PostVisibility, ProfileChanges, Registration, User, ensure_author,
};
use crate::error::{DomainError, DomainResult};
use crate::pagination::{Page, PageRequest};
use crate::ports::PasswordService;

/// A user's public page.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    pub posts: Page<PostDetails>,
}

/// Accounts: sign-up, sign-in and profile pages.
#[derive(Clone)]
pub struct ProfileService {
    repos: Repositories,
    passwords: Arc<dyn PasswordService>,
}

impl ProfileService {
    pub fn new(repos: Repositories, passwords: Arc<dyn PasswordService>) -> Self {
        Self { repos, passwords }
    }

    pub async fn register(&self, registration: Registration) -> DomainResult<User> {
        registration.validate()?;
        self.ensure_unique(None, &registration.username, &registration.email)
            .await?;

        let password_hash = self
            .passwords
            .hash(&registration.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = self
            .repos
            .users
            .create(User::new(registration, password_hash))
            .await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    /// Check a username/password pair. Unknown users and wrong passwords
    /// are indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> DomainResult<User> {
        let user = self
            .repos
            .users
            .find_by_username(username)
            .await?
            .ok_or(DomainError::InvalidCredentials)?;

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        if !valid {
            tracing::debug!(username = %username, "Rejected login attempt");
            return Err(DomainError::InvalidCredentials);
        }

        Ok(user)
    }

    pub async fn find(&self, user_id: Uuid) -> DomainResult<User> {
        self.repos
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", user_id))
    }

    /// A user's posts. The owner also sees drafts and scheduled posts.
    pub async fn profile(
        &self,
        username: &str,
        viewer: Option<Uuid>,
        page: PageRequest,
    ) -> DomainResult<Profile> {
        let user = self.find_by_username(username).await?;

        let query = PostQuery::new(PostVisibility::for_viewer(viewer, Utc::now())).by_author(user.id);
        let posts = self
            .repos
            .posts
            .find_page(&query, page)
            .await?
            .ensure_in_range()?;

        Ok(Profile { user, posts })
    }

    pub async fn update_profile(
        &self,
        actor: Uuid,
        username: &str,
        changes: ProfileChanges,
    ) -> DomainResult<User> {
        let mut user = self.find_by_username(username).await?;
        ensure_author(actor, user.id, "profile")?;

        changes.validate()?;
        self.ensure_unique(Some(user.id), &changes.username, &changes.email)
            .await?;

        user.apply(changes);
        let user = self.repos.users.update(user).await?;
        tracing::info!(user_id = %user.id, "Profile updated");

        Ok(user)
    }

    /// Remove an account together with its posts and comments.
    pub async fn delete_user(&self, username: &str) -> DomainResult<()> {
        let user = self.find_by_username(username).await?;
        self.repos.users.delete(user.id).await?;
        tracing::warn!(user_id = %user.id, username = %username, "User deleted");
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> DomainResult<User> {
        self.repos
            .users
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("user", username))
    }

    /// Username and email must not belong to anybody but `owner`.
    async fn ensure_unique(&self, owner: Option<Uuid>, username: &str, email: &str) -> DomainResult<()> {
        let taken_by_other = |user: Option<User>| user.is_some_and(|u| Some(u.id) != owner);

        if taken_by_other(self.repos.users.find_by_username(username).await?) {
            return Err(DomainError::Duplicate("Username already taken".to_string()));
        }
        if taken_by_other(self.repos.users.find_by_email(email).await?) {
            return Err(DomainError::Duplicate("Email already registered".to_string()));
        }
        Ok(())
    }
}
