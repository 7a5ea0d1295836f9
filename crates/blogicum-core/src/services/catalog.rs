use uuid::Uuid;

use super::Repositories;
use crate::domain::{Category, CategoryDraft, Location, LocationDraft};
use crate::error::{DomainError, DomainResult, RepoError};

/// Category and location management.
#[derive(Clone)]
pub struct CatalogService {
    repos: Repositories,
}

impl CatalogService {
    pub fn new(repos: Repositories) -> Self {
        Self { repos }
    }

    pub async fn published_categories(&self) -> DomainResult<Vec<Category>> {
        Ok(self.repos.categories.list(true).await?)
    }

    pub async fn categories(&self) -> DomainResult<Vec<Category>> {
        Ok(self.repos.categories.list(false).await?)
    }

    pub async fn create_category(&self, draft: CategoryDraft) -> DomainResult<Category> {
        draft.validate()?;
        self.ensure_slug_free(None, &draft.slug).await?;

        let category = self.repos.categories.create(Category::new(draft)).await?;
        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    pub async fn update_category(&self, id: Uuid, draft: CategoryDraft) -> DomainResult<Category> {
        let mut category = self
            .repos
            .categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("category", id))?;

        draft.validate()?;
        self.ensure_slug_free(Some(id), &draft.slug).await?;

        category.apply(draft);
        Ok(self.repos.categories.update(category).await?)
    }

    /// Delete a category. Its posts survive without a category.
    pub async fn delete_category(&self, id: Uuid) -> DomainResult<()> {
        match self.repos.categories.delete(id).await {
            Ok(()) => {
                tracing::info!(category_id = %id, "Category deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(DomainError::not_found("category", id)),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn locations(&self) -> DomainResult<Vec<Location>> {
        Ok(self.repos.locations.list().await?)
    }

    pub async fn create_location(&self, draft: LocationDraft) -> DomainResult<Location> {
        draft.validate()?;
        let location = self.repos.locations.create(Location::new(draft)).await?;
        tracing::info!(location_id = %location.id, "Location created");
        Ok(location)
    }

    pub async fn update_location(&self, id: Uuid, draft: LocationDraft) -> DomainResult<Location> {
        let mut location = self
            .repos
            .locations
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("location", id))?;

        draft.validate()?;
        location.apply(draft);
        Ok(self.repos.locations.update(location).await?)
    }

    /// Delete a location. Posts that referenced it keep existing.
    pub async fn delete_location(&self, id: Uuid) -> DomainResult<()> {
        match self.repos.locations.delete(id).await {
            Ok(()) => {
                tracing::info!(location_id = %id, "Location deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(DomainError::not_found("location", id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn ensure_slug_free(&self, owner: Option<Uuid>, slug: &str) -> DomainResult<()> {
        match self.repos.categories.find_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != owner => Err(DomainError::Duplicate(format!(
                "Category slug '{slug}' is already in use"
            ))),
            _ => Ok(()),
        }
    }
}
