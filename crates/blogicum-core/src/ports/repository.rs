use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Category, Comment, CommentDetails, Location, Post, PostDetails, PostQuery, User,
};
use crate::error::RepoError;
use crate::pagination::{Page, PageRequest};

/// Generic repository trait defining standard CRUD operations.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity.
    async fn create(&self, entity: T) -> Result<T, RepoError>;

    /// Overwrite an existing entity. `RepoError::NotFound` if it is gone.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID, applying the schema's cascade rules.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User repository. Deleting a user removes their posts and comments.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Category repository. Deleting a category clears `Post::category_id`.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// All categories ordered by title, optionally only published ones.
    async fn list(&self, published_only: bool) -> Result<Vec<Category>, RepoError>;
}

/// Location repository. Deleting a location clears `Post::location_id`.
#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    async fn list(&self) -> Result<Vec<Location>, RepoError>;
}

/// Post repository. Deleting a post removes its comments.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One page of posts matching `query`, newest `pub_date` first.
    async fn find_page(
        &self,
        query: &PostQuery,
        page: PageRequest,
    ) -> Result<Page<PostDetails>, RepoError>;

    /// A single post with its author, category, location and comment count.
    async fn find_details(&self, id: Uuid) -> Result<Option<PostDetails>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentDetails>, RepoError>;
}
