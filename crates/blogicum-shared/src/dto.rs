//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

fn published_by_default() -> bool {
    true
}

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response containing authentication tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
}

/// Response containing a user's public information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub created_at: String,
}

/// Request to edit the caller's own profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Author shown next to posts and comments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: String,
    pub username: String,
}

/// Create or replace a post. `pub_date` is RFC 3339; a future date
/// schedules the post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostRequest {
    pub title: String,
    pub text: String,
    pub pub_date: String,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub location_id: Option<String>,
    #[serde(default = "published_by_default")]
    pub is_published: bool,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub text: String,
    pub pub_date: String,
    pub author: AuthorResponse,
    pub category: Option<CategoryResponse>,
    /// Omitted when the location is unpublished.
    pub location: Option<LocationResponse>,
    pub is_published: bool,
    pub image: Option<String>,
    pub comment_count: u64,
    pub created_at: String,
}

/// A post page: the post, its comments, and scheduling information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    pub post: PostResponse,
    pub comments: Vec<CommentResponse>,
    /// Seconds until a scheduled post goes live.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publishes_in_seconds: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: String,
    pub post_id: String,
    pub author: AuthorResponse,
    pub text: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRequest {
    pub title: String,
    pub slug: String,
    pub description: String,
    #[serde(default = "published_by_default")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub is_published: bool,
}

/// Posts of one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryPostsResponse {
    pub category: CategoryResponse,
    pub posts: PageResponse<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationRequest {
    pub name: String,
    #[serde(default = "published_by_default")]
    pub is_published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationResponse {
    pub id: String,
    pub name: String,
    pub is_published: bool,
}

/// A user's page with their posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub posts: PageResponse<PostResponse>,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_previous: bool,
}

/// `?page=N` query string.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: Option<u64>,
}

/// A static informational page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticPageResponse {
    pub slug: String,
    pub title: String,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_request_defaults() {
        let req: PostRequest = serde_json::from_str(
            r#"{"title":"t","text":"x","pub_date":"2023-05-27T19:38:00Z"}"#,
        )
        .unwrap();

        assert!(req.is_published);
        assert!(req.category_id.is_none());
        assert!(req.image.is_none());
    }

    #[test]
    fn test_publishes_in_omitted_when_live() {
        let body = PostDetailResponse {
            post: PostResponse {
                id: "1".into(),
                title: "t".into(),
                text: "x".into(),
                pub_date: "2023-05-27T19:38:00+00:00".into(),
                author: AuthorResponse {
                    id: "2".into(),
                    username: "anna".into(),
                },
                category: None,
                location: None,
                is_published: true,
                image: None,
                comment_count: 0,
                created_at: "2023-05-27T19:38:00+00:00".into(),
            },
            comments: vec![],
            publishes_in_seconds: None,
        };

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("publishes_in_seconds").is_none());
    }
}
