//! Conversions between domain values and wire DTOs.

use chrono::{DateTime, SecondsFormat, Utc};
use uuid::Uuid;

use blogicum_core::domain::{
    AuthorRef, Category, CategoryDraft, CommentDetails, Location, LocationDraft, PostDetails,
    PostDraft, ProfileChanges, Registration, User,
};
use blogicum_core::pagination::{Page, PageRequest};
use blogicum_shared::dto::{
    AuthorResponse, CategoryRequest, CategoryResponse, CommentResponse, LocationRequest,
    LocationResponse, PageQuery, PageResponse, PostRequest, PostResponse, RegisterUserRequest,
    UpdateProfileRequest, UserResponse,
};

use crate::middleware::error::{AppError, AppResult};

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub fn page_request(query: &PageQuery) -> AppResult<PageRequest> {
    Ok(PageRequest::new(query.page.unwrap_or(1))?)
}

pub fn page_response<T, U>(page: &Page<T>, item: impl Fn(&T) -> U) -> PageResponse<U> {
    PageResponse {
        items: page.items.iter().map(item).collect(),
        page: page.page,
        per_page: page.per_page,
        total_items: page.total_items,
        total_pages: page.total_pages(),
        has_next: page.has_next(),
        has_previous: page.has_previous(),
    }
}

pub fn user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id.to_string(),
        username: user.username.clone(),
        first_name: user.first_name.clone(),
        last_name: user.last_name.clone(),
        email: user.email.clone(),
        created_at: timestamp(user.created_at),
    }
}

pub fn author_response(author: &AuthorRef) -> AuthorResponse {
    AuthorResponse {
        id: author.id.to_string(),
        username: author.username.clone(),
    }
}

pub fn category_response(category: &Category) -> CategoryResponse {
    CategoryResponse {
        id: category.id.to_string(),
        title: category.title.clone(),
        slug: category.slug.clone(),
        description: category.description.clone(),
        is_published: category.is_published,
    }
}

pub fn location_response(location: &Location) -> LocationResponse {
    LocationResponse {
        id: location.id.to_string(),
        name: location.name.clone(),
        is_published: location.is_published,
    }
}

pub fn post_response(details: &PostDetails) -> PostResponse {
    let post = &details.post;
    PostResponse {
        id: post.id.to_string(),
        title: post.title.clone(),
        text: post.text.clone(),
        pub_date: timestamp(post.pub_date),
        author: author_response(&details.author),
        category: details.category.as_ref().map(category_response),
        location: details
            .location
            .as_ref()
            .filter(|l| l.is_published)
            .map(location_response),
        is_published: post.is_published,
        image: post.image.clone(),
        comment_count: details.comment_count,
        created_at: timestamp(post.created_at),
    }
}

pub fn comment_response(details: &CommentDetails) -> CommentResponse {
    let comment = &details.comment;
    CommentResponse {
        id: comment.id.to_string(),
        post_id: comment.post_id.to_string(),
        author: author_response(&details.author),
        text: comment.text.clone(),
        created_at: timestamp(comment.created_at),
    }
}

fn parse_reference(raw: Option<String>, field: &str) -> AppResult<Option<Uuid>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(|s| {
            Uuid::parse_str(s.trim())
                .map_err(|_| AppError::BadRequest(format!("{field} must be a UUID")))
        })
        .transpose()
}

pub fn post_draft(req: PostRequest) -> AppResult<PostDraft> {
    let pub_date = DateTime::parse_from_rfc3339(&req.pub_date)
        .map_err(|_| AppError::BadRequest("pub_date must be an RFC 3339 timestamp".to_string()))?
        .with_timezone(&Utc);

    Ok(PostDraft {
        title: req.title,
        text: req.text,
        pub_date,
        category_id: parse_reference(req.category_id, "category_id")?,
        location_id: parse_reference(req.location_id, "location_id")?,
        is_published: req.is_published,
        image: req.image.filter(|s| !s.trim().is_empty()),
    })
}

pub fn registration(req: RegisterUserRequest) -> Registration {
    Registration {
        username: req.username,
        email: req.email,
        password: req.password,
        first_name: req.first_name,
        last_name: req.last_name,
    }
}

pub fn profile_changes(req: UpdateProfileRequest) -> ProfileChanges {
    ProfileChanges {
        username: req.username,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
    }
}

pub fn category_draft(req: CategoryRequest) -> CategoryDraft {
    CategoryDraft {
        title: req.title,
        slug: req.slug,
        description: req.description,
        is_published: req.is_published,
    }
}

pub fn location_draft(req: LocationRequest) -> LocationDraft {
    LocationDraft {
        name: req.name,
        is_published: req.is_published,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pub_date: &str, category_id: Option<&str>) -> PostRequest {
        PostRequest {
            title: "Hello".to_string(),
            text: "World".to_string(),
            pub_date: pub_date.to_string(),
            category_id: category_id.map(String::from),
            location_id: Some(String::new()),
            is_published: true,
            image: None,
        }
    }

    #[test]
    fn test_post_draft_normalizes_timezone() {
        let draft = post_draft(request("2024-03-01T12:00:00+03:00", None)).unwrap();

        assert_eq!(timestamp(draft.pub_date), "2024-03-01T09:00:00Z");
        assert_eq!(draft.location_id, None);
    }

    #[test]
    fn test_post_draft_rejects_bad_input() {
        assert!(matches!(
            post_draft(request("yesterday", None)),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            post_draft(request("2024-03-01T12:00:00Z", Some("travel"))),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_page_zero_is_rejected() {
        assert!(page_request(&PageQuery { page: None }).is_ok());
        assert!(matches!(
            page_request(&PageQuery { page: Some(0) }),
            Err(AppError::Validation(_))
        ));
    }
}
