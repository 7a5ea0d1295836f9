//! Post listings and post authoring.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_shared::dto::{PageQuery, PostDetailResponse, PostRequest};

use super::mapping::{comment_response, page_request, page_response, post_draft, post_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/posts?page=N
pub async fn index(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state.posts.index(page_request(&query)?).await?;
    Ok(HttpResponse::Ok().json(page_response(&page, post_response)))
}

/// GET /api/posts/archive/{year}?page=N
pub async fn archive(
    state: web::Data<AppState>,
    year: web::Path<i32>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let page = state
        .posts
        .archive(year.into_inner(), page_request(&query)?)
        .await?;
    Ok(HttpResponse::Ok().json(page_response(&page, post_response)))
}

/// GET /api/posts/{post_id}
///
/// Hidden posts are reported as missing unless the caller wrote them.
pub async fn detail(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let view = state
        .posts
        .detail(post_id.into_inner(), identity.user_id())
        .await?;

    Ok(HttpResponse::Ok().json(PostDetailResponse {
        post: post_response(&view.details),
        comments: view.comments.iter().map(comment_response).collect(),
        publishes_in_seconds: view.publishes_in.map(|d| d.num_seconds()),
    }))
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let draft = post_draft(body.into_inner())?;
    let details = state.posts.create(identity.user_id, draft).await?;
    Ok(HttpResponse::Created().json(post_response(&details)))
}

/// PUT /api/posts/{post_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<Uuid>,
    body: web::Json<PostRequest>,
) -> AppResult<HttpResponse> {
    let draft = post_draft(body.into_inner())?;
    let details = state
        .posts
        .update(identity.user_id, post_id.into_inner(), draft)
        .await?;
    Ok(HttpResponse::Ok().json(post_response(&details)))
}

/// DELETE /api/posts/{post_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state
        .posts
        .delete(identity.user_id, post_id.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
