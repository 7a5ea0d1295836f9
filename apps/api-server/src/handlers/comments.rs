//! Comment handlers, nested under `/api/posts/{post_id}/comments`.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_shared::dto::CommentRequest;

use super::mapping::comment_response;
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/posts/{post_id}/comments
pub async fn create(
    state: web::Data<AppState>,
    identity: Identity,
    post_id: web::Path<Uuid>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = state
        .comments
        .create(identity.user_id, post_id.into_inner(), body.into_inner().text)
        .await?;
    Ok(HttpResponse::Created().json(comment_response(&comment)))
}

/// PUT /api/posts/{post_id}/comments/{comment_id}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<CommentRequest>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    let comment = state
        .comments
        .update(identity.user_id, post_id, comment_id, body.into_inner().text)
        .await?;
    Ok(HttpResponse::Ok().json(comment_response(&comment)))
}

/// DELETE /api/posts/{post_id}/comments/{comment_id}
pub async fn delete(
    state: web::Data<AppState>,
    identity: Identity,
    path: web::Path<(Uuid, Uuid)>,
) -> AppResult<HttpResponse> {
    let (post_id, comment_id) = path.into_inner();
    state
        .comments
        .delete(identity.user_id, post_id, comment_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
