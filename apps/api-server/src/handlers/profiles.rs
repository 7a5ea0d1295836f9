use actix_web::{HttpResponse, web};

use blogicum_shared::dto::{PageQuery, ProfileResponse, UpdateProfileRequest};

use super::mapping::{page_request, page_response, post_response, profile_changes, user_response};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/profile/{username}?page=N
pub async fn show(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    username: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let profile = state
        .profiles
        .profile(&username, identity.user_id(), page_request(&query)?)
        .await?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        user: user_response(&profile.user),
        posts: page_response(&profile.posts, post_response),
    }))
}

/// PUT /api/profile/{username}
pub async fn update(
    state: web::Data<AppState>,
    identity: Identity,
    username: web::Path<String>,
    body: web::Json<UpdateProfileRequest>,
) -> AppResult<HttpResponse> {
    let user = state
        .profiles
        .update_profile(identity.user_id, &username, profile_changes(body.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(user_response(&user)))
}
