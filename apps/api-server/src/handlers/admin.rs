//! Staff-only catalog and account management.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use blogicum_shared::dto::{CategoryRequest, CategoryResponse, LocationRequest, LocationResponse};

use super::mapping::{category_draft, category_response, location_draft, location_response};
use crate::middleware::auth::Admin;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/admin/categories
pub async fn list_categories(state: web::Data<AppState>, _admin: Admin) -> AppResult<HttpResponse> {
    let categories = state.catalog.categories().await?;
    let body: Vec<CategoryResponse> = categories.iter().map(category_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/admin/categories
pub async fn create_category(
    state: web::Data<AppState>,
    _admin: Admin,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .catalog
        .create_category(category_draft(body.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(category_response(&category)))
}

/// PUT /api/admin/categories/{id}
pub async fn update_category(
    state: web::Data<AppState>,
    _admin: Admin,
    id: web::Path<Uuid>,
    body: web::Json<CategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .catalog
        .update_category(id.into_inner(), category_draft(body.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(category_response(&category)))
}

/// DELETE /api/admin/categories/{id}
pub async fn delete_category(
    state: web::Data<AppState>,
    _admin: Admin,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.catalog.delete_category(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/admin/locations
pub async fn list_locations(state: web::Data<AppState>, _admin: Admin) -> AppResult<HttpResponse> {
    let locations = state.catalog.locations().await?;
    let body: Vec<LocationResponse> = locations.iter().map(location_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// POST /api/admin/locations
pub async fn create_location(
    state: web::Data<AppState>,
    _admin: Admin,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    let location = state
        .catalog
        .create_location(location_draft(body.into_inner()))
        .await?;
    Ok(HttpResponse::Created().json(location_response(&location)))
}

/// PUT /api/admin/locations/{id}
pub async fn update_location(
    state: web::Data<AppState>,
    _admin: Admin,
    id: web::Path<Uuid>,
    body: web::Json<LocationRequest>,
) -> AppResult<HttpResponse> {
    let location = state
        .catalog
        .update_location(id.into_inner(), location_draft(body.into_inner()))
        .await?;
    Ok(HttpResponse::Ok().json(location_response(&location)))
}

/// DELETE /api/admin/locations/{id}
pub async fn delete_location(
    state: web::Data<AppState>,
    _admin: Admin,
    id: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    state.catalog.delete_location(id.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/admin/users/{username}
pub async fn delete_user(
    state: web::Data<AppState>,
    admin: Admin,
    username: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.profiles.delete_user(&username).await?;
    tracing::info!(admin = %admin.0.username, username = %username, "User removed by staff");
    Ok(HttpResponse::NoContent().finish())
}
