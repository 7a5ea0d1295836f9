use actix_web::{HttpResponse, web};

use blogicum_shared::dto::{CategoryPostsResponse, CategoryResponse, PageQuery};

use super::mapping::{category_response, page_request, page_response, post_response};
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.catalog.published_categories().await?;
    let body: Vec<CategoryResponse> = categories.iter().map(category_response).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /api/category/{slug}?page=N
pub async fn posts(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    query: web::Query<PageQuery>,
) -> AppResult<HttpResponse> {
    let (category, posts) = state
        .posts
        .category_posts(&slug, page_request(&query)?)
        .await?;

    Ok(HttpResponse::Ok().json(CategoryPostsResponse {
        category: category_response(&category),
        posts: page_response(&posts, post_response),
    }))
}
