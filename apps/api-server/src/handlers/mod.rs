//! HTTP handlers and route configuration.

mod admin;
mod auth;
mod categories;
mod comments;
mod health;
mod mapping;
mod pages;
mod posts;
mod profiles;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, HttpResponse, error, web};
use blogicum_shared::ErrorResponse;

use crate::middleware::error::bad_request_response;
use crate::observability::RequestId;
use crate::state::AppState;

#[cfg(feature = "rate-limit")]
use crate::middleware::rate_limit::RateLimitMiddleware;

/// Register shared state, extractor error handlers and every route.
pub fn configure_app(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.app_data(web::Data::new(state.clone()))
        .app_data(web::Data::new(state.tokens.clone()))
        .app_data(web::JsonConfig::default().error_handler(|err, req| {
            let detail = err.to_string();
            error::InternalError::from_response(err, bad_request_response(req, detail)).into()
        }))
        .app_data(web::QueryConfig::default().error_handler(|err, req| {
            let detail = err.to_string();
            error::InternalError::from_response(err, bad_request_response(req, detail)).into()
        }))
        .app_data(web::PathConfig::default().error_handler(|err, _req| {
            let response = HttpResponse::NotFound().json(ErrorResponse::not_found(err.to_string()));
            error::InternalError::from_response(err, response).into()
        }))
        .configure(|cfg| configure_routes(cfg, state));
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    let auth_scope = web::scope("/auth")
        .route("/register", web::post().to(auth::register))
        .route("/login", web::post().to(auth::login))
        .route("/me", web::get().to(auth::me));

    #[cfg(feature = "rate-limit")]
    let auth_scope = auth_scope.wrap(RateLimitMiddleware::new(state.rate_limiter.clone()));
    #[cfg(not(feature = "rate-limit"))]
    let _ = state;

    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(auth_scope)
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::index))
                    .route("", web::post().to(posts::create))
                    .route("/archive/{year}", web::get().to(posts::archive))
                    .route("/{post_id}", web::get().to(posts::detail))
                    .route("/{post_id}", web::put().to(posts::update))
                    .route("/{post_id}", web::delete().to(posts::delete))
                    .route("/{post_id}/comments", web::post().to(comments::create))
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::put().to(comments::update),
                    )
                    .route(
                        "/{post_id}/comments/{comment_id}",
                        web::delete().to(comments::delete),
                    ),
            )
            .route("/categories", web::get().to(categories::list))
            .route("/category/{slug}", web::get().to(categories::posts))
            .route("/profile/{username}", web::get().to(profiles::show))
            .route("/profile/{username}", web::put().to(profiles::update))
            .service(
                web::scope("/pages")
                    .route("/about", web::get().to(pages::about))
                    .route("/rules", web::get().to(pages::rules)),
            )
            .service(
                web::scope("/admin")
                    .route("/categories", web::get().to(admin::list_categories))
                    .route("/categories", web::post().to(admin::create_category))
                    .route("/categories/{id}", web::put().to(admin::update_category))
                    .route("/categories/{id}", web::delete().to(admin::delete_category))
                    .route("/locations", web::get().to(admin::list_locations))
                    .route("/locations", web::post().to(admin::create_location))
                    .route("/locations/{id}", web::put().to(admin::update_location))
                    .route("/locations/{id}", web::delete().to(admin::delete_location))
                    .route("/users/{username}", web::delete().to(admin::delete_user)),
            ),
    );
}

/// Fallback for unknown routes.
pub async fn not_found(req: HttpRequest, request_id: RequestId) -> HttpResponse {
    HttpResponse::NotFound().json(
        ErrorResponse::not_found(format!("No route for {} {}", req.method(), req.path()))
            .with_request_id(request_id.as_str()),
    )
}
