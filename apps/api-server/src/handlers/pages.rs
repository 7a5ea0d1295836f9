//! Static informational pages.

use actix_web::HttpResponse;

use blogicum_shared::dto::StaticPageResponse;

const ABOUT: &str = "Blogicum is a place to share what happens in your life: \
    trips, books, everyday discoveries. Anyone can read; registered users \
    can write posts, schedule them for later and comment on each other's stories.";

const RULES: &str = "Be respectful to other readers and authors. Publish only \
    content you have the right to share. Posts and comments that break these \
    rules may be unpublished by the site staff.";

fn page(slug: &str, title: &str, body: &str) -> HttpResponse {
    HttpResponse::Ok().json(StaticPageResponse {
        slug: slug.to_string(),
        title: title.to_string(),
        body: body.to_string(),
    })
}

/// GET /api/pages/about
pub async fn about() -> HttpResponse {
    page("about", "About the project", ABOUT)
}

/// GET /api/pages/rules
pub async fn rules() -> HttpResponse {
    page("rules", "Our rules", RULES)
}
