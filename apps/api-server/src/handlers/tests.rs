use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use chrono::{TimeDelta, Utc};
use serde_json::{Value, json};

use blogicum_core::ports::{AuthError, PasswordService};
use blogicum_core::services::Repositories;
use blogicum_infra::InMemoryStore;
use blogicum_shared::dto::{AuthResponse, CategoryResponse, PostDetailResponse, PostResponse};

use super::{configure_app, not_found};
use crate::config::AppConfig;
use crate::observability::RequestIdMiddleware;
use crate::state::AppState;

/// Stores passwords verbatim so tests skip the cost of Argon2.
struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("plain:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("plain:{password}"))
    }
}

fn fixture_with(config: AppConfig) -> (AppState, Repositories) {
    let repos = Arc::new(InMemoryStore::new()).repositories();
    let state = AppState::with_repositories(repos.clone(), Arc::new(PlainPasswords), &config);
    (state, repos)
}

fn fixture() -> (AppState, Repositories) {
    fixture_with(AppConfig::for_tests())
}

macro_rules! test_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .configure(|cfg| configure_app(cfg, &$state))
                .default_service(web::to(not_found)),
        )
        .await
    };
}

/// Register `$username` and return its bearer token.
macro_rules! register {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({
                "username": $username,
                "email": format!("{}@example.com", $username),
                "password": "correct horse",
            }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: AuthResponse = test::read_body_json(resp).await;
        body.access_token
    }};
}

macro_rules! login {
    ($app:expr, $username:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": $username, "password": "correct horse" }))
            .to_request();
        let body: AuthResponse = test::call_and_read_body_json(&$app, req).await;
        body.access_token
    }};
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

fn post_body(title: &str, offset: TimeDelta) -> Value {
    json!({
        "title": title,
        "text": format!("{title} body"),
        "pub_date": (Utc::now() + offset).to_rfc3339(),
    })
}

/// Promote an existing account to staff; the next login carries the admin role.
async fn make_staff(repos: &Repositories, username: &str) {
    let mut user = repos
        .users
        .find_by_username(username)
        .await
        .unwrap()
        .unwrap();
    user.is_staff = true;
    repos.users.update(user).await.unwrap();
}

#[actix_web::test]
async fn test_health_check() {
    let (state, _) = fixture();
    let app = test_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[actix_web::test]
async fn test_register_login_and_me() {
    let (state, _) = fixture();
    let app = test_app!(state);

    let token = register!(app, "anna");
    let me: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer(&token))
            .to_request(),
    )
    .await;
    assert_eq!(me["username"], "anna");
    assert_eq!(me["email"], "anna@example.com");

    let token = login!(app, "anna");
    assert!(!token.is_empty());

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "anna", "password": "wrong password" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_me_requires_valid_token() {
    let (state, _) = fixture();
    let app = test_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/auth/me").to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(bearer("not-a-jwt"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_registration_errors() {
    let (state, _) = fixture();
    let app = test_app!(state);
    register!(app, "anna");

    let duplicate = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "anna",
            "email": "someone@example.com",
            "password": "correct horse",
        }))
        .to_request();
    assert_eq!(test::call_service(&app, duplicate).await.status(), StatusCode::CONFLICT);

    let weak = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "username": "boris",
            "email": "boris@example.com",
            "password": "short",
        }))
        .to_request();
    let resp = test::call_service(&app, weak).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 422);
    assert!(body["errors"].as_array().is_some_and(|e| !e.is_empty()));

    let malformed = test::TestRequest::post()
        .uri("/api/auth/register")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, malformed).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["title"], "Bad Request");
}

#[actix_web::test]
async fn test_scheduled_post_visible_only_to_author() {
    let (state, _) = fixture();
    let app = test_app!(state);
    let anna = register!(app, "anna");
    let boris = register!(app, "boris");

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .set_json(post_body("anonymous", TimeDelta::zero()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&anna))
            .set_json(post_body("tomorrow", TimeDelta::days(1)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let post: PostResponse = test::read_body_json(resp).await;
    let uri = format!("/api/posts/{}", post.id);

    let index: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/posts").to_request())
            .await;
    assert_eq!(index["total_items"], 0);
    assert_eq!(index["page"], 1);

    let own: PostDetailResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&anna))
            .to_request(),
    )
    .await;
    assert_eq!(own.post.title, "tomorrow");
    assert!(own.publishes_in_seconds.is_some_and(|s| s > 0));

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&uri)
            .insert_header(bearer(&boris))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let profile: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri("/api/profile/anna")
            .insert_header(bearer(&anna))
            .to_request(),
    )
    .await;
    assert_eq!(profile["posts"]["total_items"], 1);

    let public_profile: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/profile/anna").to_request(),
    )
    .await;
    assert_eq!(public_profile["posts"]["total_items"], 0);
}

#[actix_web::test]
async fn test_only_author_edits_and_deletes_post() {
    let (state, _) = fixture();
    let app = test_app!(state);
    let anna = register!(app, "anna");
    let boris = register!(app, "boris");

    let post: PostResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&anna))
            .set_json(post_body("mine", -TimeDelta::hours(1)))
            .to_request(),
    )
    .await;
    let uri = format!("/api/posts/{}", post.id);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&boris))
            .set_json(post_body("theirs", -TimeDelta::hours(1)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["request_id"].is_string());

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&boris))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let updated: PostResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&anna))
            .set_json(post_body("still mine", -TimeDelta::hours(1)))
            .to_request(),
    )
    .await;
    assert_eq!(updated.title, "still mine");
    assert_eq!(updated.author.username, "anna");

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&anna))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_hidden_post_mutations_answer_not_found() {
    let (state, _) = fixture();
    let app = test_app!(state);
    let anna = register!(app, "anna");
    let boris = register!(app, "boris");

    let scheduled: PostResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&anna))
            .set_json(post_body("tomorrow", TimeDelta::days(1)))
            .to_request(),
    )
    .await;
    let uri = format!("/api/posts/{}", scheduled.id);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&uri)
            .insert_header(bearer(&boris))
            .insert_header(("x-request-id", "edit-hidden"))
            .set_json(post_body("theirs", -TimeDelta::hours(1)))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["request_id"], "edit-hidden");

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&boris))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&uri)
            .insert_header(bearer(&anna))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}

#[actix_web::test]
async fn test_comment_permissions_and_order() {
    let (state, _) = fixture();
    let app = test_app!(state);
    let anna = register!(app, "anna");
    let boris = register!(app, "boris");

    let post: PostResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&anna))
            .set_json(post_body("open", -TimeDelta::hours(1)))
            .to_request(),
    )
    .await;
    let comments_uri = format!("/api/posts/{}/comments", post.id);

    let mut comment_ids = Vec::new();
    for (token, text) in [(&boris, "first"), (&anna, "second")] {
        let created: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri(&comments_uri)
                .insert_header(bearer(token))
                .set_json(json!({ "text": text }))
                .to_request(),
        )
        .await;
        comment_ids.push(created["id"].as_str().unwrap().to_string());
    }
    let boris_comment = format!("{comments_uri}/{}", comment_ids[0]);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&boris_comment)
            .insert_header(bearer(&anna))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&boris_comment)
            .insert_header(bearer(&anna))
            .set_json(json!({ "text": "edited by someone else" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&boris_comment)
            .insert_header(bearer(&boris))
            .set_json(json!({ "text": "first, edited" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let detail: PostDetailResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .to_request(),
    )
    .await;
    let texts: Vec<&str> = detail.comments.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["first, edited", "second"]);
    assert_eq!(detail.post.comment_count, 2);
    assert!(detail.publishes_in_seconds.is_none());
}

#[actix_web::test]
async fn test_admin_catalog_and_category_deletion() {
    let (state, repos) = fixture();
    let app = test_app!(state);
    let anna = register!(app, "anna");
    register!(app, "root");
    make_staff(&repos, "root").await;
    let root = login!(app, "root");

    let category = json!({
        "title": "Travel",
        "slug": "travel",
        "description": "Trips",
    });

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/categories")
            .insert_header(bearer(&anna))
            .set_json(&category)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/categories")
            .insert_header(bearer(&root))
            .set_json(&category)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let travel: CategoryResponse = test::read_body_json(resp).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/admin/categories")
            .insert_header(bearer(&root))
            .set_json(&category)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let mut body = post_body("trip", -TimeDelta::hours(1));
    body["category_id"] = json!(travel.id);
    let post: PostResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&anna))
            .set_json(&body)
            .to_request(),
    )
    .await;
    assert_eq!(post.category.as_ref().map(|c| c.slug.as_str()), Some("travel"));

    let listing: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/category/travel").to_request(),
    )
    .await;
    assert_eq!(listing["posts"]["total_items"], 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/admin/categories/{}", travel.id))
            .insert_header(bearer(&root))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let detail: PostDetailResponse = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{}", post.id))
            .to_request(),
    )
    .await;
    assert!(detail.post.category.is_none());

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/category/travel").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_admin_deletes_user_with_posts() {
    let (state, repos) = fixture();
    let app = test_app!(state);
    let anna = register!(app, "anna");
    register!(app, "root");
    make_staff(&repos, "root").await;
    let root = login!(app, "root");

    test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&anna))
            .set_json(post_body("bye", -TimeDelta::hours(1)))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/api/admin/users/anna")
            .insert_header(bearer(&root))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let index: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/posts").to_request())
            .await;
    assert_eq!(index["total_items"], 0);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/profile/anna").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_profile_edit_is_owner_only() {
    let (state, _) = fixture();
    let app = test_app!(state);
    let anna = register!(app, "anna");
    let boris = register!(app, "boris");

    let changes = json!({
        "username": "anna_k",
        "email": "anna@example.com",
        "first_name": "Anna",
    });

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/profile/anna")
            .insert_header(bearer(&boris))
            .set_json(&changes)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let updated: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri("/api/profile/anna")
            .insert_header(bearer(&anna))
            .set_json(&changes)
            .to_request(),
    )
    .await;
    assert_eq!(updated["username"], "anna_k");
    assert_eq!(updated["first_name"], "Anna");
}

#[actix_web::test]
async fn test_pagination_boundaries() {
    let (state, _) = fixture();
    let app = test_app!(state);
    let anna = register!(app, "anna");

    for i in 0..11 {
        test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header(bearer(&anna))
                .set_json(post_body(&format!("post {i}"), -TimeDelta::hours(i + 1)))
                .to_request(),
        )
        .await;
    }

    let first: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/posts").to_request(),
    )
    .await;
    assert_eq!(first["items"].as_array().map(Vec::len), Some(10));
    assert_eq!(first["items"][0]["title"], "post 0");
    assert_eq!(first["total_pages"], 2);
    assert_eq!(first["has_next"], true);

    let second: Value = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/posts?page=2").to_request(),
    )
    .await;
    assert_eq!(second["items"].as_array().map(Vec::len), Some(1));
    assert_eq!(second["has_previous"], true);

    for (uri, status) in [
        ("/api/posts?page=3", StatusCode::NOT_FOUND),
        ("/api/posts?page=0", StatusCode::UNPROCESSABLE_ENTITY),
        ("/api/posts?page=abc", StatusCode::BAD_REQUEST),
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), status, "{uri}");
    }

    for uri in [
        "/api/posts?page=18446744073709551615",
        "/api/posts/archive/2024?page=18446744073709551615",
        "/api/profile/anna?page=1844674407370955162",
    ] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let body: Value = test::read_body_json(resp).await;
        assert!(body["request_id"].is_string(), "{uri}");
    }
}

#[actix_web::test]
async fn test_unknown_routes_and_ids() {
    let (state, _) = fixture();
    let app = test_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/nope").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], 404);
    assert!(body["request_id"].is_string());

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/posts/not-a-uuid").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/posts/{}", uuid::Uuid::new_v4()))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_static_pages() {
    let (state, _) = fixture();
    let app = test_app!(state);

    for slug in ["about", "rules"] {
        let page: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/pages/{slug}"))
                .to_request(),
        )
        .await;
        assert_eq!(page["slug"], slug);
        assert!(page["body"].as_str().is_some_and(|b| !b.is_empty()));
    }
}

#[cfg(feature = "rate-limit")]
#[actix_web::test]
async fn test_auth_endpoints_are_rate_limited() {
    let mut config = AppConfig::for_tests();
    config.rate_limit.max_requests = 2;
    let (state, _) = fixture_with(config);
    let app = test_app!(state);

    let attempt = || {
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "username": "ghost", "password": "correct horse" }))
            .to_request()
    };

    for _ in 0..2 {
        let resp = test::call_service(&app, attempt()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    let resp = test::call_service(&app, attempt()).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().contains_key(header::RETRY_AFTER));

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
