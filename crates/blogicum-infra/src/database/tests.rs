use chrono::{TimeDelta, Utc};
use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, QueryTrait};
use uuid::Uuid;

use blogicum_core::domain::{Category, Post, PostQuery, PostVisibility};
use blogicum_core::error::RepoError;
use blogicum_core::ports::BaseRepository;

use crate::database::entity::{category, post};
use crate::database::postgres_repo::{
    PostgresCategoryRepository, PostgresPostRepository, comments_for_post, post_listing,
};

fn sql(statement: impl QueryTrait) -> String {
    statement.build(DatabaseBackend::Postgres).to_string()
}

#[tokio::test]
async fn test_find_post_by_id() {
    let post_id = Uuid::new_v4();
    let author_id = Uuid::new_v4();
    let now = Utc::now();

    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![post::Model {
            id: post_id,
            title: "Test Post".to_owned(),
            text: "Content".to_owned(),
            pub_date: (now + TimeDelta::days(1)).into(),
            author_id,
            category_id: None,
            location_id: None,
            is_published: true,
            image: None,
            created_at: now.into(),
        }]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);

    let result = BaseRepository::<Post, Uuid>::find_by_id(&repo, post_id)
        .await
        .unwrap();

    let post = result.unwrap();
    assert_eq!(post.title, "Test Post");
    assert_eq!(post.id, post_id);
    assert_eq!(post.author_id, author_id);
    assert!(post.time_until_publication(now).is_some());
}

#[tokio::test]
async fn test_delete_missing_category_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results(vec![MockExecResult {
            last_insert_id: 0,
            rows_affected: 0,
        }])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let result = BaseRepository::<Category, Uuid>::delete(&repo, Uuid::new_v4()).await;
    assert!(matches!(result, Err(RepoError::NotFound)));
}

#[tokio::test]
async fn test_find_category_by_slug() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![category::Model {
            id: Uuid::new_v4(),
            title: "Travel".to_owned(),
            slug: "travel".to_owned(),
            description: "Trips".to_owned(),
            is_published: false,
            created_at: Utc::now().into(),
        }]])
        .into_connection();

    let repo = PostgresCategoryRepository::new(db);

    let category = blogicum_core::ports::CategoryRepository::find_by_slug(&repo, "travel")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(category.slug, "travel");
    assert!(!category.is_published);
}

#[test]
fn test_public_listing_applies_visibility_rule() {
    let query = PostQuery::new(PostVisibility::Public { now: Utc::now() });
    let statement = sql(post_listing(&query));

    assert!(statement.contains(r#"LEFT JOIN "categories""#));
    assert!(statement.contains(r#""posts"."is_published""#));
    assert!(statement.contains(r#""posts"."pub_date" <="#));
    assert!(statement.contains(r#""posts"."category_id" IS NULL"#));
    assert!(statement.contains(r#""categories"."is_published""#));
    assert!(statement.contains(r#"ORDER BY "posts"."pub_date" DESC"#));
}

#[test]
fn test_author_listing_includes_own_posts() {
    let author_id = Uuid::new_v4();
    let query = PostQuery::new(PostVisibility::PublicOrAuthor {
        now: Utc::now(),
        author_id,
    });
    let statement = sql(post_listing(&query));

    assert!(statement.contains(&author_id.to_string()));
    assert!(statement.contains(" OR "));
}

#[test]
fn test_unrestricted_author_listing_has_no_visibility_filter() {
    let author_id = Uuid::new_v4();
    let query = PostQuery::new(PostVisibility::Unrestricted).by_author(author_id);
    let statement = sql(post_listing(&query));

    assert!(!statement.contains(r#""posts"."is_published""#));
    assert!(statement.contains(r#""posts"."author_id""#));
}

#[test]
fn test_comments_ordered_oldest_first() {
    let statement = sql(comments_for_post(Uuid::new_v4()));

    assert!(statement.contains(r#"ORDER BY "comments"."created_at" ASC"#));
}
