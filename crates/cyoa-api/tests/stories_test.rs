//! Integration tests for the story reader over `PostgreSQL`.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_stories_is_empty_before_loading(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = common::get_json(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["stories"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_list_stories_returns_every_loaded_story(pool: PgPool) {
    common::load_story(&pool, common::DEMO_STORY).await;
    common::load_story(
        &pool,
        r#"{"name":"Zork","description":"West of House","pages":[{"index":1,"text":"You are standing in an open field.","choices":{}}]}"#,
    )
    .await;
    // Loading the same definition again yields a second, independent story.
    common::load_story(&pool, common::DEMO_STORY).await;

    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(app, "/").await;

    assert_eq!(status, StatusCode::OK);
    let stories = json["stories"].as_array().unwrap();
    assert_eq!(stories.len(), 3);
    assert_eq!(stories[0]["title"], "Demo");
    assert_eq!(stories[1]["title"], "Zork");
    assert_eq!(stories[1]["description"], "West of House");
    assert_eq!(stories[2]["title"], "Demo");
    assert_ne!(stories[0]["story_id"], stories[2]["story_id"]);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_read_demo_story_round_trip(pool: PgPool) {
    let summary = common::load_story(&pool, common::DEMO_STORY).await;
    let story_id = summary.story_id;

    // GET /story/{story_id}/0 — entry page
    let app = common::build_test_app(pool.clone());
    let (status, json) = common::get_json(app, &format!("/story/{story_id}/0")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["story"]["story_id"], story_id);
    assert_eq!(json["page"]["page_id"], summary.page_ids[&0]);
    assert_eq!(json["page"]["text"], "Start");
    assert_eq!(json["result"], "");
    assert_eq!(json["ended"], false);
    let choices = json["choices"].as_array().unwrap();
    assert_eq!(choices.len(), 1);
    assert_eq!(choices[0]["text"], "go north");
    let to_page = choices[0]["to_page"].as_i64().unwrap();
    assert_eq!(to_page, i64::from(summary.page_ids[&1]));

    // Follow the choice.
    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(app, &format!("/story/{story_id}/{to_page}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["page"]["text"], "End, success!");
    assert_eq!(json["result"], "success");
    assert_eq!(json["ended"], true);
    assert!(json["choices"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_persisted_counts_match_definition(pool: PgPool) {
    let summary = common::load_story(
        &pool,
        r#"{
            "name": "Maze",
            "description": "Twisty little passages",
            "pages": [
                { "index": 10, "text": "Hall", "choices": { "left": 30, "right": 20, "stay": 10 } },
                { "index": 20, "text": "Pit", "result": "failure", "choices": { "climb out": 10, "give up": 0 } },
                { "index": 30, "text": "Exit", "result": "success", "choices": {} }
            ]
        }"#,
    )
    .await;

    let (pages,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pages WHERE story_id = $1")
        .bind(summary.story_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let (choices,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM choices WHERE story_id = $1")
        .bind(summary.story_id)
        .fetch_one(&pool)
        .await
        .unwrap();
    let (foreign,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM choices c JOIN pages p ON p.page_id = c.to_page \
         WHERE c.story_id = $1 AND p.story_id <> c.story_id",
    )
    .bind(summary.story_id)
    .fetch_one(&pool)
    .await
    .unwrap();

    assert_eq!(pages, 3);
    assert_eq!(choices, 4);
    assert_eq!(foreign, 0);

    // The pit is a failure page.
    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(
        app,
        &format!("/story/{}/{}", summary.story_id, summary.page_ids[&20]),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["result"], "failure");
    assert_eq!(json["ended"], true);
    assert_eq!(json["choices"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_failed_import_persists_nothing(pool: PgPool) {
    let definition = cyoa_stories::domain::definition::StoryDefinition::from_json(
        r#"{"name":"Broken","description":"","pages":[{"index":1,"text":"Start","choices":{"jump":7}}]}"#,
    )
    .unwrap();
    let repo = cyoa_store::pg_story_repository::PgStoryRepository::new(pool.clone());

    let result = cyoa_stories::application::loader::import_story(&definition, &repo).await;

    assert!(result.is_err());
    let app = common::build_test_app(pool);
    let (_, json) = common::get_json(app, "/").await;
    assert!(json["stories"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_page_of_another_story_returns_404(pool: PgPool) {
    let first = common::load_story(&pool, common::DEMO_STORY).await;
    let second = common::load_story(&pool, common::DEMO_STORY).await;

    let app = common::build_test_app(pool);
    let (status, json) = common::get_json(
        app,
        &format!("/story/{}/{}", second.story_id, first.page_ids[&0]),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "page_not_found");
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_nonexistent_story_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let (status, json) = common::get_json(app, "/story/4242/0").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "story_not_found");
}
