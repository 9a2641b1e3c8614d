//! HTTP-level integration tests for lift maxes, plus the per-request max cache.

mod common;

use axum::http::StatusCode;
use chrono::NaiveDate;
use common::{
    body_json, create_admin, create_lift, create_user, decimal, get_auth, post_json_auth,
    put_json_auth,
};
use liftcycle_api::engine::max_cache::MaxCache;
use liftcycle_core::lift_max::MaxType;
use liftcycle_core::types::DbId;
use liftcycle_db::repositories::LiftMaxRepo;
use rust_decimal_macros::dec;
use serde_json::json;
use sqlx::PgPool;

async fn record(
    pool: &PgPool,
    token: &str,
    lift_id: DbId,
    value: serde_json::Value,
    effective_date: &str,
) -> (StatusCode, serde_json::Value) {
    let app = common::build_test_app(pool.clone());
    let body = json!({
        "lift_id": lift_id,
        "max_type": "TRAINING_MAX",
        "value": value,
        "effective_date": effective_date,
    });
    let response = post_json_auth(app, "/api/v1/maxes", body, token).await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn current(pool: &PgPool, token: &str, lift_id: DbId, as_of: &str) -> serde_json::Value {
    let app = common::build_test_app(pool.clone());
    let uri = format!("/api/v1/maxes/current?lift_id={lift_id}&max_type=TRAINING_MAX&as_of={as_of}");
    let response = get_auth(app, &uri, token).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn create_and_list_maxes(pool: PgPool) {
    let (user_id, token) = create_user(&pool, "lifter@test.com").await;
    let squat = create_lift(&pool, "squat").await;
    let bench = create_lift(&pool, "bench-press").await;

    let (status, json) = record(&pool, &token, squat, json!("302.5"), "2026-01-01").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["user_id"], user_id.to_string());
    assert_eq!(json["data"]["max_type"], "TRAINING_MAX");
    assert_eq!(decimal(&json["data"]["value"]), dec!(302.5));

    record(&pool, &token, bench, json!(200), "2026-01-01").await;

    let app = common::build_test_app(pool.clone());
    let json = body_json(get_auth(app, "/api/v1/maxes", &token).await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/maxes?lift_id={bench}");
    let json = body_json(get_auth(app, &uri, &token).await).await;
    let items = json["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["lift_id"], bench.to_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn non_positive_values_are_rejected(pool: PgPool) {
    let (_, token) = create_user(&pool, "lifter@test.com").await;
    let squat = create_lift(&pool, "squat").await;

    for value in [json!(0), json!(-10)] {
        let (status, json) = record(&pool, &token, squat, value, "2026-01-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "VALIDATION_ERROR");
    }

    let (status, _) =
        record(&pool, &token, uuid::Uuid::new_v4(), json!(100), "2026-01-01").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn current_max_respects_effective_dates(pool: PgPool) {
    let (_, token) = create_user(&pool, "lifter@test.com").await;
    let squat = create_lift(&pool, "squat").await;

    record(&pool, &token, squat, json!(300), "2026-01-01").await;
    record(&pool, &token, squat, json!(310), "2026-03-01").await;
    // Same date: the later entry wins.
    record(&pool, &token, squat, json!(315), "2026-03-01").await;

    let json = current(&pool, &token, squat, "2025-12-31").await;
    assert!(json["data"].is_null());

    let json = current(&pool, &token, squat, "2026-02-15").await;
    assert_eq!(decimal(&json["data"]["value"]), dec!(300));

    let json = current(&pool, &token, squat, "2026-03-01").await;
    assert_eq!(decimal(&json["data"]["value"]), dec!(315));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn maxes_are_private_to_their_owner(pool: PgPool) {
    let (_, token) = create_user(&pool, "lifter@test.com").await;
    let (_, other_token) = create_user(&pool, "other@test.com").await;
    let squat = create_lift(&pool, "squat").await;

    record(&pool, &token, squat, json!(300), "2026-01-01").await;

    let json = current(&pool, &other_token, squat, "2026-02-01").await;
    assert!(json["data"].is_null());

    let app = common::build_test_app(pool);
    let json = body_json(get_auth(app, "/api/v1/maxes", &other_token).await).await;
    assert!(json["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_is_limited_to_owner_or_admin(pool: PgPool) {
    let (_, token) = create_user(&pool, "lifter@test.com").await;
    let (_, other_token) = create_user(&pool, "other@test.com").await;
    let (_, admin_token) = create_admin(&pool, "coach@test.com").await;
    let squat = create_lift(&pool, "squat").await;

    let (_, json) = record(&pool, &token, squat, json!(300), "2026-01-01").await;
    let max_id = json["data"]["id"].as_str().unwrap().to_string();
    let uri = format!("/api/v1/maxes/{max_id}");

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "value": 400 }), &other_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({}), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "value": 0 }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(app, &uri, json!({ "value": 295 }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(decimal(&body_json(response).await["data"]["value"]), dec!(295));

    let app = common::build_test_app(pool.clone());
    let body = json!({ "effective_date": "2026-01-15" });
    let response = put_json_auth(app, &uri, body, &admin_token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["effective_date"], "2026-01-15");
    assert_eq!(decimal(&json["data"]["value"]), dec!(295));

    let app = common::build_test_app(pool);
    let uri = format!("/api/v1/maxes/{}", uuid::Uuid::new_v4());
    let response = put_json_auth(app, &uri, json!({ "value": 100 }), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// MaxCache
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn max_cache_queries_each_series_once(pool: PgPool) {
    let (user_id, _) = create_user(&pool, "lifter@test.com").await;
    let squat = create_lift(&pool, "squat").await;
    let bench = create_lift(&pool, "bench-press").await;
    LiftMaxRepo::create(
        &pool,
        user_id,
        squat,
        MaxType::TrainingMax,
        dec!(300),
        date("2026-01-01"),
    )
    .await
    .unwrap();

    let mut cache = MaxCache::new(date("2026-02-01"));

    for _ in 0..3 {
        let value = cache
            .get(&pool, user_id, squat, MaxType::TrainingMax)
            .await
            .unwrap();
        assert_eq!(value, Some(dec!(300)));
    }
    assert_eq!(cache.queries(), 1);

    // Misses are cached as well.
    for _ in 0..2 {
        assert!(cache.require(&pool, user_id, bench, MaxType::TrainingMax).await.is_err());
    }
    assert_eq!(cache.queries(), 2);

    // A different max type is a separate series.
    let one_rm = cache.get(&pool, user_id, squat, MaxType::OneRm).await.unwrap();
    assert_eq!(one_rm, None);
    assert_eq!(cache.queries(), 3);
}
