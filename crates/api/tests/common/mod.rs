#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use sqlx::PgPool;
use tower::ServiceExt;

use liftcycle_api::auth::jwt::{generate_access_token, JwtConfig, DEFAULT_ISSUER};
use liftcycle_api::config::{EngineConfig, ServerConfig};
use liftcycle_api::router::build_app_router;
use liftcycle_api::state::AppState;
use liftcycle_core::roles::Role;
use liftcycle_core::types::DbId;
use liftcycle_db::models::lift::CreateLift;
use liftcycle_db::models::program::{
    CreateCycle, CreateCycleWeek, CreateDay, CreateProgram, CreateWeekDay,
};
use liftcycle_db::models::user::CreateUser;
use liftcycle_db::repositories::{LiftRepo, ProgramRepo, UserRepo};

// ---------------------------------------------------------------------------
// App
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-not-for-production".to_string(),
            issuer: DEFAULT_ISSUER.to_string(),
            access_token_expiry_mins: 15,
        },
        engine: EngineConfig::default(),
    }
}

/// Build the full application router through the same builder `main.rs` uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Users & tokens
// ---------------------------------------------------------------------------

async fn create_user_with_role(pool: &PgPool, email: &str, role: Role) -> (DbId, String) {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email: email.to_string(),
            display_name: email.to_string(),
            role: Some(role.as_str().to_string()),
        },
    )
    .await
    .expect("user creation should succeed");
    let token = generate_access_token(user.id, role, &test_config().jwt)
        .expect("token generation should succeed");
    (user.id, token)
}

/// Create a regular user and return `(user_id, bearer token)`.
pub async fn create_user(pool: &PgPool, email: &str) -> (DbId, String) {
    create_user_with_role(pool, email, Role::User).await
}

/// Create an admin user and return `(user_id, bearer token)`.
pub async fn create_admin(pool: &PgPool, email: &str) -> (DbId, String) {
    create_user_with_role(pool, email, Role::Admin).await
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

pub async fn create_lift(pool: &PgPool, slug: &str) -> DbId {
    LiftRepo::create(
        pool,
        &CreateLift {
            name: slug.replace('-', " "),
            slug: slug.to_string(),
        },
    )
    .await
    .expect("lift creation should succeed")
    .id
}

/// A seeded program: one cycle of `weeks` weeks, each scheduling the same
/// days in order.
pub struct ProgramFixture {
    pub program_id: DbId,
    pub cycle_id: DbId,
    /// Day ids in schedule order.
    pub day_ids: Vec<DbId>,
}

pub async fn create_program(
    pool: &PgPool,
    slug: &str,
    weeks: i32,
    day_slugs: &[&str],
    lookups: (Option<DbId>, Option<DbId>),
) -> ProgramFixture {
    let cycle = ProgramRepo::create_cycle(
        pool,
        &CreateCycle {
            name: format!("{slug} cycle"),
            length_weeks: weeks,
        },
    )
    .await
    .expect("cycle creation should succeed");

    let program = ProgramRepo::create(
        pool,
        &CreateProgram {
            name: slug.to_string(),
            slug: slug.to_string(),
            cycle_id: cycle.id,
            weekly_lookup_id: lookups.0,
            daily_lookup_id: lookups.1,
        },
    )
    .await
    .expect("program creation should succeed");

    let mut day_ids = Vec::with_capacity(day_slugs.len());
    for day_slug in day_slugs {
        let day = ProgramRepo::create_day(
            pool,
            &CreateDay {
                program_id: program.id,
                name: day_slug.to_string(),
                slug: day_slug.to_string(),
            },
        )
        .await
        .expect("day creation should succeed");
        day_ids.push(day.id);
    }

    for week_number in 1..=weeks {
        let week = ProgramRepo::create_week(
            pool,
            &CreateCycleWeek {
                cycle_id: cycle.id,
                week_number,
                name: None,
            },
        )
        .await
        .expect("week creation should succeed");
        for (position, day_id) in day_ids.iter().enumerate() {
            ProgramRepo::add_day_to_week(
                pool,
                &CreateWeekDay {
                    week_id: week.id,
                    day_id: *day_id,
                    position: position as i32,
                },
            )
            .await
            .expect("week day creation should succeed");
        }
    }

    ProgramFixture {
        program_id: program.id,
        cycle_id: cycle.id,
        day_ids,
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST without a body.
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a decimal serialized as a JSON string.
pub fn decimal(value: &serde_json::Value) -> Decimal {
    let raw = value
        .as_str()
        .unwrap_or_else(|| panic!("expected a decimal string, got {value}"));
    Decimal::from_str(raw).unwrap()
}
