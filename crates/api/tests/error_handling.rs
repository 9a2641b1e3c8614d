//! Tests for `AppError` → HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use http_body_util::BodyExt;
use liftcycle_api::error::AppError;
use liftcycle_core::error::CoreError;
use liftcycle_core::lift_max::MaxType;
use uuid::Uuid;

/// Convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn not_found_error_returns_404() {
    let id = Uuid::nil();
    let err = AppError::Core(CoreError::NotFound {
        entity: "Prescription",
        id,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], format!("Prescription with id {id} not found"));
}

#[tokio::test]
async fn bad_request_error_returns_400() {
    let err = AppError::BadRequest("invalid field value".into());

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "BAD_REQUEST");
    assert_eq!(json["error"], "invalid field value");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("percentage out of range".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "percentage out of range");
}

#[tokio::test]
async fn max_not_found_returns_422_with_setup_hint() {
    let err = AppError::Core(CoreError::MaxNotFound {
        lift_id: Uuid::nil(),
        max_type: MaxType::TrainingMax,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "MAX_NOT_FOUND");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("TRAINING_MAX"), "got: {message}");
    assert!(message.contains("set up your maxes"), "got: {message}");
}

#[tokio::test]
async fn user_not_enrolled_returns_404() {
    let (status, json) = error_to_response(AppError::Core(CoreError::UserNotEnrolled)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "USER_NOT_ENROLLED");
}

#[tokio::test]
async fn schedule_lookups_return_404() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::WeekNotFound { week_number: 9 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "WEEK_NOT_FOUND");

    let (status, json) = error_to_response(AppError::Core(CoreError::DayNotFound {
        day: "heavy".into(),
    }))
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "DAY_NOT_FOUND");
}

#[tokio::test]
async fn session_errors_return_422() {
    let (status, json) = error_to_response(AppError::Core(CoreError::NoSetsLogged)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "NO_SETS_LOGGED");

    let (status, json) =
        error_to_response(AppError::Core(CoreError::UnsupportedScheme("FIXED".into()))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "UNSUPPORTED_SCHEME");
}

#[tokio::test]
async fn invalid_state_returns_409() {
    let err = AppError::Core(CoreError::InvalidState("already between cycles".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_STATE");
    assert_eq!(json["error"], "already between cycles");
}

#[tokio::test]
async fn no_applicable_progressions_returns_422() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::NoApplicableProgressions)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "NO_APPLICABLE_PROGRESSIONS");
}

#[tokio::test]
async fn internal_errors_are_sanitized() {
    let (status, json) =
        error_to_response(AppError::Core(CoreError::Internal("pool exhausted".into()))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");
    assert_eq!(json["error"], "An internal error occurred");

    let (status, json) = error_to_response(AppError::InternalError("secret detail".into())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn row_not_found_returns_404() {
    let (status, json) = error_to_response(AppError::Database(sqlx::Error::RowNotFound)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}
