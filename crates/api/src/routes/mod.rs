pub mod enrollment;
pub mod health;
pub mod maxes;
pub mod prescriptions;
pub mod programs;
pub mod progressions;
pub mod sessions;
pub mod workout;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /maxes                                    list, record (auth required)
/// /maxes/current                            current max for lift + type
/// /maxes/{id}                               update (owner or admin)
///
/// /prescriptions                            create (admin only)
/// /prescriptions/resolve                    batch resolve (POST)
/// /prescriptions/{id}/resolve               resolve one (GET)
/// /load-strategies/resolve                  resolve ad-hoc strategy (POST)
/// /set-schemes/generate                     expand ad-hoc scheme (POST)
///
/// /workout                                  current workout (GET)
/// /workout/preview                          preview week/day (GET)
///
/// /programs/{id}/enroll                     enroll (POST)
/// /programs/{id}/progressions               link progression (admin only)
///
/// /enrollment                               get, unenroll
/// /enrollment/advance-week                  advance week (POST)
/// /enrollment/advance-day                   advance day (POST)
/// /enrollment/next-cycle                    start next cycle (POST)
///
/// /progressions                             create (admin only)
/// /progressions/{id}/trigger                manual trigger (POST)
/// /progression-history                      list (?lift_id, limit, offset)
///
/// /sessions                                 start (POST)
/// /sessions/{id}                            get with sets
/// /sessions/{id}/sets                       log set (POST)
/// /sessions/{id}/next-set                   next variable set (GET)
/// /sessions/{id}/finish                     finish (POST)
/// /sessions/{id}/abandon                    abandon (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/maxes", maxes::router())
        .nest("/prescriptions", prescriptions::prescription_router())
        .nest("/load-strategies", prescriptions::load_strategy_router())
        .nest("/set-schemes", prescriptions::set_scheme_router())
        .nest("/workout", workout::router())
        .nest("/programs", programs::router())
        .nest("/enrollment", enrollment::router())
        .nest("/progressions", progressions::progression_router())
        .nest("/progression-history", progressions::history_router())
        .nest("/sessions", sessions::router())
}
