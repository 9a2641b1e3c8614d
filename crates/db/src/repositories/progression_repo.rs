//! Repository for `progressions` and `program_progressions`.

use liftcycle_core::progression::{ProgressionParameters, ProgressionType, TriggerType};
use liftcycle_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::progression::{
    CreateProgramProgression, CreateProgression, ProgramProgression, Progression,
};

const COLUMNS: &str = "\
    id, name, progression_type, increment, max_type, trigger_type, created_at, updated_at";

const LINK_COLUMNS: &str = "\
    id, program_id, progression_id, lift_id, priority, enabled, created_at, updated_at";

pub struct ProgressionRepo;

impl ProgressionRepo {
    /// Insert a progression. Callers validate type/trigger compatibility first.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProgression,
    ) -> Result<Progression, sqlx::Error> {
        let ProgressionParameters {
            increment,
            max_type,
            trigger_type,
        } = input.parameters;
        let query = format!(
            "INSERT INTO progressions (name, progression_type, increment, max_type, trigger_type) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progression>(&query)
            .bind(&input.name)
            .bind(input.progression_type.as_str())
            .bind(increment)
            .bind(max_type.as_str())
            .bind(trigger_type.map(|t| t.as_str()))
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Progression>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progressions WHERE id = $1");
        sqlx::query_as::<_, Progression>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Progressions linked to a program that respond to `trigger`.
    pub async fn list_for_program_trigger<'e>(
        executor: impl PgExecutor<'e>,
        program_id: DbId,
        trigger: TriggerType,
    ) -> Result<Vec<Progression>, sqlx::Error> {
        let (kind, trigger_filter) = match trigger {
            TriggerType::AfterCycle => (ProgressionType::CycleProgression, None),
            other => (ProgressionType::LinearProgression, Some(other.as_str())),
        };
        let query = format!(
            "SELECT {} FROM progressions p \
             WHERE p.progression_type = $2 \
               AND ($3::text IS NULL OR p.trigger_type = $3) \
               AND EXISTS ( \
                   SELECT 1 FROM program_progressions pp \
                   WHERE pp.progression_id = p.id AND pp.program_id = $1 \
               ) \
             ORDER BY ( \
                 SELECT MIN(pp.priority) FROM program_progressions pp \
                 WHERE pp.progression_id = p.id AND pp.program_id = $1 \
             ) ASC, p.created_at ASC",
            prefixed_columns("p")
        );
        sqlx::query_as::<_, Progression>(&query)
            .bind(program_id)
            .bind(kind.as_str())
            .bind(trigger_filter)
            .fetch_all(executor)
            .await
    }

    // -----------------------------------------------------------------------
    // Program links
    // -----------------------------------------------------------------------

    pub async fn link_to_program(
        pool: &PgPool,
        program_id: DbId,
        input: &CreateProgramProgression,
    ) -> Result<ProgramProgression, sqlx::Error> {
        let query = format!(
            "INSERT INTO program_progressions (program_id, progression_id, lift_id, priority, enabled) \
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, true)) \
             RETURNING {LINK_COLUMNS}"
        );
        sqlx::query_as::<_, ProgramProgression>(&query)
            .bind(program_id)
            .bind(input.progression_id)
            .bind(input.lift_id)
            .bind(input.priority)
            .bind(input.enabled)
            .fetch_one(pool)
            .await
    }

    /// Links for one program + progression, enabled or not, by priority.
    ///
    /// `lift_id` narrows the result to a single lift.
    pub async fn list_links<'e>(
        executor: impl PgExecutor<'e>,
        program_id: DbId,
        progression_id: DbId,
        lift_id: Option<DbId>,
    ) -> Result<Vec<ProgramProgression>, sqlx::Error> {
        let query = format!(
            "SELECT {LINK_COLUMNS} FROM program_progressions \
             WHERE program_id = $1 AND progression_id = $2 \
               AND ($3::uuid IS NULL OR lift_id = $3) \
             ORDER BY priority ASC, created_at ASC"
        );
        sqlx::query_as::<_, ProgramProgression>(&query)
            .bind(program_id)
            .bind(progression_id)
            .bind(lift_id)
            .fetch_all(executor)
            .await
    }
}

fn prefixed_columns(alias: &str) -> String {
    COLUMNS
        .split(',')
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}
