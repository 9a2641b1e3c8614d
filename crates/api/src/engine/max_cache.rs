//! Per-request cache of current maxes.
//!
//! A [`MaxCache`] is created by the caller for one resolution pass and passed
//! by `&mut` into every lookup. It is never stored in shared state, so two
//! requests never see each other's entries.

use std::collections::HashMap;

use liftcycle_core::error::CoreError;
use liftcycle_core::lift_max::MaxType;
use liftcycle_core::types::{Date, DbId};
use liftcycle_db::repositories::LiftMaxRepo;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::error::AppResult;

type MaxKey = (DbId, DbId, MaxType);

#[derive(Debug)]
pub struct MaxCache {
    as_of: Date,
    entries: HashMap<MaxKey, Option<Decimal>>,
    queries: usize,
}

impl MaxCache {
    /// An empty cache resolving maxes as of `as_of`.
    pub fn new(as_of: Date) -> Self {
        Self {
            as_of,
            entries: HashMap::new(),
            queries: 0,
        }
    }

    pub fn as_of(&self) -> Date {
        self.as_of
    }

    /// Number of database lookups performed so far.
    pub fn queries(&self) -> usize {
        self.queries
    }

    /// The current max value, if the user has one. Misses are cached too.
    pub async fn get(
        &mut self,
        pool: &PgPool,
        user_id: DbId,
        lift_id: DbId,
        max_type: MaxType,
    ) -> AppResult<Option<Decimal>> {
        let key = (user_id, lift_id, max_type);
        if let Some(value) = self.entries.get(&key) {
            return Ok(*value);
        }

        let value = LiftMaxRepo::find_current(pool, user_id, lift_id, max_type, self.as_of)
            .await?
            .map(|m| m.value);
        self.queries += 1;
        self.entries.insert(key, value);
        Ok(value)
    }

    /// Like [`MaxCache::get`], failing with `MaxNotFound` when absent.
    pub async fn require(
        &mut self,
        pool: &PgPool,
        user_id: DbId,
        lift_id: DbId,
        max_type: MaxType,
    ) -> AppResult<Decimal> {
        self.get(pool, user_id, lift_id, max_type)
            .await?
            .ok_or_else(|| CoreError::MaxNotFound { lift_id, max_type }.into())
    }
}
