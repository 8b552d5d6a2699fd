use async_trait::async_trait;
use sqlx::{postgres::PgArguments, PgPool, Postgres, Row};
use thiserror::Error;
use tracing::debug;

use super::routine::{RoutineCall, SqlParam};
use crate::types::RawJson;

/// Errors from routine execution. Never shown to API clients.
#[derive(Debug, Error)]
pub enum RoutineError {
    #[error("Routine {0} returned NULL")]
    NullResult(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Runs routine calls against the database.
///
/// Handlers only talk to this trait, so a recording stub can stand in for
/// PostgreSQL in tests.
#[async_trait]
pub trait RoutineExecutor: Send + Sync {
    /// Call a function returning a single JSON value.
    async fn fetch_json(&self, call: &RoutineCall) -> Result<RawJson, RoutineError>;

    /// Call a function returning a generated integer id.
    async fn fetch_id(&self, call: &RoutineCall) -> Result<i64, RoutineError>;

    /// Call a procedure for its effect only.
    async fn execute(&self, call: &RoutineCall) -> Result<(), RoutineError>;

    /// Round-trip to the database without touching any routine.
    async fn ping(&self) -> Result<(), RoutineError>;
}

type PgQuery<'q> = sqlx::query::Query<'q, Postgres, PgArguments>;

/// `RoutineExecutor` over a shared PostgreSQL pool.
#[derive(Clone)]
pub struct PgRoutineExecutor {
    pool: PgPool,
    schema: String,
    log_queries: bool,
}

impl PgRoutineExecutor {
    /// `schema` must already be a validated plain identifier.
    pub fn new(pool: PgPool, schema: impl Into<String>, log_queries: bool) -> Self {
        Self {
            pool,
            schema: schema.into(),
            log_queries,
        }
    }

    fn sql(&self, call: &RoutineCall, cast: Option<&str>) -> String {
        let sql = call.to_sql(&self.schema, cast);
        if self.log_queries {
            debug!(routine = call.name(), params = call.params().len(), "{}", sql);
        }
        sql
    }
}

fn bind_all<'q>(mut query: PgQuery<'q>, params: &[SqlParam]) -> PgQuery<'q> {
    for param in params {
        query = match param.clone() {
            SqlParam::Int(v) => query.bind(v),
            SqlParam::OptInt(v) => query.bind(v),
            SqlParam::Text(v) => query.bind(v),
            SqlParam::OptText(v) => query.bind(v),
            SqlParam::Timestamp(v) => query.bind(v),
            SqlParam::OptTimestamp(v) => query.bind(v),
            SqlParam::OptBool(v) => query.bind(v),
            SqlParam::IntList(v) => query.bind(v),
        };
    }
    query
}

#[async_trait]
impl RoutineExecutor for PgRoutineExecutor {
    async fn fetch_json(&self, call: &RoutineCall) -> Result<RawJson, RoutineError> {
        let sql = self.sql(call, Some("text"));
        let row = bind_all(sqlx::query(&sql), call.params())
            .fetch_one(&self.pool)
            .await?;
        let text: Option<String> = row.try_get(0)?;
        text.map(RawJson::from)
            .ok_or(RoutineError::NullResult(call.name()))
    }

    async fn fetch_id(&self, call: &RoutineCall) -> Result<i64, RoutineError> {
        let sql = self.sql(call, Some("bigint"));
        let row = bind_all(sqlx::query(&sql), call.params())
            .fetch_one(&self.pool)
            .await?;
        let id: Option<i64> = row.try_get(0)?;
        id.ok_or(RoutineError::NullResult(call.name()))
    }

    async fn execute(&self, call: &RoutineCall) -> Result<(), RoutineError> {
        let sql = self.sql(call, None);
        bind_all(sqlx::query(&sql), call.params())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), RoutineError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
