// src/db/log_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        auth::Role,
        log::{LogEntry, LogView, NewLog},
    },
    workflow::permissions::LogScope,
};

// Só INSERT e SELECT: o log é imutável.
#[derive(Clone)]
pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(&self, executor: E, log: &NewLog) -> Result<LogEntry, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, LogEntry>(
            r#"
            INSERT INTO logs (user_id, action, project_id, reason)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, action, project_id, reason, created_at
            "#,
        )
        .bind(log.user_id)
        .bind(log.action)
        .bind(log.project_id)
        .bind(&log.reason)
        .fetch_one(executor)
        .await?;
        Ok(entry)
    }

    /// Log fora de transação de workflow (ex: LOGIN).
    pub async fn record(&self, log: &NewLog) -> Result<LogEntry, AppError> {
        self.insert(&self.pool, log).await
    }

    /// Mais recentes primeiro, filtrados pelo escopo do cargo de quem consulta.
    pub async fn list_scoped(&self, viewer_id: Uuid, scope: LogScope) -> Result<Vec<LogView>, AppError> {
        let (all, include_attendants) = match scope {
            LogScope::All => (true, false),
            LogScope::OwnAndAttendants => (false, true),
            LogScope::Own => (false, false),
        };

        let logs = sqlx::query_as::<_, LogView>(
            r#"
            SELECT l.id, l.user_id, l.action, l.project_id, l.reason, l.created_at,
                   u.email AS user_email,
                   p.name AS project_name
            FROM logs l
            LEFT JOIN users u ON u.id = l.user_id
            LEFT JOIN projects p ON p.id = l.project_id
            WHERE $1
               OR l.user_id = $2
               OR ($3 AND u.role = $4)
            ORDER BY l.created_at DESC
            "#,
        )
        .bind(all)
        .bind(viewer_id)
        .bind(include_attendants)
        .bind(Role::Attendant)
        .fetch_all(&self.pool)
        .await?;
        Ok(logs)
    }
}
