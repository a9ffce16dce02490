// src/db/stats_repo.rs

use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::stats::{DashboardStats, MonthlyStatusRow},
};

#[derive(Clone)]
pub struct StatsRepository {
    pool: PgPool,
}

impl StatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Totais por status
    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                COUNT(*)                                    AS total_projects,
                COUNT(*) FILTER (WHERE status = 'APPROVED') AS approved_projects,
                COUNT(*) FILTER (WHERE status = 'REJECTED') AS rejected_projects,
                COUNT(*) FILTER (WHERE status = 'PENDING')  AS pending_projects
            FROM projects
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(stats)
    }

    // 2. Projetos por mês de criação e status
    pub async fn monthly(&self) -> Result<Vec<MonthlyStatusRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyStatusRow>(
            r#"
            SELECT to_char(date_trunc('month', created_at), 'YYYY-MM') AS month,
                   status,
                   COUNT(*) AS total
            FROM projects
            GROUP BY 1, 2
            ORDER BY 1
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
