// src/models/stats.rs

use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::project::ApprovalStatus;

// Cards do topo do dashboard
#[derive(Debug, Default, PartialEq, Eq, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_projects: i64,
    pub approved_projects: i64,
    pub rejected_projects: i64,
    pub pending_projects: i64,
}

/// Contagem mensal por status. Os três campos sempre aparecem.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct MonthlyStatusCount {
    pub approved: i64,
    pub rejected: i64,
    pub pending: i64,
}

// Linha crua do GROUP BY (mês, status)
#[derive(Debug, Clone, FromRow)]
pub struct MonthlyStatusRow {
    pub month: String, // YYYY-MM
    pub status: ApprovalStatus,
    pub total: i64,
}
