// src/services/stats_service.rs

use std::collections::BTreeMap;

use crate::{
    common::error::AppError,
    db::StatsRepository,
    models::{
        project::ApprovalStatus,
        stats::{DashboardStats, MonthlyStatusCount, MonthlyStatusRow},
    },
};

/// Agrupa as linhas (mês, status, total) em "YYYY-MM" -> contagens.
/// Todo mês presente leva os três status, zerados quando não há projetos.
pub fn fold_monthly(rows: Vec<MonthlyStatusRow>) -> BTreeMap<String, MonthlyStatusCount> {
    let mut months: BTreeMap<String, MonthlyStatusCount> = BTreeMap::new();
    for row in rows {
        let counts = months.entry(row.month).or_default();
        match row.status {
            ApprovalStatus::Approved => counts.approved += row.total,
            ApprovalStatus::Rejected => counts.rejected += row.total,
            ApprovalStatus::Pending => counts.pending += row.total,
        }
    }
    months
}

#[derive(Clone)]
pub struct StatsService {
    stats_repo: StatsRepository,
}

impl StatsService {
    pub fn new(stats_repo: StatsRepository) -> Self {
        Self { stats_repo }
    }

    pub async fn dashboard(&self) -> Result<DashboardStats, AppError> {
        self.stats_repo.dashboard().await
    }

    pub async fn monthly(&self) -> Result<BTreeMap<String, MonthlyStatusCount>, AppError> {
        let rows = self.stats_repo.monthly().await?;
        Ok(fold_monthly(rows))
    }
}
