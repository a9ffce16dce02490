// src/services/audit_service.rs

use crate::{
    common::error::AppError,
    db::LogRepository,
    models::{auth::Actor, log::LogView},
    workflow::permissions::log_scope,
};

#[derive(Clone)]
pub struct AuditService {
    log_repo: LogRepository,
}

impl AuditService {
    pub fn new(log_repo: LogRepository) -> Self {
        Self { log_repo }
    }

    /// Logs visíveis para quem consulta, mais recentes primeiro.
    pub async fn list_for(&self, viewer: &Actor) -> Result<Vec<LogView>, AppError> {
        self.log_repo.list_scoped(viewer.id, log_scope(viewer.role)).await
    }
}
