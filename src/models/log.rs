// src/models/log.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "log_action", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogAction {
    Create,
    Approve,
    Reject,
    Edit,
    Login,
}

// Registro de auditoria. Imutável: só existe INSERT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: LogAction,
    pub project_id: Option<Uuid>,
    #[schema(example = "Item FLOOR aprovado")]
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LogView {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub entry: LogEntry,
    pub user_email: Option<String>,
    pub project_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewLog {
    pub user_id: Uuid,
    pub action: LogAction,
    pub project_id: Option<Uuid>,
    pub reason: Option<String>,
}

impl NewLog {
    pub fn new(user_id: Uuid, action: LogAction, project_id: Option<Uuid>) -> Self {
        Self { user_id, action, project_id, reason: None }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}
