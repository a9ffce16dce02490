// src/models/document.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Modelo de documento emitido para um projeto aprovado
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DocumentModel {
    pub id: Uuid,
    pub project_id: Uuid,
    #[schema(example = "Memorial Descritivo - Torre A")]
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DefineDocumentPayload {
    pub project_id: Uuid,
    #[validate(length(max = 100, message = "O nome deve ter no máximo 100 caracteres."))]
    pub name: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct DocumentFilter {
    pub project: Option<Uuid>,
}
