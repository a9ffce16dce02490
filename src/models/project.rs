// src/models/project.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    catalog::{BrandDescription, Environment},
    material::MaterialView,
};

// --- Enums ---

/// Status de aprovação, compartilhado por projetos e materiais.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash,
    Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "approval_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "PENDING",
            ApprovalStatus::Approved => "APPROVED",
            ApprovalStatus::Rejected => "REJECTED",
        }
    }

    /// Aceita "approved", "APPROVED", "Approved"...
    pub fn parse_loose(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Some(ApprovalStatus::Pending),
            "APPROVED" => Some(ApprovalStatus::Approved),
            "REJECTED" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "project_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectType {
    Residential,
    Commercial,
    Industrial,
}

// --- Structs ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Torre A")]
    pub name: String,
    pub project_type: ProjectType,
    pub delivery_date: NaiveDate,
    pub description: Option<String>,
    pub status: ApprovalStatus,
    pub owner_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Listagem (sem a árvore de ambientes)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub project: Project,
    pub owner_email: Option<String>,
    pub environment_count: i64,
}

/// Visão aninhada: Projeto -> Ambientes -> Materiais.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub owner_email: Option<String>,
    pub environments: Vec<EnvironmentDetail>,
    pub brand_guidance: Vec<BrandDescription>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentDetail {
    #[serde(flatten)]
    pub environment: Environment,
    pub materials: Vec<MaterialView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewProject {
    pub name: String,
    pub project_type: ProjectType,
    pub delivery_date: NaiveDate,
    pub description: Option<String>,
}

/// Resultado da replicação dos templates para um projeto.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationReport {
    pub created: usize,
    pub skipped_existing: usize,
    pub environments_without_templates: Vec<String>,
}

/// Resposta da criação: o projeto e o que a replicação gerou.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCreated {
    #[serde(flatten)]
    pub project: Project,
    pub replication: ReplicationReport,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub id: Uuid,
    pub status: ApprovalStatus,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    #[validate(length(max = 255, message = "O nome do projeto deve ter no máximo 255 caracteres."), custom(function = "crate::common::validation::validate_not_blank"))]
    #[schema(example = "Torre A")]
    pub name: String,

    #[schema(example = "RESIDENTIAL")]
    pub project_type: ProjectType,

    #[schema(example = "2027-03-31")]
    pub delivery_date: NaiveDate,

    pub description: Option<String>,

    #[schema(example = json!(["550e8400-e29b-41d4-a716-446655440001"]))]
    #[serde(default)]
    pub environment_ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectPayload {
    #[validate(length(max = 255, message = "O nome do projeto deve ter no máximo 255 caracteres."), custom(function = "crate::common::validation::validate_not_blank"))]
    pub name: Option<String>,
    pub project_type: Option<ProjectType>,
    pub delivery_date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<String>,
}
