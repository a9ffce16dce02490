// src/models/material.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::project::ApprovalStatus;

/// Tipos de item do memorial. Conjunto fechado.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
    Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "material_item", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaterialItem {
    Floor,
    Wall,
    Ceiling,
    Baseboard,
    Threshold,
    Sill,
    Frame,
    Glass,
    Door,
    Hardware,
    Electrical,
    Communication,
}

impl MaterialItem {
    pub const ALL: [MaterialItem; 12] = [
        MaterialItem::Floor,
        MaterialItem::Wall,
        MaterialItem::Ceiling,
        MaterialItem::Baseboard,
        MaterialItem::Threshold,
        MaterialItem::Sill,
        MaterialItem::Frame,
        MaterialItem::Glass,
        MaterialItem::Door,
        MaterialItem::Hardware,
        MaterialItem::Electrical,
        MaterialItem::Communication,
    ];

    /// Rótulo exibido no memorial.
    pub fn label(self) -> &'static str {
        match self {
            MaterialItem::Floor => "Piso",
            MaterialItem::Wall => "Parede",
            MaterialItem::Ceiling => "Teto",
            MaterialItem::Baseboard => "Rodapé",
            MaterialItem::Threshold => "Soleira",
            MaterialItem::Sill => "Peitoril",
            MaterialItem::Frame => "Esquadria",
            MaterialItem::Glass => "Vidro",
            MaterialItem::Door => "Porta",
            MaterialItem::Hardware => "Ferragem",
            MaterialItem::Electrical => "Inst. Elétrica",
            MaterialItem::Communication => "Inst. Comunicação",
        }
    }

    /// Código usado no banco e na API ("FLOOR", "WALL", ...).
    pub fn code(self) -> &'static str {
        match self {
            MaterialItem::Floor => "FLOOR",
            MaterialItem::Wall => "WALL",
            MaterialItem::Ceiling => "CEILING",
            MaterialItem::Baseboard => "BASEBOARD",
            MaterialItem::Threshold => "THRESHOLD",
            MaterialItem::Sill => "SILL",
            MaterialItem::Frame => "FRAME",
            MaterialItem::Glass => "GLASS",
            MaterialItem::Door => "DOOR",
            MaterialItem::Hardware => "HARDWARE",
            MaterialItem::Electrical => "ELECTRICAL",
            MaterialItem::Communication => "COMMUNICATION",
        }
    }
}

// O que sai do banco (Tabela material_specs).
// project_id = None => linha-modelo (template) do memorial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialSpec {
    pub id: Uuid,
    pub project_id: Option<Uuid>,
    pub environment_id: Uuid,
    pub item: MaterialItem,
    #[schema(example = "Porcelanato 60x60 retificado")]
    pub description: String,
    pub brand_id: Option<Uuid>,
    pub status: ApprovalStatus,
    #[schema(example = "Cor errada")]
    pub rejection_reason: Option<String>,
    pub approver_id: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl MaterialSpec {
    pub fn is_template(&self) -> bool {
        self.project_id.is_none()
    }
}

// Linha com os JOINs de marca e aprovador
#[derive(Debug, Clone, FromRow)]
pub struct MaterialRow {
    #[sqlx(flatten)]
    pub spec: MaterialSpec,
    pub brand_name: Option<String>,
    pub approver_email: Option<String>,
}

/// Material enriquecido para leitura (nome da marca, rótulo do item, e-mail do aprovador).
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialView {
    #[serde(flatten)]
    pub spec: MaterialSpec,
    #[schema(example = "Piso")]
    pub item_label: String,
    #[schema(example = "Portobello")]
    pub brand_name: Option<String>,
    pub approver_email: Option<String>,
}

impl From<MaterialRow> for MaterialView {
    fn from(row: MaterialRow) -> Self {
        Self {
            item_label: row.spec.item.label().to_string(),
            spec: row.spec,
            brand_name: row.brand_name,
            approver_email: row.approver_email,
        }
    }
}

/// Dados para inserir uma nova linha (projeto ou template).
#[derive(Debug, Clone, PartialEq)]
pub struct NewMaterial {
    pub project_id: Option<Uuid>,
    pub environment_id: Uuid,
    pub item: MaterialItem,
    pub description: String,
    pub brand_id: Option<Uuid>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaterialPayload {
    pub project_id: Uuid,
    pub environment_id: Uuid,
    #[validate(required(message = "O campo 'item' é obrigatório."))]
    pub item: Option<MaterialItem>,
    #[serde(default)]
    #[schema(example = "Porcelanato 60x60")]
    pub description: String,
    pub brand_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaterialPayload {
    pub description: Option<String>,
    pub brand_id: Option<Uuid>,
    // Remove a marca vinculada (ignora brandId)
    #[serde(default)]
    pub clear_brand: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RejectPayload {
    #[serde(default)]
    #[schema(example = "Cor errada")]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTemplatePayload {
    pub environment_id: Uuid,
    pub item: MaterialItem,
    #[validate(custom(function = "crate::common::validation::validate_not_blank"))]
    #[schema(example = "Porcelanato ou laminado")]
    pub description: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTemplatePayload {
    #[validate(custom(function = "crate::common::validation::validate_not_blank"))]
    pub description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct MaterialFilter {
    pub project: Option<Uuid>,
    pub environment: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TemplateFilter {
    pub environment: Option<Uuid>,
}
