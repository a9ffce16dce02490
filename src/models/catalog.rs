// src/models/catalog.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::material::MaterialItem;

// --- Enums ---
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "environment_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnvironmentCategory {
    PrivateUnit,
    CommonArea,
    ExternalArea,
}

// --- Ambientes (dados de referência globais) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "Quarto/Suíte")]
    pub name: String,
    pub category: EnvironmentCategory,
    #[schema(example = "Branco gelo")]
    pub color_guide: Option<String>,
    // Texto livre por tipo de item (ex: {"FLOOR": "Porcelanato 60x60"})
    #[schema(value_type = Object)]
    pub item_notes: Json<BTreeMap<MaterialItem, String>>,
    pub environment_type_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentType {
    pub id: Uuid,
    #[schema(example = "Área Molhada")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: Uuid,
    #[schema(example = "Portobello")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Orientação de marcas: material (texto livre) -> lista de marcas aceitas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandDescription {
    pub id: Uuid,
    #[schema(example = "Porcelanato")]
    pub material: String,
    #[schema(example = "Portobello, Arielle, Tecnogres")]
    pub brands: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEnvironmentPayload {
    #[validate(length(max = 100, message = "O nome do ambiente deve ter no máximo 100 caracteres."), custom(function = "crate::common::validation::validate_not_blank"))]
    #[schema(example = "Varanda")]
    pub name: String,
    pub category: EnvironmentCategory,
    pub color_guide: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub item_notes: BTreeMap<MaterialItem, String>,
    pub environment_type_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnvironmentPayload {
    #[validate(length(max = 100, message = "O nome do ambiente deve ter no máximo 100 caracteres."), custom(function = "crate::common::validation::validate_not_blank"))]
    pub name: Option<String>,
    pub category: Option<EnvironmentCategory>,
    pub color_guide: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub item_notes: Option<BTreeMap<MaterialItem, String>>,
    pub environment_type_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NamePayload {
    #[validate(length(max = 120, message = "O nome deve ter no máximo 120 caracteres."), custom(function = "crate::common::validation::validate_not_blank"))]
    #[schema(example = "Portobello")]
    pub name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveBrandDescriptionPayload {
    #[validate(length(max = 120, message = "O material deve ter no máximo 120 caracteres."), custom(function = "crate::common::validation::validate_not_blank"))]
    #[schema(example = "piso")]
    pub material: String,
    #[schema(example = json!(["Portobello", "Pisolar"]))]
    pub brands: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BrandDescriptionFilter {
    pub material: Option<String>,
}
