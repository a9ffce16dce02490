// src/handlers/materials.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{CanDelete, CanEdit, CanRead, CanReview, RequirePermission},
    },
    models::material::{
        CreateMaterialPayload, CreateTemplatePayload, MaterialFilter, MaterialView, RejectPayload,
        TemplateFilter, UpdateMaterialPayload, UpdateTemplatePayload,
    },
};

// =============================================================================
//  ÁREA 1: MATERIAIS DE PROJETO
// =============================================================================

// GET /api/materials
#[utoipa::path(
    get,
    path = "/api/materials",
    tag = "Materials",
    params(
        ("project" = Option<Uuid>, Query, description = "Filtra por projeto"),
        ("environment" = Option<Uuid>, Query, description = "Filtra por ambiente")
    ),
    responses((status = 200, description = "Materiais de projeto", body = Vec<MaterialView>)),
    security(("api_jwt" = []))
)]
pub async fn list_materials(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
    Query(filter): Query<MaterialFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let materials = app_state
        .material_service
        .list(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(materials))
}

// GET /api/materials/{id}
#[utoipa::path(
    get,
    path = "/api/materials/{id}",
    tag = "Materials",
    params(("id" = Uuid, Path, description = "ID do material")),
    responses(
        (status = 200, description = "Material", body = MaterialView),
        (status = 404, description = "Material não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_material(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let material = app_state
        .material_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(material))
}

// POST /api/materials
#[utoipa::path(
    post,
    path = "/api/materials",
    tag = "Materials",
    request_body = CreateMaterialPayload,
    responses(
        (status = 201, description = "Material criado", body = MaterialView),
        (status = 400, description = "Dados inválidos ou ambiente fora do projeto"),
        (status = 409, description = "Já existe material para este ambiente e item")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_material(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<CanEdit>,
    Json(payload): Json<CreateMaterialPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let material = app_state
        .material_service
        .create(&user.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(material)))
}

// PATCH /api/materials/{id}
#[utoipa::path(
    patch,
    path = "/api/materials/{id}",
    tag = "Materials",
    request_body = UpdateMaterialPayload,
    params(("id" = Uuid, Path, description = "ID do material")),
    responses(
        (status = 200, description = "Material atualizado", body = MaterialView),
        (status = 403, description = "Material aprovado: reverta antes de editar")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_material(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<CanEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaterialPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let material = app_state
        .material_service
        .update(&user.0, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(material))
}

// DELETE /api/materials/{id}
#[utoipa::path(
    delete,
    path = "/api/materials/{id}",
    tag = "Materials",
    params(("id" = Uuid, Path, description = "ID do material")),
    responses(
        (status = 204, description = "Material excluído"),
        (status = 404, description = "Material não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_material(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<CanDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .material_service
        .delete(&user.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: APROVAÇÃO
// =============================================================================

// POST /api/materials/{id}/approve
#[utoipa::path(
    post,
    path = "/api/materials/{id}/approve",
    tag = "Materials",
    params(("id" = Uuid, Path, description = "ID do material")),
    responses(
        (status = 200, description = "Material aprovado", body = MaterialView),
        (status = 400, description = "Linha-modelo não passa por aprovação"),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn approve_material(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<CanReview>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let material = app_state
        .material_service
        .approve(&user.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(material))
}

// POST /api/materials/{id}/reject
#[utoipa::path(
    post,
    path = "/api/materials/{id}/reject",
    tag = "Materials",
    request_body = RejectPayload,
    params(("id" = Uuid, Path, description = "ID do material")),
    responses(
        (status = 200, description = "Material reprovado", body = MaterialView),
        (status = 409, description = "Transição inválida")
    ),
    security(("api_jwt" = []))
)]
pub async fn reject_material(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<CanReview>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let material = app_state
        .material_service
        .reject(&user.0, id, &payload.reason)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(material))
}

// POST /api/materials/{id}/revert
#[utoipa::path(
    post,
    path = "/api/materials/{id}/revert",
    tag = "Materials",
    params(("id" = Uuid, Path, description = "ID do material")),
    responses((status = 200, description = "Material de volta para PENDING", body = MaterialView)),
    security(("api_jwt" = []))
)]
pub async fn revert_material(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<CanReview>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let material = app_state
        .material_service
        .revert(&user.0, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(material))
}

// =============================================================================
//  ÁREA 3: TEMPLATES
// =============================================================================

// GET /api/templates
#[utoipa::path(
    get,
    path = "/api/templates",
    tag = "Templates",
    params(("environment" = Option<Uuid>, Query, description = "Filtra por ambiente")),
    responses((status = 200, description = "Linhas-modelo", body = Vec<MaterialView>)),
    security(("api_jwt" = []))
)]
pub async fn list_templates(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
    Query(filter): Query<TemplateFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let templates = app_state
        .material_service
        .list_templates(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(templates))
}

// POST /api/templates
#[utoipa::path(
    post,
    path = "/api/templates",
    tag = "Templates",
    request_body = CreateTemplatePayload,
    responses(
        (status = 201, description = "Template criado", body = MaterialView),
        (status = 409, description = "Já existe template para este ambiente e item")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_template(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<CanEdit>,
    Json(payload): Json<CreateTemplatePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let template = app_state
        .material_service
        .create_template(&user.0, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(template)))
}

// PATCH /api/templates/{id}
#[utoipa::path(
    patch,
    path = "/api/templates/{id}",
    tag = "Templates",
    request_body = UpdateTemplatePayload,
    params(("id" = Uuid, Path, description = "ID do template")),
    responses(
        (status = 200, description = "Template atualizado", body = MaterialView),
        (status = 404, description = "Template não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_template(
    State(app_state): State<AppState>,
    locale: Locale,
    user: AuthenticatedUser,
    _guard: RequirePermission<CanEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTemplatePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let template = app_state
        .material_service
        .update_template(&user.0, id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(template))
}
