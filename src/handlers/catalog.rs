// src/handlers/catalog.rs

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
        i18n::Locale,
        rbac::{CanCreate, CanDelete, CanEdit, CanRead, RequirePermission},
    },
    models::catalog::{
        Brand, BrandDescription, BrandDescriptionFilter, CreateEnvironmentPayload, Environment,
        EnvironmentType, NamePayload, SaveBrandDescriptionPayload, UpdateEnvironmentPayload,
    },
};

// =============================================================================
//  ÁREA 1: AMBIENTES
// =============================================================================

// GET /api/environments
#[utoipa::path(
    get,
    path = "/api/environments",
    tag = "Catalog",
    responses((status = 200, description = "Ambientes cadastrados", body = Vec<Environment>)),
    security(("api_jwt" = []))
)]
pub async fn list_environments(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
) -> Result<impl IntoResponse, ApiError> {
    let environments = app_state
        .catalog_service
        .list_environments()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(environments))
}

// GET /api/environments/{id}
#[utoipa::path(
    get,
    path = "/api/environments/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do ambiente")),
    responses(
        (status = 200, description = "Ambiente", body = Environment),
        (status = 404, description = "Ambiente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_environment(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let environment = app_state
        .catalog_service
        .get_environment(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(environment))
}

// POST /api/environments
#[utoipa::path(
    post,
    path = "/api/environments",
    tag = "Catalog",
    request_body = CreateEnvironmentPayload,
    responses(
        (status = 201, description = "Ambiente criado", body = Environment),
        (status = 400, description = "Dados inválidos ou nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_environment(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanCreate>,
    Json(payload): Json<CreateEnvironmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let environment = app_state
        .catalog_service
        .create_environment(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(environment)))
}

// PATCH /api/environments/{id}
#[utoipa::path(
    patch,
    path = "/api/environments/{id}",
    tag = "Catalog",
    request_body = UpdateEnvironmentPayload,
    params(("id" = Uuid, Path, description = "ID do ambiente")),
    responses(
        (status = 200, description = "Ambiente atualizado", body = Environment),
        (status = 404, description = "Ambiente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_environment(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanEdit>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEnvironmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let environment = app_state
        .catalog_service
        .update_environment(id, payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(environment))
}

// DELETE /api/environments/{id}
#[utoipa::path(
    delete,
    path = "/api/environments/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do ambiente")),
    responses(
        (status = 204, description = "Ambiente excluído"),
        (status = 404, description = "Ambiente não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_environment(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_environment(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 2: TIPOS DE AMBIENTE
// =============================================================================

// GET /api/environment-types
#[utoipa::path(
    get,
    path = "/api/environment-types",
    tag = "Catalog",
    responses((status = 200, description = "Tipos de ambiente", body = Vec<EnvironmentType>)),
    security(("api_jwt" = []))
)]
pub async fn list_environment_types(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
) -> Result<impl IntoResponse, ApiError> {
    let types = app_state
        .catalog_service
        .list_environment_types()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(types))
}

// POST /api/environment-types
#[utoipa::path(
    post,
    path = "/api/environment-types",
    tag = "Catalog",
    request_body = NamePayload,
    responses(
        (status = 201, description = "Tipo criado", body = EnvironmentType),
        (status = 400, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_environment_type(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanEdit>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let environment_type = app_state
        .catalog_service
        .create_environment_type(&payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(environment_type)))
}

// DELETE /api/environment-types/{id}
#[utoipa::path(
    delete,
    path = "/api/environment-types/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID do tipo")),
    responses((status = 204, description = "Tipo excluído")),
    security(("api_jwt" = []))
)]
pub async fn delete_environment_type(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_environment_type(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 3: MARCAS
// =============================================================================

// GET /api/brands
#[utoipa::path(
    get,
    path = "/api/brands",
    tag = "Catalog",
    responses((status = 200, description = "Marcas cadastradas", body = Vec<Brand>)),
    security(("api_jwt" = []))
)]
pub async fn list_brands(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
) -> Result<impl IntoResponse, ApiError> {
    let brands = app_state
        .catalog_service
        .list_brands()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brands))
}

// POST /api/brands
#[utoipa::path(
    post,
    path = "/api/brands",
    tag = "Catalog",
    request_body = NamePayload,
    responses(
        (status = 201, description = "Marca criada", body = Brand),
        (status = 400, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanEdit>,
    Json(payload): Json<NamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .catalog_service
        .create_brand(&payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(brand)))
}

// DELETE /api/brands/{id}
#[utoipa::path(
    delete,
    path = "/api/brands/{id}",
    tag = "Catalog",
    params(("id" = Uuid, Path, description = "ID da marca")),
    responses((status = 204, description = "Marca excluída")),
    security(("api_jwt" = []))
)]
pub async fn delete_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanDelete>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .catalog_service
        .delete_brand(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
//  ÁREA 4: ORIENTAÇÃO DE MARCAS
// =============================================================================

// GET /api/brands-description
#[utoipa::path(
    get,
    path = "/api/brands-description",
    tag = "Catalog",
    params(("material" = Option<String>, Query, description = "Material exato (sem caixa)")),
    responses((status = 200, description = "Orientações de marca", body = Vec<BrandDescription>)),
    security(("api_jwt" = []))
)]
pub async fn list_brand_descriptions(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
    Query(filter): Query<BrandDescriptionFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let entries = app_state
        .catalog_service
        .list_brand_descriptions(filter.material.as_deref())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(entries))
}

// POST /api/brands-description/save
#[utoipa::path(
    post,
    path = "/api/brands-description/save",
    tag = "Catalog",
    request_body = SaveBrandDescriptionPayload,
    responses((status = 201, description = "Orientação criada ou mesclada", body = BrandDescription)),
    security(("api_jwt" = []))
)]
pub async fn save_brand_description(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanEdit>,
    Json(payload): Json<SaveBrandDescriptionPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let entry = app_state
        .catalog_service
        .save_brand_description(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(entry)))
}
