// src/handlers/documents.rs

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{CanEdit, CanRead, RequirePermission},
    },
    models::document::{DefineDocumentPayload, DocumentFilter, DocumentModel},
};

// POST /api/documents/define
#[utoipa::path(
    post,
    path = "/api/documents/define",
    tag = "Documents",
    request_body = DefineDocumentPayload,
    responses(
        (status = 201, description = "Modelo de documento registrado", body = DocumentModel),
        (status = 400, description = "Projeto ainda não aprovado"),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn define_document(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanEdit>,
    Json(payload): Json<DefineDocumentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let document = app_state
        .document_service
        .define(payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(document)))
}

// GET /api/documents
#[utoipa::path(
    get,
    path = "/api/documents",
    tag = "Documents",
    params(("project" = Option<Uuid>, Query, description = "Filtra por projeto")),
    responses((status = 200, description = "Documentos registrados", body = Vec<DocumentModel>)),
    security(("api_jwt" = []))
)]
pub async fn list_documents(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
    Query(filter): Query<DocumentFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = app_state
        .document_service
        .list(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(documents))
}

// GET /api/projects/{id}/memorial.pdf
#[utoipa::path(
    get,
    path = "/api/projects/{id}/memorial.pdf",
    tag = "Documents",
    params(("id" = Uuid, Path, description = "ID do projeto")),
    responses(
        (status = 200, description = "Memorial descritivo em PDF", content_type = "application/pdf"),
        (status = 400, description = "Projeto ainda não aprovado"),
        (status = 404, description = "Projeto não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn memorial_pdf(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
    Path(project_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let pdf_bytes = app_state
        .document_service
        .memorial_pdf(project_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let disposition = format!("attachment; filename=\"memorial_{}.pdf\"", project_id);
    let headers = [
        (header::CONTENT_TYPE, "application/pdf"),
        (header::CONTENT_DISPOSITION, disposition.as_str()),
    ];

    Ok((headers, pdf_bytes).into_response())
}
