// src/handlers/stats.rs

use std::collections::BTreeMap;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        i18n::Locale,
        rbac::{CanRead, RequirePermission},
    },
    models::stats::{DashboardStats, MonthlyStatusCount},
};

// GET /api/stats/dashboard
#[utoipa::path(
    get,
    path = "/api/stats/dashboard",
    tag = "Stats",
    responses(
        (status = 200, description = "Totais de projetos por status", body = DashboardStats),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_dashboard(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
) -> Result<impl IntoResponse, ApiError> {
    let stats = app_state
        .stats_service
        .dashboard()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/stats/monthly (e o alias /api/stats/mensais)
#[utoipa::path(
    get,
    path = "/api/stats/monthly",
    tag = "Stats",
    responses(
        (status = 200, description = "\"YYYY-MM\" -> contagem por status", body = BTreeMap<String, MonthlyStatusCount>),
        (status = 401, description = "Não autorizado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_monthly(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequirePermission<CanRead>,
) -> Result<impl IntoResponse, ApiError> {
    let months = app_state
        .stats_service
        .monthly()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(months)))
}
