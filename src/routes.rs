// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/auth/login", post(handlers::auth::login));

    let user_routes = Router::new()
        .route("/users/me", get(handlers::auth::get_me))
        .route(
            "/users",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route(
            "/users/{id}",
            patch(handlers::users::update_user).delete(handlers::users::delete_user),
        )
        .route("/users/{id}/reset-password", post(handlers::users::reset_password));

    let project_routes = Router::new()
        .route(
            "/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(handlers::projects::get_project)
                .patch(handlers::projects::update_project)
                .delete(handlers::projects::delete_project),
        )
        .route("/projects/{id}/approve", post(handlers::projects::approve_project))
        .route("/projects/{id}/reject", post(handlers::projects::reject_project))
        .route("/projects/{id}/revert", post(handlers::projects::revert_project))
        .route("/projects/{id}/replicate", post(handlers::projects::replicate_project))
        .route("/projects/{id}/memorial.pdf", get(handlers::documents::memorial_pdf));

    let material_routes = Router::new()
        .route(
            "/materials",
            get(handlers::materials::list_materials).post(handlers::materials::create_material),
        )
        .route(
            "/materials/{id}",
            get(handlers::materials::get_material)
                .patch(handlers::materials::update_material)
                .delete(handlers::materials::delete_material),
        )
        .route("/materials/{id}/approve", post(handlers::materials::approve_material))
        .route("/materials/{id}/reject", post(handlers::materials::reject_material))
        .route("/materials/{id}/revert", post(handlers::materials::revert_material))
        .route(
            "/templates",
            get(handlers::materials::list_templates).post(handlers::materials::create_template),
        )
        .route("/templates/{id}", patch(handlers::materials::update_template));

    let catalog_routes = Router::new()
        .route(
            "/environments",
            get(handlers::catalog::list_environments).post(handlers::catalog::create_environment),
        )
        .route(
            "/environments/{id}",
            get(handlers::catalog::get_environment)
                .patch(handlers::catalog::update_environment)
                .delete(handlers::catalog::delete_environment),
        )
        .route(
            "/environment-types",
            get(handlers::catalog::list_environment_types)
                .post(handlers::catalog::create_environment_type),
        )
        .route(
            "/environment-types/{id}",
            axum::routing::delete(handlers::catalog::delete_environment_type),
        )
        .route(
            "/brands",
            get(handlers::catalog::list_brands).post(handlers::catalog::create_brand),
        )
        .route("/brands/{id}", axum::routing::delete(handlers::catalog::delete_brand))
        .route("/brands-description", get(handlers::catalog::list_brand_descriptions))
        .route("/brands-description/save", post(handlers::catalog::save_brand_description));

    let report_routes = Router::new()
        .route("/logs", get(handlers::logs::list_logs))
        .route("/stats/dashboard", get(handlers::stats::get_dashboard))
        .route("/stats/monthly", get(handlers::stats::get_monthly))
        .route("/stats/mensais", get(handlers::stats::get_monthly))
        .route("/documents", get(handlers::documents::list_documents))
        .route("/documents/define", post(handlers::documents::define_document));

    // Tudo abaixo exige Bearer token válido
    let protected_routes = Router::new()
        .merge(user_routes)
        .merge(project_routes)
        .merge(material_routes)
        .merge(catalog_routes)
        .merge(report_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .nest("/api", public_routes.merge(protected_routes))
        .with_state(app_state)
}
