// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health,

        // --- Auth / Users ---
        handlers::auth::login,
        handlers::auth::get_me,
        handlers::users::list_users,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,
        handlers::users::reset_password,

        // --- Projects ---
        handlers::projects::list_projects,
        handlers::projects::get_project,
        handlers::projects::create_project,
        handlers::projects::update_project,
        handlers::projects::delete_project,
        handlers::projects::approve_project,
        handlers::projects::reject_project,
        handlers::projects::revert_project,
        handlers::projects::replicate_project,

        // --- Materials / Templates ---
        handlers::materials::list_materials,
        handlers::materials::get_material,
        handlers::materials::create_material,
        handlers::materials::update_material,
        handlers::materials::delete_material,
        handlers::materials::approve_material,
        handlers::materials::reject_material,
        handlers::materials::revert_material,
        handlers::materials::list_templates,
        handlers::materials::create_template,
        handlers::materials::update_template,

        // --- Catalog ---
        handlers::catalog::list_environments,
        handlers::catalog::get_environment,
        handlers::catalog::create_environment,
        handlers::catalog::update_environment,
        handlers::catalog::delete_environment,
        handlers::catalog::list_environment_types,
        handlers::catalog::create_environment_type,
        handlers::catalog::delete_environment_type,
        handlers::catalog::list_brands,
        handlers::catalog::create_brand,
        handlers::catalog::delete_brand,
        handlers::catalog::list_brand_descriptions,
        handlers::catalog::save_brand_description,

        // --- Logs / Stats / Documents ---
        handlers::logs::list_logs,
        handlers::stats::get_dashboard,
        handlers::stats::get_monthly,
        handlers::documents::define_document,
        handlers::documents::list_documents,
        handlers::documents::memorial_pdf,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::Actor,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::auth::CreateUserPayload,
            models::auth::UpdateUserPayload,
            models::auth::PasswordResetResponse,

            // --- Projects ---
            models::project::ApprovalStatus,
            models::project::ProjectType,
            models::project::Project,
            models::project::ProjectSummary,
            models::project::ProjectDetail,
            models::project::EnvironmentDetail,
            models::project::ProjectCreated,
            models::project::ReplicationReport,
            models::project::StatusResponse,
            models::project::CreateProjectPayload,
            models::project::UpdateProjectPayload,

            // --- Materials ---
            models::material::MaterialItem,
            models::material::MaterialSpec,
            models::material::MaterialView,
            models::material::CreateMaterialPayload,
            models::material::UpdateMaterialPayload,
            models::material::RejectPayload,
            models::material::CreateTemplatePayload,
            models::material::UpdateTemplatePayload,

            // --- Catalog ---
            models::catalog::EnvironmentCategory,
            models::catalog::Environment,
            models::catalog::EnvironmentType,
            models::catalog::Brand,
            models::catalog::BrandDescription,
            models::catalog::CreateEnvironmentPayload,
            models::catalog::UpdateEnvironmentPayload,
            models::catalog::NamePayload,
            models::catalog::SaveBrandDescriptionPayload,

            // --- Logs / Stats / Documents ---
            models::log::LogAction,
            models::log::LogEntry,
            models::log::LogView,
            models::stats::DashboardStats,
            models::stats::MonthlyStatusCount,
            models::document::DocumentModel,
            models::document::DefineDocumentPayload,
        )
    ),
    tags(
        (name = "Health", description = "Disponibilidade do serviço"),
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Usuários e cargos"),
        (name = "Projects", description = "Projetos e fluxo de aprovação"),
        (name = "Materials", description = "Itens do memorial por projeto e ambiente"),
        (name = "Templates", description = "Memorial base (linhas-modelo por ambiente)"),
        (name = "Catalog", description = "Ambientes, tipos, marcas e orientação de marcas"),
        (name = "Logs", description = "Trilha de auditoria"),
        (name = "Stats", description = "Indicadores de projetos"),
        (name = "Documents", description = "Modelos de documento e memorial em PDF")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
