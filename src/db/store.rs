// src/db/store.rs
//
// Fronteira transacional usada pelos serviços de workflow (projetos e materiais).
// Cada operação abre UMA transação: commit grava tudo (inclusive o Log),
// drop sem commit faz rollback.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{CatalogRepository, LogRepository, MaterialRepository, ProjectRepository, UserRepository},
    models::{
        catalog::{BrandDescription, Environment},
        log::{LogEntry, NewLog},
        material::{MaterialFilter, MaterialSpec, MaterialView, NewMaterial},
        project::{ApprovalStatus, NewProject, Project, ProjectSummary},
    },
};

#[async_trait]
pub trait WorkflowStore: Clone + Send + Sync + 'static {
    type Tx: WorkflowTx;

    async fn begin(&self) -> Result<Self::Tx, AppError>;
}

#[async_trait]
pub trait WorkflowTx: Send + Sized {
    // --- Projetos ---
    async fn insert_project(&mut self, new: &NewProject, owner_id: Uuid) -> Result<Project, AppError>;
    async fn find_project(&mut self, id: Uuid) -> Result<Option<Project>, AppError>;
    async fn update_project(&mut self, project: &Project) -> Result<Project, AppError>;
    async fn set_project_status(&mut self, id: Uuid, status: ApprovalStatus) -> Result<Project, AppError>;
    async fn delete_project(&mut self, id: Uuid) -> Result<bool, AppError>;
    async fn list_projects(&mut self, status: Option<ApprovalStatus>) -> Result<Vec<ProjectSummary>, AppError>;
    async fn user_email(&mut self, user_id: Uuid) -> Result<Option<String>, AppError>;

    // --- Ambientes do projeto ---
    async fn find_environments(&mut self, ids: &[Uuid]) -> Result<Vec<Environment>, AppError>;
    async fn link_environments(&mut self, project_id: Uuid, environment_ids: &[Uuid]) -> Result<(), AppError>;
    /// Ordenados por nome.
    async fn project_environments(&mut self, project_id: Uuid) -> Result<Vec<Environment>, AppError>;

    // --- Materiais e templates ---
    async fn templates_for_environment_name(&mut self, name: &str) -> Result<Vec<MaterialSpec>, AppError>;
    async fn list_templates(&mut self, environment_id: Option<Uuid>) -> Result<Vec<MaterialView>, AppError>;
    /// Cria se ainda não existir linha para (projeto, ambiente, item). `None` = já existia.
    async fn insert_material_if_absent(&mut self, new: &NewMaterial) -> Result<Option<MaterialSpec>, AppError>;
    /// Duplicata => `AppError::MaterialAlreadyExists`.
    async fn insert_material(&mut self, new: &NewMaterial) -> Result<MaterialSpec, AppError>;
    async fn find_material(&mut self, id: Uuid) -> Result<Option<MaterialSpec>, AppError>;
    async fn material_view(&mut self, id: Uuid) -> Result<Option<MaterialView>, AppError>;
    async fn save_material(&mut self, spec: &MaterialSpec) -> Result<MaterialSpec, AppError>;
    async fn delete_material(&mut self, id: Uuid) -> Result<bool, AppError>;
    /// Volta todos os materiais do projeto para PENDING. Retorna quantas linhas mudaram.
    async fn reset_project_materials(&mut self, project_id: Uuid) -> Result<u64, AppError>;
    /// Ordenados por ambiente e tipo de item.
    async fn project_materials(&mut self, project_id: Uuid) -> Result<Vec<MaterialView>, AppError>;
    async fn list_materials(&mut self, filter: &MaterialFilter) -> Result<Vec<MaterialView>, AppError>;
    async fn brand_exists(&mut self, brand_id: Uuid) -> Result<bool, AppError>;

    // --- Orientação de marcas ---
    async fn brand_descriptions(&mut self) -> Result<Vec<BrandDescription>, AppError>;
    async fn insert_brand_description(&mut self, material: &str, brands: &str) -> Result<BrandDescription, AppError>;

    // --- Auditoria ---
    async fn insert_log(&mut self, log: &NewLog) -> Result<LogEntry, AppError>;

    async fn commit(self) -> Result<(), AppError>;
}

// --- Implementação Postgres ---

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    projects: ProjectRepository,
    materials: MaterialRepository,
    catalog: CatalogRepository,
    logs: LogRepository,
    users: UserRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            projects: ProjectRepository::new(),
            materials: MaterialRepository::new(),
            catalog: CatalogRepository::new(pool.clone()),
            logs: LogRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            pool,
        }
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
    store: PgStore,
}

#[async_trait]
impl WorkflowStore for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, AppError> {
        let tx = self.pool.begin().await?;
        Ok(PgTx { tx, store: self.clone() })
    }
}

#[async_trait]
impl WorkflowTx for PgTx {
    async fn insert_project(&mut self, new: &NewProject, owner_id: Uuid) -> Result<Project, AppError> {
        self.store.projects.insert(&mut *self.tx, new, owner_id).await
    }

    async fn find_project(&mut self, id: Uuid) -> Result<Option<Project>, AppError> {
        self.store.projects.find_by_id(&mut *self.tx, id).await
    }

    async fn update_project(&mut self, project: &Project) -> Result<Project, AppError> {
        self.store.projects.update(&mut *self.tx, project).await
    }

    async fn set_project_status(&mut self, id: Uuid, status: ApprovalStatus) -> Result<Project, AppError> {
        self.store.projects.set_status(&mut *self.tx, id, status).await
    }

    async fn delete_project(&mut self, id: Uuid) -> Result<bool, AppError> {
        self.store.projects.delete(&mut *self.tx, id).await
    }

    async fn list_projects(&mut self, status: Option<ApprovalStatus>) -> Result<Vec<ProjectSummary>, AppError> {
        self.store.projects.list(&mut *self.tx, status).await
    }

    async fn user_email(&mut self, user_id: Uuid) -> Result<Option<String>, AppError> {
        let user = self.store.users.find_by_id(&mut *self.tx, user_id).await?;
        Ok(user.map(|u| u.email))
    }

    async fn find_environments(&mut self, ids: &[Uuid]) -> Result<Vec<Environment>, AppError> {
        self.store.catalog.find_environments(&mut *self.tx, ids).await
    }

    async fn link_environments(&mut self, project_id: Uuid, environment_ids: &[Uuid]) -> Result<(), AppError> {
        self.store.projects.link_environments(&mut *self.tx, project_id, environment_ids).await
    }

    async fn project_environments(&mut self, project_id: Uuid) -> Result<Vec<Environment>, AppError> {
        self.store.projects.environments(&mut *self.tx, project_id).await
    }

    async fn templates_for_environment_name(&mut self, name: &str) -> Result<Vec<MaterialSpec>, AppError> {
        self.store.materials.templates_for_environment_name(&mut *self.tx, name).await
    }

    async fn list_templates(&mut self, environment_id: Option<Uuid>) -> Result<Vec<MaterialView>, AppError> {
        self.store.materials.list_templates(&mut *self.tx, environment_id).await
    }

    async fn insert_material_if_absent(&mut self, new: &NewMaterial) -> Result<Option<MaterialSpec>, AppError> {
        self.store.materials.insert_if_absent(&mut *self.tx, new).await
    }

    async fn insert_material(&mut self, new: &NewMaterial) -> Result<MaterialSpec, AppError> {
        self.store.materials.insert(&mut *self.tx, new).await
    }

    async fn find_material(&mut self, id: Uuid) -> Result<Option<MaterialSpec>, AppError> {
        self.store.materials.find_by_id(&mut *self.tx, id).await
    }

    async fn material_view(&mut self, id: Uuid) -> Result<Option<MaterialView>, AppError> {
        self.store.materials.view_by_id(&mut *self.tx, id).await
    }

    async fn save_material(&mut self, spec: &MaterialSpec) -> Result<MaterialSpec, AppError> {
        self.store.materials.save(&mut *self.tx, spec).await
    }

    async fn delete_material(&mut self, id: Uuid) -> Result<bool, AppError> {
        self.store.materials.delete(&mut *self.tx, id).await
    }

    async fn reset_project_materials(&mut self, project_id: Uuid) -> Result<u64, AppError> {
        self.store.materials.reset_for_project(&mut *self.tx, project_id).await
    }

    async fn project_materials(&mut self, project_id: Uuid) -> Result<Vec<MaterialView>, AppError> {
        self.store.materials.views_for_project(&mut *self.tx, project_id).await
    }

    async fn list_materials(&mut self, filter: &MaterialFilter) -> Result<Vec<MaterialView>, AppError> {
        self.store.materials.list(&mut *self.tx, filter).await
    }

    async fn brand_exists(&mut self, brand_id: Uuid) -> Result<bool, AppError> {
        let brand = self.store.catalog.find_brand(&mut *self.tx, brand_id).await?;
        Ok(brand.is_some())
    }

    async fn brand_descriptions(&mut self) -> Result<Vec<BrandDescription>, AppError> {
        self.store.catalog.list_brand_descriptions(&mut *self.tx, None).await
    }

    async fn insert_brand_description(&mut self, material: &str, brands: &str) -> Result<BrandDescription, AppError> {
        self.store.catalog.insert_brand_description(&mut *self.tx, material, brands).await
    }

    async fn insert_log(&mut self, log: &NewLog) -> Result<LogEntry, AppError> {
        self.store.logs.insert(&mut *self.tx, log).await
    }

    async fn commit(self) -> Result<(), AppError> {
        self.tx.commit().await?;
        Ok(())
    }
}
