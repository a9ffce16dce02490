// src/db/memory.rs
//
// WorkflowStore em memória para os testes de serviço.
// A transação trabalha numa cópia do estado: commit grava, drop descarta.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{WorkflowStore, WorkflowTx},
    models::{
        catalog::{Brand, BrandDescription, Environment, EnvironmentCategory},
        log::{LogEntry, NewLog},
        material::{MaterialFilter, MaterialItem, MaterialSpec, MaterialView, NewMaterial},
        project::{ApprovalStatus, NewProject, Project, ProjectSummary},
    },
};

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub projects: Vec<Project>,
    pub environments: Vec<Environment>,
    pub project_environments: Vec<(Uuid, Uuid)>,
    pub materials: Vec<MaterialSpec>,
    pub brands: Vec<Brand>,
    pub brand_descriptions: Vec<BrandDescription>,
    pub logs: Vec<LogEntry>,
    pub users: Vec<(Uuid, String)>,
    // Simula falha de banco na gravação do log
    pub fail_log_inserts: bool,
}

impl MemoryState {
    fn environment_name(&self, id: Uuid) -> String {
        self.environments
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    }

    fn view(&self, spec: &MaterialSpec) -> MaterialView {
        MaterialView {
            item_label: spec.item.label().to_string(),
            brand_name: spec
                .brand_id
                .and_then(|id| self.brands.iter().find(|b| b.id == id))
                .map(|b| b.name.clone()),
            approver_email: spec
                .approver_id
                .and_then(|id| self.users.iter().find(|(uid, _)| *uid == id))
                .map(|(_, email)| email.clone()),
            spec: spec.clone(),
        }
    }

    fn sorted_views<'a>(&self, specs: impl Iterator<Item = &'a MaterialSpec>) -> Vec<MaterialView> {
        let mut views: Vec<MaterialView> = specs.map(|s| self.view(s)).collect();
        views.sort_by(|a, b| {
            self.environment_name(a.spec.environment_id)
                .cmp(&self.environment_name(b.spec.environment_id))
                .then(a.spec.item.cmp(&b.spec.item))
        });
        views
    }

    fn conflicts(&self, new: &NewMaterial) -> bool {
        self.materials.iter().any(|m| {
            m.project_id == new.project_id
                && m.environment_id == new.environment_id
                && m.item == new.item
        })
    }
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    pub async fn seed<F: FnOnce(&mut MemoryState)>(&self, f: F) {
        f(&mut *self.state.lock().await);
    }

    pub async fn add_user(&self, email: &str) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().await.users.push((id, email.to_string()));
        id
    }

    pub async fn add_environment(&self, name: &str) -> Environment {
        let environment = Environment {
            id: Uuid::new_v4(),
            name: name.to_string(),
            category: EnvironmentCategory::PrivateUnit,
            color_guide: None,
            item_notes: Json(Default::default()),
            environment_type_id: None,
            created_at: Utc::now(),
        };
        self.state.lock().await.environments.push(environment.clone());
        environment
    }

    pub async fn add_template(&self, environment_id: Uuid, item: MaterialItem, description: &str) -> MaterialSpec {
        let template = MaterialSpec {
            id: Uuid::new_v4(),
            project_id: None,
            environment_id,
            item,
            description: description.to_string(),
            brand_id: None,
            status: ApprovalStatus::Pending,
            rejection_reason: None,
            approver_id: None,
            approved_at: None,
            updated_at: Utc::now(),
        };
        self.state.lock().await.materials.push(template.clone());
        template
    }

    pub async fn add_brand(&self, name: &str) -> Brand {
        let brand = Brand { id: Uuid::new_v4(), name: name.to_string(), created_at: Utc::now() };
        self.state.lock().await.brands.push(brand.clone());
        brand
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    work: MemoryState,
}

#[async_trait]
impl WorkflowStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, AppError> {
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(MemoryTx { guard, work })
    }
}

#[async_trait]
impl WorkflowTx for MemoryTx {
    async fn insert_project(&mut self, new: &NewProject, owner_id: Uuid) -> Result<Project, AppError> {
        if self.work.projects.iter().any(|p| p.name == new.name) {
            return Err(AppError::ProjectNameAlreadyExists(new.name.clone()));
        }
        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: new.name.clone(),
            project_type: new.project_type,
            delivery_date: new.delivery_date,
            description: new.description.clone(),
            status: ApprovalStatus::Pending,
            owner_id: Some(owner_id),
            created_at: now,
            updated_at: now,
        };
        self.work.projects.push(project.clone());
        Ok(project)
    }

    async fn find_project(&mut self, id: Uuid) -> Result<Option<Project>, AppError> {
        Ok(self.work.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn update_project(&mut self, project: &Project) -> Result<Project, AppError> {
        if self.work.projects.iter().any(|p| p.name == project.name && p.id != project.id) {
            return Err(AppError::ProjectNameAlreadyExists(project.name.clone()));
        }
        let stored = self
            .work
            .projects
            .iter_mut()
            .find(|p| p.id == project.id)
            .ok_or_else(|| AppError::ResourceNotFound("Projeto".into()))?;
        stored.name = project.name.clone();
        stored.project_type = project.project_type;
        stored.delivery_date = project.delivery_date;
        stored.description = project.description.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn set_project_status(&mut self, id: Uuid, status: ApprovalStatus) -> Result<Project, AppError> {
        let stored = self
            .work
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::ResourceNotFound("Projeto".into()))?;
        stored.status = status;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn delete_project(&mut self, id: Uuid) -> Result<bool, AppError> {
        let before = self.work.projects.len();
        self.work.projects.retain(|p| p.id != id);
        if self.work.projects.len() == before {
            return Ok(false);
        }
        // cascata / SET NULL, como no banco
        self.work.materials.retain(|m| m.project_id != Some(id));
        self.work.project_environments.retain(|(p, _)| *p != id);
        for log in self.work.logs.iter_mut().filter(|l| l.project_id == Some(id)) {
            log.project_id = None;
        }
        Ok(true)
    }

    async fn list_projects(&mut self, status: Option<ApprovalStatus>) -> Result<Vec<ProjectSummary>, AppError> {
        let mut projects: Vec<ProjectSummary> = self
            .work
            .projects
            .iter()
            .filter(|p| status.is_none_or(|s| p.status == s))
            .map(|p| ProjectSummary {
                owner_email: p
                    .owner_id
                    .and_then(|id| self.work.users.iter().find(|(uid, _)| *uid == id))
                    .map(|(_, email)| email.clone()),
                environment_count: self
                    .work
                    .project_environments
                    .iter()
                    .filter(|(pid, _)| *pid == p.id)
                    .count() as i64,
                project: p.clone(),
            })
            .collect();
        projects.sort_by(|a, b| b.project.created_at.cmp(&a.project.created_at));
        Ok(projects)
    }

    async fn user_email(&mut self, user_id: Uuid) -> Result<Option<String>, AppError> {
        Ok(self
            .work
            .users
            .iter()
            .find(|(id, _)| *id == user_id)
            .map(|(_, email)| email.clone()))
    }

    async fn find_environments(&mut self, ids: &[Uuid]) -> Result<Vec<Environment>, AppError> {
        let mut found: Vec<Environment> = self
            .work
            .environments
            .iter()
            .filter(|e| ids.contains(&e.id))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn link_environments(&mut self, project_id: Uuid, environment_ids: &[Uuid]) -> Result<(), AppError> {
        for environment_id in environment_ids {
            let link = (project_id, *environment_id);
            if !self.work.project_environments.contains(&link) {
                self.work.project_environments.push(link);
            }
        }
        Ok(())
    }

    async fn project_environments(&mut self, project_id: Uuid) -> Result<Vec<Environment>, AppError> {
        let ids: Vec<Uuid> = self
            .work
            .project_environments
            .iter()
            .filter(|(p, _)| *p == project_id)
            .map(|(_, e)| *e)
            .collect();
        self.find_environments(&ids).await
    }

    async fn templates_for_environment_name(&mut self, name: &str) -> Result<Vec<MaterialSpec>, AppError> {
        let environment_ids: Vec<Uuid> = self
            .work
            .environments
            .iter()
            .filter(|e| e.name == name)
            .map(|e| e.id)
            .collect();
        let mut templates: Vec<MaterialSpec> = self
            .work
            .materials
            .iter()
            .filter(|m| m.is_template() && environment_ids.contains(&m.environment_id))
            .cloned()
            .collect();
        templates.sort_by_key(|t| t.item);
        Ok(templates)
    }

    async fn list_templates(&mut self, environment_id: Option<Uuid>) -> Result<Vec<MaterialView>, AppError> {
        let state = &self.work;
        Ok(state.sorted_views(
            state
                .materials
                .iter()
                .filter(|m| m.is_template())
                .filter(|m| environment_id.is_none_or(|id| m.environment_id == id)),
        ))
    }

    async fn insert_material_if_absent(&mut self, new: &NewMaterial) -> Result<Option<MaterialSpec>, AppError> {
        if self.work.conflicts(new) {
            return Ok(None);
        }
        self.insert_material(new).await.map(Some)
    }

    async fn insert_material(&mut self, new: &NewMaterial) -> Result<MaterialSpec, AppError> {
        if self.work.conflicts(new) {
            return Err(AppError::MaterialAlreadyExists { item: new.item.code().to_string() });
        }
        let spec = MaterialSpec {
            id: Uuid::new_v4(),
            project_id: new.project_id,
            environment_id: new.environment_id,
            item: new.item,
            description: new.description.clone(),
            brand_id: new.brand_id,
            status: ApprovalStatus::Pending,
            rejection_reason: None,
            approver_id: None,
            approved_at: None,
            updated_at: Utc::now(),
        };
        self.work.materials.push(spec.clone());
        Ok(spec)
    }

    async fn find_material(&mut self, id: Uuid) -> Result<Option<MaterialSpec>, AppError> {
        Ok(self.work.materials.iter().find(|m| m.id == id).cloned())
    }

    async fn material_view(&mut self, id: Uuid) -> Result<Option<MaterialView>, AppError> {
        let state = &self.work;
        Ok(state.materials.iter().find(|m| m.id == id).map(|m| state.view(m)))
    }

    async fn save_material(&mut self, spec: &MaterialSpec) -> Result<MaterialSpec, AppError> {
        let stored = self
            .work
            .materials
            .iter_mut()
            .find(|m| m.id == spec.id)
            .ok_or_else(|| AppError::ResourceNotFound("Material".into()))?;
        *stored = MaterialSpec { updated_at: Utc::now(), ..spec.clone() };
        Ok(stored.clone())
    }

    async fn delete_material(&mut self, id: Uuid) -> Result<bool, AppError> {
        let before = self.work.materials.len();
        self.work.materials.retain(|m| m.id != id);
        Ok(self.work.materials.len() < before)
    }

    async fn reset_project_materials(&mut self, project_id: Uuid) -> Result<u64, AppError> {
        let mut changed = 0;
        for spec in self.work.materials.iter_mut().filter(|m| m.project_id == Some(project_id)) {
            spec.status = ApprovalStatus::Pending;
            spec.approver_id = None;
            spec.approved_at = None;
            spec.rejection_reason = None;
            spec.updated_at = Utc::now();
            changed += 1;
        }
        Ok(changed)
    }

    async fn project_materials(&mut self, project_id: Uuid) -> Result<Vec<MaterialView>, AppError> {
        let state = &self.work;
        Ok(state.sorted_views(state.materials.iter().filter(|m| m.project_id == Some(project_id))))
    }

    async fn list_materials(&mut self, filter: &MaterialFilter) -> Result<Vec<MaterialView>, AppError> {
        let state = &self.work;
        Ok(state.sorted_views(state.materials.iter().filter(|m| {
            !m.is_template()
                && filter.project.is_none_or(|id| m.project_id == Some(id))
                && filter.environment.is_none_or(|id| m.environment_id == id)
        })))
    }

    async fn brand_exists(&mut self, brand_id: Uuid) -> Result<bool, AppError> {
        Ok(self.work.brands.iter().any(|b| b.id == brand_id))
    }

    async fn brand_descriptions(&mut self) -> Result<Vec<BrandDescription>, AppError> {
        Ok(self.work.brand_descriptions.clone())
    }

    async fn insert_brand_description(&mut self, material: &str, brands: &str) -> Result<BrandDescription, AppError> {
        let lower = material.to_lowercase();
        if self.work.brand_descriptions.iter().any(|d| d.material.to_lowercase() == lower) {
            return Err(AppError::NameAlreadyExists(material.to_string()));
        }
        let now = Utc::now();
        let entry = BrandDescription {
            id: Uuid::new_v4(),
            material: material.to_string(),
            brands: brands.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.work.brand_descriptions.push(entry.clone());
        Ok(entry)
    }

    async fn insert_log(&mut self, log: &NewLog) -> Result<LogEntry, AppError> {
        if self.work.fail_log_inserts {
            return Err(AppError::InternalServerError(anyhow::anyhow!("falha simulada no log")));
        }
        let entry = LogEntry {
            id: Uuid::new_v4(),
            user_id: Some(log.user_id),
            action: log.action,
            project_id: log.project_id,
            reason: log.reason.clone(),
            created_at: Utc::now(),
        };
        self.work.logs.push(entry.clone());
        Ok(entry)
    }

    async fn commit(self) -> Result<(), AppError> {
        let MemoryTx { mut guard, work } = self;
        *guard = work;
        Ok(())
    }
}
