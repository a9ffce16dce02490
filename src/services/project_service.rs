// src/services/project_service.rs

use uuid::Uuid;

use crate::{
    common::{error::AppError, validation::required_text},
    db::store::{WorkflowStore, WorkflowTx},
    models::{
        auth::Actor,
        log::{LogAction, NewLog},
        project::{
            ApprovalStatus, CreateProjectPayload, NewProject, Project, ProjectCreated,
            ProjectDetail, ProjectFilter, ProjectSummary, ReplicationReport, UpdateProjectPayload,
        },
    },
    workflow::{
        aggregate::assemble_project_detail,
        approval::{next_status, Transition},
        brand_guidance::ensure_brand_guidance,
        replication::replicate_templates,
    },
};

fn project_not_found() -> AppError {
    AppError::ResourceNotFound("Projeto".into())
}

#[derive(Clone)]
pub struct ProjectService<S: WorkflowStore> {
    store: S,
}

impl<S: WorkflowStore> ProjectService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // --- CREATE PROJECT ---
    // Projeto + vínculo de ambientes + replicação + orientação de marcas + log, numa transação só.
    pub async fn create(&self, actor: &Actor, payload: CreateProjectPayload) -> Result<ProjectCreated, AppError> {
        let name = required_text(&payload.name, "nome do projeto")?.to_string();
        let mut environment_ids = payload.environment_ids;
        environment_ids.sort();
        environment_ids.dedup();

        let mut tx = self.store.begin().await?;

        let environments = tx.find_environments(&environment_ids).await?;
        if environments.len() != environment_ids.len() {
            return Err(AppError::ResourceNotFound("Ambiente".into()));
        }

        let new = NewProject {
            name,
            project_type: payload.project_type,
            delivery_date: payload.delivery_date,
            description: payload.description,
        };
        let project = tx.insert_project(&new, actor.id).await?;
        tx.link_environments(project.id, &environment_ids).await?;

        let (replication, created) = replicate_templates(&mut tx, project.id, &environments).await?;
        ensure_brand_guidance(&mut tx, &created).await?;

        tx.insert_log(
            &NewLog::new(actor.id, LogAction::Create, Some(project.id))
                .with_reason(format!("Projeto '{}' criado", project.name)),
        )
        .await?;
        tx.commit().await?;

        tracing::info!(
            "Projeto {} ('{}') criado por {}: {} itens replicados",
            project.id,
            project.name,
            actor.email,
            replication.created
        );
        Ok(ProjectCreated { project, replication })
    }

    pub async fn get(&self, id: Uuid) -> Result<Project, AppError> {
        let mut tx = self.store.begin().await?;
        tx.find_project(id).await?.ok_or_else(project_not_found)
    }

    pub async fn list(&self, filter: &ProjectFilter) -> Result<Vec<ProjectSummary>, AppError> {
        let status = match filter.status.as_deref() {
            Some(raw) => Some(
                ApprovalStatus::parse_loose(raw)
                    .ok_or_else(|| AppError::InvalidInput(format!("status '{}'", raw)))?,
            ),
            None => None,
        };
        let mut tx = self.store.begin().await?;
        tx.list_projects(status).await
    }

    /// Visão aninhada Projeto -> Ambientes -> Materiais, com a orientação de marcas aplicável.
    pub async fn detail(&self, id: Uuid) -> Result<ProjectDetail, AppError> {
        let mut tx = self.store.begin().await?;

        let project = tx.find_project(id).await?.ok_or_else(project_not_found)?;
        let owner_email = match project.owner_id {
            Some(owner_id) => tx.user_email(owner_id).await?,
            None => None,
        };
        let environments = tx.project_environments(id).await?;
        let materials = tx.project_materials(id).await?;
        let catalog = tx.brand_descriptions().await?;

        Ok(assemble_project_detail(project, owner_email, environments, materials, &catalog))
    }

    pub async fn update(&self, actor: &Actor, id: Uuid, payload: UpdateProjectPayload) -> Result<Project, AppError> {
        let name = payload
            .name
            .as_deref()
            .map(|n| required_text(n, "nome do projeto").map(str::to_string))
            .transpose()?;

        let mut tx = self.store.begin().await?;

        let mut project = tx.find_project(id).await?.ok_or_else(project_not_found)?;
        if let Some(name) = name {
            project.name = name;
        }
        if let Some(project_type) = payload.project_type {
            project.project_type = project_type;
        }
        if let Some(delivery_date) = payload.delivery_date {
            project.delivery_date = delivery_date;
        }
        if let Some(description) = payload.description {
            project.description = Some(description);
        }

        let updated = tx.update_project(&project).await?;
        tx.insert_log(
            &NewLog::new(actor.id, LogAction::Edit, Some(id)).with_reason("Dados do projeto atualizados"),
        )
        .await?;
        tx.commit().await?;

        tracing::info!("Projeto {} atualizado por {}", id, actor.email);
        Ok(updated)
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_project(id).await? {
            return Err(project_not_found());
        }
        tx.commit().await?;
        tracing::info!("Projeto {} excluído por {}", id, actor.email);
        Ok(())
    }

    pub async fn approve(&self, actor: &Actor, id: Uuid) -> Result<Project, AppError> {
        self.transition(actor, id, Transition::Approve, None).await
    }

    pub async fn reject(&self, actor: &Actor, id: Uuid, reason: &str) -> Result<Project, AppError> {
        self.transition(actor, id, Transition::Reject, Some(reason.trim())).await
    }

    /// Volta para PENDING e leva junto todos os materiais do projeto.
    pub async fn revert(&self, actor: &Actor, id: Uuid) -> Result<Project, AppError> {
        self.transition(actor, id, Transition::Revert, None).await
    }

    async fn transition(
        &self,
        actor: &Actor,
        id: Uuid,
        transition: Transition,
        reason: Option<&str>,
    ) -> Result<Project, AppError> {
        let mut tx = self.store.begin().await?;

        let project = tx.find_project(id).await?.ok_or_else(project_not_found)?;
        let next = next_status(project.status, transition)?;
        let updated = tx.set_project_status(id, next).await?;

        let log = match transition {
            Transition::Approve => NewLog::new(actor.id, LogAction::Approve, Some(id)),
            Transition::Reject => {
                let log = NewLog::new(actor.id, LogAction::Reject, Some(id));
                match reason.filter(|r| !r.is_empty()) {
                    Some(reason) => log.with_reason(reason),
                    None => log,
                }
            }
            Transition::Revert => {
                let reverted = tx.reset_project_materials(id).await?;
                NewLog::new(actor.id, LogAction::Edit, Some(id))
                    .with_reason(format!("Reversão em massa: {} itens voltaram para PENDING", reverted))
            }
        };
        tx.insert_log(&log).await?;
        tx.commit().await?;

        tracing::info!(
            "Projeto {}: {} -> {} por {}",
            id,
            project.status.as_str(),
            next.as_str(),
            actor.email
        );
        Ok(updated)
    }

    /// Reexecuta a replicação. Só cria o que falta; sem novidades, não há log.
    pub async fn replicate(&self, actor: &Actor, id: Uuid) -> Result<ReplicationReport, AppError> {
        let mut tx = self.store.begin().await?;

        tx.find_project(id).await?.ok_or_else(project_not_found)?;
        let environments = tx.project_environments(id).await?;

        let (report, created) = replicate_templates(&mut tx, id, &environments).await?;
        if created.is_empty() {
            return Ok(report);
        }

        ensure_brand_guidance(&mut tx, &created).await?;
        tx.insert_log(
            &NewLog::new(actor.id, LogAction::Edit, Some(id))
                .with_reason(format!("Replicação de templates: {} itens criados", report.created)),
        )
        .await?;
        tx.commit().await?;

        tracing::info!("Projeto {}: replicação criou {} itens", id, report.created);
        Ok(report)
    }
}
