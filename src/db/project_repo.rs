// src/db/project_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::{
        catalog::Environment,
        project::{ApprovalStatus, NewProject, Project, ProjectSummary},
    },
};

const PROJECT_COLUMNS: &str = r#"
    p.id, p.name, p.project_type, p.delivery_date, p.description,
    p.status, p.owner_id, p.created_at, p.updated_at
"#;

fn map_project_error(err: sqlx::Error, name: &str) -> AppError {
    map_unique_violation(err, |constraint| match constraint {
        "projects_name_key" => Some(AppError::ProjectNameAlreadyExists(name.to_string())),
        _ => None,
    })
}

#[derive(Clone, Default)]
pub struct ProjectRepository;

impl ProjectRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(&self, executor: E, new: &NewProject, owner_id: Uuid) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (name, project_type, delivery_date, description, owner_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, project_type, delivery_date, description,
                      status, owner_id, created_at, updated_at
            "#,
        )
        .bind(&new.name)
        .bind(new.project_type)
        .bind(new.delivery_date)
        .bind(&new.description)
        .bind(owner_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_project_error(e, &new.name))
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM projects p WHERE p.id = $1", PROJECT_COLUMNS);
        let project = sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(project)
    }

    pub async fn update<'e, E>(&self, executor: E, project: &Project) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET name = $2, project_type = $3, delivery_date = $4, description = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, project_type, delivery_date, description,
                      status, owner_id, created_at, updated_at
            "#,
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(project.project_type)
        .bind(project.delivery_date)
        .bind(&project.description)
        .fetch_one(executor)
        .await
        .map_err(|e| map_project_error(e, &project.name))
    }

    pub async fn set_status<'e, E>(&self, executor: E, id: Uuid, status: ApprovalStatus) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, project_type, delivery_date, description,
                      status, owner_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Projeto".into()))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list<'e, E>(&self, executor: E, status: Option<ApprovalStatus>) -> Result<Vec<ProjectSummary>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {},
                   u.email AS owner_email,
                   (SELECT COUNT(*) FROM project_environments pe WHERE pe.project_id = p.id) AS environment_count
            FROM projects p
            LEFT JOIN users u ON u.id = p.owner_id
            WHERE ($1::approval_status IS NULL OR p.status = $1)
            ORDER BY p.created_at DESC
            "#,
            PROJECT_COLUMNS
        );
        let projects = sqlx::query_as::<_, ProjectSummary>(&sql)
            .bind(status)
            .fetch_all(executor)
            .await?;
        Ok(projects)
    }

    pub async fn link_environments<'e, E>(&self, executor: E, project_id: Uuid, environment_ids: &[Uuid]) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        if environment_ids.is_empty() {
            return Ok(());
        }
        sqlx::query(
            r#"
            INSERT INTO project_environments (project_id, environment_id)
            SELECT $1, unnest($2::uuid[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(project_id)
        .bind(environment_ids)
        .execute(executor)
        .await?;
        Ok(())
    }

    pub async fn environments<'e, E>(&self, executor: E, project_id: Uuid) -> Result<Vec<Environment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let environments = sqlx::query_as::<_, Environment>(
            r#"
            SELECT e.id, e.name, e.category, e.color_guide, e.item_notes,
                   e.environment_type_id, e.created_at
            FROM environments e
            JOIN project_environments pe ON pe.environment_id = e.id
            WHERE pe.project_id = $1
            ORDER BY e.name
            "#,
        )
        .bind(project_id)
        .fetch_all(executor)
        .await?;
        Ok(environments)
    }
}
