// src/db/material_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::material::{MaterialFilter, MaterialRow, MaterialSpec, MaterialView, NewMaterial},
};

const SPEC_COLUMNS: &str = r#"
    id, project_id, environment_id, item, description, brand_id,
    status, rejection_reason, approver_id, approved_at, updated_at
"#;

// SELECT com os JOINs usados em todas as leituras enriquecidas
const VIEW_SELECT: &str = r#"
    SELECT m.id, m.project_id, m.environment_id, m.item, m.description, m.brand_id,
           m.status, m.rejection_reason, m.approver_id, m.approved_at, m.updated_at,
           b.name AS brand_name,
           u.email AS approver_email
    FROM material_specs m
    JOIN environments e ON e.id = m.environment_id
    LEFT JOIN brands b ON b.id = m.brand_id
    LEFT JOIN users u ON u.id = m.approver_id
"#;

// Só roda dentro das transações do WorkflowStore, por isso não guarda o pool.
#[derive(Clone, Default)]
pub struct MaterialRepository;

impl MaterialRepository {
    pub fn new() -> Self {
        Self
    }

    /// Linhas-modelo cujo ambiente tem o nome informado.
    pub async fn templates_for_environment_name<'e, E>(&self, executor: E, name: &str) -> Result<Vec<MaterialSpec>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let templates = sqlx::query_as::<_, MaterialSpec>(
            r#"
            SELECT m.id, m.project_id, m.environment_id, m.item, m.description, m.brand_id,
                   m.status, m.rejection_reason, m.approver_id, m.approved_at, m.updated_at
            FROM material_specs m
            JOIN environments e ON e.id = m.environment_id
            WHERE m.project_id IS NULL AND e.name = $1
            ORDER BY m.item
            "#,
        )
        .bind(name)
        .fetch_all(executor)
        .await?;
        Ok(templates)
    }

    pub async fn list_templates<'e, E>(&self, executor: E, environment_id: Option<Uuid>) -> Result<Vec<MaterialView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "{} WHERE m.project_id IS NULL AND ($1::uuid IS NULL OR m.environment_id = $1) ORDER BY e.name, m.item",
            VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, MaterialRow>(&sql)
            .bind(environment_id)
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(MaterialView::from).collect())
    }

    /// INSERT ... ON CONFLICT DO NOTHING contra os índices únicos parciais.
    pub async fn insert_if_absent<'e, E>(&self, executor: E, new: &NewMaterial) -> Result<Option<MaterialSpec>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO material_specs (project_id, environment_id, item, description, brand_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT DO NOTHING
            RETURNING {}
            "#,
            SPEC_COLUMNS
        );
        let created = sqlx::query_as::<_, MaterialSpec>(&sql)
            .bind(new.project_id)
            .bind(new.environment_id)
            .bind(new.item)
            .bind(&new.description)
            .bind(new.brand_id)
            .fetch_optional(executor)
            .await?;
        Ok(created)
    }

    pub async fn insert<'e, E>(&self, executor: E, new: &NewMaterial) -> Result<MaterialSpec, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO material_specs (project_id, environment_id, item, description, brand_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            SPEC_COLUMNS
        );
        sqlx::query_as::<_, MaterialSpec>(&sql)
            .bind(new.project_id)
            .bind(new.environment_id)
            .bind(new.item)
            .bind(&new.description)
            .bind(new.brand_id)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                map_unique_violation(e, |constraint| match constraint {
                    "idx_material_specs_project_item" | "idx_material_specs_template_item" => {
                        Some(AppError::MaterialAlreadyExists { item: new.item.code().to_string() })
                    }
                    _ => None,
                })
            })
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<MaterialSpec>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT {} FROM material_specs WHERE id = $1", SPEC_COLUMNS);
        let spec = sqlx::query_as::<_, MaterialSpec>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(spec)
    }

    pub async fn view_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<MaterialView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE m.id = $1", VIEW_SELECT);
        let row = sqlx::query_as::<_, MaterialRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(MaterialView::from))
    }

    /// Grava descrição, marca e os campos de aprovação.
    pub async fn save<'e, E>(&self, executor: E, spec: &MaterialSpec) -> Result<MaterialSpec, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE material_specs
            SET description = $2, brand_id = $3, status = $4, rejection_reason = $5,
                approver_id = $6, approved_at = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SPEC_COLUMNS
        );
        sqlx::query_as::<_, MaterialSpec>(&sql)
            .bind(spec.id)
            .bind(&spec.description)
            .bind(spec.brand_id)
            .bind(spec.status)
            .bind(&spec.rejection_reason)
            .bind(spec.approver_id)
            .bind(spec.approved_at)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Material".into()))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM material_specs WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Reversão em massa do projeto.
    pub async fn reset_for_project<'e, E>(&self, executor: E, project_id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE material_specs
            SET status = 'PENDING', approver_id = NULL, approved_at = NULL,
                rejection_reason = NULL, updated_at = NOW()
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn views_for_project<'e, E>(&self, executor: E, project_id: Uuid) -> Result<Vec<MaterialView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE m.project_id = $1 ORDER BY e.name, m.item", VIEW_SELECT);
        let rows = sqlx::query_as::<_, MaterialRow>(&sql)
            .bind(project_id)
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(MaterialView::from).collect())
    }

    /// Só linhas de projeto; templates têm rota própria.
    pub async fn list<'e, E>(&self, executor: E, filter: &MaterialFilter) -> Result<Vec<MaterialView>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{}
            WHERE m.project_id IS NOT NULL
              AND ($1::uuid IS NULL OR m.project_id = $1)
              AND ($2::uuid IS NULL OR m.environment_id = $2)
            ORDER BY m.project_id, e.name, m.item
            "#,
            VIEW_SELECT
        );
        let rows = sqlx::query_as::<_, MaterialRow>(&sql)
            .bind(filter.project)
            .bind(filter.environment)
            .fetch_all(executor)
            .await?;
        Ok(rows.into_iter().map(MaterialView::from).collect())
    }
}
