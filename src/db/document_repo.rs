// src/db/document_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{common::error::AppError, models::document::DocumentModel};

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, project_id: Uuid, name: &str, description: &str) -> Result<DocumentModel, AppError> {
        let document = sqlx::query_as::<_, DocumentModel>(
            r#"
            INSERT INTO document_models (project_id, name, description)
            VALUES ($1, $2, $3)
            RETURNING id, project_id, name, description, created_at
            "#,
        )
        .bind(project_id)
        .bind(name)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        Ok(document)
    }

    pub async fn list(&self, project_id: Option<Uuid>) -> Result<Vec<DocumentModel>, AppError> {
        let documents = sqlx::query_as::<_, DocumentModel>(
            r#"
            SELECT id, project_id, name, description, created_at
            FROM document_models
            WHERE ($1::uuid IS NULL OR project_id = $1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(documents)
    }
}
