// src/db/catalog_repo.rs
//
// Dados de referência globais: ambientes, tipos de ambiente, marcas
// e orientação de marcas.

use std::collections::BTreeMap;

use sqlx::{types::Json, Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_unique_violation, error::AppError},
    models::{
        catalog::{Brand, BrandDescription, Environment, EnvironmentCategory, EnvironmentType},
        material::MaterialItem,
    },
};

const ENVIRONMENT_COLUMNS: &str =
    "id, name, category, color_guide, item_notes, environment_type_id, created_at";

fn name_conflict(err: sqlx::Error, constraint_name: &'static str, name: &str) -> AppError {
    map_unique_violation(err, |constraint| {
        (constraint == constraint_name).then(|| AppError::NameAlreadyExists(name.to_string()))
    })
}

#[derive(Clone)]
pub struct CatalogRepository {
    pool: PgPool,
}

impl CatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // --- Ambientes ---

    pub async fn list_environments(&self) -> Result<Vec<Environment>, AppError> {
        let sql = format!("SELECT {} FROM environments ORDER BY name", ENVIRONMENT_COLUMNS);
        let environments = sqlx::query_as::<_, Environment>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(environments)
    }

    pub async fn find_environment(&self, id: Uuid) -> Result<Option<Environment>, AppError> {
        let sql = format!("SELECT {} FROM environments WHERE id = $1", ENVIRONMENT_COLUMNS);
        let environment = sqlx::query_as::<_, Environment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(environment)
    }

    pub async fn find_environments<'e, E>(&self, executor: E, ids: &[Uuid]) -> Result<Vec<Environment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "SELECT {} FROM environments WHERE id = ANY($1) ORDER BY name",
            ENVIRONMENT_COLUMNS
        );
        let environments = sqlx::query_as::<_, Environment>(&sql)
            .bind(ids)
            .fetch_all(executor)
            .await?;
        Ok(environments)
    }

    pub async fn create_environment(
        &self,
        name: &str,
        category: EnvironmentCategory,
        color_guide: Option<&str>,
        item_notes: &BTreeMap<MaterialItem, String>,
        environment_type_id: Option<Uuid>,
    ) -> Result<Environment, AppError> {
        let sql = format!(
            r#"
            INSERT INTO environments (name, category, color_guide, item_notes, environment_type_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            ENVIRONMENT_COLUMNS
        );
        sqlx::query_as::<_, Environment>(&sql)
            .bind(name)
            .bind(category)
            .bind(color_guide)
            .bind(Json(item_notes))
            .bind(environment_type_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| name_conflict(e, "environments_name_key", name))
    }

    pub async fn update_environment(&self, environment: &Environment) -> Result<Environment, AppError> {
        let sql = format!(
            r#"
            UPDATE environments
            SET name = $2, category = $3, color_guide = $4, item_notes = $5, environment_type_id = $6
            WHERE id = $1
            RETURNING {}
            "#,
            ENVIRONMENT_COLUMNS
        );
        sqlx::query_as::<_, Environment>(&sql)
            .bind(environment.id)
            .bind(&environment.name)
            .bind(environment.category)
            .bind(&environment.color_guide)
            .bind(&environment.item_notes)
            .bind(environment.environment_type_id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| name_conflict(e, "environments_name_key", &environment.name))
    }

    pub async fn delete_environment(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM environments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Tipos de ambiente ---

    pub async fn list_environment_types(&self) -> Result<Vec<EnvironmentType>, AppError> {
        let types = sqlx::query_as::<_, EnvironmentType>(
            "SELECT id, name, created_at FROM environment_types ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(types)
    }

    pub async fn create_environment_type(&self, name: &str) -> Result<EnvironmentType, AppError> {
        sqlx::query_as::<_, EnvironmentType>(
            "INSERT INTO environment_types (name) VALUES ($1) RETURNING id, name, created_at",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| name_conflict(e, "environment_types_name_key", name))
    }

    pub async fn delete_environment_type(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM environment_types WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Marcas ---

    pub async fn list_brands(&self) -> Result<Vec<Brand>, AppError> {
        let brands = sqlx::query_as::<_, Brand>("SELECT id, name, created_at FROM brands ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(brands)
    }

    pub async fn find_brand<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Brand>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let brand = sqlx::query_as::<_, Brand>("SELECT id, name, created_at FROM brands WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(brand)
    }

    pub async fn create_brand(&self, name: &str) -> Result<Brand, AppError> {
        sqlx::query_as::<_, Brand>("INSERT INTO brands (name) VALUES ($1) RETURNING id, name, created_at")
            .bind(name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| name_conflict(e, "brands_name_key", name))
    }

    pub async fn delete_brand(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // --- Orientação de marcas ---

    /// Ordem do catálogo (criação). `material` filtra por igualdade sem caixa.
    pub async fn list_brand_descriptions<'e, E>(&self, executor: E, material: Option<&str>) -> Result<Vec<BrandDescription>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entries = sqlx::query_as::<_, BrandDescription>(
            r#"
            SELECT id, material, brands, created_at, updated_at
            FROM brand_descriptions
            WHERE ($1::text IS NULL OR lower(material) = lower($1))
            ORDER BY created_at, material
            "#,
        )
        .bind(material)
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }

    pub async fn insert_brand_description<'e, E>(&self, executor: E, material: &str, brands: &str) -> Result<BrandDescription, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, BrandDescription>(
            r#"
            INSERT INTO brand_descriptions (material, brands)
            VALUES ($1, $2)
            RETURNING id, material, brands, created_at, updated_at
            "#,
        )
        .bind(material)
        .bind(brands)
        .fetch_one(executor)
        .await
        .map_err(|e| name_conflict(e, "idx_brand_descriptions_material", material))
    }

    pub async fn update_brand_description<'e, E>(&self, executor: E, id: Uuid, brands: &str) -> Result<BrandDescription, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, BrandDescription>(
            r#"
            UPDATE brand_descriptions SET brands = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, material, brands, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(brands)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound("Descrição de marca".into()))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}
