// src/services/user_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::SuperadminSeed,
    db::UserRepository,
    models::auth::{
        CreateUserPayload, PasswordResetResponse, Role, UpdateUserPayload, User,
    },
    services::auth::hash_password,
};

const TEMPORARY_PASSWORD_LEN: usize = 12;

/// Senha provisória alfanumérica (o envio por e-mail fica fora do sistema).
pub fn generate_temporary_password() -> String {
    Uuid::new_v4().simple().to_string()[..TEMPORARY_PASSWORD_LEN].to_string()
}

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.user_repo
            .find(id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Usuário".into()))
    }

    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list().await
    }

    pub async fn create(&self, payload: CreateUserPayload) -> Result<User, AppError> {
        let password_hash = hash_password(payload.password).await?;
        let user = self
            .user_repo
            .create_user(payload.email.trim(), payload.full_name.trim(), &password_hash, payload.role)
            .await?;
        tracing::info!("Usuário {} criado com cargo {:?}", user.email, user.role);
        Ok(user)
    }

    pub async fn update(&self, id: Uuid, payload: UpdateUserPayload) -> Result<User, AppError> {
        let current = self.get(id).await?;
        let full_name = payload.full_name.unwrap_or(current.full_name);
        let role = payload.role.unwrap_or(current.role);

        self.user_repo
            .update_user(id, &full_name, role)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Usuário".into()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        if !self.user_repo.delete_user(id).await? {
            return Err(AppError::ResourceNotFound("Usuário".into()));
        }
        tracing::info!("Usuário {} excluído", id);
        Ok(())
    }

    pub async fn reset_password(&self, id: Uuid) -> Result<PasswordResetResponse, AppError> {
        let temporary_password = generate_temporary_password();
        let password_hash = hash_password(temporary_password.clone()).await?;

        if !self.user_repo.update_password(id, &password_hash).await? {
            return Err(AppError::ResourceNotFound("Usuário".into()));
        }
        tracing::info!("Senha do usuário {} redefinida", id);

        Ok(PasswordResetResponse { user_id: id, temporary_password })
    }

    /// Cria o superadmin inicial se o e-mail ainda não existir.
    pub async fn ensure_superadmin(&self, seed: &SuperadminSeed) -> Result<bool, AppError> {
        if self.user_repo.find_by_email(&seed.email).await?.is_some() {
            return Ok(false);
        }

        let password_hash = hash_password(seed.password.clone()).await?;
        self.user_repo
            .create_user(&seed.email, "Administrador", &password_hash, Role::Superadmin)
            .await?;
        tracing::info!("Superadmin {} criado no boot", seed.email);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporary_passwords_are_alphanumeric_and_distinct() {
        let first = generate_temporary_password();
        let second = generate_temporary_password();

        assert_eq!(first.len(), TEMPORARY_PASSWORD_LEN);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }
}
