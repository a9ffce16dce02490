// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::{LogRepository, UserRepository},
    models::{
        auth::{Actor, Claims},
        log::{LogAction, NewLog},
    },
};

/// Gera o hash bcrypt fora do executor async.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    let hashed = tokio::task::spawn_blocking(move || hash(&password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub fn encode_token(secret: &str, ttl_hours: i64, actor: &Actor) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(ttl_hours);

    let claims = Claims {
        sub: actor.id,
        email: actor.email.clone(),
        full_name: actor.full_name.clone(),
        role: actor.role,
        exp: expires_at.timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_ref()),
    )?)
}

/// Só decodifica: o cargo do token é a fonte de verdade das permissões.
pub fn decode_token(secret: &str, token: &str) -> Result<Actor, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|_| AppError::InvalidToken)?;

    Ok(token_data.claims.into())
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    log_repo: LogRepository,
    jwt_secret: String,
    token_ttl_hours: i64,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        log_repo: LogRepository,
        jwt_secret: String,
        token_ttl_hours: i64,
    ) -> Self {
        Self { user_repo, log_repo, jwt_secret, token_ttl_hours }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        let actor = Actor {
            id: user.id,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
        };
        let token = self.create_token(&actor)?;

        self.log_repo
            .record(&NewLog::new(actor.id, LogAction::Login, None))
            .await?;
        tracing::info!("Login de {} ({:?})", actor.email, actor.role);

        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> Result<Actor, AppError> {
        decode_token(&self.jwt_secret, token)
    }

    pub fn create_token(&self, actor: &Actor) -> Result<String, AppError> {
        encode_token(&self.jwt_secret, self.token_ttl_hours, actor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::Role;
    use uuid::Uuid;

    fn actor(role: Role) -> Actor {
        Actor {
            id: Uuid::new_v4(),
            email: "gerente@construtora.com".into(),
            full_name: "Maria Souza".into(),
            role,
        }
    }

    #[test]
    fn token_carries_identity_and_role() {
        let manager = actor(Role::Manager);
        let token = encode_token("segredo", 168, &manager).unwrap();

        let decoded = decode_token("segredo", &token).unwrap();
        assert_eq!(decoded, manager);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let token = encode_token("segredo", 168, &actor(Role::Superadmin)).unwrap();
        assert!(matches!(decode_token("outro", &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejects_expired_token() {
        // bem além da folga padrão de 60s da validação
        let token = encode_token("segredo", -2, &actor(Role::Attendant)).unwrap();
        assert!(matches!(decode_token("segredo", &token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode_token("segredo", "nao.e.jwt"), Err(AppError::InvalidToken)));
    }
}
