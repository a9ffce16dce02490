// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    workflow::permissions::Action,
};

/// 1. O Trait que define o que é uma Permissão
pub trait PermissionDef: Send + Sync + 'static {
    fn action() -> Action;
}

/// 2. O Extractor (Guardião). Só compara o cargo do token com o mínimo da ação.
pub struct RequirePermission<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequirePermission<T>
where
    T: PermissionDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_headers(&parts.headers);

        let user = parts
            .extensions
            .get::<AuthenticatedUser>()
            .ok_or_else(|| AppError::InvalidToken.to_api_error(&locale, &app_state.i18n_store))?;

        let action = T::action();
        if !user.0.role.can(action) {
            tracing::warn!(
                "Acesso negado: {} ({:?}) tentou {:?}",
                user.0.email,
                user.0.role,
                action
            );
            return Err(AppError::InsufficientRole { required: action.minimum_role() }
                .to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequirePermission(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS PERMISSÕES (TIPOS)
// ---

pub struct CanRead;
impl PermissionDef for CanRead {
    fn action() -> Action { Action::Read }
}

pub struct CanCreate;
impl PermissionDef for CanCreate {
    fn action() -> Action { Action::Create }
}

pub struct CanEdit;
impl PermissionDef for CanEdit {
    fn action() -> Action { Action::Edit }
}

pub struct CanReview;
impl PermissionDef for CanReview {
    fn action() -> Action { Action::Review }
}

pub struct CanDelete;
impl PermissionDef for CanDelete {
    fn action() -> Action { Action::Delete }
}

pub struct CanViewUsers;
impl PermissionDef for CanViewUsers {
    fn action() -> Action { Action::ViewUsers }
}

pub struct CanManageUsers;
impl PermissionDef for CanManageUsers {
    fn action() -> Action { Action::ManageUsers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::tests::test_config,
        models::auth::{Actor, Role},
    };
    use axum::http::{Request, StatusCode};
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    fn state() -> AppState {
        let config = test_config();
        let pool = PgPoolOptions::new().connect_lazy(&config.database_url).unwrap();
        AppState::from_parts(config, pool).unwrap()
    }

    fn parts_for(role: Option<Role>) -> Parts {
        let (mut parts, _) = Request::builder().uri("/api/projects").body(()).unwrap().into_parts();
        if let Some(role) = role {
            parts.extensions.insert(AuthenticatedUser(Actor {
                id: Uuid::new_v4(),
                email: "leitor@construtora.com".into(),
                full_name: "Leitor".into(),
                role,
            }));
        }
        parts
    }

    #[tokio::test]
    async fn every_role_may_read() {
        let state = state();
        for role in [Role::Attendant, Role::Manager, Role::Superadmin] {
            let mut parts = parts_for(Some(role));
            assert!(RequirePermission::<CanRead>::from_request_parts(&mut parts, &state).await.is_ok());
        }
    }

    #[tokio::test]
    async fn read_still_needs_an_authenticated_user() {
        let state = state();
        let mut parts = parts_for(None);

        let err = RequirePermission::<CanRead>::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn attendant_is_refused_review() {
        let state = state();
        let mut parts = parts_for(Some(Role::Attendant));

        let err = RequirePermission::<CanReview>::from_request_parts(&mut parts, &state)
            .await
            .err()
            .unwrap();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }
}
