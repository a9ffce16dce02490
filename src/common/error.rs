// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    models::{auth::Role, project::ApprovalStatus},
};

// Erros de domínio. Os handlers convertem para ApiError (traduzido) na borda.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Entrada inválida: {0}")]
    InvalidInput(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Cargo insuficiente (mínimo {required:?})")]
    InsufficientRole { required: Role },

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Projeto '{0}' já existe")]
    ProjectNameAlreadyExists(String),

    #[error("Nome '{0}' já cadastrado")]
    NameAlreadyExists(String),

    #[error("E-mail '{0}' já cadastrado")]
    EmailAlreadyExists(String),

    #[error("Material {item} já existe para este ambiente")]
    MaterialAlreadyExists { item: String },

    #[error("Item aprovado não pode ser editado")]
    ApprovedMaterialLocked,

    #[error("Transição inválida de {from:?} para {to:?}")]
    InvalidTransition { from: ApprovalStatus, to: ApprovalStatus },

    #[error("Linhas-modelo não passam por aprovação")]
    TemplateNotReviewable,

    #[error("Projeto precisa estar APROVADO")]
    DocumentRequiresApproval,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    /// Status HTTP e chave da mensagem no catálogo de traduções.
    pub fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation_failed"),
            AppError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            AppError::ProjectNameAlreadyExists(_) => (StatusCode::BAD_REQUEST, "project_name_exists"),
            AppError::NameAlreadyExists(_) => (StatusCode::BAD_REQUEST, "name_exists"),
            AppError::EmailAlreadyExists(_) => (StatusCode::BAD_REQUEST, "email_exists"),
            AppError::TemplateNotReviewable => (StatusCode::BAD_REQUEST, "template_not_reviewable"),
            AppError::DocumentRequiresApproval => (StatusCode::BAD_REQUEST, "document_requires_approval"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
            AppError::InsufficientRole { .. } => (StatusCode::FORBIDDEN, "insufficient_role"),
            AppError::ApprovedMaterialLocked => (StatusCode::FORBIDDEN, "approved_material_locked"),
            AppError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            AppError::MaterialAlreadyExists { .. } => (StatusCode::CONFLICT, "material_exists"),
            AppError::InvalidTransition { .. } => (StatusCode::CONFLICT, "invalid_transition"),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "unique_violation"),
            AppError::FontNotFound(_)
            | AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }

    // Parâmetros interpolados na mensagem traduzida
    fn message_params(&self) -> Vec<(&'static str, String)> {
        match self {
            AppError::InvalidInput(detail)
            | AppError::ResourceNotFound(detail)
            | AppError::UniqueConstraintViolation(detail) => vec![("detail", detail.clone())],
            AppError::ProjectNameAlreadyExists(name)
            | AppError::NameAlreadyExists(name) => vec![("name", name.clone())],
            AppError::EmailAlreadyExists(email) => vec![("email", email.clone())],
            AppError::MaterialAlreadyExists { item } => vec![("item", item.clone())],
            AppError::InsufficientRole { required } => {
                vec![("role", format!("{:?}", required).to_uppercase())]
            }
            AppError::InvalidTransition { from, to } => vec![
                ("from", from.as_str().to_string()),
                ("to", to.as_str().to_string()),
            ],
            _ => Vec::new(),
        }
    }

    /// Converte o erro de domínio na resposta HTTP, no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica só no log, nunca na resposta.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let error = store.translate(&locale.0, key, &self.message_params());

        let details = match self {
            AppError::ValidationError(errors) => Some(validation_details(errors)),
            _ => None,
        };

        ApiError { status, error, details }
    }
}

fn validation_details(errors: &validator::ValidationErrors) -> Value {
    let mut details = serde_json::Map::new();
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<Value> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .map(Value::String)
            .collect();
        details.insert(field.to_string(), Value::Array(messages));
    }
    Value::Object(details)
}

/// Erro pronto para a borda HTTP.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn store() -> I18nStore {
        I18nStore::load().expect("catálogo embutido válido")
    }

    #[test]
    fn maps_domain_errors_to_http_status() {
        let cases = [
            (AppError::ProjectNameAlreadyExists("Torre A".into()), StatusCode::BAD_REQUEST),
            (AppError::TemplateNotReviewable, StatusCode::BAD_REQUEST),
            (AppError::InvalidToken, StatusCode::UNAUTHORIZED),
            (AppError::InsufficientRole { required: Role::Manager }, StatusCode::FORBIDDEN),
            (AppError::ApprovedMaterialLocked, StatusCode::FORBIDDEN),
            (AppError::ResourceNotFound("Projeto".into()), StatusCode::NOT_FOUND),
            (AppError::MaterialAlreadyExists { item: "FLOOR".into() }, StatusCode::CONFLICT),
            (
                AppError::InvalidTransition {
                    from: ApprovalStatus::Approved,
                    to: ApprovalStatus::Rejected,
                },
                StatusCode::CONFLICT,
            ),
            (AppError::FontNotFound("./fonts".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.to_api_error(&Locale("en".into()), &store()).status, expected, "{err:?}");
        }
    }

    #[test]
    fn translates_with_parameters() {
        let err = AppError::ProjectNameAlreadyExists("Torre A".into());

        let pt = err.to_api_error(&Locale("pt".into()), &store());
        assert!(pt.error.contains("Torre A"));
        assert!(pt.error.contains("Já existe"));

        let en = err.to_api_error(&Locale("en".into()), &store());
        assert!(en.error.contains("Torre A"));
        assert!(en.error.contains("already exists"));
    }

    #[test]
    fn internal_errors_hide_details() {
        let err = AppError::InternalServerError(anyhow::anyhow!("senha do banco: hunter2"));
        let api = err.to_api_error(&Locale("en".into()), &store());
        assert!(!api.error.contains("hunter2"));
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, message = "O nome é obrigatório."))]
        name: String,
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let errors = Sample { name: String::new() }.validate().unwrap_err();
        let api = AppError::ValidationError(errors).to_api_error(&Locale("pt".into()), &store());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("detalhes por campo");
        assert_eq!(details["name"][0], "O nome é obrigatório.");
    }
}
