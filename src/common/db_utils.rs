// src/common/db_utils.rs

use crate::common::error::AppError;

/// Nome da constraint quando o erro é uma violação de unicidade.
pub(crate) fn unique_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => Some(
            db_err
                .constraint()
                .unwrap_or("unique")
                .to_string(),
        ),
        _ => None,
    }
}

/// Converte violação de unicidade usando o mapeamento do repositório;
/// constraints desconhecidas viram `UniqueConstraintViolation`.
pub(crate) fn map_unique_violation<F>(err: sqlx::Error, map: F) -> AppError
where
    F: FnOnce(&str) -> Option<AppError>,
{
    match unique_constraint(&err) {
        Some(constraint) => {
            map(&constraint).unwrap_or(AppError::UniqueConstraintViolation(constraint))
        }
        None => err.into(),
    }
}
