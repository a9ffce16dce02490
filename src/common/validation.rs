// src/common/validation.rs

use validator::ValidationError;

use crate::common::error::AppError;

// `length(min = 1)` aceita "   "; esta regra olha o texto já aparado.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("O campo não pode ficar em branco.".into());
        return Err(err);
    }
    Ok(())
}

/// Texto aparado, ou `InvalidInput` se sobrar vazio.
pub fn required_text<'a>(value: &'a str, field: &str) -> Result<&'a str, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(format!("{} não pode ficar em branco", field)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{catalog::SaveBrandDescriptionPayload, project::{CreateProjectPayload, ProjectType}};
    use chrono::NaiveDate;
    use validator::Validate;

    #[test]
    fn whitespace_only_is_blank() {
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("\t\n").is_err());
        assert!(validate_not_blank(" Torre A ").is_ok());
    }

    #[test]
    fn required_text_trims_or_refuses() {
        assert_eq!(required_text("  Varanda ", "nome").unwrap(), "Varanda");
        assert!(matches!(required_text("  ", "nome"), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn payloads_reject_whitespace_names() {
        let project = CreateProjectPayload {
            name: "   ".into(),
            project_type: ProjectType::Residential,
            delivery_date: NaiveDate::from_ymd_opt(2027, 3, 31).unwrap(),
            description: None,
            environment_ids: Vec::new(),
        };
        let errors = project.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let guidance = SaveBrandDescriptionPayload { material: " \t".into(), brands: vec!["Deca".into()] };
        let errors = guidance.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("material"));

        let valid = SaveBrandDescriptionPayload { material: "Louças".into(), brands: Vec::new() };
        assert!(valid.validate().is_ok());
    }
}
