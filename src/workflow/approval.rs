// src/workflow/approval.rs
//
// Máquinas de estado de aprovação (projeto e material).
// PENDING -> APPROVED | REJECTED; APPROVED/REJECTED -> PENDING só via reverter.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{material::MaterialSpec, project::ApprovalStatus},
};

/// Transições disparadas pelas ações de revisão.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Approve,
    Reject,
    Revert,
}

impl Transition {
    pub fn target(self) -> ApprovalStatus {
        match self {
            Transition::Approve => ApprovalStatus::Approved,
            Transition::Reject => ApprovalStatus::Rejected,
            Transition::Revert => ApprovalStatus::Pending,
        }
    }
}

/// Calcula o próximo status. Aprovar/reprovar só a partir de PENDING;
/// reverter é aceito de qualquer estado.
pub fn next_status(current: ApprovalStatus, transition: Transition) -> Result<ApprovalStatus, AppError> {
    let target = transition.target();
    match (current, transition) {
        (_, Transition::Revert) => Ok(target),
        (ApprovalStatus::Pending, _) => Ok(target),
        (from, _) => Err(AppError::InvalidTransition { from, to: target }),
    }
}

fn ensure_reviewable(spec: &MaterialSpec) -> Result<(), AppError> {
    if spec.is_template() {
        return Err(AppError::TemplateNotReviewable);
    }
    Ok(())
}

pub fn approve_material(spec: &mut MaterialSpec, approver_id: Uuid, now: DateTime<Utc>) -> Result<(), AppError> {
    ensure_reviewable(spec)?;
    spec.status = next_status(spec.status, Transition::Approve)?;
    spec.approver_id = Some(approver_id);
    spec.approved_at = Some(now);
    spec.rejection_reason = None;
    Ok(())
}

pub fn reject_material(
    spec: &mut MaterialSpec,
    approver_id: Uuid,
    reason: &str,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    ensure_reviewable(spec)?;
    spec.status = next_status(spec.status, Transition::Reject)?;
    spec.approver_id = Some(approver_id);
    spec.approved_at = Some(now);
    spec.rejection_reason = Some(reason.to_string());
    Ok(())
}

pub fn revert_material(spec: &mut MaterialSpec) -> Result<(), AppError> {
    ensure_reviewable(spec)?;
    spec.status = next_status(spec.status, Transition::Revert)?;
    spec.approver_id = None;
    spec.approved_at = None;
    spec.rejection_reason = None;
    Ok(())
}

/// Campos editáveis de um material.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialEdit {
    pub description: Option<String>,
    // Some(None) remove a marca
    pub brand_id: Option<Option<Uuid>>,
}

impl MaterialEdit {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.brand_id.is_none()
    }
}

/// Edição só é permitida em PENDING ou REJECTED.
pub fn apply_material_edit(spec: &mut MaterialSpec, edit: &MaterialEdit) -> Result<(), AppError> {
    if spec.status == ApprovalStatus::Approved {
        return Err(AppError::ApprovedMaterialLocked);
    }
    if let Some(description) = &edit.description {
        spec.description = description.clone();
    }
    if let Some(brand_id) = edit.brand_id {
        spec.brand_id = brand_id;
    }
    Ok(())
}
