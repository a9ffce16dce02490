// src/services/material_service.rs

use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::{error::AppError, validation::required_text},
    db::store::{WorkflowStore, WorkflowTx},
    models::{
        auth::Actor,
        log::{LogAction, NewLog},
        material::{
            CreateMaterialPayload, CreateTemplatePayload, MaterialFilter, MaterialSpec, MaterialView,
            NewMaterial, TemplateFilter, UpdateMaterialPayload, UpdateTemplatePayload,
        },
    },
    workflow::{
        approval::{
            apply_material_edit, approve_material, reject_material, revert_material, MaterialEdit,
            Transition,
        },
        brand_guidance::ensure_brand_guidance,
    },
};

fn material_not_found() -> AppError {
    AppError::ResourceNotFound("Material".into())
}

async fn load_view<T: WorkflowTx>(tx: &mut T, id: Uuid) -> Result<MaterialView, AppError> {
    tx.material_view(id).await?.ok_or_else(material_not_found)
}

async fn ensure_brand<T: WorkflowTx>(tx: &mut T, brand_id: Uuid) -> Result<(), AppError> {
    if !tx.brand_exists(brand_id).await? {
        return Err(AppError::ResourceNotFound("Marca".into()));
    }
    Ok(())
}

#[derive(Clone)]
pub struct MaterialService<S: WorkflowStore> {
    store: S,
}

impl<S: WorkflowStore> MaterialService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub async fn get(&self, id: Uuid) -> Result<MaterialView, AppError> {
        let mut tx = self.store.begin().await?;
        load_view(&mut tx, id).await
    }

    pub async fn list(&self, filter: &MaterialFilter) -> Result<Vec<MaterialView>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_materials(filter).await
    }

    // --- CREATE (avulso) ---
    pub async fn create(&self, actor: &Actor, payload: CreateMaterialPayload) -> Result<MaterialView, AppError> {
        let item = payload
            .item
            .ok_or_else(|| AppError::InvalidInput("item".into()))?;

        let mut tx = self.store.begin().await?;

        let project = tx
            .find_project(payload.project_id)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound("Projeto".into()))?;

        let environments = tx.project_environments(project.id).await?;
        if !environments.iter().any(|e| e.id == payload.environment_id) {
            return Err(AppError::InvalidInput(format!(
                "ambiente {} não pertence ao projeto '{}'",
                payload.environment_id, project.name
            )));
        }
        if let Some(brand_id) = payload.brand_id {
            ensure_brand(&mut tx, brand_id).await?;
        }

        let spec = tx
            .insert_material(&NewMaterial {
                project_id: Some(project.id),
                environment_id: payload.environment_id,
                item,
                description: payload.description.trim().to_string(),
                brand_id: payload.brand_id,
            })
            .await?;
        ensure_brand_guidance(&mut tx, std::slice::from_ref(&spec)).await?;

        tx.insert_log(
            &NewLog::new(actor.id, LogAction::Create, Some(project.id))
                .with_reason(format!("Item {} adicionado", item.code())),
        )
        .await?;
        let view = load_view(&mut tx, spec.id).await?;
        tx.commit().await?;

        tracing::info!("Material {} ({}) criado no projeto {}", spec.id, item.code(), project.id);
        Ok(view)
    }

    /// Edita descrição e/ou marca. Vale para linhas de projeto e templates.
    pub async fn update(&self, actor: &Actor, id: Uuid, payload: UpdateMaterialPayload) -> Result<MaterialView, AppError> {
        let edit = MaterialEdit {
            description: payload.description.map(|d| d.trim().to_string()),
            brand_id: if payload.clear_brand {
                Some(None)
            } else {
                payload.brand_id.map(Some)
            },
        };
        if edit.is_empty() {
            return Err(AppError::InvalidInput("nada para atualizar".into()));
        }

        let mut tx = self.store.begin().await?;

        let mut spec = tx.find_material(id).await?.ok_or_else(material_not_found)?;
        if let Some(Some(brand_id)) = edit.brand_id {
            ensure_brand(&mut tx, brand_id).await?;
        }
        apply_material_edit(&mut spec, &edit)?;
        let saved = tx.save_material(&spec).await?;

        tx.insert_log(
            &NewLog::new(actor.id, LogAction::Edit, saved.project_id)
                .with_reason(format!("Item {} editado", saved.item.code())),
        )
        .await?;
        let view = load_view(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!("Material {} editado por {}", id, actor.email);
        Ok(view)
    }

    pub async fn delete(&self, actor: &Actor, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;

        let spec = tx.find_material(id).await?.ok_or_else(material_not_found)?;
        if !tx.delete_material(id).await? {
            return Err(material_not_found());
        }
        tx.insert_log(
            &NewLog::new(actor.id, LogAction::Edit, spec.project_id)
                .with_reason(format!("Item {} removido", spec.item.code())),
        )
        .await?;
        tx.commit().await?;

        tracing::info!("Material {} excluído por {}", id, actor.email);
        Ok(())
    }

    pub async fn approve(&self, actor: &Actor, id: Uuid) -> Result<MaterialView, AppError> {
        self.review(actor, id, Transition::Approve, "").await
    }

    pub async fn reject(&self, actor: &Actor, id: Uuid, reason: &str) -> Result<MaterialView, AppError> {
        self.review(actor, id, Transition::Reject, reason).await
    }

    pub async fn revert(&self, actor: &Actor, id: Uuid) -> Result<MaterialView, AppError> {
        self.review(actor, id, Transition::Revert, "").await
    }

    async fn review(
        &self,
        actor: &Actor,
        id: Uuid,
        transition: Transition,
        reason: &str,
    ) -> Result<MaterialView, AppError> {
        let mut tx = self.store.begin().await?;

        let mut spec: MaterialSpec = tx.find_material(id).await?.ok_or_else(material_not_found)?;
        let code = spec.item.code();
        let log = match transition {
            Transition::Approve => {
                approve_material(&mut spec, actor.id, Utc::now())?;
                NewLog::new(actor.id, LogAction::Approve, spec.project_id)
                    .with_reason(format!("Item {} aprovado", code))
            }
            Transition::Reject => {
                // O motivo fica gravado como veio; só o texto do log é aparado.
                reject_material(&mut spec, actor.id, reason, Utc::now())?;
                let text = match reason.trim() {
                    "" => format!("Item {} reprovado", code),
                    trimmed => format!("Item {} reprovado: {}", code, trimmed),
                };
                NewLog::new(actor.id, LogAction::Reject, spec.project_id).with_reason(text)
            }
            Transition::Revert => {
                revert_material(&mut spec)?;
                NewLog::new(actor.id, LogAction::Edit, spec.project_id)
                    .with_reason(format!("Item {} revertido para PENDING", code))
            }
        };

        tx.save_material(&spec).await?;
        tx.insert_log(&log).await?;
        let view = load_view(&mut tx, id).await?;
        tx.commit().await?;

        tracing::info!(
            "Material {} ({}) -> {} por {}",
            id,
            code,
            spec.status.as_str(),
            actor.email
        );
        Ok(view)
    }

    // --- Templates ---

    pub async fn list_templates(&self, filter: &TemplateFilter) -> Result<Vec<MaterialView>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_templates(filter.environment).await
    }

    pub async fn create_template(&self, actor: &Actor, payload: CreateTemplatePayload) -> Result<MaterialView, AppError> {
        let description = required_text(&payload.description, "descrição")?.to_string();
        let mut tx = self.store.begin().await?;

        let environment = tx
            .find_environments(&[payload.environment_id])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::ResourceNotFound("Ambiente".into()))?;

        let template = tx
            .insert_material(&NewMaterial {
                project_id: None,
                environment_id: environment.id,
                item: payload.item,
                description,
                brand_id: None,
            })
            .await?;

        tx.insert_log(&NewLog::new(actor.id, LogAction::Create, None).with_reason(format!(
            "Template {} criado para '{}'",
            payload.item.code(),
            environment.name
        )))
        .await?;
        let view = load_view(&mut tx, template.id).await?;
        tx.commit().await?;

        tracing::info!("Template {} criado para o ambiente {}", template.id, environment.name);
        Ok(view)
    }

    pub async fn update_template(
        &self,
        actor: &Actor,
        id: Uuid,
        payload: UpdateTemplatePayload,
    ) -> Result<MaterialView, AppError> {
        let description = required_text(&payload.description, "descrição")?.to_string();
        let mut tx = self.store.begin().await?;

        let mut template = tx
            .find_material(id)
            .await?
            .filter(MaterialSpec::is_template)
            .ok_or_else(|| AppError::ResourceNotFound("Template".into()))?;
        template.description = description;
        tx.save_material(&template).await?;

        tx.insert_log(
            &NewLog::new(actor.id, LogAction::Edit, None)
                .with_reason(format!("Template {} editado", template.item.code())),
        )
        .await?;
        let view = load_view(&mut tx, id).await?;
        tx.commit().await?;

        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::memory::MemoryStore,
        models::{
            auth::Role,
            catalog::Environment,
            material::MaterialItem,
            project::ApprovalStatus,
        },
        services::project_service::{
            tests::{actor, payload},
            ProjectService,
        },
    };

    struct Fixture {
        store: MemoryStore,
        service: MaterialService<MemoryStore>,
        manager: Actor,
        project_id: Uuid,
        suite: Environment,
        garden: Environment,
    }

    impl Fixture {
        async fn floor(&self) -> MaterialSpec {
            self.store
                .snapshot()
                .await
                .materials
                .into_iter()
                .find(|m| m.project_id == Some(self.project_id) && m.item == MaterialItem::Floor)
                .unwrap()
        }

        async fn project_logs(&self) -> Vec<LogAction> {
            self.store
                .snapshot()
                .await
                .logs
                .iter()
                .filter(|l| l.project_id == Some(self.project_id))
                .map(|l| l.action)
                .collect()
        }
    }

    async fn fixture() -> Fixture {
        let store = MemoryStore::new();
        let suite = store.add_environment("Suite").await;
        let garden = store.add_environment("Garden").await;
        store.add_template(suite.id, MaterialItem::Floor, "Porcelain").await;

        let manager = actor(Role::Manager);
        store.seed(|state| state.users.push((manager.id, manager.email.clone()))).await;

        let projects = ProjectService::new(store.clone());
        let project_id = projects
            .create(&actor(Role::Attendant), payload("Tower A", &[&suite, &garden]))
            .await
            .unwrap()
            .project
            .id;

        Fixture {
            service: MaterialService::new(store.clone()),
            store,
            manager,
            project_id,
            suite,
            garden,
        }
    }

    fn create_payload(fx: &Fixture, environment_id: Uuid, item: MaterialItem) -> CreateMaterialPayload {
        CreateMaterialPayload {
            project_id: fx.project_id,
            environment_id,
            item: Some(item),
            description: "Padrão construtora".into(),
            brand_id: None,
        }
    }

    #[tokio::test]
    async fn approve_sets_approver_and_locks_edits() {
        let fx = fixture().await;
        let floor = fx.floor().await;

        let approved = fx.service.approve(&fx.manager, floor.id).await.unwrap();

        assert_eq!(approved.spec.status, ApprovalStatus::Approved);
        assert_eq!(approved.spec.approver_id, Some(fx.manager.id));
        assert!(approved.spec.approved_at.is_some());
        assert_eq!(approved.approver_email.as_deref(), Some(fx.manager.email.as_str()));
        assert_eq!(fx.project_logs().await, vec![LogAction::Create, LogAction::Approve]);

        let edit = UpdateMaterialPayload { description: Some("Outro".into()), ..Default::default() };
        assert!(matches!(
            fx.service.update(&fx.manager, floor.id, edit).await,
            Err(AppError::ApprovedMaterialLocked)
        ));
        assert_eq!(fx.floor().await.description, "Porcelain");
        assert_eq!(fx.project_logs().await.len(), 2);
    }

    #[tokio::test]
    async fn reject_keeps_reason_and_revert_clears_it() {
        let fx = fixture().await;
        let floor = fx.floor().await;

        let rejected = fx.service.reject(&fx.manager, floor.id, " wrong color ").await.unwrap();
        assert_eq!(rejected.spec.status, ApprovalStatus::Rejected);
        assert_eq!(rejected.spec.rejection_reason.as_deref(), Some(" wrong color "));
        assert_eq!(rejected.spec.approver_id, Some(fx.manager.id));

        let reverted = fx.service.revert(&fx.manager, floor.id).await.unwrap();
        assert_eq!(reverted.spec.status, ApprovalStatus::Pending);
        assert_eq!(reverted.spec.rejection_reason, None);
        assert_eq!(reverted.spec.approver_id, None);
        assert_eq!(reverted.spec.approved_at, None);

        let state = fx.store.snapshot().await;
        let reasons: Vec<_> = state
            .logs
            .iter()
            .filter(|l| l.project_id == Some(fx.project_id))
            .map(|l| (l.action, l.reason.clone().unwrap_or_default()))
            .collect();
        assert_eq!(reasons[1], (LogAction::Reject, "Item FLOOR reprovado: wrong color".to_string()));
        assert_eq!(reasons[2].0, LogAction::Edit);
    }

    #[tokio::test]
    async fn reviewed_items_need_revert_before_new_review() {
        let fx = fixture().await;
        let floor = fx.floor().await;
        fx.service.approve(&fx.manager, floor.id).await.unwrap();

        assert!(matches!(
            fx.service.approve(&fx.manager, floor.id).await,
            Err(AppError::InvalidTransition { .. })
        ));
        assert!(matches!(
            fx.service.reject(&fx.manager, floor.id, "").await,
            Err(AppError::InvalidTransition { .. })
        ));

        fx.service.revert(&fx.manager, floor.id).await.unwrap();
        let rejected = fx.service.reject(&fx.manager, floor.id, "").await.unwrap();
        assert_eq!(rejected.spec.status, ApprovalStatus::Rejected);
    }

    #[tokio::test]
    async fn templates_cannot_be_reviewed() {
        let fx = fixture().await;
        let template = fx
            .store
            .snapshot()
            .await
            .materials
            .into_iter()
            .find(MaterialSpec::is_template)
            .unwrap();

        for result in [
            fx.service.approve(&fx.manager, template.id).await,
            fx.service.reject(&fx.manager, template.id, "x").await,
            fx.service.revert(&fx.manager, template.id).await,
        ] {
            assert!(matches!(result, Err(AppError::TemplateNotReviewable)));
        }
    }

    #[tokio::test]
    async fn second_row_conflicts_for_every_item_kind() {
        let fx = fixture().await;

        for item in MaterialItem::ALL {
            fx.service
                .create(&fx.manager, create_payload(&fx, fx.garden.id, item))
                .await
                .unwrap();
            let err = fx
                .service
                .create(&fx.manager, create_payload(&fx, fx.garden.id, item))
                .await
                .unwrap_err();
            assert!(
                matches!(&err, AppError::MaterialAlreadyExists { item: code } if code == item.code()),
                "{:?}",
                err
            );
        }

        let state = fx.store.snapshot().await;
        let garden_rows = state
            .materials
            .iter()
            .filter(|m| m.project_id == Some(fx.project_id) && m.environment_id == fx.garden.id)
            .count();
        assert_eq!(garden_rows, MaterialItem::ALL.len());
    }

    #[tokio::test]
    async fn create_requires_an_environment_of_the_project() {
        let fx = fixture().await;
        let kitchen = fx.store.add_environment("Cozinha").await;

        assert!(matches!(
            fx.service
                .create(&fx.manager, create_payload(&fx, kitchen.id, MaterialItem::Wall))
                .await,
            Err(AppError::InvalidInput(_))
        ));

        let mut missing_item = create_payload(&fx, fx.suite.id, MaterialItem::Wall);
        missing_item.item = None;
        assert!(matches!(
            fx.service.create(&fx.manager, missing_item).await,
            Err(AppError::InvalidInput(_))
        ));

        let mut unknown_brand = create_payload(&fx, fx.suite.id, MaterialItem::Wall);
        unknown_brand.brand_id = Some(Uuid::new_v4());
        assert!(matches!(
            fx.service.create(&fx.manager, unknown_brand).await,
            Err(AppError::ResourceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn ad_hoc_create_logs_and_runs_guidance_hook() {
        let fx = fixture().await;
        let brand = fx.store.add_brand("Eucatex").await;
        let mut request = create_payload(&fx, fx.suite.id, MaterialItem::Wall);
        request.description = "Rodapé laminado".into();
        request.brand_id = Some(brand.id);

        let view = fx.service.create(&fx.manager, request).await.unwrap();

        assert_eq!(view.spec.status, ApprovalStatus::Pending);
        assert_eq!(view.brand_name.as_deref(), Some("Eucatex"));
        assert_eq!(view.item_label, "Parede");
        assert_eq!(fx.project_logs().await, vec![LogAction::Create, LogAction::Create]);
        assert!(fx
            .store
            .snapshot()
            .await
            .brand_descriptions
            .iter()
            .any(|d| d.material == "Laminado"));
    }

    #[tokio::test]
    async fn edit_changes_description_and_clears_brand() {
        let fx = fixture().await;
        let brand = fx.store.add_brand("Portobello").await;
        let floor = fx.floor().await;

        let with_brand = fx
            .service
            .update(
                &fx.manager,
                floor.id,
                UpdateMaterialPayload { brand_id: Some(brand.id), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(with_brand.brand_name.as_deref(), Some("Portobello"));

        let cleared = fx
            .service
            .update(
                &fx.manager,
                floor.id,
                UpdateMaterialPayload {
                    description: Some(" Porcelanato 90x90 ".into()),
                    brand_id: Some(brand.id),
                    clear_brand: true,
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.spec.description, "Porcelanato 90x90");
        assert_eq!(cleared.spec.brand_id, None);

        assert!(matches!(
            fx.service.update(&fx.manager, floor.id, UpdateMaterialPayload::default()).await,
            Err(AppError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn one_log_per_transition_with_matching_project() {
        let fx = fixture().await;
        let floor = fx.floor().await;

        fx.service.approve(&fx.manager, floor.id).await.unwrap();
        fx.service.revert(&fx.manager, floor.id).await.unwrap();
        fx.service.reject(&fx.manager, floor.id, "").await.unwrap();

        assert_eq!(
            fx.project_logs().await,
            vec![LogAction::Create, LogAction::Approve, LogAction::Edit, LogAction::Reject]
        );
        let state = fx.store.snapshot().await;
        assert!(state
            .logs
            .iter()
            .skip(1)
            .all(|l| l.user_id == Some(fx.manager.id)));
    }

    #[tokio::test]
    async fn failed_log_write_leaves_item_untouched() {
        let fx = fixture().await;
        let floor = fx.floor().await;
        fx.store.seed(|state| state.fail_log_inserts = true).await;

        assert!(fx.service.approve(&fx.manager, floor.id).await.is_err());

        let after = fx.floor().await;
        assert_eq!(after.status, ApprovalStatus::Pending);
        assert_eq!(after.approver_id, None);
        assert_eq!(fx.project_logs().await, vec![LogAction::Create]);
    }

    #[tokio::test]
    async fn blank_template_description_is_refused() {
        let fx = fixture().await;
        let before = fx.store.snapshot().await;

        let created = fx
            .service
            .create_template(
                &fx.manager,
                CreateTemplatePayload {
                    environment_id: fx.garden.id,
                    item: MaterialItem::Wall,
                    description: "   ".into(),
                },
            )
            .await;
        assert!(matches!(created, Err(AppError::InvalidInput(_))));

        let template = before.materials.iter().find(|m| m.is_template()).unwrap();
        let edited = fx
            .service
            .update_template(&fx.manager, template.id, UpdateTemplatePayload { description: "\t ".into() })
            .await;
        assert!(matches!(edited, Err(AppError::InvalidInput(_))));

        let after = fx.store.snapshot().await;
        assert_eq!(after.materials, before.materials);
        assert_eq!(after.logs.len(), before.logs.len());
    }

    #[tokio::test]
    async fn templates_are_created_once_per_environment_and_item() {
        let fx = fixture().await;
        let request = || CreateTemplatePayload {
            environment_id: fx.garden.id,
            item: MaterialItem::Wall,
            description: "Textura acrílica".into(),
        };

        let template = fx.service.create_template(&fx.manager, request()).await.unwrap();
        assert_eq!(template.spec.project_id, None);
        assert!(matches!(
            fx.service.create_template(&fx.manager, request()).await,
            Err(AppError::MaterialAlreadyExists { .. })
        ));

        let edited = fx
            .service
            .update_template(&fx.manager, template.spec.id, UpdateTemplatePayload { description: "Grafiato".into() })
            .await
            .unwrap();
        assert_eq!(edited.spec.description, "Grafiato");

        let floor = fx.floor().await;
        assert!(matches!(
            fx.service
                .update_template(&fx.manager, floor.id, UpdateTemplatePayload { description: "x".into() })
                .await,
            Err(AppError::ResourceNotFound(_))
        ));

        let garden_templates = fx
            .service
            .list_templates(&TemplateFilter { environment: Some(fx.garden.id) })
            .await
            .unwrap();
        assert_eq!(garden_templates.len(), 1);
    }
}
