// src/workflow/replication.rs
//
// Replica as linhas-modelo (project_id nulo) para os ambientes de um projeto.
// O template é localizado pelo NOME do ambiente. Cria apenas o que falta,
// nunca sobrescreve, e nunca altera o template.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::WorkflowTx,
    models::{
        catalog::Environment,
        material::{MaterialItem, MaterialSpec, NewMaterial},
        project::ReplicationReport,
    },
};

/// Linhas que o projeto deveria ter para um ambiente, uma por tipo de item.
pub fn plan_for_environment(
    project_id: Uuid,
    environment: &Environment,
    templates: &[MaterialSpec],
) -> Vec<NewMaterial> {
    let mut by_item: BTreeMap<MaterialItem, &MaterialSpec> = BTreeMap::new();
    for template in templates.iter().filter(|t| t.is_template()) {
        by_item.entry(template.item).or_insert(template);
    }

    by_item
        .into_values()
        .map(|template| NewMaterial {
            project_id: Some(project_id),
            environment_id: environment.id,
            item: template.item,
            description: template.description.clone(),
            brand_id: None,
        })
        .collect()
}

/// Executa a replicação dentro da transação corrente.
/// Retorna o relatório e as linhas efetivamente criadas.
pub async fn replicate_templates<T: WorkflowTx>(
    tx: &mut T,
    project_id: Uuid,
    environments: &[Environment],
) -> Result<(ReplicationReport, Vec<MaterialSpec>), AppError> {
    let mut report = ReplicationReport::default();
    let mut created = Vec::new();

    for environment in environments {
        let templates = tx.templates_for_environment_name(&environment.name).await?;
        let plan = plan_for_environment(project_id, environment, &templates);

        if plan.is_empty() {
            tracing::warn!(
                "Nenhum template para o ambiente '{}' (projeto {})",
                environment.name,
                project_id
            );
            report.environments_without_templates.push(environment.name.clone());
            continue;
        }

        for new in &plan {
            match tx.insert_material_if_absent(new).await? {
                Some(spec) => created.push(spec),
                None => report.skipped_existing += 1,
            }
        }
    }

    report.created = created.len();
    Ok((report, created))
}
