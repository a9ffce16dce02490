// src/workflow/aggregate.rs
//
// Monta a visão aninhada Projeto -> Ambientes -> Materiais.

use crate::models::{
    catalog::{BrandDescription, Environment},
    material::MaterialView,
    project::{EnvironmentDetail, Project, ProjectDetail},
};

/// Cada ambiente recebe apenas as linhas do próprio projeto e do próprio ambiente.
/// Linhas-modelo e linhas de outros projetos nunca aparecem.
pub fn assemble_project_detail(
    project: Project,
    owner_email: Option<String>,
    mut environments: Vec<Environment>,
    materials: Vec<MaterialView>,
    catalog: &[BrandDescription],
) -> ProjectDetail {
    let materials: Vec<MaterialView> = materials
        .into_iter()
        .filter(|m| m.spec.project_id == Some(project.id))
        .collect();

    let brand_guidance = applicable_brand_guidance(&materials, catalog);

    environments.sort_by(|a, b| a.name.cmp(&b.name));
    let environments = environments
        .into_iter()
        .map(|environment| {
            let mut own: Vec<MaterialView> = materials
                .iter()
                .filter(|m| m.spec.environment_id == environment.id)
                .cloned()
                .collect();
            own.sort_by_key(|m| m.spec.item);
            EnvironmentDetail { environment, materials: own }
        })
        .collect();

    ProjectDetail { project, owner_email, environments, brand_guidance }
}

/// Uma entrada se aplica quando (sem caixa) o material dela contém o rótulo do item,
/// é igual ao código do item, ou aparece dentro da descrição do material.
/// Sem repetição, na ordem do catálogo.
pub fn applicable_brand_guidance(
    materials: &[MaterialView],
    catalog: &[BrandDescription],
) -> Vec<BrandDescription> {
    catalog
        .iter()
        .filter(|entry| {
            let key = entry.material.to_lowercase();
            !key.is_empty()
                && materials.iter().any(|m| {
                    key.contains(&m.spec.item.label().to_lowercase())
                        || key == m.spec.item.code().to_lowercase()
                        || m.spec.description.to_lowercase().contains(&key)
                })
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            catalog::EnvironmentCategory,
            material::{MaterialItem, MaterialSpec},
            project::{ApprovalStatus, ProjectType},
        },
        workflow::approval::tests::pending_spec,
    };
    use chrono::{NaiveDate, Utc};
    use sqlx::types::Json;
    use uuid::Uuid;

    fn project() -> Project {
        Project {
            id: Uuid::new_v4(),
            name: "Torre A".into(),
            project_type: ProjectType::Residential,
            delivery_date: NaiveDate::from_ymd_opt(2027, 3, 31).unwrap(),
            description: None,
            status: ApprovalStatus::Pending,
            owner_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn environment(name: &str) -> Environment {
        Environment {
            id: Uuid::new_v4(),
            name: name.into(),
            category: EnvironmentCategory::PrivateUnit,
            color_guide: None,
            item_notes: Json(Default::default()),
            environment_type_id: None,
            created_at: Utc::now(),
        }
    }

    fn view(spec: MaterialSpec) -> MaterialView {
        MaterialView {
            item_label: spec.item.label().to_string(),
            spec,
            brand_name: None,
            approver_email: None,
        }
    }

    fn row(project_id: Option<Uuid>, environment_id: Uuid, item: MaterialItem, description: &str) -> MaterialView {
        let mut spec = pending_spec(project_id);
        spec.environment_id = environment_id;
        spec.item = item;
        spec.description = description.into();
        view(spec)
    }

    fn guidance(material: &str) -> BrandDescription {
        BrandDescription {
            id: Uuid::new_v4(),
            material: material.into(),
            brands: "X, Y".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn groups_materials_by_environment_and_filters_foreign_rows() {
        let project = project();
        let suite = environment("Suíte");
        let living = environment("Sala de Estar/Jantar");
        let other_project = Uuid::new_v4();

        let materials = vec![
            row(Some(project.id), suite.id, MaterialItem::Wall, "Pintura PVA"),
            row(Some(project.id), suite.id, MaterialItem::Floor, "Porcelanato"),
            row(Some(other_project), suite.id, MaterialItem::Floor, "Laminado"),
            row(None, suite.id, MaterialItem::Floor, "Porcelanato ou laminado"),
            row(Some(project.id), living.id, MaterialItem::Ceiling, "Gesso"),
        ];

        let detail = assemble_project_detail(project.clone(), None, vec![suite.clone(), living.clone()], materials, &[]);

        // ordenado por nome
        assert_eq!(detail.environments[0].environment.name, "Sala de Estar/Jantar");
        assert_eq!(detail.environments[1].environment.name, "Suíte");

        let suite_rows = &detail.environments[1].materials;
        assert_eq!(suite_rows.len(), 2);
        assert_eq!(suite_rows[0].spec.item, MaterialItem::Floor);
        assert_eq!(suite_rows[1].spec.item, MaterialItem::Wall);
        assert!(suite_rows.iter().all(|m| m.spec.project_id == Some(project.id)));

        assert_eq!(detail.environments[0].materials.len(), 1);
    }

    #[test]
    fn brand_guidance_matches_label_code_or_description() {
        let project = project();
        let suite = environment("Suíte");
        let materials = vec![
            row(Some(project.id), suite.id, MaterialItem::Floor, "Porcelanato 60x60"),
            row(Some(project.id), suite.id, MaterialItem::Hardware, "Acabamento cromado"),
            row(Some(project.id), suite.id, MaterialItem::Door, "Semi-oca"),
        ];
        let catalog = vec![
            guidance("Laminado"),
            guidance("Porcelanato"),
            guidance("Ferragem de portas"),
            guidance("door"),
            guidance("Louças"),
        ];

        let applicable = applicable_brand_guidance(&materials, &catalog);
        let names: Vec<_> = applicable.iter().map(|g| g.material.as_str()).collect();

        assert_eq!(names, vec!["Porcelanato", "Ferragem de portas", "door"]);
    }

    #[test]
    fn each_guidance_entry_appears_once() {
        let project = project();
        let suite = environment("Suíte");
        let materials = vec![
            row(Some(project.id), suite.id, MaterialItem::Floor, "Porcelanato"),
            row(Some(project.id), suite.id, MaterialItem::Baseboard, "Porcelanato h=5cm"),
        ];

        let applicable = applicable_brand_guidance(&materials, &[guidance("porcelanato")]);
        assert_eq!(applicable.len(), 1);
    }
}
