// src/workflow/brand_guidance.rs

use crate::{
    common::error::AppError,
    db::store::WorkflowTx,
    models::{
        catalog::BrandDescription,
        material::{MaterialItem, MaterialSpec},
    },
};

/// Palavra-chave -> (material, marcas padrão).
/// Procurada no rótulo do item e na descrição de cada material criado.
pub const DEFAULT_GUIDANCE: &[(&str, &str, &str)] = &[
    (
        "porcelanato",
        "Porcelanato",
        "Portobello, Arielle, Tecnogres, Pamesa, Biancogrês, Elizabeth, Ceusa, Pointer, Villagres",
    ),
    (
        "cerâmica",
        "Cerâmica",
        "Incesa, Portobello, Arielle, Tecnogres, Pamesa, Camelo Fior, Biancogrês, Pointer",
    ),
    ("laminado", "Laminado", "Eucatex, Durafloor, Espaçofloor"),
    ("esquadria", "Esquadria", "Esaf, Alumasa, Atlantica, Ramassol, Unicasa"),
    ("ferragem", "Ferragem", "Silvana, Stam, Arouca, Soprano, Aliança, Imab"),
    (
        "inst. elétrica",
        "Inst. Elétrica",
        "Alumbra, Steck, Ilumi, Schneider, Margirius, Fame",
    ),
    ("metal sanitário", "Metal Sanitário", "Forusi, Deca, Celite, Fabrimar, Docol"),
    ("louça", "Louças", "Celite, Deca, Incepa"),
];

/// Separa "A, B, C" em nomes limpos.
pub fn split_brands(brands: &str) -> Vec<String> {
    brands
        .split(',')
        .map(|b| b.trim().trim_end_matches('.').trim())
        .filter(|b| !b.is_empty())
        .map(str::to_string)
        .collect()
}

/// Junta as marcas novas às existentes sem duplicar (comparação sem caixa).
/// A primeira grafia vence e a ordem de chegada é mantida.
pub fn merge_brands(existing: &str, incoming: &[String]) -> String {
    let mut merged: Vec<String> = Vec::new();
    let candidates = split_brands(existing)
        .into_iter()
        .chain(incoming.iter().flat_map(|b| split_brands(b)));

    for brand in candidates {
        let lower = brand.to_lowercase();
        if !merged.iter().any(|m| m.to_lowercase() == lower) {
            merged.push(brand);
        }
    }
    merged.join(", ")
}

/// Entradas padrão que precisam ser criadas para os materiais informados.
pub fn guidance_to_create(
    materials: &[(MaterialItem, &str)],
    existing: &[BrandDescription],
) -> Vec<(&'static str, &'static str)> {
    let mut missing: Vec<(&'static str, &'static str)> = Vec::new();

    for (item, description) in materials {
        let haystack = format!("{} {}", item.label(), description).to_lowercase();

        for (keyword, material, brands) in DEFAULT_GUIDANCE {
            if !haystack.contains(keyword) {
                continue;
            }
            let known = existing
                .iter()
                .any(|e| e.material.to_lowercase() == material.to_lowercase())
                || missing.iter().any(|(m, _)| m == material);
            if !known {
                missing.push((*material, *brands));
            }
        }
    }
    missing
}

/// Hook pós-criação: garante a orientação de marcas para os materiais recém-criados.
/// Roda na mesma transação; um erro aqui aborta a operação inteira.
pub async fn ensure_brand_guidance<T: WorkflowTx>(
    tx: &mut T,
    created: &[MaterialSpec],
) -> Result<Vec<BrandDescription>, AppError> {
    if created.is_empty() {
        return Ok(Vec::new());
    }

    let existing = tx.brand_descriptions().await?;
    let materials: Vec<(MaterialItem, &str)> = created
        .iter()
        .map(|m| (m.item, m.description.as_str()))
        .collect();

    let mut inserted = Vec::new();
    for (material, brands) in guidance_to_create(&materials, &existing) {
        let entry = tx.insert_brand_description(material, brands).await?;
        tracing::info!("Orientação de marcas criada para '{}'", entry.material);
        inserted.push(entry);
    }
    Ok(inserted)
}
