// src/services/document_service.rs

use std::path::{Path, PathBuf};

use genpdf::{elements, style, Element};
use image::Luma;
use qrcode::QrCode;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{DocumentRepository, PgStore},
    models::{
        document::{DefineDocumentPayload, DocumentFilter, DocumentModel},
        project::{ApprovalStatus, ProjectDetail},
    },
    services::project_service::ProjectService,
};

// --- Estrutura do memorial (independente do PDF) ---

#[derive(Debug, Clone, PartialEq)]
pub struct MemorialRow {
    pub item: String,
    pub description: String,
    pub brand: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemorialSection {
    pub heading: String,
    pub color_guide: Option<String>,
    pub rows: Vec<MemorialRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemorialOutline {
    pub title: String,
    pub header_lines: Vec<String>,
    pub sections: Vec<MemorialSection>,
    // (material, marcas)
    pub guidance: Vec<(String, String)>,
    pub qr_payload: String,
}

pub fn memorial_outline(detail: &ProjectDetail) -> MemorialOutline {
    let project = &detail.project;

    let mut header_lines = vec![
        format!("Tipo: {:?}", project.project_type),
        format!("Entrega prevista: {}", project.delivery_date.format("%d/%m/%Y")),
    ];
    if let Some(owner) = &detail.owner_email {
        header_lines.push(format!("Responsável: {}", owner));
    }
    if let Some(description) = project.description.as_deref().filter(|d| !d.trim().is_empty()) {
        header_lines.push(description.to_string());
    }

    let sections = detail
        .environments
        .iter()
        .map(|env| MemorialSection {
            heading: env.environment.name.to_uppercase(),
            color_guide: env.environment.color_guide.clone(),
            rows: env
                .materials
                .iter()
                .map(|m| MemorialRow {
                    item: m.item_label.clone(),
                    description: m.spec.description.clone(),
                    brand: m.brand_name.clone().unwrap_or_else(|| "-".to_string()),
                })
                .collect(),
        })
        .collect();

    MemorialOutline {
        title: format!("MEMORIAL DESCRITIVO - {}", project.name),
        header_lines,
        sections,
        guidance: detail
            .brand_guidance
            .iter()
            .map(|g| (g.material.clone(), g.brands.clone()))
            .collect(),
        qr_payload: format!("memorial:{}", project.id),
    }
}

fn pdf_error(e: impl std::fmt::Display) -> AppError {
    AppError::InternalServerError(anyhow::anyhow!("Falha ao gerar o PDF: {}", e))
}

/// Renderiza o memorial. Bloqueante (fontes em disco + layout).
pub fn render_memorial_pdf(outline: &MemorialOutline, fonts_dir: &Path) -> Result<Vec<u8>, AppError> {
    let font_family = genpdf::fonts::from_files(fonts_dir, "Roboto", None)
        .map_err(|_| AppError::FontNotFound(fonts_dir.display().to_string()))?;

    let mut doc = genpdf::Document::new(font_family);
    doc.set_title(outline.title.clone());
    let mut decorator = genpdf::SimplePageDecorator::new();
    decorator.set_margins(10);
    doc.set_page_decorator(decorator);

    // --- CABEÇALHO ---
    doc.push(
        elements::Paragraph::new(outline.title.clone())
            .styled(style::Style::new().bold().with_font_size(16)),
    );
    for line in &outline.header_lines {
        doc.push(elements::Paragraph::new(line.clone()).styled(style::Style::new().with_font_size(10)));
    }
    doc.push(elements::Break::new(1.5));

    // --- AMBIENTES ---
    let style_bold = style::Style::new().bold();
    for section in &outline.sections {
        doc.push(
            elements::Paragraph::new(section.heading.clone())
                .styled(style::Style::new().bold().with_font_size(12)),
        );
        if let Some(color_guide) = &section.color_guide {
            doc.push(
                elements::Paragraph::new(format!("Cores: {}", color_guide))
                    .styled(style::Style::new().italic().with_font_size(9)),
            );
        }

        if section.rows.is_empty() {
            doc.push(elements::Paragraph::new("Nenhum item especificado."));
        } else {
            // Pesos: Item (2), Descrição (5), Marca (2)
            let mut table = elements::TableLayout::new(vec![2, 5, 2]);
            table.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));
            table
                .row()
                .element(elements::Paragraph::new("Item").styled(style_bold))
                .element(elements::Paragraph::new("Descrição").styled(style_bold))
                .element(elements::Paragraph::new("Marca").styled(style_bold))
                .push()
                .map_err(pdf_error)?;

            for row in &section.rows {
                table
                    .row()
                    .element(elements::Paragraph::new(row.item.clone()))
                    .element(elements::Paragraph::new(row.description.clone()))
                    .element(elements::Paragraph::new(row.brand.clone()))
                    .push()
                    .map_err(pdf_error)?;
            }
            doc.push(table);
        }
        doc.push(elements::Break::new(1));
    }

    // --- ORIENTAÇÃO DE MARCAS ---
    if !outline.guidance.is_empty() {
        doc.push(
            elements::Paragraph::new("MARCAS DE REFERÊNCIA")
                .styled(style::Style::new().bold().with_font_size(12)),
        );
        for (material, brands) in &outline.guidance {
            doc.push(elements::Paragraph::new(format!("{}: {}", material, brands)));
        }
        doc.push(elements::Break::new(1));
    }

    // --- QR CODE (referência do projeto) ---
    let code = QrCode::new(outline.qr_payload.as_bytes()).map_err(pdf_error)?;
    let image_buffer = code.render::<Luma<u8>>().build();
    let dynamic_image = image::DynamicImage::ImageLuma8(image_buffer);
    let pdf_image = elements::Image::from_dynamic_image(dynamic_image)
        .map_err(pdf_error)?
        .with_scale(genpdf::Scale::new(0.4, 0.4));
    doc.push(pdf_image);

    let mut buffer = Vec::new();
    doc.render(&mut buffer).map_err(pdf_error)?;
    Ok(buffer)
}

#[derive(Clone)]
pub struct DocumentService {
    document_repo: DocumentRepository,
    project_service: ProjectService<PgStore>,
    fonts_dir: PathBuf,
}

impl DocumentService {
    pub fn new(
        document_repo: DocumentRepository,
        project_service: ProjectService<PgStore>,
        fonts_dir: PathBuf,
    ) -> Self {
        Self { document_repo, project_service, fonts_dir }
    }

    /// Registra o modelo de documento. Só para projetos APROVADOS.
    pub async fn define(&self, payload: DefineDocumentPayload) -> Result<DocumentModel, AppError> {
        let project = self.project_service.get(payload.project_id).await?;
        if project.status != ApprovalStatus::Approved {
            return Err(AppError::DocumentRequiresApproval);
        }

        let name = payload
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&project.name);

        let document = self
            .document_repo
            .create(project.id, name, payload.description.trim())
            .await?;
        tracing::info!("Documento '{}' definido para o projeto {}", document.name, project.id);
        Ok(document)
    }

    pub async fn list(&self, filter: &DocumentFilter) -> Result<Vec<DocumentModel>, AppError> {
        self.document_repo.list(filter.project).await
    }

    pub async fn memorial_pdf(&self, project_id: Uuid) -> Result<Vec<u8>, AppError> {
        let detail = self.project_service.detail(project_id).await?;
        if detail.project.status != ApprovalStatus::Approved {
            return Err(AppError::DocumentRequiresApproval);
        }

        let outline = memorial_outline(&detail);
        let fonts_dir = self.fonts_dir.clone();

        let pdf = tokio::task::spawn_blocking(move || render_memorial_pdf(&outline, &fonts_dir))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de renderização: {}", e))??;

        tracing::info!("Memorial do projeto {} gerado ({} bytes)", project_id, pdf.len());
        Ok(pdf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        catalog::{BrandDescription, Environment, EnvironmentCategory},
        material::{MaterialItem, MaterialView},
        project::{EnvironmentDetail, Project, ProjectType},
    };
    use crate::workflow::approval::tests::pending_spec;
    use chrono::{NaiveDate, Utc};
    use sqlx::types::Json;

    fn detail() -> ProjectDetail {
        let project = Project {
            id: Uuid::new_v4(),
            name: "Tower A".into(),
            project_type: ProjectType::Residential,
            delivery_date: NaiveDate::from_ymd_opt(2027, 3, 31).unwrap(),
            description: Some("  ".into()),
            status: ApprovalStatus::Approved,
            owner_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let suite = Environment {
            id: Uuid::new_v4(),
            name: "Suite".into(),
            category: EnvironmentCategory::PrivateUnit,
            color_guide: Some("Branco gelo".into()),
            item_notes: Json(Default::default()),
            environment_type_id: None,
            created_at: Utc::now(),
        };
        let garden = Environment { id: Uuid::new_v4(), name: "Garden".into(), color_guide: None, ..suite.clone() };

        let mut floor = pending_spec(Some(project.id));
        floor.environment_id = suite.id;
        floor.item = MaterialItem::Floor;

        ProjectDetail {
            owner_email: Some("atendente@construtora.com".into()),
            environments: vec![
                EnvironmentDetail {
                    environment: suite,
                    materials: vec![MaterialView {
                        item_label: "Piso".into(),
                        brand_name: Some("Portobello".into()),
                        approver_email: None,
                        spec: floor,
                    }],
                },
                EnvironmentDetail { environment: garden, materials: vec![] },
            ],
            brand_guidance: vec![BrandDescription {
                id: Uuid::new_v4(),
                material: "Porcelanato".into(),
                brands: "Portobello, Arielle".into(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }],
            project,
        }
    }

    #[test]
    fn outline_follows_the_nested_view() {
        let detail = detail();
        let outline = memorial_outline(&detail);

        assert_eq!(outline.title, "MEMORIAL DESCRITIVO - Tower A");
        assert_eq!(
            outline.header_lines,
            vec![
                "Tipo: Residential".to_string(),
                "Entrega prevista: 31/03/2027".to_string(),
                "Responsável: atendente@construtora.com".to_string(),
            ]
        );
        assert_eq!(outline.sections.len(), 2);
        assert_eq!(outline.sections[0].heading, "SUITE");
        assert_eq!(outline.sections[0].color_guide.as_deref(), Some("Branco gelo"));
        assert_eq!(
            outline.sections[0].rows,
            vec![MemorialRow {
                item: "Piso".into(),
                description: "Porcelanato".into(),
                brand: "Portobello".into(),
            }]
        );
        assert!(outline.sections[1].rows.is_empty());
        assert_eq!(outline.guidance, vec![("Porcelanato".to_string(), "Portobello, Arielle".to_string())]);
    }

    #[test]
    fn qr_code_points_to_the_project() {
        let detail = detail();
        let outline = memorial_outline(&detail);
        assert_eq!(outline.qr_payload, format!("memorial:{}", detail.project.id));
    }

    #[test]
    fn missing_fonts_are_reported() {
        let outline = memorial_outline(&detail());
        let result = render_memorial_pdf(&outline, Path::new("/nao/existe/fonts"));
        assert!(matches!(result, Err(AppError::FontNotFound(_))));
    }
}
