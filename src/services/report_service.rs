// src/services/report_service.rs

use std::{path::PathBuf, sync::Arc};

use genpdf::{elements, style, Element};

use crate::{
    common::error::AppError,
    db::{CustomerRepository, StaffRepository},
    models::{
        auth::RoleScope,
        customer::{Customer, RecordStatus},
        report::{ReportColumn, ReportFormat, ReportTable},
        staff::Staff,
    },
};

#[derive(Clone)]
pub struct ReportService {
    customers: Arc<dyn CustomerRepository>,
    staff: Arc<dyn StaffRepository>,
    fonts_dir: PathBuf,
}

/// Corta o texto em `max` caracteres, terminando com reticências.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn yes_no(flag: bool) -> String {
    let label = if flag { "Yes" } else { "No" };
    label.to_string()
}

fn status_label(status: RecordStatus) -> String {
    let label = match status {
        RecordStatus::Active => "Active",
        RecordStatus::Inactive => "Inactive",
    };
    label.to_string()
}

const fn column(header: &'static str, weight: usize, max_chars: usize) -> ReportColumn {
    ReportColumn { header, weight, max_chars }
}

pub fn customer_table(customers: &[Customer]) -> ReportTable {
    ReportTable {
        title: "Customers".into(),
        columns: vec![
            column("Code", 2, 14),
            column("Name", 3, 28),
            column("Contact", 2, 14),
            column("Email", 3, 30),
            column("City", 2, 18),
            column("Status", 1, 10),
            column("Blacklisted", 1, 4),
            column("Created", 2, 10),
        ],
        rows: customers
            .iter()
            .map(|c| {
                vec![
                    c.customer_code.clone(),
                    c.full_name(),
                    c.contact_number.clone(),
                    c.email.clone(),
                    c.city.clone(),
                    status_label(c.status),
                    yes_no(c.is_blacklisted),
                    c.created_at.format("%d/%m/%Y").to_string(),
                ]
            })
            .collect(),
    }
}

pub fn staff_table(staff: &[Staff]) -> ReportTable {
    ReportTable {
        title: "Staff".into(),
        columns: vec![
            column("Name", 3, 28),
            column("Email", 3, 30),
            column("Contact", 2, 14),
            column("Designation", 2, 20),
            column("City", 2, 18),
            column("Status", 1, 10),
            column("Available", 1, 4),
        ],
        rows: staff
            .iter()
            .map(|s| {
                vec![
                    s.full_name(),
                    s.email.clone(),
                    s.contact_number.clone(),
                    s.designation.clone().unwrap_or_default(),
                    s.address.city.clone(),
                    status_label(s.status),
                    yes_no(s.is_available),
                ]
            })
            .collect(),
    }
}

pub fn render_csv(table: &ReportTable) -> Result<Vec<u8>, AppError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let headers: Vec<&str> = table.columns.iter().map(|c| c.header).collect();
    writer
        .write_record(&headers)
        .map_err(|e| anyhow::anyhow!("Falha ao escrever CSV: {}", e))?;

    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| anyhow::anyhow!("Falha ao escrever CSV: {}", e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Falha ao finalizar CSV: {}", e.error()))?;
    Ok(bytes)
}

impl ReportService {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        staff: Arc<dyn StaffRepository>,
        fonts_dir: PathBuf,
    ) -> Self {
        Self { customers, staff, fonts_dir }
    }

    pub async fn customer_report(
        &self,
        scope: RoleScope,
        format: ReportFormat,
    ) -> Result<Vec<u8>, AppError> {
        let customers = self.customers.list_customers(scope).await?;
        self.render(&customer_table(&customers), format)
    }

    /// Funcionários excluídos logicamente não entram.
    pub async fn staff_report(&self, format: ReportFormat) -> Result<Vec<u8>, AppError> {
        let staff = self.staff.list_all_active().await?;
        self.render(&staff_table(&staff), format)
    }

    fn render(&self, table: &ReportTable, format: ReportFormat) -> Result<Vec<u8>, AppError> {
        match format {
            ReportFormat::Csv => render_csv(table),
            ReportFormat::Pdf => self.render_pdf(table),
        }
    }

    fn render_pdf(&self, table: &ReportTable) -> Result<Vec<u8>, AppError> {
        // Carrega a fonte da pasta configurada
        let font_family = genpdf::fonts::from_files(&self.fonts_dir, "Roboto", None).map_err(|_| {
            AppError::FontNotFound(format!(
                "Fonte não encontrada na pasta {}",
                self.fonts_dir.display()
            ))
        })?;

        let mut doc = genpdf::Document::new(font_family);
        doc.set_title(format!("{} report", table.title));
        doc.set_font_size(8);
        let mut decorator = genpdf::SimplePageDecorator::new();
        decorator.set_margins(10);
        doc.set_page_decorator(decorator);

        doc.push(
            elements::Paragraph::new(format!("{} report", table.title))
                .styled(style::Style::new().bold().with_font_size(16)),
        );
        doc.push(elements::Paragraph::new(format!(
            "Generated {} · {} records",
            chrono::Utc::now().format("%d/%m/%Y %H:%M"),
            table.rows.len()
        )));
        doc.push(elements::Break::new(1.5));

        let weights = table.columns.iter().map(|c| c.weight).collect();
        let mut layout = elements::TableLayout::new(weights);
        layout.set_cell_decorator(elements::FrameCellDecorator::new(true, true, false));

        let style_bold = style::Style::new().bold();
        let mut header = layout.row();
        for column in &table.columns {
            header.push_element(elements::Paragraph::new(column.header).styled(style_bold));
        }
        header
            .push()
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        for row in &table.rows {
            let mut line = layout.row();
            for (cell, column) in row.iter().zip(&table.columns) {
                line.push_element(elements::Paragraph::new(truncate(cell, column.max_chars)));
            }
            line.push()
                .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;
        }

        doc.push(layout);

        // Renderiza em memória
        let mut buffer = Vec::new();
        doc.render(&mut buffer)
            .map_err(|e| AppError::InternalServerError(anyhow::Error::msg(e.to_string())))?;

        Ok(buffer)
    }
}
