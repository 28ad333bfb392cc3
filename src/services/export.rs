//! Spreadsheet, printable report and KPI exports.
//!
//! Exports are rendered from the same read models as the interactive views,
//! so labels, colors, order and percentages always match the screen.

use crate::domain::{ProgressPolicy, Project};
use crate::error::{ExportError, ExportResult};
use crate::views::{build_rows, build_timeline, DashboardKpis, SortKey};
use chrono::{Local, NaiveDate};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Spreadsheet (CSV)
    Csv,
    /// Printable plain-text report grouped by stage
    Report,
    /// Dashboard KPIs as JSON
    Kpi,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Report => "txt",
            Self::Kpi => "json",
        }
    }

    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Csv => "proyectos",
            Self::Report => "reporte",
            Self::Kpi => "indicadores",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" | "xlsx" | "spreadsheet" => Ok(Self::Csv),
            "report" | "pdf" | "txt" => Ok(Self::Report),
            "kpi" | "json" => Ok(Self::Kpi),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

const CSV_HEADER: [&str; 11] = [
    "Código",
    "Nombre",
    "Tipo",
    "Etapa",
    "Etapa (corta)",
    "Color",
    "Avance (%)",
    "Prioridad",
    "Profesional",
    "Fecha inicio",
    "Fecha entrega",
];

/// Quote a CSV field when it contains a separator, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn date_cell(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Rows in pipeline order, one line per project
pub fn render_csv(projects: &[Project], policy: ProgressPolicy) -> String {
    let mut out = String::new();
    out.push_str(&CSV_HEADER.join(","));
    out.push_str("\r\n");

    for project in projects_by_stage(projects) {
        let row = crate::views::TableRow::from_project(project, policy);
        let cells = [
            csv_field(&row.code),
            csv_field(&row.name),
            csv_field(&row.development_type),
            csv_field(row.stage.label),
            csv_field(row.stage.short),
            row.stage.color.to_string(),
            row.progress.to_string(),
            row.priority.label().to_string(),
            csv_field(row.professional.as_deref().unwrap_or("")),
            date_cell(project.start_date),
            date_cell(row.due_date),
        ];
        out.push_str(&cells.join(","));
        out.push_str("\r\n");
    }
    out
}

fn projects_by_stage(projects: &[Project]) -> Vec<&Project> {
    let order = build_rows(projects, ProgressPolicy::Stage, SortKey::Stage, false);
    order
        .iter()
        .filter_map(|row| projects.iter().find(|p| p.id == row.id))
        .collect()
}

/// Printable report: KPI summary followed by one section per stage
pub fn render_report(projects: &[Project], policy: ProgressPolicy, today: NaiveDate) -> String {
    let kpis = DashboardKpis::compute(projects, policy, today);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "REPORTE DE PROYECTOS");
    let _ = writeln!(out, "Fecha: {}", today.format("%Y-%m-%d"));
    let _ = writeln!(out);
    let _ = writeln!(out, "Total de proyectos:  {}", kpis.total);
    let _ = writeln!(out, "En curso:            {}", kpis.active);
    let _ = writeln!(out, "Terminados:          {}", kpis.finished);
    let _ = writeln!(out, "Atrasados:           {}", kpis.overdue);
    let _ = writeln!(out, "Avance promedio:     {}%", kpis.average_progress);

    for group in build_timeline(projects, policy) {
        let _ = writeln!(out);
        let _ = writeln!(out, "== {} ({}) ==", group.stage.label, group.entries.len());
        let mut entries = group.entries;
        entries.sort_by(|a, b| a.code.cmp(&b.code));
        for entry in entries {
            let _ = writeln!(
                out,
                "  {:<14} {:<40} {:>3}%",
                entry.code, entry.name, entry.progress
            );
        }
    }
    out
}

/// KPI snapshot as pretty JSON
pub fn render_kpis(
    projects: &[Project],
    policy: ProgressPolicy,
    today: NaiveDate,
) -> ExportResult<String> {
    let kpis = DashboardKpis::compute(projects, policy, today);
    Ok(serde_json::to_string_pretty(&kpis)?)
}

/// Render `format` and write it to a timestamped file in `directory`
pub fn export_to(
    directory: &Path,
    format: ExportFormat,
    projects: &[Project],
    policy: ProgressPolicy,
) -> ExportResult<PathBuf> {
    let now = Local::now();
    let today = now.date_naive();
    let content = match format {
        ExportFormat::Csv => render_csv(projects, policy),
        ExportFormat::Report => render_report(projects, policy, today),
        ExportFormat::Kpi => render_kpis(projects, policy, today)?,
    };

    fs::create_dir_all(directory)?;
    let path = directory.join(format!(
        "{}-{}.{}",
        format.file_stem(),
        now.format("%Y%m%d-%H%M%S"),
        format.extension()
    ));
    fs::write(&path, content)?;
    tracing::info!(
        "Exported {} projects as {:?} to {}",
        projects.len(),
        format,
        path.display()
    );
    Ok(path)
}
