//! Project table rows and their sort orders.

use crate::domain::stage::stage_position;
use crate::domain::{Priority, ProgressPolicy, Project, Stage};
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Column the table is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Stage,
    Name,
    Code,
    Progress,
    DueDate,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        Self::Stage,
        Self::Name,
        Self::Code,
        Self::Progress,
        Self::DueDate,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Stage => "Etapa",
            Self::Name => "Nombre",
            Self::Code => "Código",
            Self::Progress => "Avance",
            Self::DueDate => "Entrega",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub id: String,
    pub code: String,
    pub name: String,
    pub development_type: String,
    pub stage: &'static Stage,
    /// Position of the stage in the full pipeline, comparable across types
    pub pipeline_rank: usize,
    pub progress: u8,
    pub priority: Priority,
    pub professional: Option<String>,
    pub due_date: Option<NaiveDate>,
}

impl TableRow {
    pub fn from_project(project: &Project, policy: ProgressPolicy) -> Self {
        let stage = project.stage();
        Self {
            id: project.id.clone(),
            code: project.code.clone(),
            name: project.name.clone(),
            development_type: project.development().label().to_string(),
            stage,
            pipeline_rank: stage_position(stage.id, ""),
            progress: project.progress(policy),
            priority: project.priority,
            professional: project.professional.clone(),
            due_date: project.due_date,
        }
    }
}

/// Rows for `projects`, sorted by `key` (ties broken by code)
pub fn build_rows(
    projects: &[Project],
    policy: ProgressPolicy,
    key: SortKey,
    descending: bool,
) -> Vec<TableRow> {
    let mut rows: Vec<TableRow> = projects
        .iter()
        .map(|p| TableRow::from_project(p, policy))
        .collect();

    rows.sort_by(|a, b| {
        let primary = compare(a, b, key);
        let primary = if descending { primary.reverse() } else { primary };
        primary.then_with(|| a.code.cmp(&b.code))
    });
    rows
}

fn compare(a: &TableRow, b: &TableRow, key: SortKey) -> Ordering {
    match key {
        SortKey::Stage => a.pipeline_rank.cmp(&b.pipeline_rank),
        SortKey::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        SortKey::Code => a.code.cmp(&b.code),
        SortKey::Progress => a.progress.cmp(&b.progress),
        // Undated rows go last
        SortKey::DueDate => match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::{DESIGN, EXECUTION, FINISHED};
    use crate::domain::ProjectPatch;

    fn projects() -> Vec<Project> {
        let mut a = Project::new("P-3", "Zócalo", "REM", "ana@uni.cl");
        a.apply(ProjectPatch::status(EXECUTION)).unwrap();
        let mut b = Project::new("P-1", "aulas", "FTE", "ana@uni.cl");
        b.apply(ProjectPatch::status(DESIGN)).unwrap();
        let c = Project::new("P-2", "Biblioteca", "OBN", "ana@uni.cl");
        vec![a, b, c]
    }

    fn codes(rows: &[TableRow]) -> Vec<&str> {
        rows.iter().map(|r| r.code.as_str()).collect()
    }

    #[test]
    fn test_sort_by_stage_uses_pipeline_order() {
        let rows = build_rows(&projects(), ProgressPolicy::Stage, SortKey::Stage, false);
        assert_eq!(codes(&rows), vec!["P-2", "P-1", "P-3"]);
        // FTE design reads 75% even though it sorts before execution
        assert_eq!(rows[1].progress, 75);
        assert_eq!(rows[1].stage.label, "En Diseño");
    }

    #[test]
    fn test_sort_by_progress_descending() {
        let rows = build_rows(&projects(), ProgressPolicy::Stage, SortKey::Progress, true);
        assert_eq!(codes(&rows), vec!["P-3", "P-1", "P-2"]);
    }

    #[test]
    fn test_sort_by_name_case_insensitive() {
        let rows = build_rows(&projects(), ProgressPolicy::Stage, SortKey::Name, false);
        assert_eq!(codes(&rows), vec!["P-1", "P-2", "P-3"]);
    }

    #[test]
    fn test_undated_rows_last() {
        let mut ps = projects();
        ps[2].due_date = NaiveDate::from_ymd_opt(2025, 1, 10);
        let rows = build_rows(&ps, ProgressPolicy::Stage, SortKey::DueDate, false);
        assert_eq!(rows[0].code, "P-2");
    }

    #[test]
    fn test_terminal_rank_shared_by_both_sets() {
        let mut fte = Project::new("P-9", "Estudio", "FTE", "ana@uni.cl");
        fte.apply(ProjectPatch::status(FINISHED)).unwrap();
        let row = TableRow::from_project(&fte, ProgressPolicy::Stage);
        assert_eq!(row.pipeline_rank, 6);
        assert_eq!(row.progress, 100);
    }

    #[test]
    fn test_sort_key_cycle() {
        assert_eq!(SortKey::Stage.next(), SortKey::Name);
        assert_eq!(SortKey::DueDate.next(), SortKey::Stage);
    }
}
