//! Kanban board: one column per stage of the full pipeline.

use crate::domain::stage::default_stages;
use crate::domain::{Priority, ProgressPolicy, Project, Stage};

#[derive(Debug, Clone, PartialEq)]
pub struct KanbanCard {
    pub id: String,
    pub code: String,
    pub name: String,
    pub development_type: String,
    pub priority: Priority,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KanbanColumn {
    pub stage: &'static Stage,
    pub cards: Vec<KanbanCard>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KanbanBoard {
    pub columns: Vec<KanbanColumn>,
}

impl KanbanBoard {
    /// Place each project in the column of its stage.
    ///
    /// Feasibility-study stages are a subset of the full pipeline, so every
    /// project has a column. Cards are ordered by priority, then code.
    pub fn build(projects: &[Project], policy: ProgressPolicy) -> Self {
        let mut columns: Vec<KanbanColumn> = default_stages()
            .iter()
            .map(|stage| KanbanColumn {
                stage,
                cards: Vec::new(),
            })
            .collect();

        for project in projects {
            let stage_id = project.stage().id;
            if let Some(column) = columns.iter_mut().find(|c| c.stage.id == stage_id) {
                column.cards.push(KanbanCard {
                    id: project.id.clone(),
                    code: project.code.clone(),
                    name: project.name.clone(),
                    development_type: project.development_type.clone(),
                    priority: project.priority,
                    progress: project.progress(policy),
                });
            }
        }

        for column in &mut columns {
            column
                .cards
                .sort_by(|a, b| a.priority.cmp(&b.priority).then_with(|| a.code.cmp(&b.code)));
        }

        Self { columns }
    }

    pub fn column(&self, stage_id: &str) -> Option<&KanbanColumn> {
        self.columns.iter().find(|c| c.stage.id == stage_id)
    }

    pub fn card_count(&self) -> usize {
        self.columns.iter().map(|c| c.cards.len()).sum()
    }
}
