//! Timeline: projects grouped by stage, most recently touched first.

use crate::domain::stage::default_stages;
use crate::domain::{ProgressPolicy, Project, Stage};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub id: String,
    pub code: String,
    pub name: String,
    pub progress: u8,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineGroup {
    pub stage: &'static Stage,
    pub entries: Vec<TimelineEntry>,
}

/// Group projects by stage in pipeline order, skipping empty stages.
///
/// Each project is evaluated against its own development type, so a
/// feasibility study in design reads 75% here as everywhere else.
pub fn build_timeline(projects: &[Project], policy: ProgressPolicy) -> Vec<TimelineGroup> {
    default_stages()
        .iter()
        .filter_map(|stage| {
            let mut entries: Vec<TimelineEntry> = projects
                .iter()
                .filter(|p| p.stage().id == stage.id)
                .map(|p| TimelineEntry {
                    id: p.id.clone(),
                    code: p.code.clone(),
                    name: p.name.clone(),
                    progress: p.progress(policy),
                    updated_at: p.updated_at,
                })
                .collect();
            if entries.is_empty() {
                return None;
            }
            entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Some(TimelineGroup { stage, entries })
        })
        .collect()
}
