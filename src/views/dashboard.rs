//! Dashboard KPIs.

use crate::domain::stage::default_stages;
use crate::domain::{DevelopmentType, Priority, ProgressPolicy, Project, Stage};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageCount {
    pub stage: &'static Stage,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardKpis {
    pub total: usize,
    pub active: usize,
    pub finished: usize,
    pub overdue: usize,
    /// Mean progress over all projects, rounded; 0 when there are none
    pub average_progress: u8,
    pub by_stage: Vec<StageCount>,
    pub by_type: Vec<LabelCount>,
    pub by_priority: Vec<LabelCount>,
}

impl DashboardKpis {
    pub fn compute(projects: &[Project], policy: ProgressPolicy, today: NaiveDate) -> Self {
        let total = projects.len();
        let finished = projects.iter().filter(|p| p.is_finished()).count();
        let overdue = projects.iter().filter(|p| p.is_overdue(today)).count();

        let progress_sum: u64 = projects.iter().map(|p| u64::from(p.progress(policy))).sum();
        let average_progress = if total == 0 {
            0
        } else {
            ((progress_sum as f64) / (total as f64)).round() as u8
        };

        let by_stage = default_stages()
            .iter()
            .map(|stage| StageCount {
                stage,
                count: projects.iter().filter(|p| p.stage().id == stage.id).count(),
            })
            .collect();

        let mut by_type: Vec<LabelCount> = DevelopmentType::KNOWN
            .iter()
            .map(|t| LabelCount {
                label: t.label().to_string(),
                count: projects.iter().filter(|p| p.development() == *t).count(),
            })
            .collect();
        let other = projects
            .iter()
            .filter(|p| matches!(p.development(), DevelopmentType::Other(_)))
            .count();
        if other > 0 {
            by_type.push(LabelCount {
                label: "Otro".to_string(),
                count: other,
            });
        }

        let by_priority = Priority::ALL
            .iter()
            .map(|priority| LabelCount {
                label: priority.label().to_string(),
                count: projects.iter().filter(|p| p.priority == *priority).count(),
            })
            .collect();

        Self {
            total,
            active: total - finished,
            finished,
            overdue,
            average_progress,
            by_stage,
            by_type,
            by_priority,
        }
    }

    pub fn stage_count(&self, stage_id: &str) -> usize {
        self.by_stage
            .iter()
            .find(|s| s.stage.id == stage_id)
            .map_or(0, |s| s.count)
    }
}
