//! Project document as kept by the store.
//!
//! The stage-bearing fields are `status`, `development_type` and
//! `sub_stages`; everything that derives from them (labels, colors,
//! percentages) goes through the stage registry and progress calculator.

use super::comment::Comment;
use super::progress::ProgressPolicy;
use super::stage::{
    initial_status, is_valid_status, remap_status, stage_by_id, stage_position, stages_for,
    DevelopmentType, Stage,
};
use super::sub_stage::SubStages;
use crate::error::ProjectError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Alta,
    #[default]
    Media,
    Baja,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Alta, Self::Media, Self::Baja];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Alta => "Alta",
            Self::Media => "Media",
            Self::Baja => "Baja",
        }
    }
}

/// A tracked project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    /// Office reference code (e.g. "P-2024-031")
    #[serde(default)]
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub development_type: String,
    pub status: String,
    #[serde(default)]
    pub sub_stages: SubStages,
    #[serde(default)]
    pub priority: Priority,
    /// Assigned professional
    #[serde(default)]
    pub professional: Option<String>,
    /// Who receives creation and status-change notices
    #[serde(default)]
    pub requester_email: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Create a project at the initial stage of its development type
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        development_type: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        let development_type = development_type.into();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            code: code.into(),
            name: name.into(),
            description: String::new(),
            status: initial_status(&development_type).to_string(),
            development_type,
            sub_stages: SubStages::new(),
            priority: Priority::default(),
            professional: None,
            requester_email: None,
            location: None,
            start_date: None,
            due_date: None,
            comments: Vec::new(),
            created_by: created_by.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Ordered stages for this project's development type
    pub fn stages(&self) -> &'static [Stage] {
        stages_for(&self.development_type)
    }

    /// Current stage, first stage if the stored status is unknown
    pub fn stage(&self) -> &'static Stage {
        stage_by_id(&self.status, &self.development_type)
    }

    pub fn stage_index(&self) -> usize {
        stage_position(&self.status, &self.development_type)
    }

    pub fn development(&self) -> DevelopmentType {
        DevelopmentType::parse(&self.development_type)
    }

    pub fn progress(&self, policy: ProgressPolicy) -> u8 {
        policy.compute(&self.status, &self.sub_stages, &self.development_type)
    }

    pub fn is_finished(&self) -> bool {
        self.stage_index() + 1 == self.stages().len()
    }

    /// Past its due date without reaching the terminal stage
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_finished() && self.due_date.is_some_and(|due| due < today)
    }

    /// Check the document invariants
    pub fn validate(&self) -> Result<(), ProjectError> {
        self.validate_fields()?;
        self.validate_status()
    }

    fn validate_fields(&self) -> Result<(), ProjectError> {
        if self.name.trim().is_empty() {
            return Err(ProjectError::EmptyName);
        }
        if let (Some(start), Some(due)) = (self.start_date, self.due_date) {
            if due < start {
                return Err(ProjectError::DatesOutOfOrder { start, due });
            }
        }
        Ok(())
    }

    fn validate_status(&self) -> Result<(), ProjectError> {
        if !is_valid_status(&self.status, &self.development_type) {
            return Err(ProjectError::InvalidStatus {
                status: self.status.clone(),
                development_type: self.development_type.clone(),
            });
        }
        Ok(())
    }

    /// Apply a partial update. The document is left untouched on error.
    ///
    /// The status is only checked when the patch writes it or the
    /// development type, so a legacy status never blocks other edits.
    pub fn apply(&mut self, patch: ProjectPatch) -> Result<(), ProjectError> {
        let mut next = self.clone();
        let moves_status = patch.status.is_some() || patch.development_type.is_some();

        if let Some(code) = patch.code {
            next.code = code;
        }
        if let Some(name) = patch.name {
            next.name = name;
        }
        if let Some(description) = patch.description {
            next.description = description;
        }
        if let Some(development_type) = patch.development_type {
            next.development_type = development_type;
            if patch.status.is_none() {
                next.status = remap_status(&next.status, &next.development_type).to_string();
            }
        }
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(sub_stages) = patch.sub_stages {
            next.sub_stages = sub_stages;
        }
        if let Some(priority) = patch.priority {
            next.priority = priority;
        }
        if let Some(professional) = patch.professional {
            next.professional = professional;
        }
        if let Some(requester_email) = patch.requester_email {
            next.requester_email = requester_email;
        }
        if let Some(location) = patch.location {
            next.location = location;
        }
        if let Some(start_date) = patch.start_date {
            next.start_date = start_date;
        }
        if let Some(due_date) = patch.due_date {
            next.due_date = due_date;
        }
        if let Some(comment) = patch.add_comment {
            next.comments.push(comment);
        }

        next.validate_fields()?;
        if moves_status {
            next.validate_status()?;
        }
        next.updated_at = Utc::now();
        *self = next;
        Ok(())
    }
}

/// Partial update of a project; `None` leaves a field as is
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_stages: Option<SubStages>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requester_email: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<Option<NaiveDate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub add_comment: Option<Comment>,
}

impl ProjectPatch {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    pub fn sub_stages(sub_stages: SubStages) -> Self {
        Self {
            sub_stages: Some(sub_stages),
            ..Default::default()
        }
    }

    pub fn comment(comment: Comment) -> Self {
        Self {
            add_comment: Some(comment),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::{DESIGN, FINISHED, PROCUREMENT, RECEPTION};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_project_starts_at_first_stage() {
        let project = Project::new("P-001", "Laboratorio", "REM", "ana@uni.cl");
        assert_eq!(project.status, RECEPTION);
        assert_eq!(project.progress(ProgressPolicy::Stage), 14);
        assert_eq!(project.stage().label, "Recepción Requerimiento");
        assert!(project.validate().is_ok());
    }

    #[test]
    fn test_apply_status_patch() {
        let mut project = Project::new("P-001", "Laboratorio", "REM", "ana@uni.cl");
        project.apply(ProjectPatch::status(DESIGN)).unwrap();
        assert_eq!(project.status, DESIGN);
        assert_eq!(project.progress(ProgressPolicy::Stage), 43);
    }

    #[test]
    fn test_apply_rejects_invalid_status() {
        let mut project = Project::new("P-002", "Estudio", "FTE", "ana@uni.cl");
        let before = project.clone();
        let err = project.apply(ProjectPatch::status(PROCUREMENT)).unwrap_err();
        assert!(matches!(err, ProjectError::InvalidStatus { .. }));
        assert_eq!(project, before);
    }

    #[test]
    fn test_development_type_change_remaps_status() {
        let mut project = Project::new("P-003", "Aulas", "REM", "ana@uni.cl");
        project.apply(ProjectPatch::status(PROCUREMENT)).unwrap();

        project
            .apply(ProjectPatch {
                development_type: Some("FTE".to_string()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(project.status, DESIGN);
        assert_eq!(project.progress(ProgressPolicy::Stage), 75);
    }

    #[test]
    fn test_sub_stage_patch_keeps_status() {
        let mut project = Project::new("P-004", "Casino", "OBN", "ana@uni.cl");
        let subs: SubStages = [("architectureDesign", true)].into_iter().collect();
        project.apply(ProjectPatch::sub_stages(subs.clone())).unwrap();
        assert_eq!(project.status, RECEPTION);
        assert_eq!(project.sub_stages, subs);
    }

    #[test]
    fn test_legacy_status_does_not_block_other_edits() {
        let mut project = Project::new("P-006", "Gimnasio", "REM", "ana@uni.cl");
        project.status = "estado_antiguo".to_string();

        project
            .apply(ProjectPatch::sub_stages(SubStages::new()))
            .unwrap();
        project
            .apply(ProjectPatch::comment(crate::domain::Comment::new("ana@uni.cl", "ok")))
            .unwrap();
        project
            .apply(ProjectPatch {
                priority: Some(Priority::Alta),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(project.status, "estado_antiguo");
        assert_eq!(project.comments.len(), 1);
        assert_eq!(project.stage_index(), 0);

        // Writing the status itself is still checked
        let err = project.apply(ProjectPatch::status("otro_estado")).unwrap_err();
        assert!(matches!(err, ProjectError::InvalidStatus { .. }));
    }

    #[test]
    fn test_finished_and_overdue() {
        let mut project = Project::new("P-005", "Biblioteca", "NOR", "ana@uni.cl");
        let due = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let after = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        project.due_date = Some(due);
        assert!(project.is_overdue(after));
        assert!(!project.is_overdue(due));

        project.apply(ProjectPatch::status(FINISHED)).unwrap();
        assert!(project.is_finished());
        assert!(!project.is_overdue(after));
    }

    #[test]
    fn test_dates_must_be_ordered() {
        let mut project = Project::new("P-006", "Gimnasio", "REM", "ana@uni.cl");
        let patch = ProjectPatch {
            start_date: Some(NaiveDate::from_ymd_opt(2024, 5, 1)),
            due_date: Some(NaiveDate::from_ymd_opt(2024, 4, 1)),
            ..Default::default()
        };
        assert!(matches!(
            project.apply(patch),
            Err(ProjectError::DatesOutOfOrder { .. })
        ));
    }

    #[test]
    fn test_serialized_field_names() {
        let project = Project::new("P-007", "Piscina", "REM", "ana@uni.cl");
        let value = serde_json::to_value(&project).unwrap();
        assert_eq!(value["developmentType"], "REM");
        assert_eq!(value["status"], RECEPTION);
        assert!(value.get("subStages").is_some());
    }
}
