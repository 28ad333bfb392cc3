//! Backlog ideas captured before they become projects.

use super::project::Project;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub development_type: String,
    #[serde(default)]
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl BacklogItem {
    pub fn new(
        title: impl Into<String>,
        development_type: impl Into<String>,
        created_by: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: String::new(),
            development_type: development_type.into(),
            created_by: created_by.into(),
            created_at: Utc::now(),
        }
    }

    /// Turn the idea into a project at the initial stage of its type
    pub fn promote(&self, code: impl Into<String>, promoted_by: impl Into<String>) -> Project {
        let mut project = Project::new(
            code,
            self.title.clone(),
            self.development_type.clone(),
            promoted_by,
        );
        project.description = self.description.clone();
        project
    }
}

/// Partial update of a backlog item
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BacklogPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub development_type: Option<String>,
}

impl BacklogItem {
    pub fn apply(&mut self, patch: BacklogPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(development_type) = patch.development_type {
            self.development_type = development_type;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::RECEPTION;

    #[test]
    fn test_promote_starts_at_first_stage() {
        let mut item = BacklogItem::new("Techado multicancha", "FTE", "ana@uni.cl");
        item.description = "Cubrir la multicancha norte".to_string();

        let project = item.promote("P-2024-040", "jefe@uni.cl");
        assert_eq!(project.status, RECEPTION);
        assert_eq!(project.name, "Techado multicancha");
        assert_eq!(project.description, "Cubrir la multicancha norte");
        assert_eq!(project.development_type, "FTE");
        assert_eq!(project.created_by, "jefe@uni.cl");
        assert_eq!(project.stages().len(), 4);
    }

    #[test]
    fn test_apply_patch() {
        let mut item = BacklogItem::new("Idea", "REM", "ana@uni.cl");
        item.apply(BacklogPatch {
            title: Some("Idea refinada".to_string()),
            ..Default::default()
        });
        assert_eq!(item.title, "Idea refinada");
        assert_eq!(item.development_type, "REM");
    }
}
