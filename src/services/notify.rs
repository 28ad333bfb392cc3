//! Email notifications for project creation and status changes.
//!
//! Delivery is someone else's job: [`OutboxNotifier`] appends one JSON
//! payload per line to an outbox file that a mail relay drains. The payload
//! carries stage labels and the progress percentage exactly as the views
//! show them.

use crate::domain::{Project, ProgressPolicy, Stage};
use crate::error::{NotifyError, NotifyResult};
use serde::{Deserialize, Serialize};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// Kind of notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Creation,
    StatusChange,
}

/// Payload handed to the email collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub recipient: String,
    pub project_name: String,
    pub project_code: String,
    /// Label of the stage the project is in now
    pub current_status: String,
    /// Label of the stage it left, for status changes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_status: Option<String>,
    pub progress: u8,
}

impl Notification {
    /// Notice for a freshly created project
    pub fn creation(project: &Project, policy: ProgressPolicy) -> NotifyResult<Self> {
        Self::build(NotificationKind::Creation, project, None, policy)
    }

    /// Notice for a project that left `previous`
    ///
    /// `previous` is resolved against the stage set the project had before
    /// the change, which differs from the current one when the development
    /// type changed too.
    pub fn status_change(
        project: &Project,
        previous: &Stage,
        policy: ProgressPolicy,
    ) -> NotifyResult<Self> {
        Self::build(
            NotificationKind::StatusChange,
            project,
            Some(previous.label.to_string()),
            policy,
        )
    }

    fn build(
        kind: NotificationKind,
        project: &Project,
        previous_status: Option<String>,
        policy: ProgressPolicy,
    ) -> NotifyResult<Self> {
        let recipient = project
            .requester_email
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| NotifyError::NoRecipient(project.code.clone()))?;

        Ok(Self {
            kind,
            recipient: recipient.to_string(),
            project_name: project.name.clone(),
            project_code: project.code.clone(),
            current_status: project.stage().label.to_string(),
            previous_status,
            progress: project.progress(policy),
        })
    }
}

/// Email collaborator contract
pub trait Notifier: Send + Sync {
    fn send(&self, notification: &Notification) -> NotifyResult<()>;
}

/// Appends notifications as JSON lines to an outbox file
pub struct OutboxNotifier {
    path: PathBuf,
    lock: Mutex<()>,
}

impl OutboxNotifier {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl Notifier for OutboxNotifier {
    fn send(&self, notification: &Notification) -> NotifyResult<()> {
        let line = serde_json::to_string(notification)?;
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;

        tracing::info!(
            "Queued {:?} notification for {} to {}",
            notification.kind,
            notification.project_code,
            notification.recipient
        );
        Ok(())
    }
}

/// Logs notifications instead of delivering them
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, notification: &Notification) -> NotifyResult<()> {
        tracing::info!(
            "Notification ({:?}) for {}: {} -> {}",
            notification.kind,
            notification.project_code,
            notification.previous_status.as_deref().unwrap_or("-"),
            notification.current_status
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::{ASSIGNMENT, DESIGN, PROCUREMENT};
    use crate::domain::{stage_by_id, ProjectDraft, ProjectPatch};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn project() -> Project {
        let mut project = Project::new("P-2024-001", "Sala de Música", "REM", "ana@uni.cl");
        project.requester_email = Some("decano@uni.cl".to_string());
        project
    }

    #[test]
    fn test_creation_payload() {
        let n = Notification::creation(&project(), ProgressPolicy::Stage).unwrap();
        assert_eq!(n.kind, NotificationKind::Creation);
        assert_eq!(n.current_status, "Recepción Requerimiento");
        assert_eq!(n.previous_status, None);
        assert_eq!(n.progress, 14);
    }

    #[test]
    fn test_status_change_payload() {
        let mut p = project();
        p.apply(ProjectPatch::status(ASSIGNMENT)).unwrap();
        p.apply(ProjectPatch::status(DESIGN)).unwrap();

        let previous = stage_by_id(ASSIGNMENT, "REM");
        let n = Notification::status_change(&p, previous, ProgressPolicy::Stage).unwrap();
        assert_eq!(n.previous_status.as_deref(), Some("En Asignación de Profesional"));
        assert_eq!(n.current_status, "En Diseño");
        assert_eq!(n.progress, 43);

        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], "status_change");
        assert_eq!(value["projectCode"], "P-2024-001");
    }

    #[test]
    fn test_status_change_keeps_label_of_previous_stage_set() {
        let mut p = project();
        p.apply(ProjectPatch::status(PROCUREMENT)).unwrap();

        let mut draft = ProjectDraft::new(p.clone());
        draft.set_development_type("FTE");
        let (previous, current) = draft.status_change().unwrap();
        assert_eq!(previous.label, "En Gestión de Compra");
        assert_eq!(current.id, DESIGN);

        p.apply(draft.patch().unwrap()).unwrap();
        let n = Notification::status_change(&p, previous, ProgressPolicy::Stage).unwrap();
        assert_eq!(n.previous_status.as_deref(), Some("En Gestión de Compra"));
        assert_eq!(n.current_status, "En Diseño");
    }

    #[test]
    fn test_missing_recipient() {
        let mut p = project();
        p.requester_email = Some("  ".to_string());
        assert!(matches!(
            Notification::creation(&p, ProgressPolicy::Stage),
            Err(NotifyError::NoRecipient(_))
        ));
    }

    #[test]
    fn test_outbox_appends_lines() {
        let temp = TempDir::new().unwrap();
        let notifier = OutboxNotifier::new(temp.path().join("mail").join("outbox.jsonl"));
        let n = Notification::creation(&project(), ProgressPolicy::Stage).unwrap();

        notifier.send(&n).unwrap();
        notifier.send(&n).unwrap();

        let content = std::fs::read_to_string(notifier.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        let parsed: Notification = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(parsed, n);
    }
}
