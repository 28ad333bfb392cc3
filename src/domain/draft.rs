//! Local edit state for the project detail editor.
//!
//! The editor works on a private copy of the project. Stage clicks, checklist
//! toggles and field edits stay local until [`ProjectDraft::patch`] is taken
//! and persisted. Snapshots arriving from the store in the meantime are
//! folded in with [`ProjectDraft::rebase`] without clobbering local edits.

use super::project::{Priority, Project, ProjectPatch};
use super::stage::{remap_status, Stage};
use super::transition::{stage_click, StageClick};

#[derive(Debug, Clone)]
pub struct ProjectDraft {
    base: Project,
    working: Project,
}

impl ProjectDraft {
    pub fn new(project: Project) -> Self {
        Self {
            working: project.clone(),
            base: project,
        }
    }

    /// The project as currently edited
    pub fn project(&self) -> &Project {
        &self.working
    }

    /// The last persisted version this draft is based on
    pub fn base(&self) -> &Project {
        &self.base
    }

    pub fn id(&self) -> &str {
        &self.base.id
    }

    /// Click the checkbox on stage row `row`
    pub fn click_stage(&mut self, row: usize) -> StageClick {
        let click = stage_click(&self.working.status, row, &self.working.development_type);
        if let Some(status) = click.new_status() {
            self.working.status = status.to_string();
        }
        click
    }

    /// Flip a sub-stage checkbox, returning its new state
    pub fn toggle_sub_stage(&mut self, key: &str) -> bool {
        self.working.sub_stages.toggle(key)
    }

    /// Cycle Alta → Media → Baja → Alta
    pub fn cycle_priority(&mut self) -> Priority {
        let next = match self.working.priority {
            Priority::Alta => Priority::Media,
            Priority::Media => Priority::Baja,
            Priority::Baja => Priority::Alta,
        };
        self.working.priority = next;
        next
    }

    /// Change the development type, moving the status into the new stage set
    pub fn set_development_type(&mut self, development_type: impl Into<String>) {
        self.working.development_type = development_type.into();
        self.working.status =
            remap_status(&self.working.status, &self.working.development_type).to_string();
    }

    /// Stage before and after the pending edits, when the status moved
    pub fn status_change(&self) -> Option<(&'static Stage, &'static Stage)> {
        if self.base.status == self.working.status
            && self.base.development_type == self.working.development_type
        {
            return None;
        }
        Some((self.base.stage(), self.working.stage()))
    }

    pub fn is_dirty(&self) -> bool {
        self.patch().is_some()
    }

    /// Changed fields only, or `None` when there is nothing to write
    pub fn patch(&self) -> Option<ProjectPatch> {
        let (base, work) = (&self.base, &self.working);
        let patch = ProjectPatch {
            code: changed(&base.code, &work.code),
            name: changed(&base.name, &work.name),
            description: changed(&base.description, &work.description),
            development_type: changed(&base.development_type, &work.development_type),
            status: changed(&base.status, &work.status),
            sub_stages: changed(&base.sub_stages, &work.sub_stages),
            priority: changed(&base.priority, &work.priority),
            professional: changed(&base.professional, &work.professional),
            requester_email: changed(&base.requester_email, &work.requester_email),
            location: changed(&base.location, &work.location),
            start_date: changed(&base.start_date, &work.start_date),
            due_date: changed(&base.due_date, &work.due_date),
            add_comment: None,
        };
        (!patch.is_empty()).then_some(patch)
    }

    /// Record that the pending edits were persisted
    pub fn committed(&mut self) {
        self.base = self.working.clone();
    }

    /// Throw away local edits
    pub fn discard(&mut self) {
        self.working = self.base.clone();
    }

    /// Adopt a newer stored version, keeping fields edited locally
    pub fn rebase(&mut self, snapshot: &Project) {
        let mut next = snapshot.clone();
        let (base, work) = (&self.base, &self.working);

        keep_local(&mut next.code, &base.code, &work.code);
        keep_local(&mut next.name, &base.name, &work.name);
        keep_local(&mut next.description, &base.description, &work.description);
        keep_local(
            &mut next.development_type,
            &base.development_type,
            &work.development_type,
        );
        keep_local(&mut next.status, &base.status, &work.status);
        keep_local(&mut next.sub_stages, &base.sub_stages, &work.sub_stages);
        keep_local(&mut next.priority, &base.priority, &work.priority);
        keep_local(&mut next.professional, &base.professional, &work.professional);
        keep_local(
            &mut next.requester_email,
            &base.requester_email,
            &work.requester_email,
        );
        keep_local(&mut next.location, &base.location, &work.location);
        keep_local(&mut next.start_date, &base.start_date, &work.start_date);
        keep_local(&mut next.due_date, &base.due_date, &work.due_date);

        // A remote type change can leave a locally chosen status outside the set.
        next.status = remap_status(&next.status, &next.development_type).to_string();

        self.base = snapshot.clone();
        self.working = next;
    }
}

fn changed<T: PartialEq + Clone>(base: &T, working: &T) -> Option<T> {
    (base != working).then(|| working.clone())
}

fn keep_local<T: PartialEq + Clone>(target: &mut T, base: &T, working: &T) {
    if base != working {
        *target = working.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::{ASSIGNMENT, DESIGN, PROCUREMENT, RECEPTION};
    use pretty_assertions::assert_eq;

    fn project() -> Project {
        Project::new("P-010", "Laboratorio", "REM", "ana@uni.cl")
    }

    #[test]
    fn test_clean_draft_has_no_patch() {
        let draft = ProjectDraft::new(project());
        assert!(!draft.is_dirty());
        assert_eq!(draft.patch(), None);
    }

    #[test]
    fn test_stage_click_yields_status_patch() {
        let mut draft = ProjectDraft::new(project());
        assert!(draft.click_stage(2).is_changed());

        let patch = draft.patch().unwrap();
        assert_eq!(patch, ProjectPatch::status(DESIGN));

        let (from, to) = draft.status_change().unwrap();
        assert_eq!(from.label, "Recepción Requerimiento");
        assert_eq!(to.label, "En Diseño");
    }

    #[test]
    fn test_noop_click_is_not_dirty() {
        let mut draft = ProjectDraft::new(project());
        assert_eq!(draft.click_stage(0), StageClick::Unchanged);
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_click_back_and_forth_cancels_out() {
        let mut draft = ProjectDraft::new(project());
        draft.click_stage(1);
        draft.click_stage(1);
        assert_eq!(draft.project().status, RECEPTION);
        assert!(!draft.is_dirty());
    }

    #[test]
    fn test_committed_resets_dirty() {
        let mut draft = ProjectDraft::new(project());
        draft.toggle_sub_stage("architectureDesign");
        assert!(draft.patch().unwrap().sub_stages.is_some());
        draft.committed();
        assert!(!draft.is_dirty());
        assert!(draft.base().sub_stages.is_checked("architectureDesign"));
    }

    #[test]
    fn test_rebase_keeps_local_edits() {
        let mut draft = ProjectDraft::new(project());
        draft.click_stage(3);

        let mut remote = draft.base().clone();
        remote.name = "Laboratorio de Química".to_string();
        remote.status = ASSIGNMENT.to_string();
        draft.rebase(&remote);

        assert_eq!(draft.project().name, "Laboratorio de Química");
        assert_eq!(draft.project().status, PROCUREMENT);
        assert_eq!(draft.patch(), Some(ProjectPatch::status(PROCUREMENT)));
    }

    #[test]
    fn test_rebase_adopts_untouched_status() {
        let mut draft = ProjectDraft::new(project());
        assert_eq!(draft.cycle_priority(), Priority::Baja);

        let mut remote = draft.base().clone();
        remote.status = DESIGN.to_string();
        draft.rebase(&remote);

        assert_eq!(draft.project().status, DESIGN);
        assert_eq!(draft.project().priority, Priority::Baja);
    }

    #[test]
    fn test_development_type_change_remaps() {
        let mut draft = ProjectDraft::new(project());
        draft.click_stage(4);
        draft.set_development_type("FTE");
        assert_eq!(draft.project().status, DESIGN);
    }

    #[test]
    fn test_discard() {
        let mut draft = ProjectDraft::new(project());
        draft.click_stage(5);
        draft.cycle_priority();
        draft.discard();
        assert!(!draft.is_dirty());
    }
}
