//! Stage checkbox click semantics for the detail editor.
//!
//! Clicking a later stage advances straight to it. Clicking an earlier stage
//! retreats to it. Clicking the current stage un-checks it and retreats one
//! step, except at the initial stage where nothing happens.

use super::stage::{stage_position, stages_for, Stage};

/// New stage index after clicking row `clicked` while at `current`
pub fn next_stage_index(current: usize, clicked: usize) -> usize {
    if clicked <= current {
        if clicked == current && clicked > 0 {
            clicked - 1
        } else if clicked < current {
            clicked
        } else {
            current
        }
    } else {
        clicked
    }
}

/// Result of a stage click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageClick {
    /// Status stays put; no write should be issued
    Unchanged,
    Changed {
        /// Stage the click was resolved from; the initial stage when the
        /// stored status is not part of the set
        from: &'static Stage,
        to: &'static Stage,
    },
}

impl StageClick {
    pub fn is_changed(&self) -> bool {
        matches!(self, Self::Changed { .. })
    }

    /// Id to persist, if any
    pub fn new_status(&self) -> Option<&'static str> {
        match self {
            Self::Unchanged => None,
            Self::Changed { to, .. } => Some(to.id),
        }
    }
}

/// Apply a click on stage row `clicked` to a project at `status`.
///
/// Unknown statuses count as the initial stage and rows past the end of the
/// set are clamped to the terminal stage.
pub fn stage_click(status: &str, clicked: usize, development_type: &str) -> StageClick {
    let stages = stages_for(development_type);
    let current = stage_position(status, development_type);
    let clicked = clicked.min(stages.len() - 1);
    let next = next_stage_index(current, clicked);

    let to = &stages[next];
    if to.id == status {
        StageClick::Unchanged
    } else {
        StageClick::Changed {
            from: &stages[current],
            to,
        }
    }
}
