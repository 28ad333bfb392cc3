//! Domain entities for planboard.
//!
//! This module contains the core business rules and entities:
//! - Stage registry, progress calculator and transition rule
//! - Project: a tracked project document
//! - Backlog: ideas awaiting promotion
//! - Draft: local edit state for the detail editor
//! - Workspace: where the tracker keeps its files

mod backlog;
mod comment;
mod draft;
pub mod progress;
mod project;
pub mod stage;
pub mod sub_stage;
pub mod transition;
mod workspace;

pub use backlog::{BacklogItem, BacklogPatch};
pub use comment::{parse_mentions, Comment};
pub use draft::ProjectDraft;
pub use progress::{compute_progress, ProgressPolicy};
pub use project::{Priority, Project, ProjectPatch};
pub use stage::{
    stage_by_id, stage_index_of, stage_position, stages_for, DevelopmentType, Stage,
};
pub use sub_stage::{sub_stages_for, SubStage, SubStages};
pub use transition::{next_stage_index, stage_click, StageClick};
pub use workspace::Workspace;
