//! Reusable UI widgets for planboard.

pub mod comment_editor;
pub mod dashboard;
pub mod gantt;
pub mod help;
pub mod kanban;
pub mod project_table;
pub mod stage_checklist;
pub mod text_input;
pub mod timeline;

use crate::domain::Stage;
use ratatui::style::Color;

/// Terminal color for a stage accent
pub fn stage_color(stage: &Stage) -> Color {
    stage.color.parse().unwrap_or(Color::Gray)
}

/// Text progress bar such as `███░░░░ 43%`
pub fn progress_bar(percent: u8, width: usize) -> String {
    let percent = percent.min(100);
    let filled = (width * usize::from(percent) + 50) / 100;
    format!(
        "{}{} {:>3}%",
        "█".repeat(filled),
        "░".repeat(width - filled),
        percent
    )
}
