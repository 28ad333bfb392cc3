//! Read models behind every screen and export.
//!
//! Each view is rebuilt from a collection snapshot and takes its stage
//! names, colors, order and percentages from the domain registry and
//! progress calculator only.

pub mod dashboard;
pub mod gantt;
pub mod kanban;
pub mod table;
pub mod timeline;

pub use dashboard::{DashboardKpis, LabelCount, StageCount};
pub use gantt::{BarLayout, GanttBar, GanttChart};
pub use kanban::{KanbanBoard, KanbanCard, KanbanColumn};
pub use table::{build_rows, SortKey, TableRow};
pub use timeline::{build_timeline, TimelineEntry, TimelineGroup};
