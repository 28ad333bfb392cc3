//! Timeline widget: stage headers with their projects underneath.

use super::{progress_bar, stage_color};
use crate::views::TimelineGroup;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// List row of the `selected`-th entry, counting one header row per group
fn list_row(groups: &[TimelineGroup], selected: usize) -> Option<usize> {
    let mut remaining = selected;
    let mut row = 0;
    for group in groups {
        row += 1;
        if remaining < group.entries.len() {
            return Some(row + remaining);
        }
        remaining -= group.entries.len();
        row += group.entries.len();
    }
    None
}

pub struct TimelineWidget<'a> {
    groups: &'a [TimelineGroup],
    selected: usize,
}

impl<'a> TimelineWidget<'a> {
    pub fn new(groups: &'a [TimelineGroup], selected: usize) -> Self {
        Self { groups, selected }
    }
}

impl Widget for TimelineWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut items = Vec::new();
        for group in self.groups {
            let color = stage_color(group.stage);
            items.push(ListItem::new(Line::from(vec![
                Span::styled("● ", Style::default().fg(color)),
                Span::styled(
                    format!("{} ({})", group.stage.label, group.entries.len()),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ])));
            for entry in &group.entries {
                items.push(ListItem::new(Line::from(vec![
                    Span::styled("│ ", Style::default().fg(color)),
                    Span::raw(format!("{:<14} {:<36} ", entry.code, entry.name)),
                    Span::styled(
                        progress_bar(entry.progress, 10),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(
                        format!("  {}", entry.updated_at.format("%Y-%m-%d %H:%M")),
                        Style::default().fg(Color::DarkGray),
                    ),
                ])));
            }
        }

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" Línea de tiempo "))
            .highlight_style(Style::default().bg(Color::DarkGray));

        let mut state = ListState::default();
        state.select(list_row(self.groups, self.selected));
        StatefulWidget::render(list, area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::DESIGN;
    use crate::domain::{ProgressPolicy, Project, ProjectPatch};
    use crate::views::build_timeline;

    #[test]
    fn test_selection_skips_headers() {
        let a = Project::new("P-1", "Aulas", "REM", "ana@uni.cl");
        let b = Project::new("P-2", "Casino", "REM", "ana@uni.cl");
        let mut c = Project::new("P-3", "Sala", "REM", "ana@uni.cl");
        c.apply(ProjectPatch::status(DESIGN)).unwrap();
        let groups = build_timeline(&[a, b, c], ProgressPolicy::Stage);

        assert_eq!(list_row(&groups, 0), Some(1));
        assert_eq!(list_row(&groups, 1), Some(2));
        assert_eq!(list_row(&groups, 2), Some(4));
        assert_eq!(list_row(&groups, 3), None);
    }
}
