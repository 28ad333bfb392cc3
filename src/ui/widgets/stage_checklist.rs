//! Project detail editor: stage checklist, sub-stage checklist and summary.

use super::{progress_bar, stage_color};
use crate::domain::{sub_stages_for, ProgressPolicy, Project};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};

/// One selectable row of the detail editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailRow {
    /// Stage checkbox at this position of the project's stage set
    Stage(usize),
    /// Sub-stage checkbox of the current stage
    SubStage(&'static str),
}

/// Stage rows followed by the current stage's sub-stage rows
pub fn detail_rows(project: &Project) -> Vec<DetailRow> {
    let stages = (0..project.stages().len()).map(DetailRow::Stage);
    let subs = sub_stages_for(project.stage().id)
        .iter()
        .map(|sub| DetailRow::SubStage(sub.key));
    stages.chain(subs).collect()
}

/// Detail editor widget
pub struct StageChecklistWidget<'a> {
    project: &'a Project,
    policy: ProgressPolicy,
    cursor: usize,
    dirty: bool,
    can_edit_stages: bool,
}

impl<'a> StageChecklistWidget<'a> {
    pub fn new(project: &'a Project, policy: ProgressPolicy, cursor: usize) -> Self {
        Self {
            project,
            policy,
            cursor,
            dirty: false,
            can_edit_stages: true,
        }
    }

    /// Mark unsaved local edits
    pub fn dirty(mut self, dirty: bool) -> Self {
        self.dirty = dirty;
        self
    }

    /// Show stage rows as read-only for non-administrators
    pub fn can_edit_stages(mut self, can_edit: bool) -> Self {
        self.can_edit_stages = can_edit;
        self
    }

    fn row_items(&self) -> Vec<ListItem<'static>> {
        let stages = self.project.stages();
        let current = self.project.stage_index();
        let lock = if self.can_edit_stages { "" } else { " 🔒" };

        detail_rows(self.project)
            .into_iter()
            .map(|row| match row {
                DetailRow::Stage(idx) => {
                    let stage = &stages[idx];
                    let mark = if idx <= current { "[✓]" } else { "[ ]" };
                    let mut style = Style::default().fg(stage_color(stage));
                    if idx == current {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("{mark} ")),
                        Span::styled(stage.label, style),
                        Span::styled(lock, Style::default().fg(Color::DarkGray)),
                    ]))
                }
                DetailRow::SubStage(key) => {
                    let label = sub_stages_for(self.project.stage().id)
                        .iter()
                        .find(|sub| sub.key == key)
                        .map_or(key, |sub| sub.label);
                    let mark = if self.project.sub_stages.is_checked(key) {
                        "[✓]"
                    } else {
                        "[ ]"
                    };
                    ListItem::new(Line::from(vec![
                        Span::raw(format!("    {mark} ")),
                        Span::raw(label),
                    ]))
                }
            })
            .collect()
    }

    fn summary_lines(&self) -> Vec<Line<'static>> {
        let project = self.project;
        let field = |name: &str, value: String| {
            Line::from(vec![
                Span::styled(format!("{name:<13}"), Style::default().fg(Color::DarkGray)),
                Span::raw(value),
            ])
        };
        let date = |d: Option<chrono::NaiveDate>| {
            d.map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string())
        };

        let mut lines = vec![
            field("Código", project.code.clone()),
            field("Tipo", project.development().label().to_string()),
            field("Prioridad", project.priority.label().to_string()),
            field(
                "Profesional",
                project.professional.clone().unwrap_or_else(|| "-".to_string()),
            ),
            field(
                "Solicitante",
                project
                    .requester_email
                    .clone()
                    .unwrap_or_else(|| "-".to_string()),
            ),
            field("Inicio", date(project.start_date)),
            field("Entrega", date(project.due_date)),
            Line::from(""),
        ];

        if !project.description.is_empty() {
            lines.push(Line::from(project.description.clone()));
            lines.push(Line::from(""));
        }

        lines.push(Line::from(Span::styled(
            format!("Comentarios ({})", project.comments.len()),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for comment in project.comments.iter().rev().take(5) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{} ", comment.created_at.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    format!("{}: ", comment.author),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(comment.body.replace('\n', " ")),
            ]));
        }
        lines
    }
}

impl Widget for StageChecklistWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = if self.dirty {
            format!(" {} [sin guardar] ", self.project.name)
        } else {
            format!(" {} ", self.project.name)
        };
        let border_color = if self.dirty { Color::Yellow } else { Color::Cyan };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(0)])
            .split(inner);

        let stage = self.project.stage();
        let progress = self.project.progress(self.policy);
        Gauge::default()
            .gauge_style(Style::default().fg(stage_color(stage)))
            .percent(u16::from(progress))
            .label(format!("{} · {}%", stage.label, progress))
            .render(rows[0], buf);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[1]);

        let items = self.row_items();
        let list = List::new(items)
            .block(Block::default().borders(Borders::RIGHT).title(" Etapas "))
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        state.select(Some(self.cursor));
        StatefulWidget::render(list, columns[0], buf, &mut state);

        let summary_area = columns[1].inner(Margin::new(1, 0));
        let mut lines = self.summary_lines();
        lines.insert(
            0,
            Line::from(Span::styled(
                progress_bar(progress, 20),
                Style::default().fg(stage_color(stage)),
            )),
        );
        lines.insert(1, Line::from(""));
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(summary_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::{DESIGN, PROCUREMENT};
    use crate::domain::ProjectPatch;

    #[test]
    fn test_rows_without_checklist() {
        let project = Project::new("P-1", "Aulas", "REM", "ana@uni.cl");
        let rows = detail_rows(&project);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0], DetailRow::Stage(0));
        assert_eq!(rows[6], DetailRow::Stage(6));
    }

    #[test]
    fn test_rows_include_current_sub_stages() {
        let mut project = Project::new("P-1", "Aulas", "REM", "ana@uni.cl");
        project.apply(ProjectPatch::status(PROCUREMENT)).unwrap();
        let rows = detail_rows(&project);
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[7], DetailRow::SubStage("purchaseRequested"));
        assert_eq!(rows[9], DetailRow::SubStage("purchaseEvaluation"));
    }

    #[test]
    fn test_feasibility_rows() {
        let mut project = Project::new("P-1", "Estudio", "FTE", "ana@uni.cl");
        project.apply(ProjectPatch::status(DESIGN)).unwrap();
        let rows = detail_rows(&project);
        assert_eq!(rows.len(), 6);
        assert_eq!(rows[4], DetailRow::SubStage("architectureDesign"));
    }

    #[test]
    fn test_renders_stage_labels() {
        let project = Project::new("P-1", "Aulas", "REM", "ana@uni.cl");
        let area = Rect::new(0, 0, 100, 14);
        let mut buf = Buffer::empty(area);
        StageChecklistWidget::new(&project, ProgressPolicy::Stage, 0).render(area, &mut buf);

        let screen: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|pos| buf[pos].symbol().to_string())
            .collect();
        assert!(screen.contains("Recepción Requerimiento"));
        assert!(screen.contains("Terminada"));
        assert!(screen.contains("14%"));
    }
}
