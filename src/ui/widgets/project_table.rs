//! Sortable project table.

use super::stage_color;
use crate::views::{SortKey, TableRow};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

pub struct ProjectTableWidget<'a> {
    rows: &'a [TableRow],
    selected: usize,
    sort_key: SortKey,
    descending: bool,
}

impl<'a> ProjectTableWidget<'a> {
    pub fn new(rows: &'a [TableRow], selected: usize) -> Self {
        Self {
            rows,
            selected,
            sort_key: SortKey::default(),
            descending: false,
        }
    }

    pub fn sort(mut self, key: SortKey, descending: bool) -> Self {
        self.sort_key = key;
        self.descending = descending;
        self
    }

    fn header(&self) -> Row<'static> {
        let arrow = if self.descending { "▼" } else { "▲" };
        let title = |label: &'static str, key: Option<SortKey>| -> Cell<'static> {
            if key == Some(self.sort_key) {
                Cell::from(format!("{label} {arrow}")).style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Cell::from(label).style(Style::default().add_modifier(Modifier::BOLD))
            }
        };
        Row::new(vec![
            title("Código", Some(SortKey::Code)),
            title("Nombre", Some(SortKey::Name)),
            title("Tipo", None),
            title("Etapa", Some(SortKey::Stage)),
            title("Avance", Some(SortKey::Progress)),
            title("Prioridad", None),
            title("Profesional", None),
            title("Entrega", Some(SortKey::DueDate)),
        ])
        .bottom_margin(1)
    }
}

impl Widget for ProjectTableWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows: Vec<Row> = self
            .rows
            .iter()
            .map(|row| {
                Row::new(vec![
                    Cell::from(row.code.clone()),
                    Cell::from(row.name.clone()),
                    Cell::from(row.development_type.clone()),
                    Cell::from(Span::styled(
                        row.stage.short,
                        Style::default().fg(stage_color(row.stage)),
                    )),
                    Cell::from(format!("{:>3}%", row.progress)),
                    Cell::from(row.priority.label()),
                    Cell::from(row.professional.clone().unwrap_or_default()),
                    Cell::from(
                        row.due_date
                            .map(|d| d.format("%Y-%m-%d").to_string())
                            .unwrap_or_default(),
                    ),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(12),
            Constraint::Min(20),
            Constraint::Length(22),
            Constraint::Length(12),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(16),
            Constraint::Length(10),
        ];

        let table = Table::new(rows, widths)
            .header(self.header())
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" Proyectos ({}) ", self.rows.len())),
            )
            .row_highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("▶ ");

        let mut state = TableState::default();
        if !self.rows.is_empty() {
            state.select(Some(self.selected.min(self.rows.len() - 1)));
        }
        StatefulWidget::render(table, area, buf, &mut state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProgressPolicy, Project};
    use crate::views::build_rows;

    #[test]
    fn test_header_marks_sort_column() {
        let projects = vec![Project::new("P-1", "Aulas", "REM", "ana@uni.cl")];
        let rows = build_rows(&projects, ProgressPolicy::Stage, SortKey::Progress, true);

        let area = Rect::new(0, 0, 130, 6);
        let mut buf = Buffer::empty(area);
        ProjectTableWidget::new(&rows, 0)
            .sort(SortKey::Progress, true)
            .render(area, &mut buf);

        let line = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(line(0).contains("Proyectos (1)"));
        assert!(line(1).contains("Avance ▼"));
        assert!(line(3).contains("P-1"));
        assert!(line(3).contains("Recepción"));
    }
}
