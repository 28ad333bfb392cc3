//! Kanban board widget: stage columns side by side.

use super::{progress_bar, stage_color};
use crate::views::{KanbanBoard, KanbanCard};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// Widget rendering a [`KanbanBoard`]
pub struct KanbanWidget<'a> {
    board: &'a KanbanBoard,
    selected_column: usize,
    selected_card: usize,
}

impl<'a> KanbanWidget<'a> {
    pub fn new(board: &'a KanbanBoard, selected_column: usize, selected_card: usize) -> Self {
        Self {
            board,
            selected_column,
            selected_card,
        }
    }

    fn card_item(card: &KanbanCard, width: u16) -> ListItem<'static> {
        let bar_width = usize::from(width.saturating_sub(7)).min(12);
        ListItem::new(vec![
            Line::from(Span::styled(
                card.code.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(card.name.clone()),
            Line::from(Span::styled(
                progress_bar(card.progress, bar_width),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ])
    }
}

impl Widget for KanbanWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let count = self.board.columns.len().max(1) as u32;
        let constraints: Vec<Constraint> = self
            .board
            .columns
            .iter()
            .map(|_| Constraint::Ratio(1, count))
            .collect();
        let areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (idx, (column, column_area)) in self.board.columns.iter().zip(areas.iter()).enumerate()
        {
            let color = stage_color(column.stage);
            let is_selected = idx == self.selected_column;
            let border_style = if is_selected {
                Style::default().fg(color).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(Span::styled(
                    format!(" {} ({}) ", column.stage.short, column.cards.len()),
                    Style::default().fg(color),
                ));

            let items: Vec<ListItem> = column
                .cards
                .iter()
                .map(|card| Self::card_item(card, column_area.width))
                .collect();

            let list = List::new(items).block(block).highlight_style(
                Style::default()
                    .bg(color)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD),
            );

            let mut state = ListState::default();
            if is_selected && !column.cards.is_empty() {
                state.select(Some(self.selected_card.min(column.cards.len() - 1)));
            }
            StatefulWidget::render(list, *column_area, buf, &mut state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProgressPolicy, Project};

    #[test]
    fn test_renders_column_titles() {
        let project = Project::new("P-1", "Aulas", "REM", "ana@uni.cl");
        let board = KanbanBoard::build(&[project], ProgressPolicy::Stage);

        let area = Rect::new(0, 0, 140, 12);
        let mut buf = Buffer::empty(area);
        KanbanWidget::new(&board, 0, 0).render(area, &mut buf);

        let first_row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(first_row.contains("Recepción (1)"));
        assert!(first_row.contains("Diseño (0)"));
    }
}
