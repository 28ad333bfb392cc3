//! Gantt widget: one dated bar per project, filled by progress.

use super::stage_color;
use crate::views::GanttChart;
use chrono::NaiveDate;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

const LABEL_WIDTH: u16 = 28;

pub struct GanttWidget<'a> {
    chart: &'a GanttChart,
    selected: usize,
    today: NaiveDate,
}

impl<'a> GanttWidget<'a> {
    pub fn new(chart: &'a GanttChart, selected: usize, today: NaiveDate) -> Self {
        Self {
            chart,
            selected,
            today,
        }
    }
}

impl Widget for GanttWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.chart.window {
            Some((first, last)) => format!(
                " Carta Gantt ({} → {}) ",
                first.format("%Y-%m-%d"),
                last.format("%Y-%m-%d")
            ),
            None => " Carta Gantt ".to_string(),
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        let inner = block.inner(area);
        block.render(area, buf);

        if self.chart.bars.is_empty() {
            Paragraph::new("Sin proyectos con fecha de inicio.")
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center)
                .render(inner, buf);
            return;
        }

        let chart_width = inner.width.saturating_sub(LABEL_WIDTH + 1);
        let visible = usize::from(inner.height);
        let first_row = self.selected.saturating_sub(visible.saturating_sub(1));

        for (row, bar) in self
            .chart
            .bars
            .iter()
            .enumerate()
            .skip(first_row)
            .take(visible)
        {
            let y = inner.y + (row - first_row) as u16;
            let label_style = if row == self.selected {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let label = format!("{} {}", bar.code, bar.name);
            buf.set_stringn(inner.x, y, &label, usize::from(LABEL_WIDTH), label_style);

            let color = stage_color(bar.stage);
            let layout = self.chart.layout(bar, chart_width);
            let x0 = inner.x + LABEL_WIDTH + 1;
            for cell in 0..layout.length {
                let (symbol, style) = if cell < layout.filled {
                    ("█", Style::default().fg(color))
                } else if bar.overdue {
                    ("░", Style::default().fg(Color::Red))
                } else {
                    ("░", Style::default().fg(color))
                };
                buf.set_string(x0 + layout.offset + cell, y, symbol, style);
            }
        }

        if let Some((first, last)) = self.chart.window {
            if (first..=last).contains(&self.today) && chart_width > 0 {
                let span = (last - first).num_days() + 1;
                let offset = ((self.today - first).num_days() as f64 / span as f64
                    * f64::from(chart_width))
                .floor() as u16;
                let x = inner.x + LABEL_WIDTH + 1 + offset.min(chart_width - 1);
                for y in inner.y..inner.y + inner.height {
                    if buf[(x, y)].symbol() == " " {
                        buf[(x, y)].set_symbol("┊").set_fg(Color::Yellow);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProgressPolicy, Project};

    #[test]
    fn test_empty_chart_message() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let chart = GanttChart::build(&[], ProgressPolicy::Stage, today);
        let area = Rect::new(0, 0, 80, 5);
        let mut buf = Buffer::empty(area);
        GanttWidget::new(&chart, 0, today).render(area, &mut buf);

        let row: String = (0..area.width)
            .map(|x| buf[(x, 2)].symbol().to_string())
            .collect();
        assert!(row.contains("Sin proyectos con fecha de inicio."));
    }

    #[test]
    fn test_bar_drawn_after_label() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let mut project = Project::new("P-1", "Aulas", "REM", "ana@uni.cl");
        project.start_date = NaiveDate::from_ymd_opt(2024, 1, 1);
        project.due_date = NaiveDate::from_ymd_opt(2024, 1, 10);
        let chart = GanttChart::build(&[project], ProgressPolicy::Stage, today);

        let area = Rect::new(0, 0, 80, 4);
        let mut buf = Buffer::empty(area);
        GanttWidget::new(&chart, 0, today).render(area, &mut buf);

        let x0 = 1 + LABEL_WIDTH + 1;
        assert_eq!(buf[(x0, 1)].symbol(), "█");
        assert_eq!(buf[(area.width - 2, 1)].symbol(), "░");
    }
}
