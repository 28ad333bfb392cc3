//! Dashboard widget: KPI tiles and per-stage bar chart.

use super::stage_color;
use crate::views::{DashboardKpis, LabelCount};
use ratatui::{
    prelude::*,
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
};

/// Width of one bar when `stages` bars share `area_width` columns
fn stage_bar_width(area_width: u16, stages: usize) -> u16 {
    let stages = u16::try_from(stages.max(1)).unwrap_or(u16::MAX);
    (area_width.saturating_sub(2) / stages)
        .saturating_sub(1)
        .clamp(3, 14)
}

pub struct DashboardWidget<'a> {
    kpis: &'a DashboardKpis,
}

impl<'a> DashboardWidget<'a> {
    pub fn new(kpis: &'a DashboardKpis) -> Self {
        Self { kpis }
    }

    fn tile(title: &str, value: String, color: Color) -> Paragraph<'static> {
        Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {title} ")),
        )
    }

    fn breakdown(title: &str, counts: &[LabelCount]) -> Paragraph<'static> {
        let lines: Vec<Line> = counts
            .iter()
            .map(|c| {
                Line::from(vec![
                    Span::raw(format!("{:<26}", c.label)),
                    Span::styled(c.count.to_string(), Style::default().fg(Color::Cyan)),
                ])
            })
            .collect();
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {title} ")),
        )
    }
}

impl Widget for DashboardWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(7),
            ])
            .split(area);

        let tiles = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 5); 5])
            .split(rows[0]);
        let kpis = self.kpis;
        Self::tile("Total", kpis.total.to_string(), Color::White).render(tiles[0], buf);
        Self::tile("En curso", kpis.active.to_string(), Color::Cyan).render(tiles[1], buf);
        Self::tile("Terminados", kpis.finished.to_string(), Color::Green).render(tiles[2], buf);
        Self::tile("Atrasados", kpis.overdue.to_string(), Color::Red).render(tiles[3], buf);
        Self::tile(
            "Avance promedio",
            format!("{}%", kpis.average_progress),
            Color::Yellow,
        )
        .render(tiles[4], buf);

        let bars: Vec<Bar> = kpis
            .by_stage
            .iter()
            .map(|count| {
                Bar::default()
                    .value(count.count as u64)
                    .label(Line::from(count.stage.short))
                    .style(Style::default().fg(stage_color(count.stage)))
            })
            .collect();
        let chart_area = rows[1];
        let bar_width = stage_bar_width(chart_area.width, kpis.by_stage.len());
        BarChart::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Proyectos por etapa "),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(bar_width)
            .bar_gap(1)
            .render(chart_area, buf);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[2]);
        Self::breakdown("Por tipo", &kpis.by_type).render(bottom[0], buf);
        Self::breakdown("Por prioridad", &kpis.by_priority).render(bottom[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProgressPolicy, Project};
    use chrono::NaiveDate;

    #[test]
    fn test_renders_tiles() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let projects = vec![
            Project::new("P-1", "Aulas", "REM", "ana@uni.cl"),
            Project::new("P-2", "Casino", "OBN", "ana@uni.cl"),
        ];
        let kpis = DashboardKpis::compute(&projects, ProgressPolicy::Stage, today);

        let area = Rect::new(0, 0, 120, 24);
        let mut buf = Buffer::empty(area);
        DashboardWidget::new(&kpis).render(area, &mut buf);

        let row = |y: u16| -> String {
            (0..area.width)
                .map(|x| buf[(x, y)].symbol().to_string())
                .collect()
        };
        assert!(row(0).contains("Total"));
        assert!(row(0).contains("Avance promedio"));
        assert!(row(1).contains("14%"));
    }

    #[test]
    fn test_bar_width_follows_stage_count() {
        assert_eq!(stage_bar_width(58, 7), 7);
        assert_eq!(stage_bar_width(58, 4), 13);
        assert_eq!(stage_bar_width(58, 0), 14);
        assert_eq!(stage_bar_width(10, 7), 3);
    }
}
