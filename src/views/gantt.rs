//! Gantt chart model: dated bars filled by progress.

use crate::domain::{ProgressPolicy, Project, Stage};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct GanttBar {
    pub id: String,
    pub code: String,
    pub name: String,
    pub stage: &'static Stage,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub progress: u8,
    pub overdue: bool,
}

/// Horizontal placement of a bar inside a chart of a given width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarLayout {
    pub offset: u16,
    pub length: u16,
    /// Leading cells drawn as completed
    pub filled: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GanttChart {
    pub bars: Vec<GanttBar>,
    /// First and last day covered by any bar
    pub window: Option<(NaiveDate, NaiveDate)>,
}

impl GanttChart {
    /// Bars for every project with a start date; a missing due date makes a
    /// one-day bar. Ordered by start date, then code.
    pub fn build(projects: &[Project], policy: ProgressPolicy, today: NaiveDate) -> Self {
        let mut bars: Vec<GanttBar> = projects
            .iter()
            .filter_map(|p| {
                let start = p.start_date?;
                let end = p.due_date.unwrap_or(start).max(start);
                Some(GanttBar {
                    id: p.id.clone(),
                    code: p.code.clone(),
                    name: p.name.clone(),
                    stage: p.stage(),
                    start,
                    end,
                    progress: p.progress(policy),
                    overdue: p.is_overdue(today),
                })
            })
            .collect();
        bars.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.code.cmp(&b.code)));

        let window = bars
            .iter()
            .map(|b| b.start)
            .min()
            .zip(bars.iter().map(|b| b.end).max());

        Self { bars, window }
    }

    /// Place `bar` in a chart `width` cells wide
    pub fn layout(&self, bar: &GanttBar, width: u16) -> BarLayout {
        let Some((first, last)) = self.window else {
            return BarLayout {
                offset: 0,
                length: 0,
                filled: 0,
            };
        };
        let span_days = (last - first).num_days() + 1;
        let width_f = f64::from(width);
        let scale = |date: NaiveDate| -> f64 {
            (date - first).num_days() as f64 / span_days as f64 * width_f
        };

        let offset = scale(bar.start).floor() as u16;
        let end = (scale(bar.end + chrono::Duration::days(1)).ceil() as u16).min(width);
        let length = end.saturating_sub(offset).max(1).min(width.saturating_sub(offset));
        let filled = (f64::from(length) * f64::from(bar.progress) / 100.0).round() as u16;

        BarLayout {
            offset,
            length,
            filled,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::FINISHED;
    use crate::domain::ProjectPatch;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dated(code: &str, start: NaiveDate, due: Option<NaiveDate>) -> Project {
        let mut p = Project::new(code, code, "REM", "ana@uni.cl");
        p.start_date = Some(start);
        p.due_date = due;
        p
    }

    #[test]
    fn test_undated_projects_skipped() {
        let undated = Project::new("P-0", "Sin fecha", "REM", "ana@uni.cl");
        let a = dated("P-1", date(2024, 1, 1), Some(date(2024, 1, 10)));
        let chart = GanttChart::build(&[undated, a], ProgressPolicy::Stage, date(2024, 1, 5));
        assert_eq!(chart.bars.len(), 1);
        assert_eq!(chart.window, Some((date(2024, 1, 1), date(2024, 1, 10))));
    }

    #[test]
    fn test_full_width_bar_and_fill() {
        let mut a = dated("P-1", date(2024, 1, 1), Some(date(2024, 1, 10)));
        a.apply(ProjectPatch::status(FINISHED)).unwrap();
        let chart = GanttChart::build(&[a], ProgressPolicy::Stage, date(2024, 1, 5));

        let layout = chart.layout(&chart.bars[0], 20);
        assert_eq!(layout, BarLayout { offset: 0, length: 20, filled: 20 });
    }

    #[test]
    fn test_partial_bar() {
        let a = dated("P-1", date(2024, 1, 1), Some(date(2024, 1, 10)));
        let b = dated("P-2", date(2024, 1, 6), Some(date(2024, 1, 10)));
        let chart = GanttChart::build(&[a, b], ProgressPolicy::Stage, date(2024, 1, 5));

        let layout = chart.layout(&chart.bars[1], 20);
        assert_eq!(layout.offset, 10);
        assert_eq!(layout.length, 10);
        // 14% of 10 cells
        assert_eq!(layout.filled, 1);
    }

    #[test]
    fn test_overdue_flag() {
        let a = dated("P-1", date(2024, 1, 1), Some(date(2024, 1, 10)));
        let chart = GanttChart::build(&[a], ProgressPolicy::Stage, date(2024, 2, 1));
        assert!(chart.bars[0].overdue);
    }
}
