//! Progress calculator.
//!
//! Every progress bar, Gantt fill, KPI and export reads its percentage from
//! here. The stored reports were produced with the stage-only formula, so
//! [`ProgressPolicy::Stage`] is the default.

use super::stage::{stage_position, stages_for};
use super::sub_stage::SubStages;
use serde::{Deserialize, Serialize};

/// How sub-stage checklists feed into the percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressPolicy {
    /// `round((index + 1) / stages * 100)`; sub-stages are ignored
    #[default]
    Stage,
    /// Stage formula plus up to half a stage width for checked sub-stages
    Blended,
}

impl ProgressPolicy {
    pub fn compute(
        self,
        stage_id: &str,
        sub_stages: &SubStages,
        development_type: &str,
    ) -> u8 {
        let total = stages_for(development_type).len();
        let index = stage_position(stage_id, development_type);

        match self {
            Self::Stage => stage_percent(index, total),
            Self::Blended => {
                let fraction = if index + 1 < total {
                    sub_stages.completion(stage_id).unwrap_or(0.0)
                } else {
                    0.0
                };
                let steps = (index + 1) as f64 + fraction / 2.0;
                (steps / total as f64 * 100.0).round().min(100.0) as u8
            }
        }
    }
}

/// Percentage for the stage at `index` in a set of `total` stages, rounded
/// half up.
pub fn stage_percent(index: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let index = index.min(total - 1);
    (((index + 1) * 200 + total) / (2 * total)) as u8
}

/// Percent complete for a project, using the stage-only formula.
pub fn compute_progress(stage_id: &str, sub_stages: &SubStages, development_type: &str) -> u8 {
    ProgressPolicy::Stage.compute(stage_id, sub_stages, development_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::*;

    fn empty() -> SubStages {
        SubStages::new()
    }

    #[test]
    fn test_first_stage_never_zero() {
        assert_eq!(compute_progress(RECEPTION, &empty(), "REM"), 14);
        assert_eq!(compute_progress(RECEPTION, &empty(), "FTE"), 25);
    }

    #[test]
    fn test_first_stage_matches_rounded_share() {
        for dev_type in ["REM", "OBN", "NOR", "FTE", ""] {
            let stages = stages_for(dev_type);
            let expected = (100.0 / stages.len() as f64).round() as u8;
            assert_eq!(compute_progress(stages[0].id, &empty(), dev_type), expected);
        }
    }

    #[test]
    fn test_terminal_is_exactly_100() {
        for dev_type in ["REM", "OBN", "NOR", "FTE", "???"] {
            let stages = stages_for(dev_type);
            let last = stages[stages.len() - 1].id;
            assert_eq!(compute_progress(last, &empty(), dev_type), 100);
            assert_eq!(
                ProgressPolicy::Blended.compute(last, &empty(), dev_type),
                100
            );
        }
    }

    #[test]
    fn test_default_table() {
        let expected = [14, 29, 43, 57, 71, 86, 100];
        for (stage, pct) in default_stages().iter().zip(expected) {
            assert_eq!(compute_progress(stage.id, &empty(), "REM"), pct);
        }
    }

    #[test]
    fn test_feasibility_differs_from_default() {
        assert_eq!(compute_progress(DESIGN, &empty(), "FTE"), 75);
        assert_eq!(compute_progress(DESIGN, &empty(), "REM"), 43);
        assert!(
            compute_progress(RECEPTION, &empty(), "FTE")
                > compute_progress(RECEPTION, &empty(), "REM")
        );
    }

    #[test]
    fn test_unknown_stage_reads_as_first() {
        assert_eq!(compute_progress("bogus", &empty(), "REM"), 14);
        assert_eq!(compute_progress(PROCUREMENT, &empty(), "FTE"), 25);
    }

    #[test]
    fn test_sub_stages_ignored_by_default() {
        let subs: SubStages = [("architectureDesign", true), ("specialtyDesign", true)]
            .into_iter()
            .collect();
        assert_eq!(compute_progress(DESIGN, &subs, "REM"), 43);
    }

    #[test]
    fn test_idempotent() {
        let subs: SubStages = [("purchaseRequested", true)].into_iter().collect();
        let a = compute_progress(PROCUREMENT, &subs, "NOR");
        let b = compute_progress(PROCUREMENT, &subs, "NOR");
        assert_eq!(a, b);
    }

    #[test]
    fn test_blended_policy() {
        let none = empty();
        let half: SubStages = [("architectureDesign", true)].into_iter().collect();
        let full: SubStages = [("architectureDesign", true), ("specialtyDesign", true)]
            .into_iter()
            .collect();

        // (3 + f/2) / 7
        assert_eq!(ProgressPolicy::Blended.compute(DESIGN, &none, "REM"), 43);
        assert_eq!(ProgressPolicy::Blended.compute(DESIGN, &half, "REM"), 46);
        assert_eq!(ProgressPolicy::Blended.compute(DESIGN, &full, "REM"), 50);
        // Design keys are inert outside design
        assert_eq!(ProgressPolicy::Blended.compute(EXECUTION, &full, "REM"), 86);
    }

    #[test]
    fn test_stage_percent_bounds() {
        assert_eq!(stage_percent(0, 0), 0);
        assert_eq!(stage_percent(99, 7), 100);
        assert_eq!(stage_percent(1, 4), 50);
    }
}
