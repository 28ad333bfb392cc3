//! Sub-stage checklists shown while a project sits in design or procurement.

use super::stage::{DESIGN, PROCUREMENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One checklist item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubStage {
    /// Key stored in the project's `subStages` map
    pub key: &'static str,
    pub label: &'static str,
}

static DESIGN_SUB_STAGES: [SubStage; 2] = [
    SubStage {
        key: "architectureDesign",
        label: "Diseño de Arquitectura",
    },
    SubStage {
        key: "specialtyDesign",
        label: "Diseño de Especialidades",
    },
];

static PROCUREMENT_SUB_STAGES: [SubStage; 3] = [
    SubStage {
        key: "purchaseRequested",
        label: "Compra Solicitada",
    },
    SubStage {
        key: "purchaseInProgress",
        label: "Compra en Proceso",
    },
    SubStage {
        key: "purchaseEvaluation",
        label: "Evaluación de Ofertas",
    },
];

/// Checklist items exposed for a stage (empty for stages without one)
pub fn sub_stages_for(stage_id: &str) -> &'static [SubStage] {
    match stage_id {
        DESIGN => &DESIGN_SUB_STAGES,
        PROCUREMENT => &PROCUREMENT_SUB_STAGES,
        _ => &[],
    }
}

/// Sub-stage checklist as stored on a project.
///
/// Values are kept as raw JSON so that entries written by other clients
/// survive a read/write cycle untouched. Only a literal `true` counts as
/// checked.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubStages(BTreeMap<String, Value>);

impl SubStages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_checked(&self, key: &str) -> bool {
        matches!(self.0.get(key), Some(Value::Bool(true)))
    }

    pub fn set(&mut self, key: &str, checked: bool) {
        self.0.insert(key.to_string(), Value::Bool(checked));
    }

    /// Flip a key and return its new state
    pub fn toggle(&mut self, key: &str) -> bool {
        let checked = !self.is_checked(key);
        self.set(key, checked);
        checked
    }

    /// Number of checked items among the checklist of `stage_id`
    pub fn checked_count(&self, stage_id: &str) -> usize {
        sub_stages_for(stage_id)
            .iter()
            .filter(|s| self.is_checked(s.key))
            .count()
    }

    /// Fraction of the checklist of `stage_id` that is checked, if it has one
    pub fn completion(&self, stage_id: &str) -> Option<f64> {
        let total = sub_stages_for(stage_id).len();
        if total == 0 {
            return None;
        }
        Some(self.checked_count(stage_id) as f64 / total as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
}

impl FromIterator<(&'static str, bool)> for SubStages {
    fn from_iter<I: IntoIterator<Item = (&'static str, bool)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), Value::Bool(v)))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stage::{EXECUTION, RECEPTION};
    use serde_json::json;

    #[test]
    fn test_catalogue() {
        assert_eq!(sub_stages_for(DESIGN).len(), 2);
        assert_eq!(sub_stages_for(PROCUREMENT).len(), 3);
        assert!(sub_stages_for(RECEPTION).is_empty());
        assert!(sub_stages_for(EXECUTION).is_empty());
    }

    #[test]
    fn test_only_literal_true_is_checked() {
        let subs: SubStages = serde_json::from_value(json!({
            "architectureDesign": true,
            "specialtyDesign": "yes",
            "purchaseRequested": 1,
            "purchaseInProgress": null,
        }))
        .unwrap();

        assert!(subs.is_checked("architectureDesign"));
        assert!(!subs.is_checked("specialtyDesign"));
        assert!(!subs.is_checked("purchaseRequested"));
        assert!(!subs.is_checked("purchaseInProgress"));
        assert!(!subs.is_checked("missing"));
    }

    #[test]
    fn test_completion() {
        let mut subs = SubStages::new();
        assert_eq!(subs.completion(DESIGN), Some(0.0));
        assert_eq!(subs.completion(RECEPTION), None);

        subs.toggle("architectureDesign");
        assert_eq!(subs.completion(DESIGN), Some(0.5));
        assert_eq!(subs.checked_count(PROCUREMENT), 0);

        assert!(!subs.toggle("architectureDesign"));
        assert_eq!(subs.checked_count(DESIGN), 0);
    }

    #[test]
    fn test_foreign_keys_survive_round_trip() {
        let raw = json!({ "purchaseRequested": true, "legacyFlag": { "nested": 1 } });
        let subs: SubStages = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&subs).unwrap(), raw);
    }
}
