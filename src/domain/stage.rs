//! Stage registry: the ordered lifecycle stages of a project.
//!
//! Two stage sets exist. Feasibility studies (`FTE`) run through a reduced
//! four-stage pipeline; every other development type uses the full seven
//! stages. Stage ids are persisted in stored documents and must never change.

use serde::Serialize;

/// Development type code that selects the reduced stage set.
pub const FEASIBILITY_STUDY: &str = "FTE";

/// One lifecycle stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    /// Stable identifier stored in `Project::status`
    pub id: &'static str,
    /// Full display name
    pub label: &'static str,
    /// Abbreviated name for tight layouts (kanban headers, table cells)
    pub short: &'static str,
    /// Accent color as `#rrggbb`
    pub color: &'static str,
}

pub const RECEPTION: &str = "recepcion_requerimiento";
pub const ASSIGNMENT: &str = "asignacion_profesional";
pub const DESIGN: &str = "en_diseno";
pub const PROCUREMENT: &str = "gestion_compra";
pub const COORDINATION: &str = "coordinacion_ejecucion";
pub const EXECUTION: &str = "en_ejecucion";
pub const FINISHED: &str = "terminada";

const fn stage(
    id: &'static str,
    label: &'static str,
    short: &'static str,
    color: &'static str,
) -> Stage {
    Stage {
        id,
        label,
        short,
        color,
    }
}

const DEFAULT: [Stage; 7] = [
    stage(RECEPTION, "Recepción Requerimiento", "Recepción", "#64748b"),
    stage(
        ASSIGNMENT,
        "En Asignación de Profesional",
        "Asignación",
        "#8b5cf6",
    ),
    stage(DESIGN, "En Diseño", "Diseño", "#3b82f6"),
    stage(PROCUREMENT, "En Gestión de Compra", "Compra", "#f59e0b"),
    stage(
        COORDINATION,
        "En Coordinación de Ejecución",
        "Coordinación",
        "#f97316",
    ),
    stage(EXECUTION, "En Ejecución", "Ejecución", "#06b6d4"),
    stage(FINISHED, "Terminada", "Terminada", "#22c55e"),
];

static DEFAULT_STAGES: [Stage; 7] = DEFAULT;

static FEASIBILITY_STAGES: [Stage; 4] = [DEFAULT[0], DEFAULT[1], DEFAULT[2], DEFAULT[6]];

/// The full seven-stage pipeline
pub fn default_stages() -> &'static [Stage] {
    &DEFAULT_STAGES
}

/// Ordered stages that apply to a development type.
///
/// Only `"FTE"` selects the reduced set; unknown or empty types fall back to
/// the default set.
pub fn stages_for(development_type: &str) -> &'static [Stage] {
    if development_type == FEASIBILITY_STUDY {
        &FEASIBILITY_STAGES
    } else {
        &DEFAULT_STAGES
    }
}

/// Position of `stage_id` within the set for `development_type`.
pub fn stage_index_of(stage_id: &str, development_type: &str) -> Option<usize> {
    stages_for(development_type)
        .iter()
        .position(|s| s.id == stage_id)
}

/// Like [`stage_index_of`], treating unknown ids as the initial stage.
pub fn stage_position(stage_id: &str, development_type: &str) -> usize {
    stage_index_of(stage_id, development_type).unwrap_or(0)
}

/// Look up a stage, falling back to the first stage of the set.
pub fn stage_by_id(stage_id: &str, development_type: &str) -> &'static Stage {
    let stages = stages_for(development_type);
    stages
        .iter()
        .find(|s| s.id == stage_id)
        .unwrap_or(&stages[0])
}

/// Whether `stage_id` belongs to the set for `development_type`
pub fn is_valid_status(stage_id: &str, development_type: &str) -> bool {
    stage_index_of(stage_id, development_type).is_some()
}

/// Id of the initial stage for a development type
pub fn initial_status(development_type: &str) -> &'static str {
    stages_for(development_type)[0].id
}

/// Map a status onto the set for `development_type`.
///
/// Valid ids are kept. Otherwise the result is the last stage of the target
/// set whose position in the default pipeline is not after the old status.
pub fn remap_status(stage_id: &str, development_type: &str) -> &'static str {
    let target = stages_for(development_type);
    if let Some(stage) = target.iter().find(|s| s.id == stage_id) {
        return stage.id;
    }

    let old_rank = stage_position(stage_id, "");
    target
        .iter()
        .rev()
        .find(|s| stage_position(s.id, "") <= old_rank)
        .unwrap_or(&target[0])
        .id
}

/// Project development type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DevelopmentType {
    /// Remodelación
    Remodeling,
    /// Obra nueva
    NewConstruction,
    /// Normalización
    Normalization,
    /// Estudio de factibilidad
    FeasibilityStudy,
    /// Any code not listed above, kept verbatim
    Other(String),
}

impl DevelopmentType {
    /// All known types, in menu order
    pub const KNOWN: [DevelopmentType; 4] = [
        Self::Remodeling,
        Self::NewConstruction,
        Self::Normalization,
        Self::FeasibilityStudy,
    ];

    pub fn parse(code: &str) -> Self {
        match code {
            "REM" => Self::Remodeling,
            "OBN" => Self::NewConstruction,
            "NOR" => Self::Normalization,
            FEASIBILITY_STUDY => Self::FeasibilityStudy,
            other => Self::Other(other.to_string()),
        }
    }

    /// Code stored in `Project::development_type`
    pub fn code(&self) -> &str {
        match self {
            Self::Remodeling => "REM",
            Self::NewConstruction => "OBN",
            Self::Normalization => "NOR",
            Self::FeasibilityStudy => FEASIBILITY_STUDY,
            Self::Other(code) => code,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Remodeling => "Remodelación",
            Self::NewConstruction => "Obra Nueva",
            Self::Normalization => "Normalización",
            Self::FeasibilityStudy => "Estudio de Factibilidad",
            Self::Other(code) if code.is_empty() => "Sin tipo",
            Self::Other(code) => code,
        }
    }

    pub fn stages(&self) -> &'static [Stage] {
        stages_for(self.code())
    }
}

impl std::fmt::Display for DevelopmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_indices_unique_and_in_range() {
        let mut seen = HashSet::new();
        for stage in default_stages() {
            let idx = stage_index_of(stage.id, "default").unwrap();
            assert!(idx <= 6);
            assert!(seen.insert(idx));
        }
        assert_eq!(seen.len(), 7);
    }

    #[test]
    fn test_ids_unique_per_set() {
        for dev_type in ["REM", "FTE"] {
            let ids: HashSet<_> = stages_for(dev_type).iter().map(|s| s.id).collect();
            assert_eq!(ids.len(), stages_for(dev_type).len());
        }
    }

    #[test]
    fn test_stage_sets_differ() {
        assert_eq!(stages_for("REM").len(), 7);
        assert_eq!(stages_for("FTE").len(), 4);
        assert_eq!(stages_for("unknown").len(), 7);
        assert_eq!(stages_for("").len(), 7);
        assert_eq!(stages_for("fte").len(), 7);
    }

    #[test]
    fn test_initial_and_terminal() {
        for dev_type in ["REM", "FTE"] {
            let stages = stages_for(dev_type);
            assert_eq!(stages[0].id, RECEPTION);
            assert_eq!(stages[stages.len() - 1].id, FINISHED);
        }
    }

    #[test]
    fn test_feasibility_ids_exist_in_default_set() {
        for stage in stages_for("FTE") {
            assert!(is_valid_status(stage.id, "REM"));
        }
    }

    #[test]
    fn test_unknown_stage_falls_back() {
        assert_eq!(stage_index_of("legacy_status", "REM"), None);
        assert_eq!(stage_position("legacy_status", "REM"), 0);
        assert_eq!(stage_by_id("legacy_status", "REM").id, RECEPTION);
        assert_eq!(stage_by_id("", "FTE").label, "Recepción Requerimiento");
    }

    #[test]
    fn test_stage_lookup_respects_set() {
        assert_eq!(stage_index_of(PROCUREMENT, "REM"), Some(3));
        assert_eq!(stage_index_of(PROCUREMENT, "FTE"), None);
        assert_eq!(stage_index_of(FINISHED, "FTE"), Some(3));
        assert_eq!(stage_by_id(DESIGN, "OBN").short, "Diseño");
    }

    #[test]
    fn test_remap_status() {
        assert_eq!(remap_status(DESIGN, "FTE"), DESIGN);
        assert_eq!(remap_status(PROCUREMENT, "FTE"), DESIGN);
        assert_eq!(remap_status(EXECUTION, "FTE"), DESIGN);
        assert_eq!(remap_status(FINISHED, "FTE"), FINISHED);
        assert_eq!(remap_status("garbage", "FTE"), RECEPTION);
        assert_eq!(remap_status(FINISHED, "REM"), FINISHED);
    }

    #[test]
    fn test_development_type_round_trip() {
        for dev_type in DevelopmentType::KNOWN {
            assert_eq!(DevelopmentType::parse(dev_type.code()), dev_type);
        }
        let other = DevelopmentType::parse("XYZ");
        assert_eq!(other.code(), "XYZ");
        assert_eq!(other.stages().len(), 7);
        assert_eq!(DevelopmentType::FeasibilityStudy.stages().len(), 4);
    }
}
