use std::fmt;

/// Stable identifier for one pipeline stage (for example `scan_serp`).
#[derive(Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StageId(pub String);

impl StageId {
    /// Creates a stage id from any string-like value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the stage id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for StageId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// One entry of the static stage catalogue: id plus display label.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StageDescriptor {
    /// Stage id as reported by the backend in `progress` events.
    pub id: StageId,
    /// Human-readable label shown on the stage board.
    pub label: String,
}

impl StageDescriptor {
    /// Creates a descriptor.
    pub fn new(id: impl Into<StageId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// Ordered, fixed catalogue of the stages one pipeline version runs through.
///
/// The catalogue is configuration data: it is identical across runs and only
/// changes with the backend pipeline version.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StageCatalog {
    stages: Vec<StageDescriptor>,
}

impl StageCatalog {
    /// Creates a catalogue from an ordered list of descriptors.
    pub fn new(stages: Vec<StageDescriptor>) -> Self {
        Self { stages }
    }

    /// The v1 DataVex growth pipeline catalogue.
    pub fn datavex_v1() -> Self {
        Self::new(vec![
            StageDescriptor::new("discover_signals", "Signal Discovery"),
            StageDescriptor::new("score_signals", "Signal Scoring"),
            StageDescriptor::new("validate_signal", "Signal Validation"),
            StageDescriptor::new("scan_serp", "SERP Analysis"),
            StageDescriptor::new("strategy_brief", "Strategy Brief"),
            StageDescriptor::new("blog_draft_1", "Blog Draft 1"),
            StageDescriptor::new("blog_critique_1", "Blog Critique 1"),
            StageDescriptor::new("blog_draft_2", "Blog Draft 2"),
            StageDescriptor::new("blog_critique_2", "Blog Critique 2"),
            StageDescriptor::new("blog_gate", "Blog Gate"),
            StageDescriptor::new("short_form_draft_1", "Short Form D1"),
            StageDescriptor::new("short_form_critique_1", "SF Critique 1"),
            StageDescriptor::new("short_form_draft_2", "Short Form D2"),
            StageDescriptor::new("short_form_critique_2", "SF Critique 2"),
            StageDescriptor::new("short_form_gate", "SF Gate"),
            StageDescriptor::new("complete", "Complete"),
        ])
    }

    /// Returns the descriptors in pipeline order.
    pub fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    /// Returns the index of `id` in the catalogue, if present.
    pub fn position(&self, id: &StageId) -> Option<usize> {
        self.stages.iter().position(|stage| stage.id == *id)
    }

    /// Number of stages in the catalogue.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns `true` when the catalogue has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Per-run view of one catalogue stage with completion/activity flags.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StageState {
    /// Stage id, stable across updates.
    pub id: StageId,
    /// Display label from the catalogue.
    pub label: String,
    /// Whether the stage has finished in the current run.
    pub completed: bool,
    /// Whether the stage is the one currently executing.
    pub active: bool,
}

impl StageState {
    pub(crate) fn fresh(descriptor: &StageDescriptor) -> Self {
        Self {
            id: descriptor.id.clone(),
            label: descriptor.label.clone(),
            completed: false,
            active: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn datavex_v1_catalog_is_ordered_and_complete() {
        let catalog = StageCatalog::datavex_v1();
        assert_eq!(catalog.len(), 16);
        assert_eq!(catalog.stages()[0].id, StageId::new("discover_signals"));
        assert_eq!(catalog.stages()[15].id, StageId::new("complete"));
        assert_eq!(catalog.stages()[3].label, "SERP Analysis");
    }

    #[test]
    fn position_finds_known_stage_and_rejects_unknown() {
        let catalog = StageCatalog::datavex_v1();
        assert_eq!(catalog.position(&StageId::new("strategy_brief")), Some(4));
        assert_eq!(catalog.position(&StageId::new("not_a_real_stage")), None);
    }

    #[test]
    fn fresh_stage_state_copies_descriptor_with_cleared_flags() {
        let descriptor = StageDescriptor::new("blog_gate", "Blog Gate");
        let state = StageState::fresh(&descriptor);
        assert_eq!(state.id, descriptor.id);
        assert_eq!(state.label, "Blog Gate");
        assert!(!state.completed);
        assert!(!state.active);
    }
}
