//! Chart selection state
//! Selected chart type, its field bindings and at most one render outcome.
//!
//! A figure only exists after an explicit `generate`. Switching chart type,
//! changing any binding or loading another dataset drops it again.

use super::dispatch::{self, ChartError, ChartOptions};
use super::figure::Figure;
use super::kind::{Arity, ChartKind};
use super::request::{ChartRequest, FieldBindings};
use crate::data::Dataset;

pub type RenderOutcome = Result<Figure, ChartError>;

#[derive(Debug, Default)]
pub struct ChartSelection {
    kind: ChartKind,
    bindings: FieldBindings,
    outcome: Option<RenderOutcome>,
    /// Bumped on every render so the viewer can reset per-figure state.
    generation: u64,
}

impl ChartSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(&self) -> ChartKind {
        self.kind
    }

    pub fn bindings(&self) -> &FieldBindings {
        &self.bindings
    }

    pub fn outcome(&self) -> Option<&RenderOutcome> {
        self.outcome.as_ref()
    }

    pub fn figure(&self) -> Option<&Figure> {
        self.outcome.as_ref().and_then(|o| o.as_ref().ok())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    pub fn is_rendered(&self) -> bool {
        self.outcome.is_some()
    }

    /// Switch chart type. Bindings and any figure of the previous type are discarded.
    pub fn select_kind(&mut self, kind: ChartKind) {
        if kind != self.kind {
            self.kind = kind;
            self.bindings.clear();
            self.outcome = None;
        }
    }

    /// Bind a single-select role. A real change returns to field selection.
    pub fn bind(&mut self, role: &str, column: Option<&str>) {
        if self.bindings.single(role) != column {
            self.bindings.set(role, column);
            self.outcome = None;
        }
    }

    /// Bind a multi-select role. A real change returns to field selection.
    pub fn bind_many(&mut self, role: &str, columns: Vec<String>) {
        if self.bindings.many(role) != columns.as_slice() {
            self.bindings.set_many(role, columns);
            self.outcome = None;
        }
    }

    /// Fill unbound required roles with their first candidate column,
    /// the way a fresh select box shows its first option.
    pub fn ensure_defaults(&mut self, dataset: &Dataset) {
        for role in dispatch::roles(self.kind) {
            if role.arity == Arity::Required && self.bindings.single(role.name).is_none() {
                let first = role.kind.candidates(dataset).first().cloned();
                if let Some(column) = first {
                    self.bindings.set(role.name, Some(&column));
                }
            }
        }
    }

    /// Forget bindings and figure, keeping the chart type. Used when the dataset changes.
    pub fn reset(&mut self) {
        self.bindings.clear();
        self.outcome = None;
    }

    pub fn request(&self) -> ChartRequest {
        ChartRequest::new(self.kind, self.bindings.clone())
    }

    /// The Generate trigger: render from scratch with the current bindings.
    pub fn generate(&mut self, dataset: &Dataset, options: &ChartOptions) -> &RenderOutcome {
        let outcome = dispatch::render(&self.request(), dataset, options);
        self.generation += 1;
        self.outcome.insert(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_sample, DatasetSource};

    fn sample() -> Dataset {
        Dataset::new(
            generate_sample(42, 100).unwrap(),
            DatasetSource::Sample { seed: 42 },
        )
    }

    #[test]
    fn nothing_renders_before_generate() {
        let ds = sample();
        let mut selection = ChartSelection::new();
        selection.ensure_defaults(&ds);
        assert!(!selection.is_rendered());
        assert_eq!(selection.bindings().single("X Axis"), Some("Category"));
        assert_eq!(selection.bindings().single("Y Axis"), Some("Value1"));

        let outcome = selection.generate(&ds, &ChartOptions::default());
        assert!(outcome.is_ok());
        assert!(selection.figure().is_some());
    }

    #[test]
    fn switching_chart_type_discards_figure() {
        let ds = sample();
        let mut selection = ChartSelection::new();
        selection.select_kind(ChartKind::Heatmap);
        selection.generate(&ds, &ChartOptions::default());
        assert!(matches!(selection.figure(), Some(Figure::Heatmap(_))));

        selection.select_kind(ChartKind::Gauge);
        assert!(selection.outcome().is_none());
        assert!(selection.bindings().is_empty());
        assert_eq!(selection.kind(), ChartKind::Gauge);
    }

    #[test]
    fn reselecting_same_type_keeps_figure() {
        let ds = sample();
        let mut selection = ChartSelection::new();
        selection.select_kind(ChartKind::Heatmap);
        selection.generate(&ds, &ChartOptions::default());
        selection.select_kind(ChartKind::Heatmap);
        assert!(selection.figure().is_some());
    }

    #[test]
    fn changing_a_binding_returns_to_field_selection() {
        let ds = sample();
        let mut selection = ChartSelection::new();
        selection.select_kind(ChartKind::Gauge);
        selection.ensure_defaults(&ds);
        selection.generate(&ds, &ChartOptions::default());
        assert!(selection.is_rendered());

        // Same value is not a change.
        selection.bind("Metric", Some("Value1"));
        assert!(selection.is_rendered());

        selection.bind("Metric", Some("Score"));
        assert!(!selection.is_rendered());

        let generation = selection.generation();
        selection.generate(&ds, &ChartOptions::default());
        assert_eq!(selection.generation(), generation + 1);
        let Some(Figure::Gauge(g)) = selection.figure() else {
            panic!("expected gauge");
        };
        assert_eq!(g.metric, "Score");
    }

    #[test]
    fn multi_binding_change_clears_outcome() {
        let ds = sample();
        let mut selection = ChartSelection::new();
        selection.select_kind(ChartKind::Radar);
        selection.bind_many("Select Columns", vec!["Value1".into()]);
        selection.generate(&ds, &ChartOptions::default());
        assert!(selection.figure().is_some());

        selection.bind_many("Select Columns", vec!["Value1".into(), "Score".into()]);
        assert!(!selection.is_rendered());
    }

    #[test]
    fn failed_generate_keeps_guard_outcome() {
        let ds = sample();
        let mut selection = ChartSelection::new();
        selection.select_kind(ChartKind::Radar);
        let outcome = selection.generate(&ds, &ChartOptions::default());
        assert!(matches!(outcome, Err(ChartError::Validation(_))));
        assert!(selection.is_rendered());
        assert!(selection.figure().is_none());
    }

    #[test]
    fn reset_clears_bindings_but_keeps_kind() {
        let ds = sample();
        let mut selection = ChartSelection::new();
        selection.select_kind(ChartKind::Pie);
        selection.ensure_defaults(&ds);
        selection.generate(&ds, &ChartOptions::default());

        selection.reset();
        assert_eq!(selection.kind(), ChartKind::Pie);
        assert!(selection.bindings().is_empty());
        assert!(!selection.is_rendered());
    }
}
