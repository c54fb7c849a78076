//! Chart Dispatcher
//! Registration table from chart type to role schema and builder, plus the
//! precondition and binding checks run before any builder.

use super::builders;
use super::figure::Figure;
use super::kind::{self, Arity, ChartKind, RoleSpec};
use super::request::{ChartRequest, FieldBindings};
use crate::config::AppConfig;
use crate::data::Dataset;
use polars::prelude::PolarsError;
use thiserror::Error;

/// Why a chart did not render. Every variant is shown in place of the chart.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChartError {
    /// The dataset cannot support this chart type at all.
    #[error("{0}")]
    Guard(String),
    /// The user's bindings are incomplete or invalid.
    #[error("{0}")]
    Validation(String),
    /// The builder failed while transforming the data.
    #[error("Could not render chart: {0}")]
    Renderer(String),
}

impl From<PolarsError> for ChartError {
    fn from(e: PolarsError) -> Self {
        ChartError::Renderer(e.to_string())
    }
}

/// Tunables passed through to the builders.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub histogram_bins: usize,
    pub word_cloud_max_words: usize,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            histogram_bins: 20,
            word_cloud_max_words: 200,
        }
    }
}

impl From<&AppConfig> for ChartOptions {
    fn from(config: &AppConfig) -> Self {
        Self {
            histogram_bins: config.histogram_bins,
            word_cloud_max_words: config.word_cloud_max_words,
        }
    }
}

pub type BuildFn = fn(&Dataset, &FieldBindings, &ChartOptions) -> Result<Figure, ChartError>;

/// One row of the registration table.
pub struct ChartEntry {
    pub kind: ChartKind,
    pub roles: &'static [RoleSpec],
    build: BuildFn,
}

const fn entry(kind: ChartKind, roles: &'static [RoleSpec], build: BuildFn) -> ChartEntry {
    ChartEntry { kind, roles, build }
}

/// Indexed by `ChartKind as usize`; same order as [`ChartKind::ALL`].
static REGISTRY: [ChartEntry; 17] = [
    entry(ChartKind::Bar, kind::BAR_ROLES, builders::bar),
    entry(ChartKind::Line, kind::LINE_ROLES, builders::line),
    entry(ChartKind::Scatter, kind::SCATTER_ROLES, builders::scatter),
    entry(ChartKind::Pie, kind::PIE_ROLES, builders::pie),
    entry(ChartKind::Histogram, kind::HISTOGRAM_ROLES, builders::histogram),
    entry(ChartKind::WordCloud, kind::WORD_CLOUD_ROLES, builders::word_cloud),
    entry(ChartKind::Heatmap, kind::HEATMAP_ROLES, builders::heatmap),
    entry(ChartKind::Radar, kind::RADAR_ROLES, builders::radar),
    entry(ChartKind::Scatter3d, kind::SCATTER_3D_ROLES, builders::scatter_3d),
    entry(ChartKind::AnimatedBubble, kind::BUBBLE_ROLES, builders::animated_bubble),
    entry(ChartKind::Gauge, kind::GAUGE_ROLES, builders::gauge),
    entry(ChartKind::Treemap, kind::HIERARCHY_ROLES, builders::treemap),
    entry(ChartKind::Sunburst, kind::HIERARCHY_ROLES, builders::sunburst),
    entry(ChartKind::Sankey, kind::SANKEY_ROLES, builders::sankey),
    entry(
        ChartKind::ParallelCoordinates,
        kind::PARALLEL_ROLES,
        builders::parallel_coordinates,
    ),
    entry(ChartKind::Dumbbell, kind::DUMBBELL_ROLES, builders::dumbbell),
    entry(ChartKind::Slope, kind::SLOPE_ROLES, builders::slope),
];

pub fn chart_entry(kind: ChartKind) -> &'static ChartEntry {
    &REGISTRY[kind as usize]
}

pub fn roles(kind: ChartKind) -> &'static [RoleSpec] {
    chart_entry(kind).roles
}

/// Dataset-level requirements of a chart type, checked before any widget is shown.
pub fn precondition(kind: ChartKind, dataset: &Dataset) -> Result<(), ChartError> {
    match kind {
        ChartKind::Heatmap if dataset.numeric_columns().len() < 2 => {
            return Err(ChartError::Guard(
                "At least 2 numeric columns required.".to_string(),
            ));
        }
        ChartKind::WordCloud if dataset.text_columns().is_empty() => {
            return Err(ChartError::Guard("No text column available.".to_string()));
        }
        _ => {}
    }

    for role in roles(kind) {
        if role.arity != Arity::Optional && role.kind.candidates(dataset).is_empty() {
            return Err(ChartError::Guard(format!(
                "No {} available for '{}'.",
                role.kind.label(),
                role.name
            )));
        }
    }
    Ok(())
}

/// Check that every role is bound as its schema demands.
pub fn validate(
    kind: ChartKind,
    bindings: &FieldBindings,
    dataset: &Dataset,
) -> Result<(), ChartError> {
    let check = |role: &RoleSpec, column: &str| {
        if role.kind.accepts(dataset, column) {
            Ok(())
        } else {
            Err(ChartError::Validation(format!(
                "'{}' is not a {} for '{}'.",
                column,
                role.kind.label(),
                role.name
            )))
        }
    };

    for role in roles(kind) {
        match role.arity {
            Arity::Required => match bindings.single(role.name) {
                Some(column) => check(role, column)?,
                None => {
                    return Err(ChartError::Validation(format!(
                        "Select a column for '{}'.",
                        role.name
                    )))
                }
            },
            Arity::Optional => {
                if let Some(column) = bindings.single(role.name) {
                    check(role, column)?;
                }
            }
            Arity::Many => {
                let columns = bindings.many(role.name);
                if columns.is_empty() {
                    return Err(ChartError::Validation(format!(
                        "Select at least one column for '{}'.",
                        role.name
                    )));
                }
                for column in columns {
                    check(role, column)?;
                }
            }
        }
    }
    Ok(())
}

/// Render one chart from scratch.
pub fn render(
    request: &ChartRequest,
    dataset: &Dataset,
    options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let entry = chart_entry(request.kind);
    precondition(entry.kind, dataset)?;
    validate(entry.kind, &request.bindings, dataset)?;

    let result = (entry.build)(dataset, &request.bindings, options);
    match &result {
        Ok(_) => log::debug!("Rendered {}", entry.kind.label()),
        Err(e) => log::debug!("{} not rendered: {}", entry.kind.label(), e),
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_sample, DatasetSource};
    use polars::prelude::*;

    fn sample() -> Dataset {
        Dataset::new(
            generate_sample(42, 100).unwrap(),
            DatasetSource::Sample { seed: 42 },
        )
    }

    fn frame(columns: Vec<Column>) -> Dataset {
        Dataset::new(
            DataFrame::new(columns).unwrap(),
            DatasetSource::Sample { seed: 0 },
        )
    }

    fn request(kind: ChartKind, bindings: FieldBindings) -> ChartRequest {
        ChartRequest::new(kind, bindings)
    }

    #[test]
    fn registry_order_matches_catalog() {
        for (i, kind) in ChartKind::ALL.iter().enumerate() {
            assert_eq!(REGISTRY[i].kind, *kind);
            assert_eq!(chart_entry(*kind).kind, *kind);
        }
    }

    #[test]
    fn heatmap_needs_two_numeric_columns() {
        let ds = frame(vec![
            Column::new("name".into(), vec!["a", "b"]),
            Column::new("v".into(), vec![1.0f64, 2.0]),
        ]);
        let err = render(
            &request(ChartKind::Heatmap, FieldBindings::new()),
            &ds,
            &ChartOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ChartError::Guard("At least 2 numeric columns required.".into())
        );
    }

    #[test]
    fn heatmap_covers_every_numeric_column() {
        let ds = sample();
        let figure = render(
            &request(ChartKind::Heatmap, FieldBindings::new()),
            &ds,
            &ChartOptions::default(),
        )
        .unwrap();
        let Figure::Heatmap(h) = figure else {
            panic!("expected heatmap");
        };
        assert_eq!(h.labels, ["Value1", "Value2", "Score"]);
        assert_eq!(h.matrix.len(), 3);
        assert!(h.matrix.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn word_cloud_without_text_columns_is_guarded() {
        let ds = frame(vec![
            Column::new("a".into(), vec![1i64, 2]),
            Column::new("b".into(), vec![3i64, 4]),
        ]);
        let err = precondition(ChartKind::WordCloud, &ds).unwrap_err();
        assert_eq!(err, ChartError::Guard("No text column available.".into()));

        let bindings = FieldBindings::new().with("Text Column", "a");
        assert!(render(
            &request(ChartKind::WordCloud, bindings),
            &ds,
            &ChartOptions::default()
        )
        .is_err());
    }

    #[test]
    fn chart_without_candidate_columns_is_guarded() {
        let ds = frame(vec![Column::new("only_text".into(), vec!["x", "y"])]);
        let err = precondition(ChartKind::Bar, &ds).unwrap_err();
        assert!(matches!(err, ChartError::Guard(msg) if msg.contains("Y Axis")));
    }

    #[test]
    fn missing_required_binding_is_validation_error() {
        let ds = sample();
        let bindings = FieldBindings::new().with("X Axis", "Category");
        let err = render(
            &request(ChartKind::Bar, bindings),
            &ds,
            &ChartOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ChartError::Validation("Select a column for 'Y Axis'.".into())
        );
    }

    #[test]
    fn wrong_column_kind_is_rejected() {
        let ds = sample();
        let bindings = FieldBindings::new()
            .with("X Axis", "Category")
            .with("Y Axis", "Description");
        let err = validate(ChartKind::Bar, &bindings, &ds).unwrap_err();
        assert!(matches!(err, ChartError::Validation(msg) if msg.contains("Description")));

        let unknown = FieldBindings::new().with("Metric", "Nope");
        assert!(validate(ChartKind::Gauge, &unknown, &ds).is_err());
    }

    #[test]
    fn optional_roles_may_stay_unbound() {
        let ds = sample();
        let bindings = FieldBindings::new()
            .with("X Axis", "Value1")
            .with("Y Axis", "Score");
        assert!(validate(ChartKind::Scatter, &bindings, &ds).is_ok());
    }

    #[test]
    fn multi_roles_need_a_selection() {
        let ds = sample();
        let err = validate(ChartKind::Radar, &FieldBindings::new(), &ds).unwrap_err();
        assert!(matches!(err, ChartError::Validation(_)));
    }

    #[test]
    fn every_chart_renders_on_the_sample() {
        let ds = sample();
        let options = ChartOptions::default();
        for kind in ChartKind::ALL {
            let mut bindings = FieldBindings::new();
            for role in roles(kind) {
                let candidates = role.kind.candidates(&ds);
                match role.arity {
                    Arity::Required => bindings.set(role.name, Some(candidates[0].as_str())),
                    Arity::Optional => {}
                    Arity::Many => bindings.set_many(role.name, candidates[..2].to_vec()),
                }
            }
            // Sankey needs distinct source and target columns.
            if kind == ChartKind::Sankey {
                bindings.set("Target", Some("Description"));
            }
            let figure = render(&request(kind, bindings), &ds, &options)
                .unwrap_or_else(|e| panic!("{} failed: {}", kind.label(), e));
            assert_eq!(figure.kind(), kind);
        }
    }
}
