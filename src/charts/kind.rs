//! Chart catalog: the 17 chart types and the column roles each one takes.

use crate::data::Dataset;

/// Which dataset columns may fill a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Any,
    Numeric,
    Text,
}

impl ColumnKind {
    /// Columns of `dataset` eligible for this kind, in source order.
    pub fn candidates<'a>(&self, dataset: &'a Dataset) -> &'a [String] {
        match self {
            ColumnKind::Any => dataset.all_columns(),
            ColumnKind::Numeric => dataset.numeric_columns(),
            ColumnKind::Text => dataset.text_columns(),
        }
    }

    pub fn accepts(&self, dataset: &Dataset, column: &str) -> bool {
        match self {
            ColumnKind::Any => dataset.has_column(column),
            ColumnKind::Numeric => dataset.is_numeric(column),
            ColumnKind::Text => dataset.is_text(column),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ColumnKind::Any => "column",
            ColumnKind::Numeric => "numeric column",
            ColumnKind::Text => "text column",
        }
    }
}

/// How many columns a role takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// Exactly one column.
    Required,
    /// Zero or one column.
    Optional,
    /// One or more columns, in selection order.
    Many,
}

/// A named slot of a chart, e.g. "X Axis" taking a numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
    pub arity: Arity,
}

const fn required(name: &'static str, kind: ColumnKind) -> RoleSpec {
    RoleSpec {
        name,
        kind,
        arity: Arity::Required,
    }
}

const fn optional(name: &'static str, kind: ColumnKind) -> RoleSpec {
    RoleSpec {
        name,
        kind,
        arity: Arity::Optional,
    }
}

const fn many(name: &'static str, kind: ColumnKind) -> RoleSpec {
    RoleSpec {
        name,
        kind,
        arity: Arity::Many,
    }
}

use ColumnKind::{Any, Numeric, Text};

pub const BAR_ROLES: &[RoleSpec] = &[required("X Axis", Any), required("Y Axis", Numeric)];
pub const LINE_ROLES: &[RoleSpec] = &[
    required("X Axis", Numeric),
    required("Y Axis", Numeric),
    optional("Group By", Any),
];
pub const SCATTER_ROLES: &[RoleSpec] = &[
    required("X Axis", Numeric),
    required("Y Axis", Numeric),
    optional("Color By", Any),
    optional("Size By", Numeric),
];
pub const PIE_ROLES: &[RoleSpec] = &[required("Name", Any), required("Value", Numeric)];
pub const HISTOGRAM_ROLES: &[RoleSpec] = &[required("Column", Numeric)];
pub const WORD_CLOUD_ROLES: &[RoleSpec] = &[required("Text Column", Text)];
pub const HEATMAP_ROLES: &[RoleSpec] = &[];
pub const RADAR_ROLES: &[RoleSpec] = &[many("Select Columns", Numeric)];
pub const SCATTER_3D_ROLES: &[RoleSpec] = &[
    required("X Axis", Numeric),
    required("Y Axis", Numeric),
    required("Z Axis", Numeric),
    optional("Color", Any),
];
pub const BUBBLE_ROLES: &[RoleSpec] = &[
    required("X Axis", Numeric),
    required("Y Axis", Numeric),
    required("Size", Numeric),
    optional("Frame", Numeric),
];
pub const GAUGE_ROLES: &[RoleSpec] = &[required("Metric", Numeric)];
pub const HIERARCHY_ROLES: &[RoleSpec] = &[many("Hierarchy", Any), required("Value", Numeric)];
pub const SANKEY_ROLES: &[RoleSpec] = &[
    required("Source", Any),
    required("Target", Any),
    required("Value", Numeric),
];
pub const PARALLEL_ROLES: &[RoleSpec] = &[many("Select Columns", Numeric)];
pub const DUMBBELL_ROLES: &[RoleSpec] = &[
    required("Category", Any),
    required("Value 1", Numeric),
    required("Value 2", Numeric),
];
pub const SLOPE_ROLES: &[RoleSpec] = &[
    required("Left", Numeric),
    required("Right", Numeric),
    required("Label", Any),
];

/// Chart-type tag shown in the sidebar selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
    Scatter,
    Pie,
    Histogram,
    WordCloud,
    Heatmap,
    Radar,
    Scatter3d,
    AnimatedBubble,
    Gauge,
    Treemap,
    Sunburst,
    Sankey,
    ParallelCoordinates,
    Dumbbell,
    Slope,
}

impl ChartKind {
    /// Selector order.
    pub const ALL: [ChartKind; 17] = [
        ChartKind::Bar,
        ChartKind::Line,
        ChartKind::Scatter,
        ChartKind::Pie,
        ChartKind::Histogram,
        ChartKind::WordCloud,
        ChartKind::Heatmap,
        ChartKind::Radar,
        ChartKind::Scatter3d,
        ChartKind::AnimatedBubble,
        ChartKind::Gauge,
        ChartKind::Treemap,
        ChartKind::Sunburst,
        ChartKind::Sankey,
        ChartKind::ParallelCoordinates,
        ChartKind::Dumbbell,
        ChartKind::Slope,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Line => "Line Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Histogram => "Histogram",
            ChartKind::WordCloud => "Word Cloud",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::Radar => "Radar Chart",
            ChartKind::Scatter3d => "3D Scatter",
            ChartKind::AnimatedBubble => "Animated Bubble",
            ChartKind::Gauge => "Gauge",
            ChartKind::Treemap => "Treemap",
            ChartKind::Sunburst => "Sunburst",
            ChartKind::Sankey => "Sankey Diagram",
            ChartKind::ParallelCoordinates => "Parallel Coordinates",
            ChartKind::Dumbbell => "Dumbbell Chart",
            ChartKind::Slope => "Slope Chart",
        }
    }
}
