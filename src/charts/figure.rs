//! Figure descriptions
//! Renderer-independent output of the chart builders. The viewer draws these
//! with egui_plot; they can also be exported as JSON.

use super::kind::ChartKind;
use crate::stats::HistogramBin;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A labelled aggregate, used by bar and pie charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarFigure {
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFigure {
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub size: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterGroup {
    pub name: String,
    pub points: Vec<ScatterPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterFigure {
    pub x_label: String,
    pub y_label: String,
    pub groups: Vec<ScatterGroup>,
    /// Range of the size column, when one is bound.
    pub size_range: Option<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieFigure {
    pub slices: Vec<Category>,
}

impl PieFigure {
    pub fn total(&self) -> f64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramFigure {
    pub column: String,
    pub bins: Vec<HistogramBin>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordWeight {
    pub word: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordCloudFigure {
    pub column: String,
    /// Every value of the column joined by single spaces.
    pub text: String,
    /// Most frequent words first.
    pub words: Vec<WordWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapFigure {
    pub labels: Vec<String>,
    /// Row-major correlation matrix; NaN where undefined.
    pub matrix: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarFigure {
    pub axes: Vec<String>,
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Group3d {
    pub name: String,
    pub points: Vec<[f64; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scatter3dFigure {
    pub axis_labels: [String; 3],
    pub groups: Vec<Group3d>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bubble {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleFrame {
    pub label: String,
    pub bubbles: Vec<Bubble>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleFigure {
    pub x_label: String,
    pub y_label: String,
    pub frame_label: String,
    pub frames: Vec<BubbleFrame>,
    /// Ranges over all frames so axes stay fixed while animating.
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub size_range: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeFigure {
    pub metric: String,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyNode {
    pub label: String,
    pub value: f64,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: 0.0,
            children: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HierarchyFigure {
    pub levels: Vec<String>,
    pub value_label: String,
    /// Unlabelled root holding the grand total.
    pub root: HierarchyNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLink {
    pub source: usize,
    pub target: usize,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyFigure {
    pub labels: Vec<String>,
    pub links: Vec<SankeyLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParallelAxis {
    pub name: String,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParallelFigure {
    pub axes: Vec<ParallelAxis>,
    /// One entry per complete row, one value per axis.
    pub lines: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DumbbellRow {
    pub category: String,
    pub first: f64,
    pub second: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DumbbellFigure {
    pub category_label: String,
    pub first_label: String,
    pub second_label: String,
    pub rows: Vec<DumbbellRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlopeLine {
    pub label: String,
    pub left: f64,
    pub right: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlopeFigure {
    pub left_label: String,
    pub right_label: String,
    pub lines: Vec<SlopeLine>,
}

/// A rendered chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum Figure {
    Bar(BarFigure),
    Line(LineFigure),
    Scatter(ScatterFigure),
    Pie(PieFigure),
    Histogram(HistogramFigure),
    WordCloud(WordCloudFigure),
    Heatmap(HeatmapFigure),
    Radar(RadarFigure),
    Scatter3d(Scatter3dFigure),
    AnimatedBubble(BubbleFigure),
    Gauge(GaugeFigure),
    Treemap(HierarchyFigure),
    Sunburst(HierarchyFigure),
    Sankey(SankeyFigure),
    ParallelCoordinates(ParallelFigure),
    Dumbbell(DumbbellFigure),
    Slope(SlopeFigure),
}

impl Figure {
    pub fn kind(&self) -> ChartKind {
        match self {
            Figure::Bar(_) => ChartKind::Bar,
            Figure::Line(_) => ChartKind::Line,
            Figure::Scatter(_) => ChartKind::Scatter,
            Figure::Pie(_) => ChartKind::Pie,
            Figure::Histogram(_) => ChartKind::Histogram,
            Figure::WordCloud(_) => ChartKind::WordCloud,
            Figure::Heatmap(_) => ChartKind::Heatmap,
            Figure::Radar(_) => ChartKind::Radar,
            Figure::Scatter3d(_) => ChartKind::Scatter3d,
            Figure::AnimatedBubble(_) => ChartKind::AnimatedBubble,
            Figure::Gauge(_) => ChartKind::Gauge,
            Figure::Treemap(_) => ChartKind::Treemap,
            Figure::Sunburst(_) => ChartKind::Sunburst,
            Figure::Sankey(_) => ChartKind::Sankey,
            Figure::ParallelCoordinates(_) => ChartKind::ParallelCoordinates,
            Figure::Dumbbell(_) => ChartKind::Dumbbell,
            Figure::Slope(_) => ChartKind::Slope,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Export as pretty JSON, replacing any existing file.
    pub fn write_json(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let json = self.to_json()?;
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(json.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_export_is_tagged_by_chart() {
        let figure = Figure::Gauge(GaugeFigure {
            metric: "Score".into(),
            value: 50.0,
            min: 0.0,
            max: 80.0,
        });
        let value: serde_json::Value = serde_json::from_str(&figure.to_json().unwrap()).unwrap();
        assert_eq!(value["chart"], "gauge");
        assert_eq!(value["metric"], "Score");
        assert_eq!(figure.kind(), ChartKind::Gauge);
    }

    #[test]
    fn write_json_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figure.json");
        let figure = Figure::Pie(PieFigure {
            slices: vec![Category {
                label: "A".into(),
                value: 3.0,
            }],
        });
        figure.write_json(&path).unwrap();
        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"pie\""));
    }

    #[test]
    fn hierarchy_depth_counts_levels() {
        let mut root = HierarchyNode::new("");
        let mut a = HierarchyNode::new("a");
        a.children.push(HierarchyNode::new("a1"));
        root.children.push(a);
        root.children.push(HierarchyNode::new("b"));
        assert_eq!(root.depth(), 3);
    }
}
