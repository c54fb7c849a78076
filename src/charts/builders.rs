//! Chart builders
//! Pure transforms from a dataset and its bound columns into a [`Figure`].
//! Rows missing a required numeric value are skipped.

use super::dispatch::{ChartError, ChartOptions};
use super::figure::*;
use super::request::FieldBindings;
use crate::data::Dataset;
use crate::stats::StatsCalculator;
use std::collections::HashMap;

const MISSING_LABEL: &str = "(missing)";

fn no_rows() -> ChartError {
    ChartError::Guard("No complete rows to plot.".to_string())
}

fn bound<'a>(bindings: &'a FieldBindings, role: &str) -> Result<&'a str, ChartError> {
    bindings
        .single(role)
        .ok_or_else(|| ChartError::Validation(format!("Select a column for '{}'.", role)))
}

/// Render a number the way a category label reads: integers without a fraction.
pub fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{}", v)
    }
}

/// Keys in first-seen order with an attached accumulator.
struct OrderedGroups<T> {
    index: HashMap<String, usize>,
    entries: Vec<(String, T)>,
}

impl<T> OrderedGroups<T> {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str, init: impl FnOnce() -> T) -> &mut T {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.entries.push((key.to_string(), init()));
                self.index.insert(key.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    fn into_entries(self) -> Vec<(String, T)> {
        self.entries
    }
}

/// Optional grouping column as per-row labels; all rows share `fallback` when unbound.
fn group_labels(
    dataset: &Dataset,
    column: Option<&str>,
    fallback: &str,
) -> Result<Vec<String>, ChartError> {
    match column {
        Some(c) => Ok(dataset
            .text_values(c)?
            .into_iter()
            .map(|v| v.unwrap_or_else(|| MISSING_LABEL.to_string()))
            .collect()),
        None => Ok(vec![fallback.to_string(); dataset.row_count()]),
    }
}

/// Sum numeric values per category label, first-seen order.
fn sum_by_label(
    dataset: &Dataset,
    label_col: &str,
    value_col: &str,
) -> Result<Vec<Category>, ChartError> {
    let labels = dataset.text_values(label_col)?;
    let values = dataset.numeric_values(value_col)?;

    let mut groups = OrderedGroups::new();
    for (label, value) in labels.iter().zip(values.iter()) {
        if let (Some(label), Some(value)) = (label, value) {
            *groups.entry(label, || 0.0) += value;
        }
    }

    Ok(groups
        .into_entries()
        .into_iter()
        .map(|(label, value)| Category { label, value })
        .collect())
}

pub fn bar(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let x = bound(bindings, "X Axis")?;
    let y = bound(bindings, "Y Axis")?;

    let bars = sum_by_label(dataset, x, y)?;
    if bars.is_empty() {
        return Err(no_rows());
    }
    Ok(Figure::Bar(BarFigure {
        x_label: x.to_string(),
        y_label: y.to_string(),
        bars,
    }))
}

pub fn line(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let x = bound(bindings, "X Axis")?;
    let y = bound(bindings, "Y Axis")?;
    let xs = dataset.numeric_values(x)?;
    let ys = dataset.numeric_values(y)?;
    let groups = group_labels(dataset, bindings.single("Group By"), y)?;

    let mut series = OrderedGroups::new();
    for ((x, y), group) in xs.iter().zip(ys.iter()).zip(groups.iter()) {
        if let (Some(x), Some(y)) = (x, y) {
            series.entry(group, Vec::new).push([*x, *y]);
        }
    }

    let series: Vec<Series> = series
        .into_entries()
        .into_iter()
        .map(|(name, points)| Series { name, points })
        .collect();
    if series.is_empty() {
        return Err(no_rows());
    }
    Ok(Figure::Line(LineFigure {
        x_label: x.to_string(),
        y_label: y.to_string(),
        series,
    }))
}

pub fn scatter(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let x = bound(bindings, "X Axis")?;
    let y = bound(bindings, "Y Axis")?;
    let xs = dataset.numeric_values(x)?;
    let ys = dataset.numeric_values(y)?;
    let groups = group_labels(dataset, bindings.single("Color By"), y)?;
    let sizes = match bindings.single("Size By") {
        Some(col) => Some(dataset.numeric_values(col)?),
        None => None,
    };

    let mut grouped = OrderedGroups::new();
    let mut used_sizes = Vec::new();
    for (i, group) in groups.iter().enumerate() {
        let (Some(x), Some(y)) = (xs[i], ys[i]) else {
            continue;
        };
        let size = match &sizes {
            Some(sizes) => match sizes[i] {
                Some(s) => Some(s),
                None => continue,
            },
            None => None,
        };
        used_sizes.push(size);
        grouped
            .entry(group, Vec::new)
            .push(ScatterPoint { x, y, size });
    }

    let groups: Vec<ScatterGroup> = grouped
        .into_entries()
        .into_iter()
        .map(|(name, points)| ScatterGroup { name, points })
        .collect();
    if groups.is_empty() {
        return Err(no_rows());
    }
    let size_range = sizes
        .as_ref()
        .and_then(|_| StatsCalculator::min_max(&used_sizes));

    Ok(Figure::Scatter(ScatterFigure {
        x_label: x.to_string(),
        y_label: y.to_string(),
        groups,
        size_range,
    }))
}

pub fn pie(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let names = bound(bindings, "Name")?;
    let values = bound(bindings, "Value")?;

    let slices: Vec<Category> = sum_by_label(dataset, names, values)?
        .into_iter()
        .filter(|c| c.value.is_finite() && c.value > 0.0)
        .collect();
    if slices.is_empty() {
        return Err(ChartError::Guard(
            "Pie values must contain at least one positive total.".to_string(),
        ));
    }
    Ok(Figure::Pie(PieFigure { slices }))
}

pub fn histogram(
    dataset: &Dataset,
    bindings: &FieldBindings,
    options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let column = bound(bindings, "Column")?;
    let bins = StatsCalculator::histogram(&dataset.numeric_values(column)?, options.histogram_bins);
    if bins.is_empty() {
        return Err(no_rows());
    }
    Ok(Figure::Histogram(HistogramFigure {
        column: column.to_string(),
        bins,
    }))
}

/// Count words case-insensitively, keeping the first spelling seen.
pub fn word_frequencies(text: &str, max_words: usize) -> Vec<WordWeight> {
    let mut groups: OrderedGroups<(String, usize)> = OrderedGroups::new();
    let tokens = text
        .split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .map(|t| t.trim_matches('\''))
        .filter(|t| !t.is_empty());

    for token in tokens {
        let entry = groups.entry(&token.to_lowercase(), || (token.to_string(), 0));
        entry.1 += 1;
    }

    let mut words: Vec<WordWeight> = groups
        .into_entries()
        .into_iter()
        .map(|(_, (word, count))| WordWeight { word, count })
        .collect();
    // Stable sort keeps first-seen order among equal counts.
    words.sort_by(|a, b| b.count.cmp(&a.count));
    words.truncate(max_words);
    words
}

pub fn word_cloud(
    dataset: &Dataset,
    bindings: &FieldBindings,
    options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let column = bound(bindings, "Text Column")?;
    let text = dataset
        .text_values(column)?
        .into_iter()
        .map(|v| v.unwrap_or_default())
        .collect::<Vec<_>>()
        .join(" ");

    let words = word_frequencies(&text, options.word_cloud_max_words);
    if words.is_empty() {
        return Err(ChartError::Guard(
            "The selected column has no words to display.".to_string(),
        ));
    }
    Ok(Figure::WordCloud(WordCloudFigure {
        column: column.to_string(),
        text,
        words,
    }))
}

pub fn heatmap(
    dataset: &Dataset,
    _bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let labels = dataset.numeric_columns().to_vec();
    let columns = labels
        .iter()
        .map(|c| dataset.numeric_values(c))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Figure::Heatmap(HeatmapFigure {
        matrix: StatsCalculator::correlation_matrix(&columns),
        labels,
    }))
}

pub fn radar(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let axes = bindings.many("Select Columns").to_vec();
    let values = axes
        .iter()
        .map(|c| -> Result<f64, ChartError> {
            Ok(StatsCalculator::mean(&dataset.numeric_values(c)?))
        })
        .collect::<Result<Vec<f64>, ChartError>>()?;

    Ok(Figure::Radar(RadarFigure { axes, values }))
}

pub fn scatter_3d(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let x = bound(bindings, "X Axis")?;
    let y = bound(bindings, "Y Axis")?;
    let z = bound(bindings, "Z Axis")?;
    let xs = dataset.numeric_values(x)?;
    let ys = dataset.numeric_values(y)?;
    let zs = dataset.numeric_values(z)?;
    let groups = group_labels(dataset, bindings.single("Color"), z)?;

    let mut grouped = OrderedGroups::new();
    for (i, group) in groups.iter().enumerate() {
        if let (Some(x), Some(y), Some(z)) = (xs[i], ys[i], zs[i]) {
            grouped.entry(group, Vec::new).push([x, y, z]);
        }
    }

    let groups: Vec<Group3d> = grouped
        .into_entries()
        .into_iter()
        .map(|(name, points)| Group3d { name, points })
        .collect();
    if groups.is_empty() {
        return Err(no_rows());
    }
    Ok(Figure::Scatter3d(Scatter3dFigure {
        axis_labels: [x.to_string(), y.to_string(), z.to_string()],
        groups,
    }))
}

pub fn animated_bubble(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let x = bound(bindings, "X Axis")?;
    let y = bound(bindings, "Y Axis")?;
    let size = bound(bindings, "Size")?;
    let xs = dataset.numeric_values(x)?;
    let ys = dataset.numeric_values(y)?;
    let sizes = dataset.numeric_values(size)?;

    // Without a frame column every row is its own frame, keyed by row index.
    let frame_column = bindings.single("Frame");
    let frame_keys: Vec<Option<String>> = match frame_column {
        Some(col) => dataset
            .numeric_values(col)?
            .into_iter()
            .map(|v| v.map(format_value))
            .collect(),
        None => (0..dataset.row_count()).map(|i| Some(i.to_string())).collect(),
    };

    let mut frames = OrderedGroups::new();
    let mut all_x = Vec::new();
    let mut all_y = Vec::new();
    let mut all_size = Vec::new();
    for (i, key) in frame_keys.iter().enumerate() {
        let (Some(key), Some(bx), Some(by), Some(bs)) = (key, xs[i], ys[i], sizes[i]) else {
            continue;
        };
        all_x.push(Some(bx));
        all_y.push(Some(by));
        all_size.push(Some(bs));
        frames.entry(key, Vec::new).push(Bubble {
            x: bx,
            y: by,
            size: bs,
        });
    }

    let (Some(x_range), Some(y_range), Some(size_range)) = (
        StatsCalculator::min_max(&all_x),
        StatsCalculator::min_max(&all_y),
        StatsCalculator::min_max(&all_size),
    ) else {
        return Err(no_rows());
    };

    Ok(Figure::AnimatedBubble(BubbleFigure {
        x_label: x.to_string(),
        y_label: y.to_string(),
        frame_label: frame_column.unwrap_or("frame").to_string(),
        frames: frames
            .into_entries()
            .into_iter()
            .map(|(label, bubbles)| BubbleFrame { label, bubbles })
            .collect(),
        x_range,
        y_range,
        size_range,
    }))
}

pub fn gauge(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let metric = bound(bindings, "Metric")?;
    let values = dataset.numeric_values(metric)?;
    let value = StatsCalculator::mean(&values);
    let Some((lo, hi)) = StatsCalculator::min_max(&values) else {
        return Err(no_rows());
    };

    Ok(Figure::Gauge(GaugeFigure {
        metric: metric.to_string(),
        value,
        min: lo.min(0.0),
        max: hi.max(value),
    }))
}

fn hierarchy(dataset: &Dataset, bindings: &FieldBindings) -> Result<HierarchyFigure, ChartError> {
    let levels = bindings.many("Hierarchy").to_vec();
    let value_col = bound(bindings, "Value")?;
    let values = dataset.numeric_values(value_col)?;
    let paths = levels
        .iter()
        .map(|c| dataset.text_values(c))
        .collect::<Result<Vec<_>, _>>()?;

    let mut root = HierarchyNode::new("");
    for (row, value) in values.iter().enumerate() {
        let Some(value) = value else { continue };
        let Some(path) = paths
            .iter()
            .map(|col| col[row].clone())
            .collect::<Option<Vec<String>>>()
        else {
            continue;
        };

        root.value += value;
        let mut node = &mut root;
        for label in path {
            let idx = match node.children.iter().position(|c| c.label == label) {
                Some(idx) => idx,
                None => {
                    node.children.push(HierarchyNode::new(label));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[idx];
            node.value += value;
        }
    }

    if root.children.is_empty() {
        return Err(no_rows());
    }
    Ok(HierarchyFigure {
        levels,
        value_label: value_col.to_string(),
        root,
    })
}

pub fn treemap(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    hierarchy(dataset, bindings).map(Figure::Treemap)
}

pub fn sunburst(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    hierarchy(dataset, bindings).map(Figure::Sunburst)
}

/// Group `(source, target, value)` rows into summed edges.
///
/// Edges keep first-seen order. Node labels are deduplicated in first-seen
/// order over all edge sources followed by all edge targets.
pub fn sankey_edges(rows: &[(String, String, f64)]) -> SankeyFigure {
    let mut edges: OrderedGroups<(String, String, f64)> = OrderedGroups::new();
    for (source, target, value) in rows {
        // Unit separator keeps ("a b", "c") and ("a", "b c") apart.
        let key = format!("{}\u{1f}{}", source, target);
        edges
            .entry(&key, || (source.clone(), target.clone(), 0.0))
            .2 += value;
    }
    let edges: Vec<(String, String, f64)> =
        edges.into_entries().into_iter().map(|(_, e)| e).collect();

    let mut labels: Vec<String> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    let sources = edges.iter().map(|e| &e.0);
    let targets = edges.iter().map(|e| &e.1);
    for label in sources.chain(targets) {
        if !index.contains_key(label) {
            index.insert(label.clone(), labels.len());
            labels.push(label.clone());
        }
    }

    let links = edges
        .iter()
        .map(|(s, t, v)| SankeyLink {
            source: index[s],
            target: index[t],
            value: *v,
        })
        .collect();

    SankeyFigure { labels, links }
}

pub fn sankey(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let source = bound(bindings, "Source")?;
    let target = bound(bindings, "Target")?;
    let value = bound(bindings, "Value")?;
    if source == target {
        return Err(ChartError::Validation(
            "Source and Target must be different columns.".to_string(),
        ));
    }

    let sources = dataset.text_values(source)?;
    let targets = dataset.text_values(target)?;
    let values = dataset.numeric_values(value)?;

    let rows: Vec<(String, String, f64)> = sources
        .into_iter()
        .zip(targets)
        .zip(values)
        .filter_map(|((s, t), v)| Some((s?, t?, v?)))
        .collect();
    if rows.is_empty() {
        return Err(no_rows());
    }
    Ok(Figure::Sankey(sankey_edges(&rows)))
}

pub fn parallel_coordinates(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let names = bindings.many("Select Columns").to_vec();
    let columns = names
        .iter()
        .map(|c| dataset.numeric_values(c))
        .collect::<Result<Vec<_>, _>>()?;

    let lines: Vec<Vec<f64>> = (0..dataset.row_count())
        .filter_map(|row| columns.iter().map(|col| col[row]).collect())
        .collect();
    if lines.is_empty() {
        return Err(no_rows());
    }

    let axes = names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let (min, max) = lines.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |acc, l| {
                (acc.0.min(l[i]), acc.1.max(l[i]))
            });
            ParallelAxis { name, min, max }
        })
        .collect();

    Ok(Figure::ParallelCoordinates(ParallelFigure { axes, lines }))
}

pub fn dumbbell(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let category = bound(bindings, "Category")?;
    let first = bound(bindings, "Value 1")?;
    let second = bound(bindings, "Value 2")?;

    let rows: Vec<DumbbellRow> = dataset
        .text_values(category)?
        .into_iter()
        .zip(dataset.numeric_values(first)?)
        .zip(dataset.numeric_values(second)?)
        .filter_map(|((c, a), b)| {
            Some(DumbbellRow {
                category: c?,
                first: a?,
                second: b?,
            })
        })
        .collect();
    if rows.is_empty() {
        return Err(no_rows());
    }

    Ok(Figure::Dumbbell(DumbbellFigure {
        category_label: category.to_string(),
        first_label: first.to_string(),
        second_label: second.to_string(),
        rows,
    }))
}

pub fn slope(
    dataset: &Dataset,
    bindings: &FieldBindings,
    _options: &ChartOptions,
) -> Result<Figure, ChartError> {
    let left = bound(bindings, "Left")?;
    let right = bound(bindings, "Right")?;
    let label = bound(bindings, "Label")?;

    let lines: Vec<SlopeLine> = dataset
        .text_values(label)?
        .into_iter()
        .zip(dataset.numeric_values(left)?)
        .zip(dataset.numeric_values(right)?)
        .filter_map(|((l, a), b)| {
            Some(SlopeLine {
                label: l.unwrap_or_default(),
                left: a?,
                right: b?,
            })
        })
        .collect();
    if lines.is_empty() {
        return Err(no_rows());
    }

    Ok(Figure::Slope(SlopeFigure {
        left_label: left.to_string(),
        right_label: right.to_string(),
        lines,
    }))
}
