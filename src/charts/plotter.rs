//! Chart Plotter Module
//! Draws figures with egui_plot, or directly with the painter for charts
//! that have no axes.

use super::builders::format_value;
use super::figure::*;
use super::layout::{self, PlacedWord, Rect};
use egui::{Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke};
use egui_plot::{
    Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Polygon, Text,
};
use std::f64::consts::{PI, TAU};
use std::ops::RangeInclusive;

/// Color for single-series charts
pub const SERIES_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(255, 87, 34),  // Deep Orange
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

const PLOT_HEIGHT: f32 = 460.0;
const FRAME_SECONDS: f64 = 0.8;

/// Per-figure interaction state: 3D rotation, bubble animation and the
/// word-cloud placement for the current canvas size.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub yaw: f64,
    pub pitch: f64,
    pub frame: usize,
    pub playing: bool,
    last_step: Option<f64>,
    word_layout: Option<((u32, u32), Vec<PlacedWord>)>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.45,
            frame: 0,
            playing: false,
            last_step: None,
            word_layout: None,
        }
    }
}

impl ViewState {
    /// Advance the animation frame when enough time has passed.
    pub fn tick(&mut self, now: f64, frame_count: usize) {
        if !self.playing || frame_count == 0 {
            self.last_step = None;
            return;
        }
        match self.last_step {
            Some(last) if now - last < FRAME_SECONDS => {}
            Some(_) => {
                self.frame = (self.frame + 1) % frame_count;
                self.last_step = Some(now);
            }
            None => self.last_step = Some(now),
        }
    }

    /// Word positions for a canvas of `width` x `height` pixels.
    ///
    /// The spiral placement runs once per canvas size; the view is replaced
    /// on every new figure, so the words never go stale.
    pub fn placed_words(&mut self, words: &[WordWeight], width: f32, height: f32) -> &[PlacedWord] {
        let size = (width.round().max(0.0) as u32, height.round().max(0.0) as u32);
        let stale = !matches!(&self.word_layout, Some((cached, _)) if *cached == size);
        if stale {
            log::debug!("Laying out {} words for {}x{}", words.len(), size.0, size.1);
            let placed = layout::word_cloud_layout(words, size.0 as f64, size.1 as f64);
            self.word_layout = Some((size, placed));
        }
        self.word_layout
            .as_ref()
            .map(|(_, placed)| placed.as_slice())
            .unwrap_or(&[])
    }
}

/// Draws figures into an egui `Ui`.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Get color for the n-th group or series.
    pub fn group_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    pub fn draw(ui: &mut egui::Ui, figure: &Figure, view: &mut ViewState) {
        match figure {
            Figure::Bar(f) => Self::draw_bar(ui, f),
            Figure::Line(f) => Self::draw_line(ui, f),
            Figure::Scatter(f) => Self::draw_scatter(ui, f),
            Figure::Pie(f) => Self::draw_pie(ui, f),
            Figure::Histogram(f) => Self::draw_histogram(ui, f),
            Figure::WordCloud(f) => Self::draw_word_cloud(ui, f, view),
            Figure::Heatmap(f) => Self::draw_heatmap(ui, f),
            Figure::Radar(f) => Self::draw_radar(ui, f),
            Figure::Scatter3d(f) => Self::draw_scatter_3d(ui, f, view),
            Figure::AnimatedBubble(f) => Self::draw_bubbles(ui, f, view),
            Figure::Gauge(f) => Self::draw_gauge(ui, f),
            Figure::Treemap(f) => Self::draw_treemap(ui, f),
            Figure::Sunburst(f) => Self::draw_sunburst(ui, f),
            Figure::Sankey(f) => Self::draw_sankey(ui, f),
            Figure::ParallelCoordinates(f) => Self::draw_parallel(ui, f),
            Figure::Dumbbell(f) => Self::draw_dumbbell(ui, f),
            Figure::Slope(f) => Self::draw_slope(ui, f),
        }
    }

    /// Axis formatter that prints category labels at integer positions.
    fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
        move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        }
    }

    fn legend_row(ui: &mut egui::Ui, names: &[&str]) {
        if names.len() < 2 {
            return;
        }
        ui.horizontal_wrapped(|ui| {
            for (i, name) in names.iter().enumerate() {
                let (rect, _) = ui.allocate_exact_size(egui::vec2(12.0, 12.0), Sense::hover());
                ui.painter().rect_filled(rect, 2.0, Self::group_color(i));
                ui.label(RichText::new(*name).size(12.0));
                ui.add_space(8.0);
            }
        });
    }

    fn draw_bar(ui: &mut egui::Ui, fig: &BarFigure) {
        let labels: Vec<String> = fig.bars.iter().map(|b| b.label.clone()).collect();
        let bars: Vec<Bar> = fig
            .bars
            .iter()
            .enumerate()
            .map(|(i, c)| {
                Bar::new(i as f64, c.value)
                    .width(0.7)
                    .name(&c.label)
                    .fill(SERIES_COLOR)
            })
            .collect();

        Plot::new("bar_chart")
            .height(PLOT_HEIGHT)
            .x_axis_label(&fig.x_label)
            .y_axis_label(&fig.y_label)
            .x_axis_formatter(Self::category_axis(labels))
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(SERIES_COLOR).name(&fig.y_label));
            });
    }

    fn draw_line(ui: &mut egui::Ui, fig: &LineFigure) {
        Plot::new("line_chart")
            .height(PLOT_HEIGHT)
            .x_axis_label(&fig.x_label)
            .y_axis_label(&fig.y_label)
            .legend(Legend::default())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (i, series) in fig.series.iter().enumerate() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(series.points.clone()))
                            .color(Self::group_color(i))
                            .width(1.5)
                            .name(&series.name),
                    );
                }
            });
    }

    fn draw_scatter(ui: &mut egui::Ui, fig: &ScatterFigure) {
        let radius = |size: Option<f64>| match (size, fig.size_range) {
            (Some(s), Some((lo, hi))) => 3.0 + 9.0 * ((layout::normalize(s, lo, hi) + 1.0) / 2.0),
            _ => 3.5,
        };

        Plot::new("scatter_chart")
            .height(PLOT_HEIGHT)
            .x_axis_label(&fig.x_label)
            .y_axis_label(&fig.y_label)
            .legend(Legend::default())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (i, group) in fig.groups.iter().enumerate() {
                    let color = Self::group_color(i);
                    if fig.size_range.is_none() {
                        let points: PlotPoints = group.points.iter().map(|p| [p.x, p.y]).collect();
                        plot_ui.points(Points::new(points).radius(3.5).color(color).name(&group.name));
                        continue;
                    }
                    // Points share one radius per item, so sized markers go one by one.
                    for p in &group.points {
                        plot_ui.points(
                            Points::new(vec![[p.x, p.y]])
                                .radius(radius(p.size) as f32)
                                .color(color.gamma_multiply(0.7))
                                .name(&group.name),
                        );
                    }
                }
            });
    }

    fn draw_histogram(ui: &mut egui::Ui, fig: &HistogramFigure) {
        let bars: Vec<Bar> = fig
            .bins
            .iter()
            .map(|b| {
                let width = (b.end - b.start).max(f64::EPSILON);
                Bar::new((b.start + b.end) / 2.0, b.count as f64)
                    .width(width)
                    .fill(SERIES_COLOR.gamma_multiply(0.8))
                    .stroke(Stroke::new(1.0, SERIES_COLOR))
            })
            .collect();

        Plot::new("histogram_chart")
            .height(PLOT_HEIGHT)
            .x_axis_label(&fig.column)
            .y_axis_label("Count")
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name(&fig.column));
            });
    }

    fn draw_radar(ui: &mut egui::Ui, fig: &RadarFigure) {
        let n = fig.axes.len().max(1);
        let max = fig.values.iter().cloned().fold(0.0_f64, f64::max).max(f64::EPSILON);
        let angle = |i: usize| TAU * i as f64 / n as f64 + std::f64::consts::FRAC_PI_2;
        let polar = |i: usize, r: f64| [r * angle(i).cos(), r * angle(i).sin()];

        Plot::new("radar_chart")
            .height(PLOT_HEIGHT)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for ring in [0.25, 0.5, 0.75, 1.0] {
                    let circle: PlotPoints = (0..=n).map(|i| polar(i % n, ring)).collect();
                    plot_ui.line(Line::new(circle).color(Color32::GRAY).width(0.5));
                }
                for (i, name) in fig.axes.iter().enumerate() {
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[0.0, 0.0], polar(i, 1.0)]))
                            .color(Color32::GRAY)
                            .width(0.5),
                    );
                    let [x, y] = polar(i, 1.12);
                    plot_ui.text(Text::new(PlotPoint::new(x, y), name.as_str()));
                }

                let shape: PlotPoints = fig
                    .values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| polar(i, v.max(0.0) / max))
                    .collect();
                plot_ui.polygon(
                    Polygon::new(shape)
                        .fill_color(SERIES_COLOR.gamma_multiply(0.35))
                        .stroke(Stroke::new(2.0, SERIES_COLOR))
                        .name("Mean"),
                );
            });
    }

    fn draw_scatter_3d(ui: &mut egui::Ui, fig: &Scatter3dFigure, view: &mut ViewState) {
        ui.horizontal(|ui| {
            ui.label("Rotate");
            ui.add(egui::Slider::new(&mut view.yaw, -PI..=PI).show_value(false));
            ui.label("Tilt");
            ui.add(egui::Slider::new(&mut view.pitch, -1.5..=1.5).show_value(false));
        });

        let mut lo = [f64::INFINITY; 3];
        let mut hi = [f64::NEG_INFINITY; 3];
        for p in fig.groups.iter().flat_map(|g| g.points.iter()) {
            for k in 0..3 {
                lo[k] = lo[k].min(p[k]);
                hi[k] = hi[k].max(p[k]);
            }
        }
        let unit = |p: &[f64; 3]| {
            [
                layout::normalize(p[0], lo[0], hi[0]),
                layout::normalize(p[1], lo[1], hi[1]),
                layout::normalize(p[2], lo[2], hi[2]),
            ]
        };
        let (yaw, pitch) = (view.yaw, view.pitch);
        let project = |p: [f64; 3]| layout::project_3d(p, yaw, pitch);

        Plot::new("scatter_3d_chart")
            .height(PLOT_HEIGHT)
            .data_aspect(1.0)
            .show_axes(false)
            .show_grid(false)
            .allow_drag(false)
            .allow_scroll(false)
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                let origin = [-1.0, -1.0, -1.0];
                let ends = [[1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [-1.0, -1.0, 1.0]];
                for (end, label) in ends.iter().zip(fig.axis_labels.iter()) {
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![project(origin), project(*end)]))
                            .color(Color32::GRAY)
                            .width(1.0),
                    );
                    let [x, y] = project(*end);
                    plot_ui.text(Text::new(PlotPoint::new(x, y), label.as_str()));
                }
                for (i, group) in fig.groups.iter().enumerate() {
                    let points: PlotPoints = group.points.iter().map(|p| project(unit(p))).collect();
                    plot_ui.points(
                        Points::new(points)
                            .radius(3.5)
                            .color(Self::group_color(i))
                            .name(&group.name),
                    );
                }
            });
    }

    fn draw_bubbles(ui: &mut egui::Ui, fig: &BubbleFigure, view: &mut ViewState) {
        let frames = fig.frames.len();
        if frames == 0 {
            return;
        }
        view.tick(ui.input(|i| i.time), frames);
        view.frame = view.frame.min(frames - 1);

        ui.horizontal(|ui| {
            let label = if view.playing { "⏸ Pause" } else { "▶ Play" };
            if ui.button(label).clicked() {
                view.playing = !view.playing;
            }
            ui.add(egui::Slider::new(&mut view.frame, 0..=frames - 1).show_value(false));
            ui.label(format!(
                "{}: {}",
                fig.frame_label, fig.frames[view.frame].label
            ));
        });
        if view.playing {
            ui.ctx().request_repaint();
        }

        let frame = &fig.frames[view.frame];
        let (slo, shi) = fig.size_range;
        Plot::new("bubble_chart")
            .height(PLOT_HEIGHT)
            .x_axis_label(&fig.x_label)
            .y_axis_label(&fig.y_label)
            .include_x(fig.x_range.0)
            .include_x(fig.x_range.1)
            .include_y(fig.y_range.0)
            .include_y(fig.y_range.1)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (i, b) in frame.bubbles.iter().enumerate() {
                    let r = 4.0 + 14.0 * (layout::normalize(b.size, slo, shi) + 1.0) / 2.0;
                    plot_ui.points(
                        Points::new(vec![[b.x, b.y]])
                            .radius(r as f32)
                            .color(Self::group_color(i).gamma_multiply(0.6)),
                    );
                }
            });
    }

    fn draw_parallel(ui: &mut egui::Ui, fig: &ParallelFigure) {
        let labels: Vec<String> = fig.axes.iter().map(|a| a.name.clone()).collect();
        Plot::new("parallel_chart")
            .height(PLOT_HEIGHT)
            .x_axis_formatter(Self::category_axis(labels))
            .y_axis_formatter(|_, _| String::new())
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (i, axis) in fig.axes.iter().enumerate() {
                    let x = i as f64;
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[x, -1.0], [x, 1.0]]))
                            .color(Color32::GRAY)
                            .width(1.0),
                    );
                    plot_ui.text(Text::new(PlotPoint::new(x, 1.08), format_value(axis.max)));
                    plot_ui.text(Text::new(PlotPoint::new(x, -1.08), format_value(axis.min)));
                }
                for line in &fig.lines {
                    let points: PlotPoints = line
                        .iter()
                        .zip(fig.axes.iter())
                        .enumerate()
                        .map(|(i, (v, axis))| [i as f64, layout::normalize(*v, axis.min, axis.max)])
                        .collect();
                    plot_ui.line(
                        Line::new(points)
                            .color(SERIES_COLOR.gamma_multiply(0.35))
                            .width(1.0),
                    );
                }
            });
    }

    fn draw_dumbbell(ui: &mut egui::Ui, fig: &DumbbellFigure) {
        let labels: Vec<String> = fig.rows.iter().map(|r| r.category.clone()).collect();
        let first_color = Self::group_color(0);
        let second_color = Self::group_color(1);
        Self::legend_row(ui, &[fig.first_label.as_str(), fig.second_label.as_str()]);

        Plot::new("dumbbell_chart")
            .height(PLOT_HEIGHT)
            .y_axis_label(&fig.category_label)
            .y_axis_formatter(Self::category_axis(labels))
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (i, row) in fig.rows.iter().enumerate() {
                    let y = i as f64;
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[row.first, y], [row.second, y]]))
                            .color(Color32::GRAY)
                            .width(2.0),
                    );
                }
                let firsts: PlotPoints = fig
                    .rows
                    .iter()
                    .enumerate()
                    .map(|(i, r)| [r.first, i as f64])
                    .collect();
                let seconds: PlotPoints = fig
                    .rows
                    .iter()
                    .enumerate()
                    .map(|(i, r)| [r.second, i as f64])
                    .collect();
                plot_ui.points(Points::new(firsts).radius(6.0).color(first_color).name(&fig.first_label));
                plot_ui.points(
                    Points::new(seconds)
                        .radius(6.0)
                        .color(second_color)
                        .name(&fig.second_label),
                );
            });
    }

    fn draw_slope(ui: &mut egui::Ui, fig: &SlopeFigure) {
        let labels = vec![fig.left_label.clone(), fig.right_label.clone()];
        Plot::new("slope_chart")
            .height(PLOT_HEIGHT)
            .x_axis_formatter(Self::category_axis(labels))
            .include_x(-0.4)
            .include_x(1.4)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                for (i, line) in fig.lines.iter().enumerate() {
                    let color = Self::group_color(i);
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[0.0, line.left], [1.0, line.right]]))
                            .color(color)
                            .width(2.0)
                            .name(&line.label),
                    );
                    plot_ui.points(
                        Points::new(vec![[0.0, line.left], [1.0, line.right]])
                            .radius(4.0)
                            .color(color),
                    );
                    plot_ui.text(
                        Text::new(PlotPoint::new(-0.05, line.left), line.label.as_str())
                            .anchor(Align2::RIGHT_CENTER),
                    );
                    plot_ui.text(
                        Text::new(PlotPoint::new(1.05, line.right), format_value(line.right))
                            .anchor(Align2::LEFT_CENTER),
                    );
                }
            });
    }

    // ===== Painter-drawn charts =====

    fn canvas(ui: &mut egui::Ui) -> (egui::Rect, egui::Painter) {
        let size = egui::vec2(ui.available_width(), PLOT_HEIGHT);
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        (response.rect, painter)
    }

    fn to_screen(area: egui::Rect, r: &Rect) -> egui::Rect {
        egui::Rect::from_min_size(
            Pos2::new(area.min.x + r.x as f32, area.min.y + r.y as f32),
            egui::vec2(r.w as f32, r.h as f32),
        )
    }

    /// Annular sector split into convex quads; egui only fills convex shapes.
    fn annular_sector(
        painter: &egui::Painter,
        center: Pos2,
        (r0, r1): (f32, f32),
        (start, end): (f64, f64),
        fill: Color32,
    ) {
        let steps = (((end - start) * 96.0).ceil() as usize).max(1);
        let at = |t: f64, r: f32| {
            let a = (t * TAU - std::f64::consts::FRAC_PI_2) as f32;
            center + egui::vec2(a.cos(), a.sin()) * r
        };
        for s in 0..steps {
            let t0 = start + (end - start) * s as f64 / steps as f64;
            let t1 = start + (end - start) * (s + 1) as f64 / steps as f64;
            let quad = vec![at(t0, r0), at(t0, r1), at(t1, r1), at(t1, r0)];
            painter.add(Shape::convex_polygon(quad, fill, Stroke::NONE));
        }
    }

    fn draw_pie(ui: &mut egui::Ui, fig: &PieFigure) {
        let (area, painter) = Self::canvas(ui);
        let total = fig.total();
        if total <= 0.0 {
            return;
        }
        let radius = area.height().min(area.width()) * 0.42;
        let center = area.center();
        let mut cursor = 0.0;
        for (i, slice) in fig.slices.iter().enumerate() {
            let share = slice.value / total;
            let color = Self::group_color(i);
            Self::annular_sector(&painter, center, (0.0, radius), (cursor, cursor + share), color);

            let mid = ((cursor + share / 2.0) * TAU - std::f64::consts::FRAC_PI_2) as f32;
            let pos = center + egui::vec2(mid.cos(), mid.sin()) * radius * 1.12;
            let align = if mid.cos() >= 0.0 {
                Align2::LEFT_CENTER
            } else {
                Align2::RIGHT_CENTER
            };
            painter.text(
                pos,
                align,
                format!("{} ({:.1}%)", slice.label, share * 100.0),
                FontId::proportional(12.0),
                ui.visuals().text_color(),
            );
            cursor += share;
        }
    }

    fn draw_gauge(ui: &mut egui::Ui, fig: &GaugeFigure) {
        let (area, painter) = Self::canvas(ui);
        let radius = (area.width() / 2.0).min(area.height() * 0.8) * 0.85;
        let center = Pos2::new(area.center().x, area.min.y + area.height() * 0.75);
        let span = (fig.max - fig.min).max(f64::EPSILON);
        let share = ((fig.value - fig.min) / span).clamp(0.0, 1.0);

        // The dial is the upper half circle, running from -0.25 to 0.25 of a turn.
        let track = ui.visuals().widgets.noninteractive.bg_fill;
        Self::annular_sector(&painter, center, (radius * 0.7, radius), (-0.25, 0.25), track);
        Self::annular_sector(
            &painter,
            center,
            (radius * 0.7, radius),
            (-0.25, -0.25 + 0.5 * share),
            SERIES_COLOR,
        );

        let text_color = ui.visuals().text_color();
        painter.text(
            center - egui::vec2(0.0, radius * 0.25),
            Align2::CENTER_CENTER,
            format_value(fig.value),
            FontId::proportional(36.0),
            text_color,
        );
        painter.text(
            center + egui::vec2(0.0, 24.0),
            Align2::CENTER_CENTER,
            format!("Average {}", fig.metric),
            FontId::proportional(16.0),
            text_color,
        );
        for (x, v) in [(-radius * 0.85, fig.min), (radius * 0.85, fig.max)] {
            painter.text(
                center + egui::vec2(x, 14.0),
                Align2::CENTER_CENTER,
                format_value(v),
                FontId::proportional(12.0),
                Color32::GRAY,
            );
        }
    }

    fn draw_word_cloud(ui: &mut egui::Ui, fig: &WordCloudFigure, view: &mut ViewState) {
        let (area, painter) = Self::canvas(ui);
        for word in view.placed_words(&fig.words, area.width(), area.height()) {
            let rect = Self::to_screen(area, &word.rect);
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                &word.word,
                FontId::proportional(word.font_size as f32),
                Self::group_color(word.rank),
            );
        }
    }

    fn draw_heatmap(ui: &mut egui::Ui, fig: &HeatmapFigure) {
        let (area, painter) = Self::canvas(ui);
        let n = fig.labels.len();
        if n == 0 {
            return;
        }
        let margin = 110.0;
        let cell = ((area.width() - margin).min(area.height() - margin) / n as f32).max(4.0);
        let origin = area.min + egui::vec2(margin, 10.0);
        let text_color = ui.visuals().text_color();

        for (i, row) in fig.matrix.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                let min = origin + egui::vec2(j as f32 * cell, i as f32 * cell);
                let rect = egui::Rect::from_min_size(min, egui::vec2(cell, cell));
                painter.rect_filled(rect.shrink(1.0), 0.0, Self::diverging(*value));
                let text = if value.is_nan() {
                    "-".to_string()
                } else {
                    format!("{:.2}", value)
                };
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    text,
                    FontId::proportional(11.0),
                    Color32::BLACK,
                );
            }
        }
        for (i, label) in fig.labels.iter().enumerate() {
            let y = origin.y + (i as f32 + 0.5) * cell;
            painter.text(
                Pos2::new(origin.x - 6.0, y),
                Align2::RIGHT_CENTER,
                label,
                FontId::proportional(12.0),
                text_color,
            );
            let x = origin.x + (i as f32 + 0.5) * cell;
            painter.text(
                Pos2::new(x, origin.y + n as f32 * cell + 6.0),
                Align2::CENTER_TOP,
                label,
                FontId::proportional(12.0),
                text_color,
            );
        }
    }

    /// Blue for -1, white for 0, red for +1; grey where undefined.
    fn diverging(value: f64) -> Color32 {
        if value.is_nan() {
            return Color32::from_gray(200);
        }
        let t = value.clamp(-1.0, 1.0) as f32;
        let lerp = |a: u8, b: u8, t: f32| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        let (r, g, b) = if t < 0.0 {
            (59, 76, 192)
        } else {
            (180, 4, 38)
        };
        let t = t.abs();
        Color32::from_rgb(lerp(245, r, t), lerp(245, g, t), lerp(245, b, t))
    }

    fn draw_treemap(ui: &mut egui::Ui, fig: &HierarchyFigure) {
        let (area, painter) = Self::canvas(ui);
        let bounds = Rect::new(0.0, 0.0, area.width() as f64, area.height() as f64);
        let tiles = layout::treemap_tiles(&fig.root, bounds, 3.0);
        // Tiles under a pixel cannot be seen.
        for tile in tiles.iter().filter(|t| t.rect.area() >= 1.0) {
            let rect = Self::to_screen(area, &tile.rect);
            let shade = 1.0 - 0.18 * tile.depth.saturating_sub(1) as f32;
            let fill = Self::group_color(tile.branch).gamma_multiply(shade.max(0.4));
            painter.rect(rect, 2.0, fill, Stroke::new(1.0, Color32::WHITE));

            let (w, h) = layout::text_box(&tile.label, 12.0);
            if tile.is_leaf && (w as f32) < rect.width() && (h as f32) < rect.height() {
                painter.text(
                    rect.center(),
                    Align2::CENTER_CENTER,
                    &tile.label,
                    FontId::proportional(12.0),
                    Color32::WHITE,
                );
            } else if !tile.is_leaf && (h as f32) < rect.height() && (w as f32) < rect.width() {
                painter.text(
                    rect.min + egui::vec2(4.0, 2.0),
                    Align2::LEFT_TOP,
                    &tile.label,
                    FontId::proportional(11.0),
                    Color32::WHITE,
                );
            }
        }
        Self::hierarchy_caption(ui, fig);
    }

    fn draw_sunburst(ui: &mut egui::Ui, fig: &HierarchyFigure) {
        let (area, painter) = Self::canvas(ui);
        let arcs = layout::sunburst_arcs(&fig.root);
        let rings = fig.root.depth().saturating_sub(1).max(1) as f32;
        let radius = area.height().min(area.width()) * 0.46;
        let ring = radius / (rings + 0.5);
        let center = area.center();

        for arc in &arcs {
            let r0 = ring * (arc.depth as f32 - 0.5);
            let shade = 1.0 - 0.18 * arc.depth.saturating_sub(1) as f32;
            let fill = Self::group_color(arc.branch).gamma_multiply(shade.max(0.4));
            Self::annular_sector(&painter, center, (r0, r0 + ring - 1.0), (arc.start, arc.end), fill);

            if (arc.end - arc.start) * TAU * (r0 + ring / 2.0) as f64 > 40.0 {
                let mid = (((arc.start + arc.end) / 2.0) * TAU - std::f64::consts::FRAC_PI_2) as f32;
                let pos = center + egui::vec2(mid.cos(), mid.sin()) * (r0 + ring / 2.0);
                painter.text(
                    pos,
                    Align2::CENTER_CENTER,
                    &arc.label,
                    FontId::proportional(11.0),
                    Color32::WHITE,
                );
            }
        }
        Self::hierarchy_caption(ui, fig);
    }

    fn hierarchy_caption(ui: &mut egui::Ui, fig: &HierarchyFigure) {
        ui.label(
            RichText::new(format!(
                "{} by {} (total {})",
                fig.value_label,
                fig.levels.join(" › "),
                format_value(fig.root.value)
            ))
            .size(12.0)
            .color(Color32::GRAY),
        );
    }

    fn draw_sankey(ui: &mut egui::Ui, fig: &SankeyFigure) {
        let (area, painter) = Self::canvas(ui);
        let sankey = layout::sankey_layout(fig);
        let node_width = 14.0;
        let usable = egui::vec2(area.width() - 160.0 - node_width, area.height());
        let left = area.min.x + 80.0;
        let point = |x: f64, y: f64| Pos2::new(left + x as f32 * usable.x, area.min.y + y as f32 * usable.y);

        for band in &sankey.bands {
            let (Some(src), Some(dst)) = (sankey.nodes.get(band.source), sankey.nodes.get(band.target))
            else {
                continue;
            };
            let color = Self::group_color(band.source).gamma_multiply(0.35);
            let steps = 24;
            let x0 = src.x;
            let x1 = dst.x;
            // Smoothstep between the two spans, in thin vertical strips.
            for s in 0..steps {
                let t0 = s as f64 / steps as f64;
                let t1 = (s + 1) as f64 / steps as f64;
                let ease = |t: f64| t * t * (3.0 - 2.0 * t);
                let lerp = |a: f64, b: f64, t: f64| a + (b - a) * ease(t);
                let xa = x0 + (x1 - x0) * t0;
                let xb = x0 + (x1 - x0) * t1;
                let top_a = lerp(band.source_span.0, band.target_span.0, t0);
                let bot_a = lerp(band.source_span.1, band.target_span.1, t0);
                let top_b = lerp(band.source_span.0, band.target_span.0, t1);
                let bot_b = lerp(band.source_span.1, band.target_span.1, t1);
                let offset = egui::vec2(node_width, 0.0);
                let quad = vec![
                    point(xa, top_a) + offset * (1.0 - t0 as f32),
                    point(xb, top_b) + offset * (1.0 - t1 as f32),
                    point(xb, bot_b) + offset * (1.0 - t1 as f32),
                    point(xa, bot_a) + offset * (1.0 - t0 as f32),
                ];
                painter.add(Shape::convex_polygon(quad, color, Stroke::NONE));
            }
        }

        let text_color = ui.visuals().text_color();
        for (i, node) in sankey.nodes.iter().enumerate() {
            let min = point(node.x, node.y0);
            let max = point(node.x, node.y1) + egui::vec2(node_width, 0.0);
            let rect = egui::Rect::from_min_max(min, max);
            painter.rect_filled(rect, 1.0, Self::group_color(i));

            let (pos, align) = if node.x >= 0.5 {
                (rect.right_center() + egui::vec2(4.0, 0.0), Align2::LEFT_CENTER)
            } else {
                (rect.left_center() - egui::vec2(4.0, 0.0), Align2::RIGHT_CENTER)
            };
            painter.text(pos, align, &node.label, FontId::proportional(12.0), text_color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_wraps_around() {
        assert_eq!(ChartPlotter::group_color(0), ChartPlotter::group_color(PALETTE.len()));
        assert_ne!(ChartPlotter::group_color(0), ChartPlotter::group_color(1));
    }

    #[test]
    fn view_state_steps_frames_while_playing() {
        let mut view = ViewState::default();
        view.tick(0.0, 3);
        assert_eq!(view.frame, 0);

        view.playing = true;
        view.tick(1.0, 3);
        assert_eq!(view.frame, 0);
        view.tick(1.5, 3);
        assert_eq!(view.frame, 0);
        view.tick(2.0, 3);
        assert_eq!(view.frame, 1);
        view.tick(3.0, 3);
        view.tick(4.0, 3);
        assert_eq!(view.frame, 0);
    }

    #[test]
    fn word_layout_is_reused_until_the_canvas_resizes() {
        let weights = |pairs: &[(&str, usize)]| -> Vec<WordWeight> {
            pairs
                .iter()
                .map(|(w, c)| WordWeight {
                    word: w.to_string(),
                    count: *c,
                })
                .collect()
        };
        let first = weights(&[("alpha", 5), ("beta", 3)]);
        let other = weights(&[("gamma", 4)]);

        let mut view = ViewState::default();
        let placed = view.placed_words(&first, 400.0, 300.0).to_vec();
        assert_eq!(placed, layout::word_cloud_layout(&first, 400.0, 300.0));
        assert_eq!(placed[0].word, "alpha");

        // Same canvas (sub-pixel jitter included): no new placement.
        assert_eq!(view.placed_words(&other, 400.2, 299.9), placed.as_slice());

        let resized = view.placed_words(&other, 500.0, 300.0);
        assert_eq!(resized.len(), 1);
        assert_eq!(resized[0].word, "gamma");

        // A fresh view starts without a cached layout.
        assert_eq!(ViewState::default().word_layout, None);
    }

    #[test]
    fn diverging_scale_endpoints() {
        assert_eq!(ChartPlotter::diverging(0.0), Color32::from_rgb(245, 245, 245));
        assert_eq!(ChartPlotter::diverging(1.0), Color32::from_rgb(180, 4, 38));
        assert_eq!(ChartPlotter::diverging(-1.0), Color32::from_rgb(59, 76, 192));
        assert_eq!(ChartPlotter::diverging(f64::NAN), Color32::from_gray(200));
    }

    #[test]
    fn category_axis_labels_integer_marks_only() {
        let fmt = ChartPlotter::category_axis(vec!["A".into(), "B".into()]);
        let mark = |value| GridMark {
            value,
            step_size: 1.0,
        };
        assert_eq!(fmt(mark(1.0), &(0.0..=1.0)), "B");
        assert_eq!(fmt(mark(0.5), &(0.0..=1.0)), "");
        assert_eq!(fmt(mark(5.0), &(0.0..=1.0)), "");
    }
}
