//! Geometric layout for the charts that are not plain x/y plots.
//!
//! Everything here is pure so the viewer only has to map the results onto
//! screen coordinates.

use super::figure::{HierarchyNode, SankeyFigure, WordWeight};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn contains(&self, other: &Rect) -> bool {
        const EPS: f64 = 1e-9;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.x + other.w <= self.x + self.w + EPS
            && other.y + other.h <= self.y + self.h + EPS
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && other.x < self.x + self.w
            && self.y < other.y + other.h
            && other.y < self.y + self.h
    }

    fn inset(&self, pad: f64) -> Rect {
        let pad = pad.min(self.w / 4.0).min(self.h / 4.0).max(0.0);
        Rect::new(self.x + pad, self.y + pad, self.w - 2.0 * pad, self.h - 2.0 * pad)
    }
}

/// A treemap rectangle. `branch` is the index of the top-level ancestor.
#[derive(Debug, Clone, PartialEq)]
pub struct Tile {
    pub rect: Rect,
    pub label: String,
    pub value: f64,
    pub depth: usize,
    pub branch: usize,
    pub is_leaf: bool,
}

/// Slice-and-dice treemap: each level alternates between splitting along
/// x and along y, proportional to node values. Children sit inside their
/// parent inset by `pad`.
pub fn treemap_tiles(root: &HierarchyNode, bounds: Rect, pad: f64) -> Vec<Tile> {
    let mut tiles = Vec::new();
    place_children(root, bounds, 1, None, pad, &mut tiles);
    tiles
}

fn place_children(
    node: &HierarchyNode,
    rect: Rect,
    depth: usize,
    branch: Option<usize>,
    pad: f64,
    tiles: &mut Vec<Tile>,
) {
    let children: Vec<&HierarchyNode> = node.children.iter().filter(|c| c.value > 0.0).collect();
    let total: f64 = children.iter().map(|c| c.value).sum();
    if total <= 0.0 {
        return;
    }

    let horizontal = depth % 2 == 1;
    let mut offset = 0.0;
    for (i, child) in children.into_iter().enumerate() {
        let share = child.value / total;
        let child_rect = if horizontal {
            Rect::new(rect.x + offset * rect.w, rect.y, share * rect.w, rect.h)
        } else {
            Rect::new(rect.x, rect.y + offset * rect.h, rect.w, share * rect.h)
        };
        offset += share;

        let branch = branch.unwrap_or(i);
        tiles.push(Tile {
            rect: child_rect,
            label: child.label.clone(),
            value: child.value,
            depth,
            branch,
            is_leaf: child.children.is_empty(),
        });
        place_children(child, child_rect.inset(pad), depth + 1, Some(branch), pad, tiles);
    }
}

/// A sunburst ring segment. Angles are fractions of a full turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    pub label: String,
    pub value: f64,
    pub depth: usize,
    pub start: f64,
    pub end: f64,
    pub branch: usize,
}

pub fn sunburst_arcs(root: &HierarchyNode) -> Vec<Arc> {
    let mut arcs = Vec::new();
    place_arcs(root, 0.0, 1.0, 1, None, &mut arcs);
    arcs
}

fn place_arcs(
    node: &HierarchyNode,
    start: f64,
    end: f64,
    depth: usize,
    branch: Option<usize>,
    arcs: &mut Vec<Arc>,
) {
    let children: Vec<&HierarchyNode> = node.children.iter().filter(|c| c.value > 0.0).collect();
    let total: f64 = children.iter().map(|c| c.value).sum();
    if total <= 0.0 {
        return;
    }

    let span = end - start;
    let mut cursor = start;
    for (i, child) in children.into_iter().enumerate() {
        let next = cursor + span * child.value / total;
        let branch = branch.unwrap_or(i);
        arcs.push(Arc {
            label: child.label.clone(),
            value: child.value,
            depth,
            start: cursor,
            end: next,
            branch,
        });
        place_arcs(child, cursor, next, depth + 1, Some(branch), arcs);
        cursor = next;
    }
}

/// Node rectangle in unit space: x in [0, 1], y in [0, 1] top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct SankeyNode {
    pub label: String,
    pub column: usize,
    pub x: f64,
    pub y0: f64,
    pub y1: f64,
}

/// A link drawn as a band from `source` to `target` node.
#[derive(Debug, Clone, PartialEq)]
pub struct SankeyBand {
    pub source: usize,
    pub target: usize,
    pub value: f64,
    pub source_span: (f64, f64),
    pub target_span: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SankeyLayout {
    pub nodes: Vec<SankeyNode>,
    pub bands: Vec<SankeyBand>,
}

const SANKEY_GAP: f64 = 0.04;

pub fn sankey_layout(figure: &SankeyFigure) -> SankeyLayout {
    let n = figure.labels.len();

    // Longest path from the sources; cycles stop at n - 1.
    let mut column = vec![0usize; n];
    for _ in 0..n {
        let mut changed = false;
        for link in &figure.links {
            if link.source == link.target {
                continue;
            }
            let candidate = (column[link.source] + 1).min(n.saturating_sub(1));
            if column[link.target] < candidate {
                column[link.target] = candidate;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    let max_column = column.iter().copied().max().unwrap_or(0);

    let mut inflow = vec![0.0; n];
    let mut outflow = vec![0.0; n];
    for link in &figure.links {
        outflow[link.source] += link.value;
        inflow[link.target] += link.value;
    }
    let throughput: Vec<f64> = (0..n).map(|i| inflow[i].max(outflow[i])).collect();

    // One scale for all columns so equal flows have equal heights.
    let scale = (0..=max_column)
        .filter_map(|c| {
            let members: Vec<usize> = (0..n).filter(|&i| column[i] == c).collect();
            if members.is_empty() {
                return None;
            }
            let total: f64 = members.iter().map(|&i| throughput[i]).sum();
            let room = 1.0 - SANKEY_GAP * (members.len() - 1) as f64;
            (total > 0.0).then(|| room.max(0.1) / total)
        })
        .fold(f64::INFINITY, f64::min);
    let scale = if scale.is_finite() { scale } else { 0.0 };

    let mut nodes = Vec::with_capacity(n);
    let mut next_y = vec![0.0; max_column + 1];
    for i in 0..n {
        let c = column[i];
        let y0 = next_y[c];
        let y1 = y0 + throughput[i] * scale;
        next_y[c] = y1 + SANKEY_GAP;
        nodes.push(SankeyNode {
            label: figure.labels[i].clone(),
            column: c,
            x: if max_column == 0 {
                0.0
            } else {
                c as f64 / max_column as f64
            },
            y0,
            y1,
        });
    }

    let mut out_cursor: Vec<f64> = nodes.iter().map(|node| node.y0).collect();
    let mut in_cursor = out_cursor.clone();
    let bands = figure
        .links
        .iter()
        .map(|link| {
            let h = link.value * scale;
            let source_span = (out_cursor[link.source], out_cursor[link.source] + h);
            out_cursor[link.source] += h;
            let target_span = (in_cursor[link.target], in_cursor[link.target] + h);
            in_cursor[link.target] += h;
            SankeyBand {
                source: link.source,
                target: link.target,
                value: link.value,
                source_span,
                target_span,
            }
        })
        .collect();

    SankeyLayout { nodes, bands }
}

/// A positioned word. `rect` is centred on the word, in the layout's units.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedWord {
    pub word: String,
    pub font_size: f64,
    pub rect: Rect,
    pub rank: usize,
}

pub const MIN_FONT: f64 = 11.0;
pub const MAX_FONT: f64 = 64.0;

/// Approximate text box for a proportional font.
pub fn text_box(word: &str, font_size: f64) -> (f64, f64) {
    (word.chars().count() as f64 * font_size * 0.58, font_size * 1.15)
}

/// Spiral placement from the centre outwards, largest words first.
/// Words that find no free spot inside `width` x `height` are dropped.
pub fn word_cloud_layout(words: &[WordWeight], width: f64, height: f64) -> Vec<PlacedWord> {
    let bounds = Rect::new(0.0, 0.0, width, height);
    let max_count = words.iter().map(|w| w.count).max().unwrap_or(1).max(1) as f64;
    let mut placed: Vec<PlacedWord> = Vec::new();

    for (rank, weight) in words.iter().enumerate() {
        let ratio = weight.count as f64 / max_count;
        let mut font_size = MIN_FONT + (MAX_FONT - MIN_FONT) * ratio;

        // Shrink oversized words until they fit the canvas at all.
        let (mut w, mut h) = text_box(&weight.word, font_size);
        while (w > width || h > height) && font_size > MIN_FONT {
            font_size = (font_size * 0.8).max(MIN_FONT);
            (w, h) = text_box(&weight.word, font_size);
        }

        let spot = (0..4000).find_map(|step| {
            let t = step as f64 * 0.1;
            let r = 1.5 * t;
            let cx = width / 2.0 + r * t.cos();
            let cy = height / 2.0 + r * t.sin() * (height / width).max(0.3);
            let rect = Rect::new(cx - w / 2.0, cy - h / 2.0, w, h);
            let free = bounds.contains(&rect) && placed.iter().all(|p| !p.rect.intersects(&rect));
            free.then_some(rect)
        });

        if let Some(rect) = spot {
            placed.push(PlacedWord {
                word: weight.word.clone(),
                font_size,
                rect,
                rank,
            });
        }
    }
    placed
}

/// Orthographic projection of a point already normalized to [-1, 1]^3.
/// `yaw` turns around the vertical axis, `pitch` tilts towards the viewer.
pub fn project_3d(p: [f64; 3], yaw: f64, pitch: f64) -> [f64; 2] {
    let [x, y, z] = p;
    let sx = x * yaw.cos() - y * yaw.sin();
    let depth = x * yaw.sin() + y * yaw.cos();
    let sy = z * pitch.cos() + depth * pitch.sin();
    [sx, sy]
}

/// Map `v` from `[lo, hi]` to `[-1, 1]`; a flat range maps to 0.
pub fn normalize(v: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        (v - lo) / (hi - lo) * 2.0 - 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::figure::SankeyLink;

    fn tree() -> HierarchyNode {
        let mut root = HierarchyNode::new("");
        root.value = 10.0;
        let mut a = HierarchyNode::new("a");
        a.value = 6.0;
        let mut a1 = HierarchyNode::new("a1");
        a1.value = 2.0;
        let mut a2 = HierarchyNode::new("a2");
        a2.value = 4.0;
        a.children = vec![a1, a2];
        let mut b = HierarchyNode::new("b");
        b.value = 4.0;
        root.children = vec![a, b];
        root
    }

    #[test]
    fn treemap_areas_are_proportional() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 50.0);
        let tiles = treemap_tiles(&tree(), bounds, 0.0);

        assert_eq!(tiles.len(), 4);
        let top: Vec<&Tile> = tiles.iter().filter(|t| t.depth == 1).collect();
        assert_eq!(top.len(), 2);
        assert!((top[0].rect.area() - 0.6 * bounds.area()).abs() < 1e-9);
        assert!((top[1].rect.area() - 0.4 * bounds.area()).abs() < 1e-9);

        for tile in &tiles {
            assert!(bounds.contains(&tile.rect));
        }
        let mut leaves = tiles.iter().filter(|t| t.label.starts_with('a') && t.depth == 2);
        assert!(leaves.all(|t| t.branch == 0 && t.is_leaf));
    }

    #[test]
    fn treemap_children_stay_inside_padded_parent() {
        let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
        let tiles = treemap_tiles(&tree(), bounds, 2.0);
        let parent = tiles.iter().find(|t| t.label == "a").unwrap();
        for child in tiles.iter().filter(|t| t.depth == 2) {
            assert!(parent.rect.contains(&child.rect));
        }
    }

    #[test]
    fn sunburst_spans_full_turn_per_ring() {
        let arcs = sunburst_arcs(&tree());
        let ring1: f64 = arcs.iter().filter(|a| a.depth == 1).map(|a| a.end - a.start).sum();
        assert!((ring1 - 1.0).abs() < 1e-12);

        let a = arcs.iter().find(|a| a.label == "a").unwrap();
        let inner: Vec<&Arc> = arcs.iter().filter(|x| x.depth == 2).collect();
        assert!((inner[0].start - a.start).abs() < 1e-12);
        assert!((inner[1].end - a.end).abs() < 1e-12);
    }

    #[test]
    fn sankey_layout_columns_follow_links() {
        let figure = SankeyFigure {
            labels: vec!["A".into(), "B".into(), "C".into()],
            links: vec![
                SankeyLink {
                    source: 0,
                    target: 1,
                    value: 8.0,
                },
                SankeyLink {
                    source: 0,
                    target: 2,
                    value: 2.0,
                },
            ],
        };
        let layout = sankey_layout(&figure);

        assert_eq!(layout.nodes[0].column, 0);
        assert_eq!(layout.nodes[1].column, 1);
        assert_eq!(layout.nodes[2].column, 1);
        assert_eq!(layout.nodes[0].x, 0.0);
        assert_eq!(layout.nodes[1].x, 1.0);
        for node in &layout.nodes {
            assert!(node.y0 >= 0.0 && node.y1 <= 1.0 + 1e-9);
        }

        let b = &layout.bands[0];
        let c = &layout.bands[1];
        assert!((b.source_span.1 - b.source_span.0) > (c.source_span.1 - c.source_span.0));
        assert!((b.source_span.1 - c.source_span.0).abs() < 1e-12);
    }

    #[test]
    fn sankey_layout_survives_cycles() {
        let figure = SankeyFigure {
            labels: vec!["A".into(), "B".into()],
            links: vec![
                SankeyLink {
                    source: 0,
                    target: 1,
                    value: 1.0,
                },
                SankeyLink {
                    source: 1,
                    target: 0,
                    value: 1.0,
                },
            ],
        };
        let layout = sankey_layout(&figure);
        assert_eq!(layout.nodes.len(), 2);
        assert!(layout.nodes.iter().all(|n| n.column <= 1));
    }

    #[test]
    fn word_cloud_words_do_not_overlap() {
        let words: Vec<WordWeight> = ["Visualization", "Data", "AI", "Plotly", "Python"]
            .iter()
            .enumerate()
            .map(|(i, w)| WordWeight {
                word: w.to_string(),
                count: 10 - i,
            })
            .collect();
        let bounds = Rect::new(0.0, 0.0, 600.0, 300.0);
        let placed = word_cloud_layout(&words, bounds.w, bounds.h);

        assert_eq!(placed.len(), words.len());
        assert!(placed[0].font_size > placed[4].font_size);
        for (i, a) in placed.iter().enumerate() {
            assert!(bounds.contains(&a.rect));
            for b in &placed[i + 1..] {
                assert!(!a.rect.intersects(&b.rect));
            }
        }
    }

    #[test]
    fn projection_without_rotation_shows_x_and_z() {
        assert_eq!(project_3d([0.5, 0.9, -0.25], 0.0, 0.0), [0.5, -0.25]);
        assert_eq!(normalize(5.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(3.0, 3.0, 3.0), 0.0);
    }
}
