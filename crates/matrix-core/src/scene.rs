// File: crates/matrix-core/src/scene.rs
// Summary: Retained scene handed to drawing surfaces: keyed nodes, keyed diffing, fade transitions.

use std::collections::HashSet;

use crate::config::ChartConfig;
use crate::geometry::{Rect, Segment};
use crate::layout::GridLayout;
use crate::types::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Cell,
    CountryLabel,
    TeamLabel,
    Axis,
    YearBadge,
    YearLabel,
    Header,
}

impl NodeKind {
    /// Class name used by the SVG output.
    pub fn class(&self) -> &'static str {
        match self {
            NodeKind::Cell => "cell",
            NodeKind::CountryLabel => "country-label",
            NodeKind::TeamLabel => "team-label",
            NodeKind::Axis => "main-axis",
            NodeKind::YearBadge => "year-badge",
            NodeKind::YearLabel => "year-label",
            NodeKind::Header => "x-label",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rect { rect: Rect, radius: f32 },
    /// Centered text; each line sits `line_height_em` below the previous one.
    Text { at: Point, lines: Vec<String>, size: f32, line_height_em: f32 },
    Line { segment: Segment, stroke_width: f32 },
}

/// Interpolated change a surface may play after presenting the node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    pub duration_ms: u64,
    pub delay_ms: u64,
    /// Starting opacity; `None` animates from whatever is currently shown.
    pub from_opacity: Option<f32>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneNode {
    pub key: String,
    pub kind: NodeKind,
    pub shape: Shape,
    pub fill: Option<String>,
    pub stroke: Option<String>,
    /// Final opacity once any transition has finished.
    pub opacity: f32,
    pub transition: Option<Transition>,
}

impl SceneNode {
    fn new(key: String, kind: NodeKind, shape: Shape) -> Self {
        Self { key, kind, shape, fill: None, stroke: None, opacity: 1.0, transition: None }
    }

    fn fill(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(color.into());
        self
    }

    fn stroke(mut self, color: impl Into<String>) -> Self {
        self.stroke = Some(color.into());
        self
    }

    fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

/// Keys that appeared, stayed or disappeared between two scenes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SceneDiff {
    pub entered: Vec<String>,
    pub updated: Vec<String>,
    pub exited: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    pub width: f32,
    pub height: f32,
    /// Translation applied to every node (the chart margins).
    pub origin: Point,
    pub nodes: Vec<SceneNode>,
    /// Keys dropped since the previous scene, with how long their fade-out lasts.
    pub exiting: Vec<(String, u64)>,
}

impl Scene {
    /// Build nodes for a layout. Transitions are attached by [`Scene::animate`].
    pub fn from_layout(layout: &GridLayout, config: &ChartConfig) -> Self {
        let labels = &config.labels;
        let colors = &config.colors;
        let mut nodes = Vec::with_capacity(layout.cells.len() * 3 + layout.year_badges.len() * 2 + 4);

        for v in &layout.cells {
            nodes.push(
                SceneNode::new(
                    format!("cell:{}", v.cell.key()),
                    NodeKind::Cell,
                    Shape::Rect { rect: v.rect, radius: config.cell.border_radius },
                )
                .fill(v.fill),
            );
        }
        for v in &layout.cells {
            nodes.push(
                SceneNode::new(
                    format!("country:{}", v.cell.key()),
                    NodeKind::CountryLabel,
                    Shape::Text {
                        at: v.acronym_at,
                        lines: vec![v.acronym.clone()],
                        size: labels.font_size,
                        line_height_em: labels.line_height_em,
                    },
                )
                .fill(v.text_color),
            );
        }
        for v in &layout.cells {
            nodes.push(
                SceneNode::new(
                    format!("team:{}", v.cell.key()),
                    NodeKind::TeamLabel,
                    Shape::Text {
                        at: v.team_at,
                        lines: v.team_lines.clone(),
                        size: labels.font_size,
                        line_height_em: labels.line_height_em,
                    },
                )
                .fill(v.text_color),
            );
        }

        nodes.push(
            SceneNode::new("axis".into(), NodeKind::Axis, Shape::Line { segment: layout.axis, stroke_width: 1.0 })
                .stroke(colors.axis.clone())
                .opacity(colors.axis_opacity),
        );

        for badge in &layout.year_badges {
            nodes.push(
                SceneNode::new(
                    format!("year-badge:{}", badge.year),
                    NodeKind::YearBadge,
                    Shape::Rect { rect: badge.rect, radius: config.cell.border_radius },
                )
                .fill(colors.year_background.clone())
                .opacity(colors.year_background_opacity),
            );
            nodes.push(
                SceneNode::new(
                    format!("year-label:{}", badge.year),
                    NodeKind::YearLabel,
                    Shape::Text {
                        at: badge.rect.center(),
                        lines: vec![badge.year.clone()],
                        size: labels.year_font_size,
                        line_height_em: labels.line_height_em,
                    },
                )
                .fill(colors.year_text.clone()),
            );
        }

        for header in &layout.headers {
            nodes.push(
                SceneNode::new(
                    format!("header:{}", header.competition),
                    NodeKind::Header,
                    Shape::Text {
                        at: header.at,
                        lines: vec![header.competition.clone()],
                        size: labels.font_size,
                        line_height_em: labels.line_height_em,
                    },
                )
                .fill(colors.header_text.clone()),
            );
        }

        Self { width: layout.width, height: layout.height, origin: layout.origin, nodes, exiting: Vec::new() }
    }

    pub fn node(&self, key: &str) -> Option<&SceneNode> {
        self.nodes.iter().find(|n| n.key == key)
    }

    pub fn nodes_of(&self, kind: NodeKind) -> impl Iterator<Item = &SceneNode> {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Compare keys against the previously presented scene. Everything enters when there is none.
    pub fn diff(&self, previous: Option<&Scene>) -> SceneDiff {
        let before: HashSet<&str> = previous
            .map(|p| p.nodes.iter().map(|n| n.key.as_str()).collect())
            .unwrap_or_default();
        let now: HashSet<&str> = self.nodes.iter().map(|n| n.key.as_str()).collect();

        let mut diff = SceneDiff::default();
        for node in &self.nodes {
            if before.contains(node.key.as_str()) {
                diff.updated.push(node.key.clone());
            } else {
                diff.entered.push(node.key.clone());
            }
        }
        if let Some(prev) = previous {
            diff.exited = prev
                .nodes
                .iter()
                .filter(|n| !now.contains(n.key.as_str()))
                .map(|n| n.key.clone())
                .collect();
        }
        diff
    }

    /// Attach staggered transitions to cells and their labels. Entering nodes
    /// fade in from zero; nodes that survive a re-render animate from their
    /// current state. Delay grows by `delay_ms` per element within each kind.
    pub fn animate(&mut self, diff: &SceneDiff, config: &ChartConfig) {
        let anim = config.animation;
        let entered: HashSet<&str> = diff.entered.iter().map(String::as_str).collect();
        for kind in [NodeKind::Cell, NodeKind::CountryLabel, NodeKind::TeamLabel] {
            let mut index = 0u64;
            for node in self.nodes.iter_mut().filter(|n| n.kind == kind) {
                let from_opacity = entered.contains(node.key.as_str()).then_some(0.0);
                node.transition = Some(Transition {
                    duration_ms: anim.duration_ms,
                    delay_ms: index * anim.delay_ms,
                    from_opacity,
                });
                index += 1;
            }
        }
        self.exiting = diff.exited.iter().map(|k| (k.clone(), anim.duration_ms / 2)).collect();
    }
}
