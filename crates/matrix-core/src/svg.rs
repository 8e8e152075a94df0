// File: crates/matrix-core/src/svg.rs
// Summary: SVG serialization of scenes, and an SVG-document drawing surface.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};

use crate::scene::{Scene, SceneNode, Shape};
use crate::surface::DrawSurface;
use crate::text::{TextMeasure, TextShaper};

/// Surface that keeps the last presented scene as a standalone SVG document.
pub struct SvgSurface {
    client_width: Option<f32>,
    measure: Box<dyn TextMeasure>,
    document: Option<String>,
}

impl SvgSurface {
    /// Surface measuring text with Skia's system fonts.
    pub fn new(client_width: Option<f32>) -> Self {
        Self { client_width, measure: Box::new(TextShaper::new()), document: None }
    }

    pub fn with_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    pub fn set_client_width(&mut self, width: Option<f32>) {
        self.client_width = width;
    }

    /// Current document; `None` after `clear`.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let doc = self
            .document
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("nothing has been drawn yet"))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, doc).with_context(|| format!("writing {}", path.display()))
    }
}

impl TextMeasure for SvgSurface {
    fn measure_width(&self, text: &str, size: f32) -> f32 {
        self.measure.measure_width(text, size)
    }
}

impl DrawSurface for SvgSurface {
    fn client_width(&self) -> Option<f32> {
        self.client_width
    }

    fn clear(&mut self) {
        self.document = None;
    }

    fn present(&mut self, scene: &Scene) -> Result<()> {
        self.document = Some(render_svg(scene));
        Ok(())
    }

    fn show_error(&mut self, message: &str) {
        let width = self.client_width.unwrap_or(crate::types::WIDTH);
        self.document = Some(error_svg(message, width));
    }
}

/// Serialize a scene to a standalone SVG document.
pub fn render_svg(scene: &Scene) -> String {
    let mut svg = String::new();
    let (w, h) = (num(scene.width), num(scene.height));
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">"
    );
    let _ = write!(svg, "<g transform=\"translate({},{})\">", num(scene.origin.x), num(scene.origin.y));
    for node in &scene.nodes {
        node_svg(&mut svg, node);
    }
    svg.push_str("</g></svg>");
    svg
}

/// Plain document standing in for a chart that failed to render.
pub fn error_svg(message: &str, width: f32) -> String {
    let w = num(width);
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"60\" viewBox=\"0 0 {w} 60\">\
         <text class=\"error\" x=\"20\" y=\"36\" fill=\"red\">{}</text></svg>",
        escape_xml(message)
    )
}

fn node_svg(out: &mut String, node: &SceneNode) {
    let class = node.kind.class();
    let start_opacity = node.transition.and_then(|t| t.from_opacity).unwrap_or(node.opacity);
    let mut paint = String::new();
    if let Some(fill) = &node.fill {
        let _ = write!(paint, " fill=\"{}\"", escape_xml(fill));
    }
    if let Some(stroke) = &node.stroke {
        let _ = write!(paint, " stroke=\"{}\"", escape_xml(stroke));
    }
    let _ = write!(paint, " opacity=\"{}\"", num(start_opacity));

    match &node.shape {
        Shape::Rect { rect, radius } => {
            let _ = write!(
                out,
                "<rect class=\"{class}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{r}\" ry=\"{r}\"{paint}>",
                num(rect.x),
                num(rect.y),
                num(rect.width),
                num(rect.height),
                r = num(*radius),
            );
            animation_svg(out, node);
            out.push_str("</rect>");
        }
        Shape::Line { segment, stroke_width } => {
            let _ = write!(
                out,
                "<line class=\"{class}\" x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke-width=\"{}\"{paint}>",
                num(segment.from.x),
                num(segment.from.y),
                num(segment.to.x),
                num(segment.to.y),
                num(*stroke_width),
            );
            animation_svg(out, node);
            out.push_str("</line>");
        }
        Shape::Text { at, lines, size, line_height_em } => {
            let (x, y) = (num(at.x), num(at.y));
            let _ = write!(
                out,
                "<text class=\"{class}\" x=\"{x}\" y=\"{y}\" font-size=\"{}\" text-anchor=\"middle\" dominant-baseline=\"middle\"{paint}>",
                num(*size),
            );
            animation_svg(out, node);
            if let [single] = lines.as_slice() {
                out.push_str(&escape_xml(single));
            } else {
                for (i, line) in lines.iter().enumerate() {
                    let dy = num(i as f32 * line_height_em);
                    let _ = write!(out, "<tspan x=\"{x}\" y=\"{y}\" dy=\"{dy}em\">{}</tspan>", escape_xml(line));
                }
            }
            out.push_str("</text>");
        }
    }
}

// Fade-in plays once after load and holds the final opacity.
fn animation_svg(out: &mut String, node: &SceneNode) {
    let Some(t) = node.transition else { return };
    let Some(from) = t.from_opacity else { return };
    let _ = write!(
        out,
        "<animate attributeName=\"opacity\" from=\"{}\" to=\"{}\" dur=\"{}ms\" begin=\"{}ms\" fill=\"freeze\"/>",
        num(from),
        num(node.opacity),
        t.duration_ms,
        t.delay_ms,
    );
}

fn num(v: f32) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
