// File: crates/matrix-core/src/raster.rs
// Summary: Skia CPU raster surface: draws scenes to an image and exports PNG / RGBA8.

use anyhow::{Context, Result};
use skia_safe as skia;
use tracing::debug;

use crate::color::parse_css_color;
use crate::scene::{Scene, SceneNode, Shape};
use crate::surface::DrawSurface;
use crate::text::{TextMeasure, TextShaper};

const ERROR_HEIGHT: i32 = 60;

/// Raster mount point. Transitions are not played; each node is drawn in its final state.
pub struct SkiaSurface {
    client_width: Option<f32>,
    pub background: skia::Color,
    shaper: TextShaper,
    frame: Option<skia::Image>,
}

impl SkiaSurface {
    pub fn new(client_width: Option<f32>) -> Self {
        Self {
            client_width,
            background: skia::Color::from_argb(255, 18, 18, 20), // near-black
            shaper: TextShaper::new(),
            frame: None,
        }
    }

    pub fn set_client_width(&mut self, width: Option<f32>) {
        self.client_width = width;
    }

    /// Size of the last drawn frame.
    pub fn frame_size(&self) -> Option<(i32, i32)> {
        self.frame.as_ref().map(|img| (img.width(), img.height()))
    }

    pub fn png_bytes(&self) -> Result<Vec<u8>> {
        let image = self.frame()?;
        #[allow(deprecated)]
        let data = image
            .encode_to_data(skia::EncodedImageFormat::PNG)
            .ok_or_else(|| anyhow::anyhow!("encode PNG failed"))?;
        Ok(data.as_bytes().to_vec())
    }

    /// Unpremultiplied RGBA pixels: (buffer, width, height, row stride in bytes).
    pub fn rgba8(&self) -> Result<(Vec<u8>, u32, u32, usize)> {
        let image = self.frame()?;
        let (w, h) = (image.width(), image.height());
        let info = skia::ImageInfo::new((w, h), skia::ColorType::RGBA8888, skia::AlphaType::Unpremul, None);
        let stride = w as usize * 4;
        let mut pixels = vec![0u8; stride * h as usize];
        if !image.read_pixels(&info, pixels.as_mut_slice(), stride, (0, 0), skia::image::CachingHint::Allow) {
            anyhow::bail!("reading back {w}x{h} pixels failed");
        }
        Ok((pixels, w as u32, h as u32, stride))
    }

    pub fn write_png(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.png_bytes()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
    }

    fn frame(&self) -> Result<&skia::Image> {
        self.frame.as_ref().ok_or_else(|| anyhow::anyhow!("nothing has been drawn yet"))
    }

    fn raster(width: i32, height: i32) -> Result<skia::Surface> {
        skia::surfaces::raster_n32_premul((width.max(1), height.max(1)))
            .ok_or_else(|| anyhow::anyhow!("failed to create {width}x{height} raster surface"))
    }
}

impl TextMeasure for SkiaSurface {
    fn measure_width(&self, text: &str, size: f32) -> f32 {
        self.shaper.measure_width(text, size)
    }
}

impl DrawSurface for SkiaSurface {
    fn client_width(&self) -> Option<f32> {
        self.client_width
    }

    fn clear(&mut self) {
        self.frame = None;
    }

    fn present(&mut self, scene: &Scene) -> Result<()> {
        let (w, h) = (scene.width.ceil() as i32, scene.height.ceil() as i32);
        let mut surface = Self::raster(w, h)?;
        let canvas = surface.canvas();
        canvas.clear(self.background);
        canvas.save();
        canvas.translate((scene.origin.x, scene.origin.y));
        for node in &scene.nodes {
            draw_node(canvas, &self.shaper, node);
        }
        canvas.restore();
        self.frame = Some(surface.image_snapshot());
        Ok(())
    }

    fn show_error(&mut self, message: &str) {
        let w = self.client_width.unwrap_or(crate::types::WIDTH).ceil() as i32;
        match Self::raster(w, ERROR_HEIGHT) {
            Ok(mut surface) => {
                let canvas = surface.canvas();
                canvas.clear(self.background);
                let red = skia::Color::from_rgb(255, 0, 0);
                let width = self.shaper.measure_width(message, 16.0);
                self.shaper.draw_centered(canvas, message, 20.0 + width / 2.0, 30.0, 16.0, red);
                self.frame = Some(surface.image_snapshot());
            }
            Err(e) => {
                debug!("could not draw error message: {e:#}");
                self.frame = None;
            }
        }
    }
}

fn resolve(color: Option<&String>, opacity: f32) -> Option<skia::Color> {
    let css = color?;
    let c = parse_css_color(css).unwrap_or_else(|| {
        debug!("unparsed color {css:?}, drawing gray");
        skia::Color::from_rgb(128, 128, 128)
    });
    let a = (c.a() as f32 * opacity.clamp(0.0, 1.0)).round() as u8;
    Some(c.with_a(a))
}

fn draw_node(canvas: &skia::Canvas, shaper: &TextShaper, node: &SceneNode) {
    match &node.shape {
        Shape::Rect { rect, radius } => {
            let Some(color) = resolve(node.fill.as_ref(), node.opacity) else { return };
            let mut paint = skia::Paint::default();
            paint.set_anti_alias(true);
            paint.set_style(skia::paint::Style::Fill);
            paint.set_color(color);
            let r = skia::Rect::from_xywh(rect.x, rect.y, rect.width, rect.height);
            canvas.draw_rrect(skia::RRect::new_rect_xy(r, *radius, *radius), &paint);
        }
        Shape::Line { segment, stroke_width } => {
            let Some(color) = resolve(node.stroke.as_ref(), node.opacity) else { return };
            let mut paint = skia::Paint::default();
            paint.set_anti_alias(true);
            paint.set_style(skia::paint::Style::Stroke);
            paint.set_stroke_width(*stroke_width);
            paint.set_color(color);
            canvas.draw_line((segment.from.x, segment.from.y), (segment.to.x, segment.to.y), &paint);
        }
        Shape::Text { at, lines, size, line_height_em } => {
            let Some(color) = resolve(node.fill.as_ref(), node.opacity) else { return };
            for (i, line) in lines.iter().enumerate() {
                let y = at.y + i as f32 * line_height_em * size;
                shaper.draw_centered(canvas, line, at.x, y, *size, color);
            }
        }
    }
}
