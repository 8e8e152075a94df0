// File: crates/matrix-core/src/surface.rs
// Summary: Drawing surface boundary: the mount point a chart presents scenes to.

use anyhow::Result;

use crate::scene::Scene;
use crate::text::TextMeasure;

/// A mount point able to measure text, show a scene, or show an error in its place.
pub trait DrawSurface: TextMeasure {
    /// Laid-out width of the mount point, if known.
    fn client_width(&self) -> Option<f32>;

    /// Remove everything previously drawn.
    fn clear(&mut self);

    /// Replace the current drawing with `scene`.
    fn present(&mut self, scene: &Scene) -> Result<()>;

    /// Replace the current drawing with a plain error message.
    fn show_error(&mut self, message: &str);
}
