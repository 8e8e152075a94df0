// File: crates/matrix-core/src/chart.rs
// Summary: MatrixChart engine: validate → compute → draw lifecycle, resize listening, cleanup.

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::config::{ChartConfig, RenderRequest};
use crate::error::{ConfigError, RenderError};
use crate::layout::{GridLayout, LayoutInput};
use crate::palette::ColorCache;
use crate::resize::{Debouncer, ListenerId, ResizeHost};
use crate::scene::{Scene, SceneDiff};
use crate::surface::DrawSurface;
use crate::types::ERROR_MESSAGE;

/// Where the engine is in its render lifecycle.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderState {
    Idle,
    Validating,
    Computing,
    Drawing,
    /// Drawn; waiting for the next resize or render call.
    Listening,
    /// Input was invalid or had nothing to draw. The surface was left alone.
    Rejected,
    /// The last render failed and the surface shows an error message.
    Failed { message: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    Drawn { cells: usize, diff: SceneDiff },
    Rejected { reason: String },
    Failed { error: String },
}

impl RenderOutcome {
    pub fn is_drawn(&self) -> bool {
        matches!(self, RenderOutcome::Drawn { .. })
    }
}

/// One chart bound to one mount point.
///
/// The chart owns its color memo and its resize listener, so several charts
/// can share a page without stepping on each other. Dropping the chart runs
/// [`MatrixChart::cleanup`].
pub struct MatrixChart<S: DrawSurface> {
    surface: S,
    config: ChartConfig,
    host: Box<dyn ResizeHost>,
    listener: Option<ListenerId>,
    colors: ColorCache,
    state: RenderState,
    last_request: Option<RenderRequest>,
    last_scene: Option<Scene>,
    resize: Debouncer<f32>,
}

impl<S: DrawSurface> MatrixChart<S> {
    pub fn new(surface: S, host: impl ResizeHost + 'static) -> Self {
        let config = ChartConfig::default();
        let resize = Debouncer::new(Duration::from_millis(config.resize_debounce_ms));
        Self {
            surface,
            config,
            host: Box::new(host),
            listener: None,
            colors: ColorCache::new(),
            state: RenderState::Idle,
            last_request: None,
            last_scene: None,
            resize,
        }
    }

    pub fn with_config(surface: S, host: impl ResizeHost + 'static, config: ChartConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut chart = Self::new(surface, host);
        chart.resize = Debouncer::new(Duration::from_millis(config.resize_debounce_ms));
        chart.config = config;
        Ok(chart)
    }

    pub fn state(&self) -> &RenderState { &self.state }
    pub fn config(&self) -> &ChartConfig { &self.config }
    pub fn surface(&self) -> &S { &self.surface }
    pub fn surface_mut(&mut self) -> &mut S { &mut self.surface }
    pub fn color_cache(&self) -> &ColorCache { &self.colors }
    pub fn listener(&self) -> Option<ListenerId> { self.listener }
    /// Scene currently on the surface, if the last render drew one.
    pub fn scene(&self) -> Option<&Scene> { self.last_scene.as_ref() }

    /// Render from a loosely-typed JSON call (`data`, `mapping`, `width`, ...).
    pub fn render_json(&mut self, raw: &Value) -> RenderOutcome {
        self.state = RenderState::Validating;
        match RenderRequest::from_json(raw) {
            Ok(request) => self.render(request),
            Err(e) => self.reject(e),
        }
    }

    /// Validate, lay out and draw. Never panics or returns an error: invalid
    /// input is rejected silently and runtime failures replace the drawing
    /// with an error message.
    pub fn render(&mut self, request: RenderRequest) -> RenderOutcome {
        self.state = RenderState::Validating;
        let container_width = match self.validate(&request) {
            Ok(w) => w,
            Err(e) => return self.reject(e),
        };

        self.state = RenderState::Computing;
        match self.draw(&request, container_width) {
            Ok(Some((cells, diff))) => {
                debug!(cells, entered = diff.entered.len(), exited = diff.exited.len(), "matrix drawn");
                self.listen(request);
                self.state = RenderState::Listening;
                RenderOutcome::Drawn { cells, diff }
            }
            Ok(None) => {
                warn!("No valid data found for visualization");
                self.state = RenderState::Rejected;
                RenderOutcome::Rejected { reason: "nothing to render".into() }
            }
            Err(e) => self.fail(e),
        }
    }

    /// Host reports a new container width. Ignored unless a listener is registered.
    pub fn notify_resize(&mut self, width: f32, now: Instant) {
        if self.listener.is_none() {
            debug!(width, "resize ignored, no listener registered");
            return;
        }
        self.resize.trigger(width, now);
    }

    /// Re-render once a burst of resizes has settled for the debounce delay.
    pub fn poll_resize(&mut self, now: Instant) -> Option<RenderOutcome> {
        let width = self.resize.poll(now)?;
        if !(width.is_finite() && width > 0.0) {
            debug!(width, "resize to unusable width skipped");
            return None;
        }
        let mut request = self.last_request.clone()?;
        request.width = Some(width);
        debug!(width, delay_ms = self.resize.delay().as_millis() as u64, "re-rendering after resize");
        Some(self.render(request))
    }

    /// A resize is waiting out the debounce delay.
    pub fn resize_pending(&self) -> bool {
        self.resize.is_pending()
    }

    /// Deregister the resize listener and clear the color memo. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        if let Some(id) = self.listener.take() {
            self.host.remove_listener(id);
            debug!(?id, "resize listener removed");
        }
        self.resize.cancel();
        self.colors.clear();
        if self.state == RenderState::Listening {
            self.state = RenderState::Idle;
        }
    }

    /// Tear the chart down explicitly.
    pub fn dispose(mut self) {
        self.cleanup();
    }

    fn validate(&self, request: &RenderRequest) -> Result<f32, ConfigError> {
        request.validate()?;
        request
            .width
            .or_else(|| self.surface.client_width())
            .filter(|w| w.is_finite() && *w > 0.0)
            .ok_or(ConfigError::NoContainerWidth)
    }

    fn draw(&mut self, request: &RenderRequest, container_width: f32) -> Result<Option<(usize, SceneDiff)>, RenderError> {
        let input = LayoutInput {
            records: &request.data,
            mapping: &request.mapping,
            container_width,
            max_width: request.max_width,
            height: request.height,
        };
        let Some(layout) = GridLayout::compute(input, &self.config, &mut self.colors, &self.surface)? else {
            return Ok(None);
        };

        self.state = RenderState::Drawing;
        let mut scene = Scene::from_layout(&layout, &self.config);
        let diff = scene.diff(self.last_scene.as_ref());
        scene.animate(&diff, &self.config);
        self.surface.clear();
        self.surface.present(&scene)?;
        self.last_scene = Some(scene);
        Ok(Some((layout.cells.len(), diff)))
    }

    // Exactly one listener per chart: the old one goes before the new one is added.
    fn listen(&mut self, request: RenderRequest) {
        if let Some(old) = self.listener.take() {
            self.host.remove_listener(old);
        }
        self.listener = Some(self.host.add_listener());
        self.resize.cancel();
        self.last_request = Some(request);
    }

    fn reject(&mut self, e: ConfigError) -> RenderOutcome {
        warn!("render skipped: {e}");
        self.state = RenderState::Rejected;
        RenderOutcome::Rejected { reason: e.to_string() }
    }

    fn fail(&mut self, e: RenderError) -> RenderOutcome {
        error!("Error rendering visualization: {e}");
        if let Some(id) = self.listener.take() {
            self.host.remove_listener(id);
        }
        self.resize.cancel();
        self.last_scene = None;
        self.surface.clear();
        self.surface.show_error(ERROR_MESSAGE);
        let message = e.to_string();
        self.state = RenderState::Failed { message: message.clone() };
        RenderOutcome::Failed { error: message }
    }
}

impl<S: DrawSurface> Drop for MatrixChart<S> {
    fn drop(&mut self) {
        self.cleanup();
    }
}
