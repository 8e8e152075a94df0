// File: crates/matrix-core/src/lib.rs
// Summary: Core library entry point; exports the matrix chart engine, layout pipeline and surfaces.

pub mod cells;
pub mod chart;
pub mod color;
pub mod config;
pub mod dimensions;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod palette;
pub mod raster;
pub mod record;
pub mod resize;
pub mod scene;
pub mod selection;
pub mod surface;
pub mod svg;
pub mod text;
pub mod types;

pub use cells::Cell;
pub use chart::{MatrixChart, RenderOutcome, RenderState};
pub use config::{ChartConfig, DuplicatePolicy, Mapping, RenderRequest};
pub use dimensions::{calculate_dimensions, Dimensions};
pub use error::{ConfigError, LayoutError, RenderError};
pub use layout::{GridLayout, LayoutInput};
pub use palette::ColorCache;
pub use raster::SkiaSurface;
pub use record::ResultRecord;
pub use resize::{Debouncer, ListenerId, ListenerRegistry, ResizeHost};
pub use scene::{Scene, SceneDiff};
pub use surface::DrawSurface;
pub use svg::SvgSurface;
pub use text::{FixedAdvance, TextMeasure, TextShaper};
