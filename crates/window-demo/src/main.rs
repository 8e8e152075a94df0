// File: crates/window-demo/src/main.rs
// Summary: Minimal windowed demo that renders the matrix via RGBA blit (CPU) using winit + softbuffer,
// forwarding window resizes through the chart's debounced resize listener.

use std::cell::RefCell;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use matrix_core::{ListenerRegistry, Mapping, MatrixChart, RenderRequest, ResultRecord, SkiaSurface};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

// How often the loop wakes up while a resize is settling.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = tracing_subscriber::fmt().with_env_filter(env_filter).try_init() {
        eprintln!("tracing init failed: {err}");
    }

    let event_loop = EventLoop::new();
    let window = WindowBuilder::new()
        .with_title("Competition Matrix - Window Demo")
        .with_inner_size(winit::dpi::LogicalSize::new(720.0, 900.0))
        .build(&event_loop)
        .context("build window")?;

    let context = unsafe { softbuffer::Context::new(&window) }.map_err(|e| anyhow::anyhow!("softbuffer context: {e}"))?;
    let mut surface =
        unsafe { softbuffer::Surface::new(&context, &window) }.map_err(|e| anyhow::anyhow!("softbuffer surface: {e}"))?;

    // The window is the resize host; the registry records the chart's listener.
    let host = Rc::new(RefCell::new(ListenerRegistry::new()));
    let mut size = window.inner_size();
    let mut chart = MatrixChart::new(SkiaSurface::new(Some(size.width as f32)), host.clone());
    let outcome = chart.render(RenderRequest::new(sample_records(), Mapping::new("year", "team")));
    info!(?outcome, "initial render");

    event_loop.run(move |event, _, cf| {
        *cf = if chart.resize_pending() {
            ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL)
        } else {
            ControlFlow::Wait
        };
        match event {
            Event::WindowEvent { event, window_id: _ } => match event {
                WindowEvent::CloseRequested => {
                    chart.cleanup();
                    *cf = ControlFlow::Exit;
                }
                WindowEvent::Resized(new_size) => {
                    size = new_size;
                    chart.surface_mut().set_client_width(Some(new_size.width as f32));
                    chart.notify_resize(new_size.width as f32, Instant::now());
                    *cf = ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL);
                }
                _ => {}
            },
            Event::MainEventsCleared => {
                if let Some(outcome) = chart.poll_resize(Instant::now()) {
                    debug!(?outcome, listeners = host.borrow().active().len(), "resize settled");
                    window.request_redraw();
                }
            }
            Event::RedrawRequested(_) => {
                if let Err(e) = blit(&mut surface, &chart, size.width, size.height) {
                    error!("present error: {e:#}");
                }
            }
            _ => {}
        }
    })
}

/// Copy the chart's last frame into the window buffer, clipped to the window.
fn blit(
    surface: &mut softbuffer::Surface,
    chart: &MatrixChart<SkiaSurface>,
    width: u32,
    height: u32,
) -> Result<()> {
    let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) else {
        return Ok(());
    };
    surface.resize(w, h).map_err(|e| anyhow::anyhow!("resize buffer: {e}"))?;
    let mut frame = surface.buffer_mut().map_err(|e| anyhow::anyhow!("buffer: {e}"))?;
    let background = chart.surface().background;
    let fill = (u32::from(background.r()) << 16) | (u32::from(background.g()) << 8) | u32::from(background.b());
    frame.fill(fill);

    let (rgba, fw, fh, stride) = chart.surface().rgba8()?;
    let cols = fw.min(width) as usize;
    for y in 0..fh.min(height) as usize {
        let src = &rgba[y * stride..y * stride + cols * 4];
        let dst = &mut frame[y * width as usize..y * width as usize + cols];
        for (out, px) in dst.iter_mut().zip(src.chunks_exact(4)) {
            // softbuffer wants 0RGB
            *out = (u32::from(px[0]) << 16) | (u32::from(px[1]) << 8) | u32::from(px[2]);
        }
    }
    frame.present().map_err(|e| anyhow::anyhow!("present: {e}"))
}

fn sample_records() -> Vec<ResultRecord> {
    let rows = [
        ("UCL", 2019, 2, "Liverpool", "England"),
        ("UCL", 2019, 1, "Tottenham Hotspur", "England"),
        ("UEL", 2019, 2, "Chelsea", "England"),
        ("UEL", 2019, 1, "Arsenal", "England"),
        ("UCL", 2020, 2, "Bayern Munich", "Germany"),
        ("UCL", 2020, 1, "Paris Saint-Germain", "France"),
        ("UEL", 2020, 2, "Sevilla", "Spain"),
        ("UEL", 2020, 1, "Inter", "Italy"),
        ("UCL", 2021, 2, "Chelsea", "England"),
        ("UCL", 2021, 1, "Manchester City", "England"),
        ("UEL", 2021, 2, "Villarreal", "Spain"),
        ("UEL", 2021, 1, "Manchester United", "England"),
        ("UCL", 2022, 2, "Real Madrid", "Spain"),
        ("UCL", 2022, 1, "Liverpool", "England"),
        ("UEL", 2022, 2, "Eintracht Frankfurt", "Germany"),
        ("UEL", 2022, 1, "Rangers", "Scotland"),
        ("UCL", 2023, 2, "Manchester City", "England"),
        ("UCL", 2023, 1, "Inter", "Italy"),
        ("UEL", 2023, 2, "Sevilla", "Spain"),
        ("UEL", 2023, 1, "Roma", "Italy"),
    ];
    rows.iter()
        .map(|(comp, year, value, team, country)| {
            ResultRecord::new(*comp, *value)
                .with_field("year", *year)
                .with_field("team", *team)
                .with_country(*country)
        })
        .collect()
}
