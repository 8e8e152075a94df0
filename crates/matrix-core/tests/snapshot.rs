// File: crates/matrix-core/tests/snapshot.rs
// Purpose: Golden snapshot harness with bless flow.
// Behavior:
// - Renders a deterministic small matrix to PNG bytes and to SVG.
// - If env UPDATE_SNAPSHOTS=1, (re)writes the snapshot files.
// - Else, if a snapshot exists, compares it (decoded pixels for PNG, text for SVG).
// - Else, logs a note and returns (skips) without failing to ease first run.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use matrix_core::{
    DrawSurface, FixedAdvance, ListenerRegistry, Mapping, MatrixChart, RenderRequest, ResultRecord, SkiaSurface,
    SvgSurface,
};

fn request() -> RenderRequest {
    let rows = [
        ("UCL", 2020, 2, "Bayern Munich", "Germany"),
        ("UCL", 2020, 1, "Paris Saint-Germain", "France"),
        ("UEL", 2020, 2, "Sevilla", "Spain"),
        ("UEL", 2020, 1, "Inter", "Italy"),
        ("UCL", 2021, 2, "Chelsea", "England"),
        ("UEL", 2021, 2, "Villarreal", "Spain"),
        ("UEL", 2021, 1, "Manchester United", "England"),
    ];
    let data = rows
        .iter()
        .map(|(comp, year, value, team, country)| {
            ResultRecord::new(*comp, *value)
                .with_field("year", *year)
                .with_field("team", *team)
                .with_country(*country)
        })
        .collect();
    RenderRequest::new(data, Mapping::new("year", "team")).with_width(480.0)
}

fn render<S: DrawSurface>(surface: S) -> MatrixChart<S> {
    let mut chart = MatrixChart::new(surface, Rc::new(RefCell::new(ListenerRegistry::new())));
    assert!(chart.render(request()).is_drawn());
    chart
}

fn snap_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/__snapshots__")
}

fn update_requested() -> bool {
    std::env::var("UPDATE_SNAPSHOTS").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

#[test]
fn golden_matrix_png() {
    let chart = render(SkiaSurface::new(None));
    let bytes = chart.surface().png_bytes().expect("png bytes");
    let snap_path = snap_dir().join("matrix.png");

    if update_requested() {
        std::fs::create_dir_all(snap_dir()).expect("create snapshots dir");
        std::fs::write(&snap_path, &bytes).expect("write snapshot");
        eprintln!("[snapshot] Updated {} ({} bytes)", snap_path.display(), bytes.len());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read(&snap_path).expect("read snapshot");
        // Compare decoded pixel buffers to avoid PNG encoder variance
        let got_img = image::load_from_memory(&bytes).expect("decode got").to_rgba8();
        let want_img = image::load_from_memory(&want).expect("decode want").to_rgba8();
        assert_eq!(got_img.as_raw(), want_img.as_raw(), "rendered pixels differ from golden snapshot: {}", snap_path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}

#[test]
fn golden_matrix_svg() {
    let chart = render(SvgSurface::new(None).with_measure(FixedAdvance::default()));
    let svg = chart.surface().document().expect("svg document").to_string();
    let snap_path = snap_dir().join("matrix.svg");

    if update_requested() {
        std::fs::create_dir_all(snap_dir()).expect("create snapshots dir");
        std::fs::write(&snap_path, &svg).expect("write snapshot");
        eprintln!("[snapshot] Updated {}", snap_path.display());
        return;
    }

    if snap_path.exists() {
        let want = std::fs::read_to_string(&snap_path).expect("read snapshot");
        assert_eq!(svg, want, "svg differs from golden snapshot: {}", snap_path.display());
    } else {
        eprintln!("[snapshot] Missing snapshot {}; set UPDATE_SNAPSHOTS=1 to bless.", snap_path.display());
    }
}
