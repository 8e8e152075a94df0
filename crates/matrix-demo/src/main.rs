// File: crates/matrix-demo/src/main.rs
// Summary: Demo loads competition results (CSV or JSON) and renders the winners matrix to SVG and PNG.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use matrix_core::{
    ChartConfig, DrawSurface, ListenerRegistry, Mapping, MatrixChart, RenderOutcome, RenderRequest, ResultRecord,
    SkiaSurface, SvgSurface,
};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Render a matrix of competition winners and runners-up.
///
/// Input rows need `competition`, `value` (2 = winner, 1 = runner-up) and
/// `country` columns, plus the year and team columns named by --rows/--team.
/// Without an input file a small built-in sample is drawn.
#[derive(Parser, Debug)]
#[command(about, long_about = None)]
struct Args {
    /// CSV or JSON results file. JSON may be an array of records or an object with a `data` array.
    input: Option<PathBuf>,

    /// Field holding the year (row key).
    #[arg(long, default_value = "year")]
    rows: String,

    /// Field holding the team name.
    #[arg(long, default_value = "team")]
    team: String,

    /// Container width in pixels.
    #[arg(long, default_value_t = matrix_core::types::WIDTH)]
    width: f32,

    /// Final height; defaults to the height needed for all years.
    #[arg(long)]
    height: Option<f32>,

    /// Cap on the container width.
    #[arg(long)]
    max_width: Option<f32>,

    /// TOML chart config.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output directory.
    #[arg(long, default_value = "target/out")]
    out: PathBuf,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ChartConfig::load(path).with_context(|| format!("loading config '{}'", path.display()))?,
        None => ChartConfig::default(),
    };

    let (records, stem) = match &args.input {
        Some(raw) => {
            let (path, used_alt) = resolve_path(raw)?;
            info!("Using input file: {}", path.display());
            if used_alt {
                info!("  (extension swapped between .csv/.cvs)");
            }
            let records = load_records(&path).with_context(|| format!("failed to load '{}'", path.display()))?;
            let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("matrix").to_string();
            (records, stem)
        }
        None => (sample_records(), "sample".to_string()),
    };
    info!("Loaded {} records", records.len());
    if records.is_empty() {
        anyhow::bail!("no records loaded; check headers/delimiter.");
    }

    let mut request = RenderRequest::new(records, Mapping::new(&args.rows, &args.team)).with_width(args.width);
    if let Some(h) = args.height {
        request = request.with_height(h);
    }
    if let Some(m) = args.max_width {
        request = request.with_max_width(m);
    }

    std::fs::create_dir_all(&args.out).with_context(|| format!("creating {}", args.out.display()))?;

    let mut svg_chart = chart(SvgSurface::new(Some(args.width)), &config)?;
    report(svg_chart.render(request.clone()))?;
    let out_svg = args.out.join(format!("matrix_{stem}.svg"));
    svg_chart.surface().write_to(&out_svg)?;
    info!("Wrote {}", out_svg.display());

    let mut png_chart = chart(SkiaSurface::new(Some(args.width)), &config)?;
    report(png_chart.render(request))?;
    let out_png = args.out.join(format!("matrix_{stem}.png"));
    png_chart.surface().write_png(&out_png)?;
    info!("Wrote {}", out_png.display());

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = tracing_subscriber::fmt().with_env_filter(env_filter).with_target(true).try_init() {
        eprintln!("tracing init failed: {err}");
    }
}

fn chart<S: DrawSurface>(surface: S, config: &ChartConfig) -> Result<MatrixChart<S>> {
    let host = Rc::new(RefCell::new(ListenerRegistry::new()));
    Ok(MatrixChart::with_config(surface, host, config.clone())?)
}

fn report(outcome: RenderOutcome) -> Result<()> {
    match outcome {
        RenderOutcome::Drawn { cells, .. } => {
            info!(cells, "matrix rendered");
            Ok(())
        }
        RenderOutcome::Rejected { reason } => anyhow::bail!("nothing rendered: {reason}"),
        RenderOutcome::Failed { error } => {
            // the surface holds the error message; still write it out
            warn!("render failed: {error}");
            Ok(())
        }
    }
}

/// Resolve path, trying .csv/.cvs swap if needed.
/// Returns (actual_path, used_alt)
fn resolve_path(p: &Path) -> Result<(PathBuf, bool)> {
    if p.exists() {
        return Ok((p.to_path_buf(), false));
    }
    if let Some(alt) = swap_ext(p) {
        if alt.exists() {
            return Ok((alt, true));
        }
    }
    anyhow::bail!("file not found: {}", p.display());
}

fn swap_ext(p: &Path) -> Option<PathBuf> {
    let mut alt = p.to_path_buf();
    let ext = p.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "cvs" => {
            alt.set_extension("csv");
            Some(alt)
        }
        "csv" => {
            alt.set_extension("cvs");
            Some(alt)
        }
        _ => None,
    }
}

fn load_records(path: &Path) -> Result<Vec<ResultRecord>> {
    let is_json = path
        .extension()
        .map(|e| e.to_string_lossy().eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if is_json {
        load_json(path)
    } else {
        load_csv(path)
    }
}

fn load_json(path: &Path) -> Result<Vec<ResultRecord>> {
    let text = std::fs::read_to_string(path)?;
    let raw: Value = serde_json::from_str(&text)?;
    let items = match raw {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => items,
            _ => anyhow::bail!("JSON object has no `data` array"),
        },
        _ => anyhow::bail!("expected a JSON array of records"),
    };
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| serde_json::from_value(item).with_context(|| format!("record {i}")))
        .collect()
}

/// Header names become record fields as written, so `--rows`/`--team` match them exactly;
/// `competition`, `value` and `country` fill the fixed fields whatever their case.
fn load_csv(path: &Path) -> Result<Vec<ResultRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let has = |want: &str| headers.iter().any(|h| h.eq_ignore_ascii_case(want));
    if !has("competition") || !has("value") {
        warn!("Could not find `competition` and `value` columns; nothing will match.");
    }

    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let mut record = ResultRecord::default();
        for (name, cell) in headers.iter().zip(rec.iter()) {
            match name.to_ascii_lowercase().as_str() {
                "competition" => record.competition = cell.to_string(),
                "value" => match cell.parse::<i64>() {
                    Ok(v) => record.value = v,
                    Err(_) => warn!(line, "unparsed value {cell:?}, row ignored by the grid"),
                },
                "country" if !cell.is_empty() => record.country = Some(cell.to_string()),
                "country" => {}
                _ => {
                    record.fields.insert(name.clone(), Value::String(cell.to_string()));
                }
            }
        }
        out.push(record);
    }
    Ok(out)
}

fn sample_records() -> Vec<ResultRecord> {
    let rows = [
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
