// File: crates/matrix-core/tests/lifecycle.rs
// Purpose: Render lifecycle: validation, drawing, listener bookkeeping, debounced resize and cleanup.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use matrix_core::scene::Scene;
use matrix_core::types::ERROR_MESSAGE;
use matrix_core::{
    DrawSurface, FixedAdvance, ListenerRegistry, Mapping, MatrixChart, RenderOutcome, RenderRequest, RenderState,
    ResultRecord, SvgSurface, TextMeasure,
};
use serde_json::json;

type Host = Rc<RefCell<ListenerRegistry>>;

fn rec(comp: &str, year: i64, value: i64, team: &str, country: &str) -> ResultRecord {
    ResultRecord::new(comp, value)
        .with_field("year", year)
        .with_field("team", team)
        .with_country(country)
}

fn finals() -> Vec<ResultRecord> {
    vec![
        rec("UCL", 2022, 2, "Real Madrid", "Spain"),
        rec("UCL", 2022, 1, "Liverpool", "England"),
        rec("UEL", 2022, 2, "Eintracht Frankfurt", "Germany"),
        rec("UEL", 2022, 1, "Rangers", "Scotland"),
        rec("UCL", 2023, 2, "Manchester City", "England"),
        rec("UCL", 2023, 1, "Inter", "Italy"),
        rec("UEL", 2023, 2, "Sevilla", "Spain"),
        rec("UEL", 2023, 1, "Roma", "Italy"),
    ]
}

fn request(data: Vec<ResultRecord>) -> RenderRequest {
    RenderRequest::new(data, Mapping::new("year", "team"))
}

fn chart(width: Option<f32>) -> (MatrixChart<SvgSurface>, Host) {
    let host: Host = Rc::new(RefCell::new(ListenerRegistry::new()));
    let surface = SvgSurface::new(width).with_measure(FixedAdvance::default());
    (MatrixChart::new(surface, host.clone()), host)
}

fn document(chart: &MatrixChart<SvgSurface>) -> String {
    chart.surface().document().unwrap_or_default().to_string()
}

#[test]
fn render_draws_and_listens() {
    let (mut chart, host) = chart(Some(640.0));
    let outcome = chart.render(request(finals()));
    match &outcome {
        RenderOutcome::Drawn { cells, diff } => {
            assert_eq!(*cells, 8);
            assert!(diff.updated.is_empty());
            assert!(diff.exited.is_empty());
        }
        other => panic!("expected a drawing, got {other:?}"),
    }
    assert_eq!(chart.state(), &RenderState::Listening);
    assert_eq!(host.borrow().active().len(), 1);
    assert_eq!(document(&chart).matches("class=\"cell\"").count(), 8);
    assert!(!chart.color_cache().is_empty());
}

#[test]
fn empty_data_is_rejected_without_drawing() {
    let (mut chart, host) = chart(Some(640.0));
    let outcome = chart.render(request(Vec::new()));
    assert!(matches!(outcome, RenderOutcome::Rejected { .. }));
    assert_eq!(chart.state(), &RenderState::Rejected);
    assert!(chart.surface().document().is_none());
    assert!(host.borrow().active().is_empty());
}

#[test]
fn nothing_to_render_keeps_previous_drawing_and_listener() {
    let (mut chart, host) = chart(Some(640.0));
    assert!(chart.render(request(finals())).is_drawn());
    let drawn = document(&chart);
    let scene = chart.scene().cloned();
    let listener = chart.listener();

    let conference_only = vec![rec("UECL", 2023, 2, "West Ham", "England")];
    for data in [Vec::new(), conference_only] {
        let outcome = chart.render(request(data));
        assert!(matches!(outcome, RenderOutcome::Rejected { .. }), "{outcome:?}");
        assert_eq!(chart.state(), &RenderState::Rejected);
        assert_eq!(document(&chart), drawn);
        assert_eq!(chart.scene().cloned(), scene);
        assert_eq!(chart.listener(), listener);
        assert_eq!(host.borrow().active().len(), 1);
    }

    // the last good request still answers resizes
    let t0 = Instant::now();
    chart.notify_resize(500.0, t0);
    let outcome = chart.poll_resize(t0 + Duration::from_millis(300)).expect("debounced render");
    let RenderOutcome::Drawn { cells, .. } = outcome else { panic!("expected a drawing, got {outcome:?}") };
    assert_eq!(cells, 8);
    assert_eq!(chart.scene().map(|s| s.width), Some(500.0));
    assert_eq!(chart.state(), &RenderState::Listening);
    assert_eq!(host.borrow().active().len(), 1);
}

#[test]
fn missing_width_is_rejected() {
    let (mut chart, host) = chart(None);
    let outcome = chart.render(request(finals()));
    let RenderOutcome::Rejected { reason } = outcome else { panic!("expected rejection") };
    assert!(reason.contains("width"), "{reason}");
    assert!(host.borrow().active().is_empty());

    // an explicit width makes the same surface usable
    assert!(chart.render(request(finals()).with_width(500.0)).is_drawn());
    assert_eq!(chart.scene().map(|s| s.width), Some(500.0));
}

#[test]
fn invalid_json_calls_are_rejected() {
    let (mut chart, _host) = chart(Some(640.0));
    let mapping = json!({"rows": {"value": "year"}, "columns": {"value": "team"}});

    let RenderOutcome::Rejected { reason } = chart.render_json(&json!({ "mapping": mapping })) else {
        panic!("missing data must be rejected")
    };
    assert!(reason.contains("data"), "{reason}");

    let outcome = chart.render_json(&json!({ "data": "nope", "mapping": mapping }));
    assert!(matches!(outcome, RenderOutcome::Rejected { .. }));

    let outcome = chart.render_json(&json!({ "data": [], "mapping": {"rows": {"value": ""}, "columns": {"value": "team"}} }));
    assert!(matches!(outcome, RenderOutcome::Rejected { .. }));

    let outcome = chart.render_json(&json!({ "data": [], "mapping": mapping, "width": -4 }));
    assert!(matches!(outcome, RenderOutcome::Rejected { .. }));

    assert!(chart.surface().document().is_none());
}

#[test]
fn json_call_draws() {
    let (mut chart, _host) = chart(Some(640.0));
    let raw = json!({
        "data": [
            {"competition": "UCL", "season": 2019, "value": 2, "club": "Liverpool", "country": "England"},
            {"competition": "UCL", "season": 2019, "value": 1, "club": "Tottenham", "country": "England"}
        ],
        "mapping": {"rows": {"value": "season"}, "columns": {"value": "club"}},
        "maxWidth": 400,
        "visualOptions": {"theme": "dark"}
    });
    let outcome = chart.render_json(&raw);
    assert!(outcome.is_drawn(), "{outcome:?}");
    assert_eq!(chart.scene().map(|s| s.width), Some(400.0));
    assert!(document(&chart).contains("Liverpool [W]"));
}

#[test]
fn repeated_renders_keep_one_listener() {
    let (mut chart, host) = chart(Some(640.0));
    assert!(chart.render(request(finals())).is_drawn());
    let first = chart.listener();
    let RenderOutcome::Drawn { diff, .. } = chart.render(request(finals())) else { panic!("second render") };
    assert!(diff.entered.is_empty());
    assert_eq!(host.borrow().active().len(), 1);
    assert_ne!(chart.listener(), first);

    chart.cleanup();
    assert!(host.borrow().active().is_empty());
    assert!(chart.color_cache().is_empty());
    chart.cleanup();

    assert!(chart.render(request(finals())).is_drawn());
    assert_eq!(host.borrow().active().len(), 1);
}

#[test]
fn dropped_results_exit_with_half_duration_fade() {
    let (mut chart, _host) = chart(Some(640.0));
    chart.render(request(finals()));
    let fewer: Vec<_> = finals().into_iter().filter(|r| r.competition == "UCL").collect();
    let RenderOutcome::Drawn { diff, .. } = chart.render(request(fewer)) else { panic!("re-render") };
    assert!(diff.exited.contains(&"cell:UEL_2023_1".to_string()));
    assert!(diff.exited.contains(&"header:UEL".to_string()));
    let scene = chart.scene().unwrap();
    assert!(scene.exiting.iter().any(|(k, ms)| k == "team:UEL_2022_0" && *ms == 400));
}

#[test]
fn resize_burst_re_renders_once_with_last_width() {
    let (mut chart, host) = chart(Some(640.0));
    chart.render(request(finals()));
    let t0 = Instant::now();
    chart.notify_resize(800.0, t0);
    chart.notify_resize(700.0, t0 + Duration::from_millis(100));
    chart.notify_resize(500.0, t0 + Duration::from_millis(200));

    assert!(chart.poll_resize(t0 + Duration::from_millis(300)).is_none());
    let outcome = chart.poll_resize(t0 + Duration::from_millis(460)).expect("debounced render");
    assert!(outcome.is_drawn());
    assert_eq!(chart.scene().map(|s| s.width), Some(500.0));
    assert!(chart.poll_resize(t0 + Duration::from_secs(5)).is_none());
    assert_eq!(host.borrow().active().len(), 1);
}

#[test]
fn resize_without_listener_is_ignored() {
    let (mut chart, _host) = chart(Some(640.0));
    let t0 = Instant::now();
    chart.notify_resize(500.0, t0);
    assert!(chart.poll_resize(t0 + Duration::from_secs(1)).is_none());

    chart.render(request(finals()));
    chart.cleanup();
    chart.notify_resize(500.0, t0);
    assert!(chart.poll_resize(t0 + Duration::from_secs(1)).is_none());
}

#[test]
fn cleanup_cancels_pending_resize() {
    let (mut chart, _host) = chart(Some(640.0));
    chart.render(request(finals()));
    let t0 = Instant::now();
    chart.notify_resize(500.0, t0);
    chart.cleanup();
    assert!(chart.poll_resize(t0 + Duration::from_secs(1)).is_none());
}

#[test]
fn runtime_failure_shows_error_message() {
    let (mut chart, host) = chart(Some(640.0));
    assert!(chart.render(request(finals())).is_drawn());

    let broken = vec![ResultRecord::new("UCL", 2).with_field("year", 2020)];
    let outcome = chart.render(request(broken));
    assert!(matches!(outcome, RenderOutcome::Failed { .. }), "{outcome:?}");
    assert!(matches!(chart.state(), RenderState::Failed { .. }));
    assert!(document(&chart).contains(ERROR_MESSAGE));
    assert!(!document(&chart).contains("class=\"cell\""));
    assert!(host.borrow().active().is_empty());
    assert!(chart.scene().is_none());
}

#[test]
fn drop_and_dispose_release_the_listener() {
    let host: Host = Rc::new(RefCell::new(ListenerRegistry::new()));
    {
        let mut chart = MatrixChart::new(SvgSurface::new(Some(640.0)).with_measure(FixedAdvance::default()), host.clone());
        chart.render(request(finals()));
        assert_eq!(host.borrow().active().len(), 1);
    }
    assert!(host.borrow().active().is_empty());

    let mut chart = MatrixChart::new(SvgSurface::new(Some(640.0)).with_measure(FixedAdvance::default()), host.clone());
    chart.render(request(finals()));
    chart.dispose();
    assert!(host.borrow().active().is_empty());
}

#[test]
fn charts_do_not_share_listeners() {
    let host: Host = Rc::new(RefCell::new(ListenerRegistry::new()));
    let mut a = MatrixChart::new(SvgSurface::new(Some(640.0)).with_measure(FixedAdvance::default()), host.clone());
    let mut b = MatrixChart::new(SvgSurface::new(Some(480.0)).with_measure(FixedAdvance::default()), host.clone());
    a.render(request(finals()));
    b.render(request(finals()));
    assert_eq!(host.borrow().active().len(), 2);
    a.cleanup();
    assert_eq!(host.borrow().active(), &[b.listener().unwrap()]);
    assert!(!b.color_cache().is_empty());
}

/// Surface whose drawing always fails.
struct BrokenSurface {
    errors: Vec<String>,
}

impl TextMeasure for BrokenSurface {
    fn measure_width(&self, text: &str, size: f32) -> f32 {
        FixedAdvance::default().measure_width(text, size)
    }
}

impl DrawSurface for BrokenSurface {
    fn client_width(&self) -> Option<f32> { Some(640.0) }
    fn clear(&mut self) {}
    fn present(&mut self, _scene: &Scene) -> anyhow::Result<()> {
        anyhow::bail!("device lost")
    }
    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }
}

#[test]
fn surface_failure_is_reported() {
    let host: Host = Rc::new(RefCell::new(ListenerRegistry::new()));
    let mut chart = MatrixChart::new(BrokenSurface { errors: Vec::new() }, host.clone());
    let RenderOutcome::Failed { error } = chart.render(request(finals())) else { panic!("expected failure") };
    assert!(error.contains("device lost"), "{error}");
    assert_eq!(chart.surface().errors, vec![ERROR_MESSAGE.to_string()]);
    assert!(host.borrow().active().is_empty());
}
