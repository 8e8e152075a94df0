// File: crates/matrix-core/tests/grid.rs
// Purpose: Competition/year selection and cell construction from raw records.

use matrix_core::cells::build_cells;
use matrix_core::selection::{select, select_competitions, select_years};
use matrix_core::{DuplicatePolicy, LayoutError, Mapping, ResultRecord};

fn rec(comp: &str, year: i64, value: i64, team: &str, country: &str) -> ResultRecord {
    ResultRecord::new(comp, value)
        .with_field("year", year)
        .with_field("team", team)
        .with_country(country)
}

fn mapping() -> Mapping {
    Mapping::new("year", "team")
}

fn preference() -> Vec<String> {
    vec!["UCL".to_string(), "UEL".to_string()]
}

fn finals() -> Vec<ResultRecord> {
    vec![
        rec("UEL", 2023, 2, "Sevilla", "Spain"),
        rec("UCL", 2023, 2, "Manchester City", "England"),
        rec("UCL", 2023, 1, "Inter", "Italy"),
        rec("UEL", 2023, 1, "Roma", "Italy"),
        rec("UCL", 2022, 2, "Real Madrid", "Spain"),
        rec("UCL", 2022, 1, "Liverpool", "England"),
        rec("UEL", 2022, 2, "Eintracht Frankfurt", "Germany"),
        rec("UEL", 2022, 1, "Rangers", "Scotland"),
    ]
}

#[test]
fn preferred_competition_sorts_first() {
    // UEL appears first in the input but UCL is preferred
    let comps = select_competitions(&finals(), &preference());
    assert_eq!(comps, vec!["UCL", "UEL"]);
}

#[test]
fn unknown_competitions_are_not_columns() {
    let mut data = finals();
    data.push(rec("UECL", 2023, 2, "West Ham", "England"));
    let sel = select(&data, &mapping(), &preference()).expect("select");
    assert_eq!(sel.competitions, vec!["UCL", "UEL"]);
}

#[test]
fn years_are_distinct_and_sorted_as_strings() {
    let data = vec![
        rec("UCL", 2021, 2, "Chelsea", "England"),
        rec("UCL", 1999, 2, "Manchester United", "England"),
        rec("UCL", 2021, 1, "Manchester City", "England"),
        ResultRecord::new("UCL", 2).with_field("year", "2005").with_field("team", "Liverpool"),
    ];
    let years = select_years(&data, &mapping()).expect("years");
    assert_eq!(years, vec!["1999", "2005", "2021"]);
}

#[test]
fn float_year_keys_coerce_without_fraction() {
    let data = vec![ResultRecord::new("UCL", 2).with_field("year", 2020.0).with_field("team", "Bayern")];
    assert_eq!(select_years(&data, &mapping()).unwrap(), vec!["2020"]);
}

#[test]
fn missing_row_key_is_a_layout_error() {
    let data = vec![ResultRecord::new("UCL", 2).with_field("team", "Bayern")];
    let err = select_years(&data, &mapping()).unwrap_err();
    assert_eq!(err, LayoutError::MissingField { index: 0, field: "year".into() });
}

#[test]
fn only_ucl_gives_one_column_and_no_uel_cells() {
    let data = vec![
        rec("UCL", 2020, 2, "Bayern Munich", "Germany"),
        rec("UCL", 2020, 1, "Paris Saint-Germain", "France"),
        rec("UCL", 2021, 2, "Chelsea", "England"),
        rec("UCL", 2021, 1, "Manchester City", "England"),
    ];
    let sel = select(&data, &mapping(), &preference()).unwrap();
    assert_eq!(sel.competitions, vec!["UCL"]);
    assert_eq!(sel.years, vec!["2020", "2021"]);

    let cells = build_cells(&data, &mapping(), &sel, DuplicatePolicy::FirstMatch).unwrap();
    assert!(cells.len() <= 4);
    assert_eq!(cells.len(), 4);
    assert!(cells.iter().all(|c| c.competition == "UCL" && c.col == 0));
}

#[test]
fn cells_exist_exactly_for_matching_results() {
    let mut data = finals();
    // drop the 2022 UEL runner-up and add noise that must be ignored
    data.retain(|r| r.fields.get("team").and_then(|t| t.as_str()) != Some("Rangers"));
    data.push(rec("UEL", 2022, 0, "Leipzig", "Germany"));
    data.push(rec("UEL", 2022, 3, "West Ham", "England"));

    let sel = select(&data, &mapping(), &preference()).unwrap();
    let cells = build_cells(&data, &mapping(), &sel, DuplicatePolicy::FirstMatch).unwrap();
    assert_eq!(cells.len(), 7);

    for year in &sel.years {
        for comp in &sel.competitions {
            for (row, value) in [(0usize, 2i64), (1, 1)] {
                let has_record = data.iter().any(|r| {
                    &r.competition == comp
                        && r.value == value
                        && r.fields.get("year").map(|y| y.to_string()) == Some(year.clone())
                });
                let has_cell = cells.iter().any(|c| &c.competition == comp && &c.year == year && c.row == row);
                assert_eq!(has_record, has_cell, "{comp} {year} row {row}");
            }
        }
    }
}

#[test]
fn cells_carry_indices_and_order() {
    let sel = select(&finals(), &mapping(), &preference()).unwrap();
    let cells = build_cells(&finals(), &mapping(), &sel, DuplicatePolicy::FirstMatch).unwrap();
    let keys: Vec<String> = cells.iter().map(|c| c.key()).collect();
    assert_eq!(
        keys,
        vec![
            "UCL_2022_0", "UCL_2022_1", "UEL_2022_0", "UEL_2022_1",
            "UCL_2023_0", "UCL_2023_1", "UEL_2023_0", "UEL_2023_1",
        ]
    );
    let sevilla = cells.iter().find(|c| c.team == "Sevilla").unwrap();
    assert_eq!((sevilla.comp_idx, sevilla.year_idx, sevilla.row, sevilla.col), (1, 1, 0, 1));
    assert_eq!(sevilla.value, 2);
    assert_eq!(sevilla.country.as_deref(), Some("Spain"));
}

#[test]
fn first_year_band_flags_winner_and_runner_up() {
    let sel = select(&finals(), &mapping(), &preference()).unwrap();
    let cells = build_cells(&finals(), &mapping(), &sel, DuplicatePolicy::FirstMatch).unwrap();
    let label = |team: &str| cells.iter().find(|c| c.team == team).unwrap().team_label();

    assert_eq!(label("Real Madrid"), "Real Madrid [W]");
    assert_eq!(label("Liverpool"), "Liverpool [R]");
    assert_eq!(label("Manchester City"), "Manchester City");
    assert_eq!(label("Inter"), "Inter");
}

#[test]
fn duplicates_take_first_match_by_default() {
    let mut data = finals();
    data.push(rec("UCL", 2023, 2, "Impostor FC", "France"));
    let sel = select(&data, &mapping(), &preference()).unwrap();
    let cells = build_cells(&data, &mapping(), &sel, DuplicatePolicy::FirstMatch).unwrap();
    let winner = cells.iter().find(|c| c.key() == "UCL_2023_0").unwrap();
    assert_eq!(winner.team, "Manchester City");
    assert!(!cells.iter().any(|c| c.team == "Impostor FC"));
}

#[test]
fn strict_policy_rejects_duplicates() {
    let mut data = finals();
    data.push(rec("UCL", 2023, 2, "Impostor FC", "France"));
    let sel = select(&data, &mapping(), &preference()).unwrap();
    let err = build_cells(&data, &mapping(), &sel, DuplicatePolicy::Strict).unwrap_err();
    assert_eq!(
        err,
        LayoutError::DuplicateResult {
            competition: "UCL".into(),
            year: "2023".into(),
            role: "winner",
            first: 1,
            second: 8,
        }
    );
}

#[test]
fn matched_record_without_team_fails() {
    let data = vec![ResultRecord::new("UCL", 2).with_field("year", 2020)];
    let sel = select(&data, &mapping(), &preference()).unwrap();
    let err = build_cells(&data, &mapping(), &sel, DuplicatePolicy::FirstMatch).unwrap_err();
    assert_eq!(err, LayoutError::MissingField { index: 0, field: "team".into() });
}

#[test]
fn records_deserialize_with_mapped_fields() {
    let json = r#"{"competition":"UEL","season":2019,"value":"2","club":"Chelsea","country":"England"}"#;
    let r: ResultRecord = serde_json::from_str(json).expect("parse");
    assert_eq!(r.value, 2);
    assert_eq!(r.field_text(0, "season").unwrap(), "2019");
    assert_eq!(r.field_text(0, "club").unwrap(), "Chelsea");
    assert_eq!(r.field_text(0, "competition").unwrap(), "UEL");
}

#[test]
fn repeated_preference_yields_one_column() {
    let data = vec![rec("UCL", 2020, 2, "Bayern Munich", "Germany")];
    let preference = vec!["UCL".to_string(), "UCL".to_string()];
    let sel = select(&data, &mapping(), &preference).unwrap();
    assert_eq!(sel.competitions, vec!["UCL"]);

    let cells = build_cells(&data, &mapping(), &sel, DuplicatePolicy::FirstMatch).unwrap();
    assert_eq!(cells.len(), 1);
    assert_eq!((cells[0].key(), cells[0].col), ("UCL_2020_0".to_string(), 0));
}
