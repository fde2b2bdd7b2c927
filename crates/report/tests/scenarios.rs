#![forbid(unsafe_code)]

use ogmap_core::{CoordPolicy, DocumentRole, FilterConfig, StatusSet};
use ogmap_report::{build_rows, generate_report, ReportError};

fn players_xml(players: &[(&str, &str, &str)]) -> String {
    let mut s = String::from("<players>");
    for (id, name, status) in players {
        s.push_str(&format!(r#"<player id="{}" name="{}" status="{}"/>"#, id, name, status));
    }
    s.push_str("</players>");
    s
}

fn planets_xml(planets: &[(&str, &str)]) -> String {
    let mut s = String::from("<universe>");
    for (i, (player, coords)) in planets.iter().enumerate() {
        s.push_str(&format!(r#"<planet id="{}" player="{}" name="P" coords="{}"/>"#, i, player, coords));
    }
    s.push_str("</universe>");
    s
}

fn highscore_xml(scores: &[(&str, &str)]) -> String {
    let mut s = String::from(r#"<highscore category="1" type="0">"#);
    for (id, score) in scores {
        s.push_str(&format!(r#"<player id="{}" score="{}"/>"#, id, score));
    }
    s.push_str("</highscore>");
    s
}

fn excluding(tokens: &[&str]) -> FilterConfig {
    FilterConfig { excluded_statuses: tokens.iter().map(|t| t.to_string()).collect::<StatusSet>(), ..FilterConfig::permissive() }
}

fn run(players: &str, planets: &str, highscore: Option<&str>, cfg: &FilterConfig) -> Vec<String> {
    let mut out = Vec::new();
    generate_report(players, planets, highscore, cfg, &mut out).unwrap();
    String::from_utf8(out).unwrap().lines().map(str::to_string).collect()
}

#[test]
fn single_kept_player_yields_named_row() {
    let lines = run(&players_xml(&[("1", "Alice", "")]), &planets_xml(&[("1", "1:2:3")]), None, &excluding(&[]));
    assert_eq!(lines, ["Alice ; 1:2:3"]);
}

#[test]
fn excluded_status_removes_player() {
    let lines = run(&players_xml(&[("1", "Alice", "i")]), &planets_xml(&[("1", "1:2:3")]), None, &excluding(&["i"]));
    assert!(lines.is_empty());
}

#[test]
fn systems_only_deduplicates_by_system() {
    let cfg = FilterConfig { systems_only: true, ..excluding(&[]) };
    let lines = run(&players_xml(&[("1", "Alice", "")]), &planets_xml(&[("1", "1:2:3"), ("1", "1:2:9")]), None, &cfg);
    assert_eq!(lines, ["1:2"]);
}

#[test]
fn systems_only_keeps_system_text_verbatim() {
    let cfg = FilterConfig { systems_only: true, ..excluding(&[]) };
    let planets = planets_xml(&[("1", "1:2:4"), ("1", "01:2:3"), ("1", "01:2:7")]);
    let lines = run(&players_xml(&[("1", "Alice", "")]), &planets, None, &cfg);
    assert_eq!(lines, ["01:2", "1:2"]);
}

#[test]
fn score_below_minimum_excludes_player() {
    let cfg = FilterConfig { min_score: Some(1000), ..excluding(&[]) };
    let hs = highscore_xml(&[("1", "500")]);
    let lines = run(&players_xml(&[("1", "Alice", "")]), &planets_xml(&[("1", "1:2:3")]), Some(&hs), &cfg);
    assert!(lines.is_empty());

    let cfg = FilterConfig { min_score: Some(500), ..cfg };
    let lines = run(&players_xml(&[("1", "Alice", "")]), &planets_xml(&[("1", "1:2:3")]), Some(&hs), &cfg);
    assert_eq!(lines, ["Alice ; 1:2:3"]);
}

#[test]
fn planet_of_unknown_player_is_dropped() {
    let (rows, summary) = build_rows(
        &players_xml(&[("1", "Alice", "")]),
        &planets_xml(&[("99", "1:1:1"), ("1", "1:2:3")]),
        None,
        &excluding(&[]),
    )
    .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(summary.planets_seen, 2);
    assert_eq!(summary.planets_dropped, 1);
    assert_eq!(summary.player_count, 1);
}

#[test]
fn empty_players_document_yields_empty_report() {
    let lines = run("<players/>", &planets_xml(&[("1", "1:2:3"), ("2", "4:5:6")]), None, &excluding(&[]));
    assert!(lines.is_empty());
}

#[test]
fn unnamed_player_falls_back_to_id() {
    let lines = run(&players_xml(&[("42", "", "")]), &planets_xml(&[("42", "3:3:3")]), None, &excluding(&[]));
    assert_eq!(lines, ["42 ; 3:3:3"]);
}

#[test]
fn any_excluded_token_is_enough() {
    let players = players_xml(&[("1", "Alice", "v,I"), ("2", "Bob", "a"), ("3", "Carol", "")]);
    let planets = planets_xml(&[("1", "1:1:1"), ("2", "1:1:2"), ("3", "1:1:3")]);
    assert_eq!(run(&players, &planets, None, &excluding(&["I"])), ["Bob ; 1:1:2", "Carol ; 1:1:3"]);
    assert_eq!(run(&players, &planets, None, &FilterConfig::default()), ["Carol ; 1:1:3"]);
}

#[test]
fn coords_are_kept_verbatim_but_sorted_numerically() {
    let players = players_xml(&[("1", "Alice", "")]);
    let planets = planets_xml(&[("1", "2:1:1"), ("1", "1:010:4"), ("1", "1:9:12")]);
    assert_eq!(run(&players, &planets, None, &excluding(&[])), ["Alice ; 1:9:12", "Alice ; 1:010:4", "Alice ; 2:1:1"]);
}

#[test]
fn repeated_player_id_takes_last_outcome() {
    let planets = planets_xml(&[("1", "1:1:1")]);
    let kept_then_excluded = players_xml(&[("1", "Alice", ""), ("1", "Alice", "i")]);
    assert!(run(&kept_then_excluded, &planets, None, &excluding(&["i"])).is_empty());

    let excluded_then_kept = players_xml(&[("1", "Alice", "i"), ("1", "Alicia", "")]);
    assert_eq!(run(&excluded_then_kept, &planets, None, &excluding(&["i"])), ["Alicia ; 1:1:1"]);
}

#[test]
fn malformed_document_writes_nothing() {
    let cfg = excluding(&[]);
    let mut out = Vec::new();
    let err = generate_report(&players_xml(&[("1", "A", "")]), "<universe><planet", None, &cfg, &mut out).unwrap_err();
    match err {
        ReportError::DocumentParse { role, .. } => assert_eq!(role, DocumentRole::Planets),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(out.is_empty());

    let cfg = FilterConfig { min_score: Some(1), ..cfg };
    let err = generate_report("<players/>", "<universe/>", Some("<highscore>"), &cfg, &mut out).unwrap_err();
    assert!(matches!(err, ReportError::DocumentParse { role: DocumentRole::Highscore, .. }));
    assert!(out.is_empty());
}

#[test]
fn malformed_coordinate_policy() {
    let players = players_xml(&[("1", "Alice", "")]);
    let planets = planets_xml(&[("1", "1:2"), ("1", "1:2:3")]);

    let (rows, summary) = build_rows(&players, &planets, None, &excluding(&[])).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(summary.malformed_coords, 1);

    let strict = FilterConfig { coord_policy: CoordPolicy::Abort, ..excluding(&[]) };
    let mut out = Vec::new();
    match generate_report(&players, &planets, None, &strict, &mut out) {
        Err(ReportError::MalformedCoordinate { raw }) => assert_eq!(raw, "1:2"),
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(out.is_empty());
}

#[test]
fn score_filter_without_highscore_is_rejected() {
    let cfg = FilterConfig { min_score: Some(10), ..excluding(&[]) };
    let mut out = Vec::new();
    let err = generate_report("<players/>", "<universe/>", None, &cfg, &mut out).unwrap_err();
    assert!(matches!(err, ReportError::MissingHighscore));
}

#[test]
fn output_is_newline_terminated() {
    let mut out = Vec::new();
    let summary = generate_report(
        &players_xml(&[("1", "Alice", "")]),
        &planets_xml(&[("1", "1:2:3"), ("1", "1:2:4")]),
        None,
        &excluding(&[]),
        &mut out,
    )
    .unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), "Alice ; 1:2:3\nAlice ; 1:2:4\n");
    assert_eq!(summary.row_count, 2);
    assert!(!summary.systems_only);
}
