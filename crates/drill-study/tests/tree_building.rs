//! End-to-end tests: PGN bytes → merged table → study lines.

use drill_core::enums::{PreamblePolicy, QualityMark, Side};
use drill_core::highlight::{Highlight, HighlightColor};
use drill_study::{
    PositionTable, StudyError, StudyEvent, StudyLine, TreeBuilder, extract_lines, parse_study,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use shakmaty::Square;

const ITALIAN: &str = include_str!("fixtures/italian.pgn");
const SICILIAN: &str = include_str!("fixtures/sicilian.pgn");

fn build(docs: &[&str]) -> PositionTable {
    let mut builder = TreeBuilder::new();
    for (i, doc) in docs.iter().enumerate() {
        let events = parse_study(doc.as_bytes()).unwrap();
        builder.ingest(&format!("doc-{i}"), &events).unwrap();
    }
    builder.finish()
}

fn lines(docs: &[&str], side: Side) -> Vec<StudyLine> {
    extract_lines(&build(docs), side, PreamblePolicy::Attach).unwrap()
}

fn sans(line: &StudyLine) -> Vec<&str> {
    line.moves.iter().map(|m| m.san.as_str()).collect()
}

fn answers(line: &StudyLine) -> Vec<&str> {
    line.answers.iter().map(|m| m.san.as_str()).collect()
}

fn find<'a>(lines: &'a [StudyLine], moves: &[&str]) -> &'a StudyLine {
    lines
        .iter()
        .find(|l| sans(l) == moves)
        .unwrap_or_else(|| panic!("no line for {moves:?}"))
}

#[test]
fn italian_yields_one_line_per_white_decision() {
    let lines = lines(&[ITALIAN], Side::White);
    assert_eq!(lines.len(), 6);

    let root = find(&lines, &[]);
    assert_eq!(answers(root), vec!["e4"]);
    assert_eq!(root.root_comments, vec!["White repertoire: the Italian.".to_string()]);

    let two_knights = find(&lines, &["e4", "e5", "Nf3", "Nc6", "Bc4", "Nf6"]);
    assert_eq!(two_knights.moves[5].comments, vec!["Two knights".to_string()]);
    assert_eq!(answers(two_knights), vec!["d3"]);
    assert_eq!(two_knights.answers[0].mark, Some(QualityMark::Good));
}

#[test]
fn black_lines_come_from_black_decisions() {
    let lines = lines(&[ITALIAN], Side::Black);
    assert!(lines.iter().all(|l| !l.answers.is_empty()));
    let last = find(&lines, &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "c3"]);
    assert_eq!(answers(last), vec!["Nf6"]);
}

#[test]
fn comment_highlights_are_stripped_and_attached() {
    let lines = lines(&[ITALIAN], Side::White);
    let after_c3 = find(&lines, &["e4", "e5", "Nf3", "Nc6", "Bc4", "Bc5", "c3", "Nf6"]);
    assert!(after_c3.moves[7].comments.is_empty());
    assert_eq!(
        after_c3.highlights,
        vec![Highlight::Fill {
            square: Square::E4,
            color: HighlightColor::Red
        }]
    );

    let black = extract_lines(&build(&[ITALIAN]), Side::Black, PreamblePolicy::Attach).unwrap();
    let after_bc4 = find(&black, &["e4", "e5", "Nf3", "Nc6", "Bc4"]);
    assert_eq!(after_bc4.moves[4].comments, vec!["Eyeing f7".to_string()]);
    assert_eq!(
        after_bc4.highlights,
        vec![Highlight::Arrow {
            from: Square::C4,
            to: Square::F7,
            color: HighlightColor::Green
        }]
    );
}

#[test]
fn games_in_one_document_share_the_table() {
    let lines = lines(&[SICILIAN], Side::Black);
    assert_eq!(lines.len(), 6);

    let after_e4 = find(&lines, &["e4"]);
    assert_eq!(answers(after_e4), vec!["c5"]);

    let after_nf3 = find(&lines, &["e4", "c5", "Nf3"]);
    assert_eq!(answers(after_nf3), vec!["Nc6", "d6"]);
    assert_eq!(after_nf3.answers[0].mark, Some(QualityMark::Interesting));

    let alapin = find(&lines, &["e4", "c5", "c3"]);
    assert_eq!(alapin.moves[2].comments, vec!["The Alapin".to_string()]);
    assert_eq!(answers(alapin), vec!["d5"]);
}

#[test]
fn transpositions_merge_into_one_node() {
    let a = "1. Nf3 Nf6 2. g3 g6 *";
    let b = "1. g3 g6 2. Nf3 Nf6 3. Bg2 *";
    let table = build(&[a, b]);
    // Start, Nf3, Nf3 Nf6, Nf3 Nf6 g3, g3, g3 g6, g3 g6 Nf3, merged KID setup,
    // and Bg2.
    assert_eq!(table.len(), 9);

    let lines = extract_lines(&table, Side::White, PreamblePolicy::Attach).unwrap();
    assert_eq!(lines.len(), 4);
    assert_eq!(answers(find(&lines, &[])), vec!["Nf3", "g3"]);

    // The merged node keeps the smaller path and the continuation learned
    // along the other one.
    let merged = find(&lines, &["Nf3", "Nf6", "g3", "g6"]);
    assert_eq!(answers(merged), vec!["Bg2"]);
}

#[test]
fn input_order_does_not_change_the_result() {
    let a = "1. Nf3 Nf6 2. g3 g6 { Fianchetto } *";
    let b = "1. g3 g6 2. Nf3 Nf6 3. Bg2 $1 *";

    let forward: Vec<String> = lines(&[a, b, ITALIAN], Side::White)
        .iter()
        .map(StudyLine::signature)
        .collect();
    let backward: Vec<String> = lines(&[ITALIAN, b, a], Side::White)
        .iter()
        .map(StudyLine::signature)
        .collect();
    assert_eq!(forward, backward);
}

#[rstest]
#[case(&["1. e4! *", "1. e4! *"], Some(QualityMark::Good))]
#[case(&["1. e4! *"], Some(QualityMark::Good))]
#[case(&["1. e4! *", "1. e4?! *"], None)]
#[case(&["1. e4 $1 *", "1. e4 $14 *"], Some(QualityMark::Good))]
fn conflicting_marks_are_dropped(#[case] docs: &[&str], #[case] expected: Option<QualityMark>) {
    let lines = lines(docs, Side::White);
    let root = find(&lines, &[]);
    assert_eq!(root.answers[0].mark, expected);
}

#[test]
fn variation_start_comment_attaches_to_its_first_move() {
    let pgn = "1. e4 e5 ( { Sicilian } 1... c5 2. Nf3 ) 2. Nf3 *";
    let lines = lines(&[pgn], Side::White);
    let sicilian = find(&lines, &["e4", "c5"]);
    assert_eq!(sicilian.moves[1].comments, vec!["Sicilian".to_string()]);
    assert_eq!(answers(sicilian), vec!["Nf3"]);
    // The main line is unaffected.
    assert!(find(&lines, &["e4", "e5"]).moves[1].comments.is_empty());
}

#[test]
fn sibling_variations_rewind_to_the_same_position() {
    let pgn = "1. e4 ( 1. d4 d5 ) ( 1. c4 e5 ) 1... e5 *";
    let lines = lines(&[pgn], Side::White);
    assert_eq!(answers(find(&lines, &[])), vec!["c4", "d4", "e4"]);
}

#[rstest]
#[case(PreamblePolicy::Attach, vec!["Repertoire".to_string()])]
#[case(PreamblePolicy::Discard, vec![])]
fn preamble_policy_controls_root_comments(
    #[case] policy: PreamblePolicy,
    #[case] expected: Vec<String>,
) {
    let table = build(&["{ Repertoire } 1. e4 e5 2. Nf3 *"]);
    let lines = extract_lines(&table, Side::White, policy).unwrap();
    for line in &lines {
        assert_eq!(line.root_comments, expected);
    }
}

#[test]
fn setup_header_roots_the_game() {
    let pgn = "[SetUp \"1\"]\n[FEN \"4k3/8/8/8/8/8/4P3/4K3 b - - 0 1\"]\n\n1... Kd7 2. e4 Kc6 *";
    let lines = lines(&[pgn], Side::Black);
    assert_eq!(lines.len(), 2);
    let root = find(&lines, &[]);
    assert_eq!(root.root_fen, "4k3/8/8/8/8/8/4P3/4K3 b - - 0 1");
    assert_eq!(answers(root), vec!["Kd7"]);
}

#[test]
fn illegal_move_rejects_the_whole_document() {
    let mut builder = TreeBuilder::new();
    builder
        .ingest("good", &parse_study(b"1. e4 e5 *").unwrap())
        .unwrap();

    let bad = parse_study(b"1. d4 d5 2. Ke3 *").unwrap();
    let err = builder.ingest("bad", &bad).unwrap_err();
    assert!(matches!(err, StudyError::IllegalMove { ref san, .. } if san == "Ke3"));
    assert!(err.is_document_error());
    assert_eq!(builder.documents(), 1);

    // Nothing from the failed document leaked in, not even 1. d4.
    let table = builder.finish();
    assert_eq!(table.len(), 3);
}

#[test]
fn invalid_setup_is_a_document_error() {
    let events = vec![
        StudyEvent::BeginGame {
            setup: Some("not a fen".into()),
        },
        StudyEvent::EndGame,
    ];
    let err = TreeBuilder::new().ingest("setup", &events).unwrap_err();
    assert!(matches!(err, StudyError::InvalidSetup { .. }));
}

#[test]
fn variation_without_a_move_is_a_document_error() {
    let events = vec![
        StudyEvent::BeginGame { setup: None },
        StudyEvent::BeginVariation,
        StudyEvent::EndVariation,
        StudyEvent::EndGame,
    ];
    let err = TreeBuilder::new().ingest("orphan", &events).unwrap_err();
    assert!(matches!(err, StudyError::Malformed { .. }));
}

#[test]
fn empty_document_contributes_nothing() {
    let table = build(&[""]);
    assert!(table.is_empty());
    assert!(
        extract_lines(&table, Side::White, PreamblePolicy::Attach)
            .unwrap()
            .is_empty()
    );
}

#[test]
fn check_suffix_does_not_split_identity() {
    let a = "1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7# *";
    let b = "1. e4 e5 2. Qh5 Nc6 3. Bc4 Nf6 4. Qxf7 *";
    let lines = lines(&[a, b], Side::White);
    let mate = find(&lines, &["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6"]);
    assert_eq!(answers(mate), vec!["Qxf7"]);
}
