//! Fixture-based tests for chart parsing, view projection, and degree
//! conversion.
//!
//! Each .song file in tests/fixtures/ is parsed and checked against the
//! projections and model properties it was written to exercise.

use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;

use cancionero::{both_text, chords_text, convert_to_degrees, lyrics_text, parse, Song};

fn load_fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(format!("{}.song", name));
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("failed to read fixture {}: {}", name, e))
}

fn parse_fixture(name: &str) -> Song {
    let result = parse(&load_fixture(name));
    assert!(
        result.feedback.is_empty(),
        "fixture {} produced feedback: {:?}",
        name,
        result.feedback
    );
    result.value
}

/// Collapse whitespace runs per line, dropping blank lines at the ends.
fn normalized(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Chord tokens of a chords view in order, headers dropped.
fn chord_stream(chords_view: &str) -> Vec<String> {
    chords_view
        .lines()
        .filter(|line| !line.starts_with('['))
        .flat_map(|line| line.split_whitespace())
        .map(str::to_string)
        .collect()
}

#[test]
fn test_evening_chart_model() {
    let song = parse_fixture("evening_chart");
    assert_eq!(song.sections.len(), 2);

    let intro = &song.sections[0];
    assert_eq!(intro.name, "Intro");
    assert!(intro.preceded_by_blank);
    assert_eq!(intro.note, None);
    assert_eq!(intro.rows.len(), 2);
    assert_eq!(intro.rows[0].bars, vec![0, 16]);
    assert_eq!(intro.rows[1].repeat, Some(2));
    assert!(intro.rows[1].lyrics.contains("(x2)"));

    let verso = &song.sections[1];
    assert_eq!(verso.name, "Verso");
    assert_eq!(verso.note.as_deref(), Some("IV"));
    assert_eq!(verso.rows.len(), 4);
    assert_eq!(verso.rows[3].modulation.as_deref(), Some("IV"));
    assert!(!verso.rows[2].preceded_by_blank);
    assert!(verso.rows[3].preceded_by_blank);
}

#[test]
fn test_evening_chart_chord_columns() {
    let song = parse_fixture("evening_chart");
    let chords = &song.sections[0].rows[0].chords;
    let spans: Vec<_> = chords
        .iter()
        .map(|c| (c.text.as_str(), c.start_col))
        .collect();
    assert_eq!(
        spans,
        [("IIm", 4), ("V7", 11), ("Imaj7", 20), ("VIm7", 28)]
    );
}

#[test]
fn test_evening_chart_carry_over() {
    let song = parse_fixture("evening_chart");
    // the open measure at the end of [Intro] is completed by the first
    // token of [Verso]
    let intro_last = song.sections[0].rows[1].bar_slices.last().unwrap();
    assert_eq!(intro_last.text, "IIIm7");
    let verso_first: Vec<_> = song.sections[1].rows[0]
        .bar_slices
        .iter()
        .map(|s| s.text.as_str())
        .collect();
    assert_eq!(verso_first, ["VIm7", "IIm"]);
}

#[test]
fn test_evening_chart_chords_view() {
    let song = parse_fixture("evening_chart");
    let expected = "\
[Intro]
IIm V7
Imaj7 VIm7
IIm V7
Imaj7
IIIm7
[Verso]
VIm7
IIm
V7
Imaj7
IIm
V7
IVmaj7
V7";
    assert_eq!(chords_text(&song), expected);
}

#[test]
fn test_evening_chart_lyrics_view() {
    let song = parse_fixture("evening_chart");
    let expected = "\
[Intro]
Donde la tarde cae,
Vuelve a sonar tu voz. (x2)

[Verso]
Nada queda por decir,
Si la noche nos oyo.
Nada mas quedo.
Otra vez amanecera.";
    assert_eq!(lyrics_text(&song), expected);
}

#[test]
fn test_evening_chart_both_view() {
    let song = parse_fixture("evening_chart");
    let expected = "\
[Intro]
IIm V7 Imaj7 VIm7
Donde la tarde cae,
IIm V7 Imaj7
Vuelve a sonar tu voz. (x2)
[Verso]
IIIm7 VIm7 IIm
Nada queda por decir,
V7 Imaj7
Si la noche nos oyo.
IIm V7
Nada mas quedo.
IVmaj7 V7
Otra vez amanecera.";
    assert_eq!(normalized(&both_text(&song)), expected);
}

/// Re-parsing the Both projection keeps every lyric line and every chord
/// token, in order. Without bar separators the reparse regroups measures
/// across rows, so chords are compared as a flat token stream.
#[test]
fn test_projection_idempotence() {
    let song = parse_fixture("evening_chart");
    let reparsed = parse(&both_text(&song)).value;

    assert_eq!(
        normalized(&lyrics_text(&reparsed)),
        normalized(&lyrics_text(&song))
    );
    assert_eq!(
        chord_stream(&chords_text(&reparsed)),
        chord_stream(&chords_text(&song))
    );
}

/// Carry-over moves chord text between neighboring slices but never loses
/// or duplicates a token: the slice stream equals the chord lines with the
/// pipes removed.
#[test]
fn test_bar_slices_conserve_chord_content() {
    let song = parse_fixture("evening_chart");
    let from_slices: Vec<String> = song
        .sections
        .iter()
        .flat_map(|s| &s.rows)
        .flat_map(|r| &r.bar_slices)
        .flat_map(|s| s.text.split_whitespace())
        .map(str::to_string)
        .collect();
    let from_lines: Vec<String> = song
        .sections
        .iter()
        .flat_map(|s| &s.rows)
        .flat_map(|r| {
            r.chord_line
                .split(|c: char| c == '|' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();
    assert_eq!(from_slices, from_lines);
}

/// Per-row slice partition on a chart where no row triggers carry-over.
#[test]
fn test_bar_slice_partition_per_row() {
    let song = parse_fixture("absolute_chart");
    for row in song.sections.iter().flat_map(|s| &s.rows) {
        let joined = row
            .bar_slices
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let joined = joined.split_whitespace().collect::<Vec<_>>().join(" ");
        let line = row
            .chord_line
            .replace('|', " ")
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        assert_eq!(joined, line, "row {:?}", row.chord_line);
    }
}

#[test]
fn test_absolute_chart_converts_and_reparses() {
    let converted = convert_to_degrees(&load_fixture("absolute_chart"), "C").unwrap();
    let song = parse(&converted).value;

    let expected = "\
[Coro]
IIm7 V7
Imaj7
III/♯V VIm
♯IVm7♭5";
    assert_eq!(chords_text(&song), expected);

    // lyrics are untouched by the conversion
    assert_eq!(
        lyrics_text(&song),
        "[Coro]\nDonde naciste tu,\nDonde volvere a cantar."
    );
}

/// Every fixture in the directory is exercised by a test above.
#[test]
fn test_all_fixtures_are_covered() {
    let fixtures_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");

    let tested = ["evening_chart", "absolute_chart"];
    for entry in fs::read_dir(&fixtures_dir).expect("failed to read fixtures directory") {
        let path = entry.expect("bad directory entry").path();
        if path.extension().is_some_and(|e| e == "song") {
            let name = path.file_stem().unwrap().to_str().unwrap().to_string();
            assert!(
                tested.contains(&name.as_str()),
                "fixture {} exists but has no test",
                name
            );
        }
    }
}
