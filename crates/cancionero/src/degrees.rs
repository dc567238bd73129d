//! Absolute-chord to Roman-degree rewriting.
//!
//! `Dm7 G7 | Cmaj7` with tonic C becomes `IIm7 V7 | Imaj7`. Each line is
//! rewritten independently: recognized absolute chords are replaced in
//! place, everything else (spacing, bar separators, lyrics) passes through
//! verbatim.

use thiserror::Error;

use crate::grammar::{absolute_chords, AbsoluteChord, Accidental, Note, NoteName, NUMERALS};

/// Semitone offsets of the seven major-scale degrees.
const MAJOR_OFFSETS: [i8; 7] = [0, 2, 4, 5, 7, 9, 11];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DegreeError {
    /// The tonic did not resolve to one of the 12 pitch classes.
    #[error("unknown tonic: {0}")]
    UnknownTonic(String),
}

/// Rewrite absolute chord names as Roman degrees relative to `tonic`.
///
/// The tonic is a note name (`C`, `F#`, `Bb`); case of the letter does not
/// matter and trailing quality text (the `m` of `Fm`) is ignored. Chord
/// spellings in the body that the grammar cannot parse are left untouched.
pub fn convert_to_degrees(input: &str, tonic: &str) -> Result<String, DegreeError> {
    let tonic_pc =
        resolve_tonic(tonic).ok_or_else(|| DegreeError::UnknownTonic(tonic.to_string()))?;
    let converted: Vec<String> = input
        .split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .map(|l| convert_line(l, tonic_pc))
        .collect();
    Ok(converted.join("\n"))
}

/// Pitch class of the tonic's leading letter+accidental, if recognizable.
fn resolve_tonic(tonic: &str) -> Option<u8> {
    let mut chars = tonic.trim().chars();
    let name = NoteName::from_letter(chars.next()?)?;
    let accidental = chars.next().and_then(Accidental::from_char);
    Some(Note { name, accidental }.pitch_class())
}

fn convert_line(line: &str, tonic_pc: u8) -> String {
    let chords = absolute_chords(line);
    if chords.is_empty() {
        return line.to_string();
    }
    let mut out = String::with_capacity(line.len());
    let mut cursor = 0;
    for chord in chords {
        out.push_str(&line[cursor..chord.start]);
        out.push_str(&degree_token(&chord, tonic_pc));
        cursor = chord.end;
    }
    out.push_str(&line[cursor..]);
    out
}

fn degree_token(chord: &AbsoluteChord, tonic_pc: u8) -> String {
    let (degree, accidental) = nearest_degree(chord.root.pitch_class(), tonic_pc);
    let mut out = format!(
        "{}{}{}",
        accidental_glyph(accidental),
        NUMERALS[degree],
        normalize_quality(&chord.suffix)
    );
    if let Some(bass) = chord.bass {
        let (bass_degree, bass_accidental) = nearest_degree(bass.pitch_class(), tonic_pc);
        out.push('/');
        out.push_str(accidental_glyph(bass_accidental));
        out.push_str(NUMERALS[bass_degree]);
    }
    out
}

/// Closest scale degree to `pc` seen from the tonic. The signed semitone
/// distance is wrapped to [-6, +5]; the smallest absolute distance wins,
/// and on an exact tie the lower degree index (scanned first) is kept, so
/// the tritone lands flat-side deterministically.
fn nearest_degree(pc: u8, tonic_pc: u8) -> (usize, i8) {
    let mut best = (0, 0);
    let mut best_distance = i8::MAX;
    for (degree, offset) in MAJOR_OFFSETS.iter().enumerate() {
        let degree_pc = (tonic_pc as i8 + offset).rem_euclid(12);
        let distance = (pc as i8 - degree_pc + 18).rem_euclid(12) - 6;
        if distance.abs() < best_distance.abs() {
            best_distance = distance;
            best = (degree, distance.clamp(-2, 2));
        }
    }
    best
}

fn accidental_glyph(accidental: i8) -> &'static str {
    match accidental {
        -2 => "♭♭",
        -1 => "♭",
        1 => "♯",
        2 => "♯♯",
        _ => "",
    }
}

/// Suffixes pass through as written, except `dim7` which collapses to the
/// diminished symbol.
fn normalize_quality(suffix: &str) -> String {
    if suffix.eq_ignore_ascii_case("dim7") {
        "°7".to_string()
    } else {
        suffix.to_string()
    }
}
