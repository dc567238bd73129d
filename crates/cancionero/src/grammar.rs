//! Chord-token grammar shared by the chart parser and the degree converter.
//!
//! Two token languages share these definitions: degree chords written with
//! Roman numerals (`IIm`, `bVII`, `Imaj7`) on chart chord lines, and
//! absolute chords (`Dmaj7`, `F#m7`, `E/G#`) rewritten by the converter.
//! Both scanners are leftmost and non-overlapping, and every token is
//! anchored on word boundaries: no ASCII word character (alphanumeric or
//! underscore) may directly precede or follow a match. Quality markers are
//! matched with a retry so that longer spellings are never mis-split from
//! the extension run that follows them (`Imaj7` is an extension, not the
//! quality `m`; `Cm7b5` is quality `m7` plus alteration `b5`).

use winnow::combinator::{alt, opt};
use winnow::prelude::*;
use winnow::token::one_of;

use crate::song::ChordToken;

type PResult<T> = winnow::ModalResult<T>;

/// The seven letter names, with semitone arithmetic rooted at C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteName {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl NoteName {
    /// Semitone offset from C (0-11).
    pub fn to_semitone(self) -> i8 {
        match self {
            NoteName::C => 0,
            NoteName::D => 2,
            NoteName::E => 4,
            NoteName::F => 5,
            NoteName::G => 7,
            NoteName::A => 9,
            NoteName::B => 11,
        }
    }

    /// Parse from a letter, either case.
    pub fn from_letter(c: char) -> Option<NoteName> {
        match c.to_ascii_uppercase() {
            'C' => Some(NoteName::C),
            'D' => Some(NoteName::D),
            'E' => Some(NoteName::E),
            'F' => Some(NoteName::F),
            'G' => Some(NoteName::G),
            'A' => Some(NoteName::A),
            'B' => Some(NoteName::B),
            _ => None,
        }
    }
}

/// A written sharp or flat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accidental {
    Sharp,
    Flat,
}

impl Accidental {
    pub fn to_semitone_offset(self) -> i8 {
        match self {
            Accidental::Sharp => 1,
            Accidental::Flat => -1,
        }
    }

    pub fn from_char(c: char) -> Option<Accidental> {
        match c {
            '#' => Some(Accidental::Sharp),
            'b' => Some(Accidental::Flat),
            _ => None,
        }
    }
}

/// A spelled note: letter plus optional accidental (`G#`, `Bb`, `E`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub name: NoteName,
    pub accidental: Option<Accidental>,
}

impl Note {
    /// Pitch class 0-11. Plain letter-plus-offset arithmetic, which also
    /// covers the enharmonic edge spellings (B# = 0, Cb = 11, E# = 5,
    /// Fb = 4).
    pub fn pitch_class(self) -> u8 {
        let offset = self
            .accidental
            .map(Accidental::to_semitone_offset)
            .unwrap_or(0);
        (self.name.to_semitone() + offset).rem_euclid(12) as u8
    }
}

/// Roman numerals for the seven scale degrees.
pub const NUMERALS: [&str; 7] = ["I", "II", "III", "IV", "V", "VI", "VII"];

/// Parse an absolute note name: uppercase letter A-G, optional `#`/`b`.
pub fn parse_note(input: &mut &str) -> PResult<Note> {
    let c = one_of(['A', 'B', 'C', 'D', 'E', 'F', 'G']).parse_next(input)?;
    let name = match c {
        'A' => NoteName::A,
        'B' => NoteName::B,
        'C' => NoteName::C,
        'D' => NoteName::D,
        'E' => NoteName::E,
        'F' => NoteName::F,
        'G' => NoteName::G,
        _ => unreachable!(), // one_of already validated the character
    };
    let accidental = opt(one_of(['#', 'b']))
        .parse_next(input)?
        .and_then(Accidental::from_char);
    Ok(Note { name, accidental })
}

/// Parse a Roman numeral, longest spelling first. Lowercase spellings are
/// equally valid numeral text on chord lines.
fn parse_numeral<'s>(input: &mut &'s str) -> PResult<&'s str> {
    alt((
        "III", "iii", "VII", "vii", "II", "ii", "IV", "iv", "VI", "vi", "I", "i", "V", "v",
    ))
    .parse_next(input)
}

fn numeral_len(rest: &str) -> Option<usize> {
    let mut s = rest;
    let matched = parse_numeral(&mut s).ok()?;
    Some(matched.len())
}

/// ASCII word character, the boundary alphabet for token anchoring.
fn is_word(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn boundary_before(line: &str, at: usize) -> bool {
    line[..at].chars().next_back().map_or(true, |c| !is_word(c))
}

fn boundary_after(line: &str, at: usize) -> bool {
    line[at..].chars().next().map_or(true, |c| !is_word(c))
}

fn digits_len(rest: &str) -> usize {
    rest.chars().take_while(char::is_ascii_digit).count()
}

// ---------------------------------------------------------------------------
// Degree-chord tokens (chart chord lines)
// ---------------------------------------------------------------------------

/// Quality marker in the degree grammar: `m`, `°`, `ø`, `dim`, `aug`, or
/// `sus` with optional digits. Returns the matched byte length.
fn degree_quality_len(rest: &str) -> Option<usize> {
    for q in ["dim", "aug", "°", "ø", "m"] {
        if rest.starts_with(q) {
            return Some(q.len());
        }
    }
    rest.strip_prefix("sus").map(|tail| 3 + digits_len(tail))
}

/// One degree-grammar extension token: `maj7`, `add<N>`, `b<N>`/`#<N>`, or
/// a bare `6|7|9|11|13`.
fn degree_extension_len(rest: &str) -> Option<usize> {
    if rest.starts_with("maj7") {
        return Some(4);
    }
    for prefix in ["add", "b", "#"] {
        if let Some(tail) = rest.strip_prefix(prefix) {
            let d = digits_len(tail);
            if d > 0 {
                return Some(prefix.len() + d);
            }
        }
    }
    for ext in ["11", "13"] {
        if rest.starts_with(ext) {
            return Some(2);
        }
    }
    for ext in ["6", "7", "9"] {
        if rest.starts_with(ext) {
            return Some(1);
        }
    }
    None
}

fn degree_extensions_len(rest: &str) -> usize {
    let mut len = 0;
    while let Some(ext) = degree_extension_len(&rest[len..]) {
        len += ext;
    }
    len
}

/// Try to match a degree chord token starting at byte `at`. Returns the
/// matched byte length.
fn match_degree_token(line: &str, at: usize) -> Option<usize> {
    let rest = &line[at..];

    // Optional leading accidental, only when a numeral follows it.
    let acc_len = match rest.chars().next() {
        Some('b') | Some('#') if numeral_len(&rest[1..]).is_some() => 1,
        _ => 0,
    };
    let len = acc_len + numeral_len(&rest[acc_len..])?;

    // Quality first; retried without it so `Imaj7` lexes as an extension run.
    let with_quality = degree_quality_len(&rest[len..]).map(|q| len + q);
    for start in [with_quality, Some(len)] {
        let Some(start) = start else { continue };
        let end = start + degree_extensions_len(&rest[start..]);
        if boundary_after(line, at + end) {
            return Some(end);
        }
    }
    None
}

/// Scan a chord line for degree-chord tokens, recording each token's
/// character column (tabs are expected to be expanded already).
pub fn degree_tokens(line: &str) -> Vec<ChordToken> {
    let mut tokens = Vec::new();
    let mut i = 0;
    let mut col = 0;
    while i < line.len() {
        if boundary_before(line, i) {
            if let Some(len) = match_degree_token(line, i) {
                let text = &line[i..i + len];
                tokens.push(ChordToken {
                    text: text.to_string(),
                    start_col: col,
                });
                col += text.chars().count();
                i += len;
                continue;
            }
        }
        let c = line[i..].chars().next().unwrap();
        i += c.len_utf8();
        col += 1;
    }
    tokens
}

// ---------------------------------------------------------------------------
// Absolute chords (degree converter input)
// ---------------------------------------------------------------------------

/// One absolute chord recognized in a line of text, with its byte span.
#[derive(Debug, Clone, PartialEq)]
pub struct AbsoluteChord {
    pub root: Note,
    /// Quality and extension run, verbatim as written.
    pub suffix: String,
    pub bass: Option<Note>,
    pub start: usize,
    pub end: usize,
}

/// Named quality alternatives of the absolute grammar, in match-preference
/// order. A shorter spelling wins only if the rest of the token still
/// scans; otherwise the next alternative is tried (`Cm7` takes `m7`, not
/// `m` + an unmatchable `7`).
const ABSOLUTE_QUALITIES: [&str; 14] = [
    "maj7", "maj9", "maj11", "maj13", "m", "m7", "m9", "m11", "m13", "m6", "mMaj7", "dim7",
    "dim", "aug",
];

/// Accidental alterations shared by the quality slot and the extension run.
const ALTERATIONS: [&str; 8] = ["b5", "#5", "b9", "#9", "b11", "#11", "b13", "#13"];

/// Byte lengths of every quality alternative matching at the start of
/// `rest`, in preference order, ending with the empty quality.
fn absolute_quality_candidates(rest: &str) -> Vec<usize> {
    let mut out = Vec::new();
    for q in ABSOLUTE_QUALITIES {
        if rest.starts_with(q) {
            out.push(q.len());
        }
    }
    if let Some(tail) = rest.strip_prefix("add") {
        let d = digits_len(tail);
        if d > 0 {
            out.push(3 + d);
        }
    }
    if let Some(tail) = rest.strip_prefix("sus") {
        out.push(3 + digits_len(tail));
    }
    for q in ["°", "ø"] {
        if rest.starts_with(q) {
            out.push(q.len());
        }
    }
    for q in ["6", "7", "9", "11", "13"] {
        if rest.starts_with(q) {
            out.push(q.len());
        }
    }
    for q in ALTERATIONS {
        if rest.starts_with(q) {
            out.push(q.len());
        }
    }
    out.push(0);
    out
}

/// One absolute-grammar extension token: `add<N>`, `sus<digits?>`, or an
/// accidental alteration.
fn absolute_extension_len(rest: &str) -> Option<usize> {
    if let Some(tail) = rest.strip_prefix("add") {
        let d = digits_len(tail);
        if d > 0 {
            return Some(3 + d);
        }
    }
    if let Some(tail) = rest.strip_prefix("sus") {
        return Some(3 + digits_len(tail));
    }
    ALTERATIONS
        .iter()
        .find(|alteration| rest.starts_with(**alteration))
        .map(|alteration| alteration.len())
}

fn absolute_extensions_len(rest: &str) -> usize {
    let mut len = 0;
    while let Some(ext) = absolute_extension_len(&rest[len..]) {
        len += ext;
    }
    len
}

/// Slash bass at the start of `rest`: the note and the consumed length,
/// slash included.
fn match_slash_bass(rest: &str) -> Option<(Note, usize)> {
    let tail = rest.strip_prefix('/')?;
    let mut s = tail;
    let bass = parse_note(&mut s).ok()?;
    Some((bass, 1 + (tail.len() - s.len())))
}

/// Try to match an absolute chord starting at byte `at`.
fn match_absolute_chord(line: &str, at: usize) -> Option<AbsoluteChord> {
    let rest = &line[at..];
    let mut s = rest;
    let root = parse_note(&mut s).ok()?;
    let root_len = rest.len() - s.len();

    for quality_len in absolute_quality_candidates(&rest[root_len..]) {
        let mut suffix_end = root_len + quality_len;
        suffix_end += absolute_extensions_len(&rest[suffix_end..]);

        // Slash bass: prefer the full spelling, fall back to the bare
        // letter, then to no bass at all.
        let mut forms: Vec<(Option<Note>, usize)> = Vec::new();
        if let Some((bass, slash_len)) = match_slash_bass(&rest[suffix_end..]) {
            forms.push((Some(bass), suffix_end + slash_len));
            if bass.accidental.is_some() {
                let bare = Note {
                    name: bass.name,
                    accidental: None,
                };
                forms.push((Some(bare), suffix_end + 2));
            }
        }
        forms.push((None, suffix_end));

        for (bass, end) in forms {
            if boundary_after(line, at + end) {
                return Some(AbsoluteChord {
                    root,
                    suffix: rest[root_len..suffix_end].to_string(),
                    bass,
                    start: at,
                    end: at + end,
                });
            }
        }
    }
    None
}

/// Scan a line for absolute chords, leftmost and non-overlapping.
pub fn absolute_chords(line: &str) -> Vec<AbsoluteChord> {
    let mut chords = Vec::new();
    let mut i = 0;
    while i < line.len() {
        if boundary_before(line, i) {
            if let Some(chord) = match_absolute_chord(line, i) {
                i = chord.end;
                chords.push(chord);
                continue;
            }
        }
        let c = line[i..].chars().next().unwrap();
        i += c.len_utf8();
    }
    chords
}
