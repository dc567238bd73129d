//! Chord chart parsing and Roman-degree conversion.
//!
//! This crate turns plain-text chord charts (chord lines over lyric lines,
//! `|` bar separators, `[Section]` headers, `{Mod ...}` markers, `(xN)`
//! repeat hints) into a structured [`Song`] model, projects that model into
//! three plain-text views, and rewrites absolute chord names as Roman
//! scale degrees relative to a tonic.
//!
//! # Example
//!
//! ```
//! use cancionero::{chords_text, convert_to_degrees, parse};
//!
//! let chart = "\
//! [Intro]
//! |  IIm   V7  |  Imaj7
//! Donde la tarde cae,
//! ";
//!
//! let result = parse(chart);
//! assert!(result.feedback.is_empty());
//! assert_eq!(chords_text(&result.value), "[Intro]\nIIm V7\nImaj7");
//!
//! let degrees = convert_to_degrees("Dm7 G7 | Cmaj7", "C").unwrap();
//! assert_eq!(degrees, "IIm7 V7 | Imaj7");
//! ```

pub mod degrees;
pub mod feedback;
pub mod grammar;
pub mod parser;
pub mod song;
pub mod views;

pub use degrees::{convert_to_degrees, DegreeError};
pub use feedback::{Feedback, FeedbackLevel, ParseResult};
pub use grammar::{AbsoluteChord, Accidental, Note, NoteName};
pub use song::{BarSlice, ChordToken, Row, Section, Song};
pub use views::{both_text, chords_text, lyrics_text};

/// Parse chord-chart text into a [`Song`].
///
/// This is a generous parser: it never fails, and reports anything it had
/// to drop as feedback on the result.
pub fn parse(input: &str) -> ParseResult<Song> {
    parser::parse(input)
}

/// Extract the body of a ```` ```song ```` fenced block, if present.
///
/// Charts are often embedded in Markdown documents; this returns the
/// trimmed fence content when a fence is found (case-insensitive), and the
/// trimmed input otherwise.
pub fn strip_song_fence(input: &str) -> &str {
    let open = input
        .as_bytes()
        .windows(7)
        .position(|w| w.eq_ignore_ascii_case(b"```song"));
    if let Some(start) = open {
        let body = &input[start + 7..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
    }
    input.trim()
}
