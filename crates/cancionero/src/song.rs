//! Document model for parsed chord charts.
//!
//! A chart is a sequence of named sections; each section owns the
//! chord-line/lyric-line rows parsed from the source. Rows keep enough
//! positional data (chord token columns, bar separator columns, bar slices)
//! for a renderer to re-slice and highlight the original line.

use serde::{Deserialize, Serialize};

/// A complete parsed chart.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Song {
    pub sections: Vec<Section>,
}

/// A named structural block (`[Intro]`, `[Coro]`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Header label, or `"Untitled"` when content appeared before any header.
    pub name: String,
    /// Modulation/annotation text from a `{...}` marker line, with any
    /// leading `Mod ` prefix already stripped.
    pub note: Option<String>,
    /// One or more blank lines came before this section in the source.
    /// Spacing metadata only.
    pub preceded_by_blank: bool,
    pub rows: Vec<Row>,
}

/// One chord-line/lyric-line pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// The chord line as written (tabs expanded, pipes retained).
    pub chord_line: String,
    /// Recognized chord tokens in text order.
    pub chords: Vec<ChordToken>,
    /// Character columns of every `|` in `chord_line`, strictly increasing.
    pub bars: Vec<usize>,
    /// Measure contents between consecutive bar separators, including the
    /// implicit segments before the first and after the last separator.
    pub bar_slices: Vec<BarSlice>,
    /// Lyric line verbatim, untrimmed.
    pub lyrics: String,
    /// Repeat count from a `(xN)` / `[xN]` hint in the lyrics; always >= 2.
    pub repeat: Option<u32>,
    /// Pending modulation marker text consumed by this row.
    pub modulation: Option<String>,
    /// A blank line came right before this row's chord line.
    pub preceded_by_blank: bool,
}

/// A chord token and the character column where it starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChordToken {
    pub text: String,
    pub start_col: usize,
}

/// One measure's worth of chord-line content between bar separators.
///
/// `start` and `end` are character columns on the untrimmed chord line, so
/// the original spacing can be recovered; `text` is trimmed. Carry-over may
/// append to `text` without touching the columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarSlice {
    pub start: usize,
    pub end: usize,
    pub text: String,
}
