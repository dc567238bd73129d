//! Chart parser: raw song text to the [`Song`] model.
//!
//! The parser is line-oriented and generous. Every non-blank line is either
//! a section header, a modulation marker, or the first half of a
//! chord-line/lyric-line pair; anything that cannot be paired is dropped
//! with a warning rather than failing the parse.

mod line;

use crate::feedback::{FeedbackCollector, ParseResult};
use crate::grammar;
use crate::song::{Row, Section, Song};

/// Parse chord-chart text into a [`Song`].
///
/// Never fails: malformed input at worst misclassifies lines or produces
/// empty sections. Dropped lines are reported as warnings in the result's
/// feedback.
pub fn parse(input: &str) -> ParseResult<Song> {
    let lines: Vec<String> = input.lines().map(line::expand_tabs).collect();
    let mut collector = FeedbackCollector::new();
    let mut song = Song::default();
    let mut pending_modulation: Option<String> = None;
    let mut saw_blank = true;
    // Chronologically last row in the whole song; carry-over crosses
    // section boundaries, so this is not per-section state.
    let mut last_row: Option<(usize, usize)> = None;

    let mut i = 0;
    while i < lines.len() {
        collector.set_line(i + 1);
        let raw = &lines[i];

        if raw.trim().is_empty() {
            saw_blank = true;
            i += 1;
            continue;
        }

        if let Some(name) = line::section_header(raw) {
            push_section(&mut song, name, saw_blank);
            saw_blank = true;
            i += 1;
            continue;
        }

        if let Some(inner) = line::modulation_marker(raw) {
            let text = line::strip_mod_prefix(inner);
            if song.sections.is_empty() {
                push_section(&mut song, "Untitled", saw_blank);
            }
            if let Some(current) = song.sections.last_mut() {
                current.note = Some(text.to_string());
            }
            pending_modulation = Some(text.to_string());
            saw_blank = true;
            i += 1;
            continue;
        }

        // Everything else is the chord half of a chord/lyric pair.
        if i + 1 >= lines.len() {
            collector.warning("chord line at end of input has no lyric line; dropped");
            break;
        }
        let lyric_line = &lines[i + 1];
        if line::section_header(lyric_line).is_some()
            || line::modulation_marker(lyric_line).is_some()
        {
            collector.warning(
                "chord line has no lyric line before the next section or marker; dropped",
            );
            i += 1;
            continue;
        }

        if song.sections.is_empty() {
            push_section(&mut song, "Untitled", saw_blank);
        }

        let row = build_row(raw, lyric_line, pending_modulation.take(), saw_blank);
        let row = apply_carry_over(row, &mut song, last_row);
        saw_blank = false;

        let section = song.sections.len() - 1;
        song.sections[section].rows.push(row);
        last_row = Some((section, song.sections[section].rows.len() - 1));
        i += 2;
    }

    ParseResult::new(song, collector.into_feedback())
}

fn push_section(song: &mut Song, name: &str, preceded_by_blank: bool) {
    song.sections.push(Section {
        name: name.to_string(),
        note: None,
        preceded_by_blank,
        rows: Vec::new(),
    });
}

fn build_row(
    chord_line: &str,
    lyrics: &str,
    modulation: Option<String>,
    preceded_by_blank: bool,
) -> Row {
    let bars = line::extract_bars(chord_line);
    let bar_slices = line::extract_bar_slices(chord_line, &bars);
    Row {
        chord_line: chord_line.to_string(),
        chords: grammar::degree_tokens(chord_line),
        bars,
        bar_slices,
        lyrics: lyrics.to_string(),
        repeat: line::extract_repeat_hint(lyrics),
        modulation,
        preceded_by_blank,
    }
}

/// A chord line that does not open with a bar separator continues the
/// measure left open by the previous row, even across sections: its leading
/// slice is detached, and its text (when non-empty) is appended to the
/// previous row's last slice. The previous row's bar columns stay as they
/// were. Without a previous row, or when the previous row has no slices,
/// the leading slice stays where it is.
fn apply_carry_over(mut row: Row, song: &mut Song, last_row: Option<(usize, usize)>) -> Row {
    if line::starts_with_pipe(&row.chord_line) {
        return row;
    }
    let Some((section, index)) = last_row else {
        return row;
    };
    let prev = &mut song.sections[section].rows[index];
    if prev.bar_slices.is_empty() || row.bar_slices.is_empty() {
        return row;
    }

    let head = row.bar_slices.remove(0);
    if !head.text.is_empty() {
        if let Some(last) = prev.bar_slices.last_mut() {
            last.text = format!("{} {}", last.text, head.text).trim().to_string();
        }
    }
    row
}
