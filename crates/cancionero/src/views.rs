//! Textual projections of a parsed song.

use crate::song::Song;

/// Combined view: chord lines keep their spacing but lose their bar
/// separators, each followed by its lyric line. Blank halves are skipped.
pub fn both_text(song: &Song) -> String {
    let mut out: Vec<String> = Vec::new();
    for section in &song.sections {
        out.push(format!("[{}]", section.name));
        for row in &section.rows {
            let chords: String = row.chord_line.chars().filter(|&c| c != '|').collect();
            if !chords.trim().is_empty() {
                out.push(chords);
            }
            if !row.lyrics.trim().is_empty() {
                out.push(row.lyrics.clone());
            }
        }
    }
    out.join("\n").trim().to_string()
}

/// Lyrics-only view: section headers and lyric lines, one blank line
/// between sections.
pub fn lyrics_text(song: &Song) -> String {
    let mut out: Vec<String> = Vec::new();
    for section in &song.sections {
        out.push(format!("[{}]", section.name));
        for row in &section.rows {
            if !row.lyrics.trim().is_empty() {
                out.push(row.lyrics.clone());
            }
        }
        out.push(String::new());
    }
    out.join("\n").trim().to_string()
}

/// Chart view: one measure per line, accidentals rendered with the flat and
/// sharp glyphs, internal whitespace collapsed.
pub fn chords_text(song: &Song) -> String {
    let mut out: Vec<String> = Vec::new();
    for section in &song.sections {
        out.push(format!("[{}]", section.name));
        for row in &section.rows {
            for slice in &row.bar_slices {
                let text = slice.text.replace('b', "♭").replace('#', "♯");
                let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
                if !text.is_empty() {
                    out.push(text);
                }
            }
        }
    }
    out.join("\n").trim().to_string()
}
