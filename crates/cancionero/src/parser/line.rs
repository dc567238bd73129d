//! Line-level helpers: tab expansion, structural line matching, bar and
//! slice extraction, repeat hints.

use crate::song::BarSlice;

/// Tabs expand to this many spaces before any column is computed.
const TAB_WIDTH: usize = 4;

pub(super) fn expand_tabs(line: &str) -> String {
    line.replace('\t', &" ".repeat(TAB_WIDTH))
}

/// `[Label]` with nothing else on the line. Returns the trimmed label.
pub(super) fn section_header(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('[')?.strip_suffix(']')?;
    if inner.is_empty() || inner.contains(']') {
        return None;
    }
    Some(inner.trim())
}

/// `{text}` with nothing else on the line. Returns the trimmed inner text,
/// still carrying any `Mod ` prefix.
pub(super) fn modulation_marker(line: &str) -> Option<&str> {
    let trimmed = line.trim();
    let inner = trimmed.strip_prefix('{')?.strip_suffix('}')?;
    if inner.is_empty() {
        return None;
    }
    Some(inner.trim())
}

/// Strip a case-insensitive `Mod ` prefix (the word `Mod` followed by
/// whitespace) from marker text.
pub(super) fn strip_mod_prefix(inner: &str) -> &str {
    if let Some(prefix) = inner.get(..3) {
        if prefix.eq_ignore_ascii_case("mod") {
            let tail = &inner[3..];
            if tail.starts_with(char::is_whitespace) {
                return tail.trim_start();
            }
        }
    }
    inner
}

/// True when the line opens a measure itself (a `|` before any content).
pub(super) fn starts_with_pipe(line: &str) -> bool {
    line.trim_start().starts_with('|')
}

/// Character columns of every `|` on the line, in order.
pub(super) fn extract_bars(line: &str) -> Vec<usize> {
    line.chars()
        .enumerate()
        .filter(|(_, c)| *c == '|')
        .map(|(col, _)| col)
        .collect()
}

/// Segments between bar separators, with virtual boundaries before column 0
/// and at line end. The tail after the last `|` counts as a measure. A line
/// with no separators yields its trimmed content as a single slice, or
/// nothing when blank.
pub(super) fn extract_bar_slices(line: &str, bars: &[usize]) -> Vec<BarSlice> {
    let chars: Vec<char> = line.chars().collect();
    if bars.is_empty() {
        let text = line.trim();
        if text.is_empty() {
            return Vec::new();
        }
        return vec![BarSlice {
            start: 0,
            end: chars.len(),
            text: text.to_string(),
        }];
    }

    let mut slices = Vec::with_capacity(bars.len() + 1);
    let mut start = 0;
    for &bar in bars {
        slices.push(slice_of(&chars, start, bar));
        start = bar + 1;
    }
    slices.push(slice_of(&chars, start, chars.len()));
    slices
}

fn slice_of(chars: &[char], start: usize, end: usize) -> BarSlice {
    let text: String = chars[start..end].iter().collect();
    BarSlice {
        start,
        end,
        text: text.trim().to_string(),
    }
}

/// First `(xN)` / `[xN]` hint on the lyric line (brackets may mix, spaces
/// and case are tolerated). Only counts above 1 are kept.
pub(super) fn extract_repeat_hint(lyrics: &str) -> Option<u32> {
    let chars: Vec<char> = lyrics.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if c == '(' || c == '[' {
            if let Some(count) = repeat_hint_body(&chars[i + 1..]) {
                return (count > 1).then_some(count);
            }
        }
    }
    None
}

fn repeat_hint_body(rest: &[char]) -> Option<u32> {
    let mut i = 0;
    while rest.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    if !matches!(rest.get(i).copied(), Some('x') | Some('X')) {
        return None;
    }
    i += 1;
    while rest.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    let digits_start = i;
    while rest.get(i).is_some_and(|c| c.is_ascii_digit()) {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    let count: u32 = rest[digits_start..i].iter().collect::<String>().parse().ok()?;
    while rest.get(i).is_some_and(|c| c.is_whitespace()) {
        i += 1;
    }
    if matches!(rest.get(i).copied(), Some(')') | Some(']')) {
        Some(count)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_tabs() {
        assert_eq!(expand_tabs("\tIIm"), "    IIm");
        assert_eq!(expand_tabs("a\tb"), "a    b");
    }

    #[test]
    fn test_section_header() {
        assert_eq!(section_header("[Intro]"), Some("Intro"));
        assert_eq!(section_header("  [ Coro 2 ]  "), Some("Coro 2"));
        assert_eq!(section_header("[]"), None);
        assert_eq!(section_header("[A] tail"), None);
        assert_eq!(section_header("[A][B]"), None);
        assert_eq!(section_header("IIm V7"), None);
    }

    #[test]
    fn test_modulation_marker() {
        assert_eq!(modulation_marker("{Mod IV}"), Some("Mod IV"));
        assert_eq!(modulation_marker("  {  I  }  "), Some("I"));
        assert_eq!(modulation_marker("{}"), None);
        assert_eq!(modulation_marker("{x} tail"), None);
    }

    #[test]
    fn test_strip_mod_prefix() {
        assert_eq!(strip_mod_prefix("Mod IV"), "IV");
        assert_eq!(strip_mod_prefix("mod   iv"), "iv");
        assert_eq!(strip_mod_prefix("MOD bVII"), "bVII");
        assert_eq!(strip_mod_prefix("Modulate"), "Modulate");
        assert_eq!(strip_mod_prefix("IV"), "IV");
    }

    #[test]
    fn test_extract_bars() {
        assert_eq!(extract_bars("| IIm | V7"), vec![0, 6]);
        assert!(extract_bars("IIm V7").is_empty());
    }

    #[test]
    fn test_extract_bar_slices_with_pipes() {
        let line = "| IIm | V7";
        let slices = extract_bar_slices(line, &extract_bars(line));
        let texts: Vec<_> = slices.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["", "IIm", "V7"]);
        assert_eq!((slices[1].start, slices[1].end), (1, 6));
        assert_eq!((slices[2].start, slices[2].end), (7, 10));
    }

    #[test]
    fn test_extract_bar_slices_without_pipes() {
        let slices = extract_bar_slices("  IIm  ", &[]);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].text, "IIm");
        assert_eq!((slices[0].start, slices[0].end), (0, 7));

        assert!(extract_bar_slices("   ", &[]).is_empty());
    }

    #[test]
    fn test_trailing_pipe_keeps_empty_tail_slice() {
        let line = "| V7 |";
        let slices = extract_bar_slices(line, &extract_bars(line));
        let texts: Vec<_> = slices.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["", "V7", ""]);
    }

    #[test]
    fn test_repeat_hints() {
        assert_eq!(extract_repeat_hint("la la la (x3)"), Some(3));
        assert_eq!(extract_repeat_hint("coda [x2]"), Some(2));
        assert_eq!(extract_repeat_hint("otra vez ( X 4 )"), Some(4));
        assert_eq!(extract_repeat_hint("solo una vez (x1)"), None);
        assert_eq!(extract_repeat_hint("sin repetir"), None);
        assert_eq!(extract_repeat_hint("(por ti)"), None);
    }
}
