use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Fit `s` into `max_cells` terminal cells, ending with `…` when cut short.
/// Never splits a grapheme cluster.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 0 {
        return String::new();
    }

    let budget = max_cells - 1;
    let mut used = 0;
    let mut out = String::new();
    for g in s.graphemes(true) {
        let w = UnicodeWidthStr::width(g);
        if used + w > budget {
            break;
        }
        used += w;
        out.push_str(g);
    }
    out.push('\u{2026}');
    out
}

/// Byte offset of the grapheme after the one at `byte_offset`, or `None` at the end
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let rest = s.get(byte_offset..)?;
    let first = rest.graphemes(true).next()?;
    Some(byte_offset + first.len())
}

/// Byte offset of the grapheme before `byte_offset`, or `None` at the start
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    let head = s.get(..byte_offset)?;
    let last = head.graphemes(true).next_back()?;
    Some(byte_offset - last.len())
}

/// Terminal column of `byte_offset` within `s`
pub fn display_col(s: &str, byte_offset: usize) -> usize {
    s.get(..byte_offset).map_or(0, display_width)
}

/// Start of the word left of `byte_offset` (skipping whitespace first)
pub fn word_start_before(s: &str, byte_offset: usize) -> usize {
    let head = &s[..byte_offset.min(s.len())];
    let trimmed = head.trim_end();
    match trimmed.rfind(char::is_whitespace) {
        Some(i) => i + trimmed[i..].chars().next().map_or(1, char::len_utf8),
        None => 0,
    }
}
