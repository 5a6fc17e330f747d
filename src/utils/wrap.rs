//! Word wrapping for transcript text.
//!
//! The transcript is rendered from pre-wrapped lines so the line count used
//! for scrolling always matches what ends up on screen. Widths are measured
//! in terminal cells, so wide characters count double.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const TAB_STOP: &str = "    ";

/// Wraps `text` to `width` cells. Explicit newlines always start a new line,
/// and words wider than a full line are split between characters.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let text = text.replace('\t', TAB_STOP);
    let paragraphs = text.split('\n').map(|line| line.trim_end_matches('\r'));
    if width == 0 {
        return paragraphs.map(str::to_string).collect();
    }

    let mut out = Vec::new();
    for paragraph in paragraphs {
        wrap_paragraph(paragraph, width, &mut out);
    }
    out
}

fn wrap_paragraph(paragraph: &str, width: usize, out: &mut Vec<String>) {
    let mut line = String::new();
    let mut line_width = 0usize;
    let mut pending_space = "";

    for (is_space, token) in tokens(paragraph) {
        if is_space {
            pending_space = token;
            continue;
        }

        let space_width = pending_space.width();
        let word_width = token.width();

        if line_width + space_width + word_width <= width {
            line.push_str(pending_space);
            line.push_str(token);
            line_width += space_width + word_width;
        } else if word_width <= width {
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
            }
            line.push_str(token);
            line_width = word_width;
        } else {
            if !line.is_empty() {
                out.push(std::mem::take(&mut line));
                line_width = 0;
            }
            for ch in token.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if line_width + ch_width > width && !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(ch);
                line_width += ch_width;
            }
        }
        pending_space = "";
    }

    out.push(line);
}

/// Splits into alternating runs of whitespace and non-whitespace.
fn tokens(text: &str) -> Vec<(bool, &str)> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (idx, ch) in text.char_indices() {
        let is_space = ch.is_whitespace();
        match current {
            Some(kind) if kind == is_space => {}
            Some(kind) => {
                tokens.push((kind, &text[start..idx]));
                start = idx;
                current = Some(is_space);
            }
            None => current = Some(is_space),
        }
    }
    if let Some(kind) = current {
        tokens.push((kind, &text[start..]));
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_at_word_boundaries() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn explicit_newlines_are_kept_including_blank_lines() {
        assert_eq!(wrap_text("one\n\ntwo\r\n", 20), vec!["one", "", "two", ""]);
        assert_eq!(wrap_text("", 20), vec![""]);
    }

    #[test]
    fn long_words_are_split() {
        assert_eq!(wrap_text("ab abcdefghij", 4), vec!["ab", "abcd", "efgh", "ij"]);
    }

    #[test]
    fn indentation_survives_when_it_fits() {
        assert_eq!(wrap_text("    let x = 1;", 40), vec!["    let x = 1;"]);
        assert_eq!(wrap_text("\tfoo", 40), vec!["    foo"]);
    }

    #[test]
    fn wide_characters_count_two_cells() {
        assert_eq!(wrap_text("你好世界", 4), vec!["你好", "世界"]);
    }

    #[test]
    fn zero_width_disables_wrapping() {
        assert_eq!(wrap_text("a b c\nd", 0), vec!["a b c", "d"]);
    }
}
