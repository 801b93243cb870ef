use console::measure_text_width;

/// Wraps `text` into lines no wider than `max_width` terminal columns.
///
/// Existing newlines are kept. Lines break at spaces where possible and
/// fall back to a hard cut for words longer than the width.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0;

        for word in paragraph.split(' ') {
            let word_width = measure_text_width(word);
            let sep = usize::from(!current.is_empty());

            if current_width + sep + word_width <= max_width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= max_width {
                current.push_str(word);
                current_width = word_width;
            } else {
                for ch in word.chars() {
                    let ch_width = measure_text_width(ch.encode_utf8(&mut [0u8; 4]));
                    if current_width + ch_width > max_width && !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                        current_width = 0;
                    }
                    current.push(ch);
                    current_width += ch_width;
                }
            }
        }

        lines.push(current);
    }

    lines
}

/// Display width of the widest line.
pub fn max_line_width(lines: &[String]) -> usize {
    lines
        .iter()
        .map(|line| measure_text_width(line))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(wrap_text("Paris.", 20), vec!["Paris."]);
    }

    #[test]
    fn breaks_at_spaces() {
        assert_eq!(
            wrap_text("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn keeps_explicit_newlines() {
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
    }

    #[test]
    fn hard_cuts_long_words() {
        assert_eq!(wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn wide_characters_count_double() {
        let lines = wrap_text("日本語テキスト", 6);
        assert_eq!(lines, vec!["日本語", "テキス", "ト"]);
        assert_eq!(max_line_width(&lines), 6);
    }
}
