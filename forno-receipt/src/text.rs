//! Fixed-width text helpers
//!
//! Receipts are drawn with a monospace font, so every character (accented
//! Portuguese letters included) occupies one cell.

/// Display width in monospace cells
pub fn text_width(s: &str) -> usize {
    s.chars().count()
}

/// Truncate to at most `max_width` cells
pub fn truncate(s: &str, max_width: usize) -> String {
    s.chars().take(max_width).collect()
}

/// Pad to exactly `width` cells, truncating when longer
pub fn pad(s: &str, width: usize, align_right: bool) -> String {
    let current = text_width(s);
    if current >= width {
        return truncate(s, width);
    }
    let spaces = " ".repeat(width - current);
    if align_right {
        format!("{spaces}{s}")
    } else {
        format!("{s}{spaces}")
    }
}

/// Greedy word wrap to `width` cells; words longer than a line are split
pub fn wrap(s: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![];
    }
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in s.split_whitespace() {
        let mut word = word.to_string();
        while text_width(&word) > width {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let head = truncate(&word, width);
            word = word.chars().skip(width).collect();
            lines.push(head);
        }
        if current.is_empty() {
            current = word;
        } else if text_width(&current) + 1 + text_width(&word) <= width {
            current.push(' ');
            current.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut current, word));
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
