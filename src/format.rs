use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::system::snapshot::ProcessEntry;

/// Cut `s` to at most `max_width` terminal columns. Wide characters that
/// would straddle the limit are dropped whole.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

/// Left-align `s` in a field of `width` columns.
pub fn pad_to_width(s: &str, width: usize) -> String {
    let used = s.width();
    let mut out = s.to_string();
    out.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    out
}

pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.1}%"),
        None => "n/a".to_string(),
    }
}

pub fn format_megabytes(mb: f64) -> String {
    format!("{mb:.2} MB")
}

/// Fixed-width row for the top-process list: pid, name, cpu share.
pub fn process_row(entry: &ProcessEntry, name_width: usize) -> String {
    format!(
        "{:>5} {} {:>5.1}%",
        entry.pid,
        pad_to_width(&entry.name, name_width),
        entry.cpu_share
    )
}
