//! Shared utility functions.

/// Shorten `s` to at most `max_chars` characters for log lines and status
/// output, appending `…` when anything was cut. Newlines are flattened.
pub fn preview(s: &str, max_chars: usize) -> String {
    let flat = s.trim().replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let mut out: String = flat.chars().take(max_chars).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_short_is_unchanged() {
        assert_eq!(preview("hi", 10), "hi");
    }

    #[test]
    fn preview_cuts_and_marks() {
        assert_eq!(preview("hello world", 5), "hello…");
    }

    #[test]
    fn preview_respects_multibyte_chars() {
        assert_eq!(preview("学而时习之", 2), "学而…");
    }

    #[test]
    fn preview_flattens_newlines() {
        assert_eq!(preview("  a\nb  ", 10), "a b");
    }
}
