//! UTF-8 safe string helpers used by the scorer and its log output

/// Longest prefix of `snippet` that fits in `budget` bytes and ends on a
/// char boundary.
///
/// Patterns only see this prefix, which bounds regex work on very large
/// pastes. A multi-byte character straddling the budget is left out whole.
///
/// ```
/// use langsniff::utils::clip_to_char_boundary;
///
/// assert_eq!(clip_to_char_boundary("<?php echo 1;", 5), "<?php");
/// assert_eq!(clip_to_char_boundary("puts \"ñ\"", 7), "puts \"");
/// ```
pub fn clip_to_char_boundary(snippet: &str, budget: usize) -> &str {
    if budget >= snippet.len() {
        return snippet;
    }
    // a UTF-8 char is at most 4 bytes, so a boundary is never further back
    let end = (budget.saturating_sub(3)..=budget)
        .rev()
        .find(|&i| snippet.is_char_boundary(i))
        .unwrap_or(0);
    &snippet[..end]
}

/// Single-line preview of a snippet for log messages
pub fn snippet_preview(s: &str, max_bytes: usize) -> String {
    let clipped = clip_to_char_boundary(s, max_bytes);
    let mut preview = clipped.replace('\n', "\\n").replace('\r', "");
    if clipped.len() < s.len() {
        preview.push_str("...");
    }
    preview
}
