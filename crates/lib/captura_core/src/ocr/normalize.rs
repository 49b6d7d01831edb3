//! Raw OCR text cleanup.

/// Normalize raw recognized text into a single run of editable prose.
///
/// A trailing hyphen at a line break is deleted, rejoining the split word.
/// Remaining line breaks become single spaces, whitespace runs collapse to
/// one space, and the result is trimmed. Applying this twice yields the
/// same output.
pub fn normalize(raw: &str) -> String {
    let rejoined = raw.replace("-\n", "");
    let unwrapped = rejoined.replace('\n', " ");

    let mut out = String::with_capacity(unwrapped.len());
    let mut in_whitespace = false;
    for ch in unwrapped.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(ch);
            in_whitespace = false;
        }
    }

    out.trim().to_string()
}
