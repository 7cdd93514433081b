//! File-name sanitization.

/// Longest name most filesystems accept, in bytes.
const NAME_MAX: usize = 255;

/// Makes a URL segment safe to use as a file name.
///
/// Characters reserved on Linux or Windows (`/ \ : * ? " < > |`), control
/// characters, and whitespace become `_`. Every other character is kept, so
/// distinct segments stay distinct. Leading and trailing dots are trimmed and
/// the result is cut to 255 bytes on a char boundary.
pub fn sanitize_filename(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| {
            if c.is_control()
                || c.is_whitespace()
                || matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = out.trim_matches('.');
    let mut end = trimmed.len().min(NAME_MAX);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].to_string()
}
