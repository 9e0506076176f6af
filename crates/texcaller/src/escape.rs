//! Escaping of LaTeX special characters.

/// Replacement for a single character, or `None` if it passes through.
fn escape_char(c: char) -> Option<&'static str> {
    Some(match c {
        '$' => "\\$",
        '%' => "\\%",
        '&' => "\\&",
        '#' => "\\#",
        '_' => "\\_",
        '{' => "\\{",
        '}' => "\\}",
        '[' => "{[}",
        ']' => "{]}",
        '"' => "{''}",
        '\\' => "\\textbackslash{}",
        '~' => "\\textasciitilde{}",
        '<' => "\\textless{}",
        '>' => "\\textgreater{}",
        '^' => "\\textasciicircum{}",
        '`' => "{}`", // avoid ?` and !`
        '\n' => "\\\\",
        _ => return None,
    })
}

/// Escape a string for direct use in LaTeX.
///
/// The 15 LaTeX special characters are replaced by literal equivalents;
/// every other character, including all non-ASCII text, passes through
/// unchanged.
pub fn escape_latex(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len());
    for c in s.chars() {
        match escape_char(c) {
            Some(replacement) => escaped.push_str(replacement),
            None => escaped.push(c),
        }
    }
    escaped
}
