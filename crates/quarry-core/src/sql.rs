//! SQL text helpers shared by the compiler and the runtime builder.
//!
//! Scanning is quote-aware: anything inside `'...'`, `"..."` or `` `...` ``
//! is left alone.

use crate::dialect::PlaceholderStyle;

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether joining `left` and `right` directly would glue two tokens.
///
/// Every junction between two non-blank tokens gets a space, except after
/// an opener (`(`, `[`, `.`, `,`, `:`) and before a closer (`)`, `]`, `.`,
/// `,`, `;`). A `(` only gets one after a word, `)` or `?` (`IN (`, not
/// `count(`).
pub fn needs_space_between(left: &str, right: &str) -> bool {
    let (Some(tail), Some(head)) = (left.chars().next_back(), right.chars().next()) else {
        return false;
    };
    if tail.is_whitespace() || head.is_whitespace() {
        return false;
    }
    if matches!(tail, '(' | '[' | '.' | ',' | ':') || matches!(head, ')' | ']' | '.' | ',' | ';') {
        return false;
    }
    if head == '(' {
        return is_word_char(tail) || matches!(tail, ')' | '?');
    }
    is_word_char(head) || matches!(head, '$' | '?' | '\'' | '"' | '`')
}

/// Append `fragment` to `out` with at most one space at the junction.
pub fn join_fragments(out: &mut String, fragment: &str) {
    if out.ends_with(char::is_whitespace) {
        out.push_str(fragment.trim_start());
    } else {
        if needs_space_between(out, fragment) {
            out.push(' ');
        }
        out.push_str(fragment);
    }
}

/// Walk `text`, calling `f(index, char, quoted)` for every character.
pub fn scan_quoted(text: &str, mut f: impl FnMut(usize, char, bool)) {
    let mut quote: Option<char> = None;
    for (i, c) in text.char_indices() {
        match quote {
            Some(q) if c == q => {
                f(i, c, true);
                quote = None;
            }
            Some(_) => f(i, c, true),
            None if matches!(c, '\'' | '"' | '`') => {
                quote = Some(c);
                f(i, c, true);
            }
            None => f(i, c, false),
        }
    }
}

fn is_placeholder_at(text: &str, i: usize) -> bool {
    // `?|` and `?&` are PostgreSQL jsonb operators.
    !matches!(text[i + 1..].chars().next(), Some('|' | '&'))
}

/// Number of unquoted `?` placeholders in `text`.
pub fn count_placeholders(text: &str) -> usize {
    let mut count = 0;
    scan_quoted(text, |i, c, quoted| {
        if c == '?' && !quoted && is_placeholder_at(text, i) {
            count += 1;
        }
    });
    count
}

/// Rewrite unquoted `?` placeholders in the dialect's style.
///
/// `seen` is the number of placeholders already written before `text` and
/// is advanced past the ones rewritten here.
pub fn rewrite_placeholders(text: &str, style: PlaceholderStyle, seen: &mut usize) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    scan_quoted(text, |i, c, quoted| {
        if c == '?' && !quoted && is_placeholder_at(text, i) {
            *seen += 1;
            match style {
                PlaceholderStyle::Numbered => {
                    out.push('$');
                    out.push_str(&seen.to_string());
                }
                PlaceholderStyle::Question => out.push('?'),
            }
        } else {
            out.push(c);
        }
    });
    out
}
