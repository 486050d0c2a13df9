//! Whitespace normalization of SQL fragments.
//!
//! Fragments come from a tokenizer that may have dropped the whitespace
//! around keywords and placeholders. These rules only ever insert single
//! spaces; they never remove text.

use quarry_core::sql::{is_word_char, scan_quoted};

pub use quarry_core::sql::join_fragments;

/// Keywords that get a leading space when they open a fragment.
const LEADING_KEYWORDS: &[&str] = &["WHERE", "JOIN", "ORDER", "GROUP", "AND", "OR", "ON"];

/// Keywords that are split from a preceding token anywhere in a fragment.
const GLUED_KEYWORDS: &[&str] = &["WHERE", "RETURNING"];

/// Apply every fragment-level rule.
pub fn normalize_fragment(text: &str) -> String {
    let text = pad_leading_keyword(text);
    let text = split_glued_keywords(&text);
    space_before_placeholders(&text)
}

/// `AND`/`OR` separators are padded with single spaces; others are kept.
pub fn pad_boundary_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.eq_ignore_ascii_case("AND") || trimmed.eq_ignore_ascii_case("OR") {
        format!(" {trimmed} ")
    } else {
        token.to_string()
    }
}

fn first_word(text: &str) -> &str {
    let end = text.find(|c: char| !is_word_char(c)).unwrap_or(text.len());
    &text[..end]
}

/// `WHERE id = 1` becomes ` WHERE id = 1`; a bare `AND` becomes ` AND `.
fn pad_leading_keyword(text: &str) -> String {
    let body = text.trim_start();
    let word = first_word(body);
    if !LEADING_KEYWORDS
        .iter()
        .any(|kw| word.eq_ignore_ascii_case(kw))
    {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len() + 2);
    out.push(' ');
    out.push_str(body);
    if body.len() == word.len() {
        out.push(' ');
    }
    out
}

/// Insert a space before an upper-case `WHERE`/`RETURNING` that is glued to
/// the previous token (`users)WHERE`, `usersWHERE`). A keyword preceded by
/// another upper-case letter is part of a longer word and left alone.
fn split_glued_keywords(text: &str) -> String {
    let mut quoted_at = vec![false; text.len()];
    scan_quoted(text, |i, c, quoted| {
        for slot in &mut quoted_at[i..i + c.len_utf8()] {
            *slot = quoted;
        }
    });

    let mut out = String::with_capacity(text.len() + 4);
    let mut last = 0;
    let mut i = 0;
    while i < text.len() {
        let hit = GLUED_KEYWORDS.iter().find(|kw| {
            text[i..].starts_with(*kw)
                && !quoted_at[i]
                && !text[i + kw.len()..].starts_with(is_word_char)
        });
        if let (Some(kw), Some(prev)) = (hit, text[..i].chars().next_back()) {
            let glued = !prev.is_whitespace() && !prev.is_ascii_uppercase() && prev != '_';
            if glued {
                out.push_str(&text[last..i]);
                out.push(' ');
                last = i;
            }
            i += kw.len();
            continue;
        }
        i += text[i..].chars().next().map_or(1, char::len_utf8);
    }
    out.push_str(&text[last..]);
    out
}

/// `id?` becomes `id ?`, `id =?` becomes `id = ?`.
fn space_before_placeholders(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut prev: Option<char> = None;
    scan_quoted(text, |_, c, quoted| {
        if c == '?' && !quoted {
            if let Some(p) = prev {
                if is_word_char(p) || matches!(p, ')' | ']' | '"' | '=' | '<' | '>') {
                    out.push(' ');
                }
            }
        }
        out.push(c);
        prev = Some(c);
    });
    out
}
