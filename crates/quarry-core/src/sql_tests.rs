use crate::PlaceholderStyle;
use crate::sql::{count_placeholders, needs_space_between, rewrite_placeholders};

#[test]
fn space_between_word_tokens() {
    assert!(needs_space_between("FROM users", "WHERE id = 1"));
    assert!(needs_space_between("count(*)", "AS total"));
    assert!(needs_space_between("id IN", "(1, 2)"));
    assert!(needs_space_between("id =", "?"));
    assert!(needs_space_between("id", "?"));
    assert!(needs_space_between("id = ?", "RETURNING id"));
}

#[test]
fn keywords_after_symbols_are_separated() {
    assert!(needs_space_between("SELECT *", "FROM t"));
    assert!(needs_space_between("name = 'a'", "ORDER BY id"));
    assert!(needs_space_between("tags[1]", "AND x = 1"));
    assert!(needs_space_between(r#"WHERE "Name""#, "GROUP BY 1"));
    assert!(needs_space_between("a =", "'b'"));
}

#[test]
fn no_space_around_punctuation_or_whitespace() {
    assert!(!needs_space_between("a,", "b"));
    assert!(!needs_space_between("a ", "b"));
    assert!(!needs_space_between("a", " b"));
    assert!(!needs_space_between("a", ")"));
    assert!(!needs_space_between("", "b"));
    assert!(!needs_space_between("count(", "*"));
    assert!(!needs_space_between("(", "?"));
    assert!(!needs_space_between("?", ","));
}

#[test]
fn numbered_placeholders_continue_across_calls() {
    let mut seen = 0;
    let first = rewrite_placeholders("a = ? AND b = ?", PlaceholderStyle::Numbered, &mut seen);
    let second = rewrite_placeholders("c = ?", PlaceholderStyle::Numbered, &mut seen);
    assert_eq!(first, "a = $1 AND b = $2");
    assert_eq!(second, "c = $3");
    assert_eq!(seen, 3);
}

#[test]
fn quoted_question_marks_are_literal() {
    let mut seen = 0;
    let text = rewrite_placeholders(
        r#"note = 'why?' AND "odd?col" = ? AND tag = ?"#,
        PlaceholderStyle::Numbered,
        &mut seen,
    );
    assert_eq!(text, r#"note = 'why?' AND "odd?col" = $1 AND tag = $2"#);
    assert_eq!(count_placeholders("x = 'it''s?' AND y = ?"), 1);
}

#[test]
fn jsonb_operators_are_not_placeholders() {
    assert_eq!(count_placeholders("data ?| array['a'] AND data ?& ?"), 1);
}

#[test]
fn question_style_keeps_marks() {
    let mut seen = 0;
    let text = rewrite_placeholders("a = ? OR b = ?", PlaceholderStyle::Question, &mut seen);
    assert_eq!(text, "a = ? OR b = ?");
    assert_eq!(seen, 2);
}
