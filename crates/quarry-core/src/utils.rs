/// Convert snake_case or kebab-case to PascalCase.
///
/// Words are separated by `_`, `-` or `.`. Input that is already PascalCase
/// is returned unchanged.
///
/// # Examples
/// ```
/// use quarry_core::utils::to_pascal_case;
/// assert_eq!(to_pascal_case("find_users"), "FindUsers");
/// assert_eq!(to_pascal_case("FindUsers"), "FindUsers");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    fn is_separator(c: char) -> bool {
        matches!(c, '_' | '-' | '.')
    }

    let has_separator = s.chars().any(is_separator);
    let has_lowercase = s.chars().any(|c| c.is_ascii_lowercase());
    let starts_uppercase = s.chars().next().is_some_and(|c| c.is_ascii_uppercase());

    if starts_uppercase && has_lowercase && !has_separator {
        return s.to_string();
    }

    let mut result = String::with_capacity(s.len());
    let mut capitalize_next = true;
    for c in s.chars() {
        if is_separator(c) {
            capitalize_next = true;
            continue;
        }
        if capitalize_next {
            result.push(c.to_ascii_uppercase());
            capitalize_next = false;
        } else if has_lowercase {
            result.push(c);
        } else {
            result.push(c.to_ascii_lowercase());
        }
    }
    result
}

/// Convert PascalCase, camelCase or kebab-case to snake_case.
///
/// Acronyms stay together: `userID` becomes `user_id`.
///
/// # Examples
/// ```
/// use quarry_core::utils::to_snake_case;
/// assert_eq!(to_snake_case("FindUsers"), "find_users");
/// assert_eq!(to_snake_case("userID"), "user_id");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '-' | '.' | ' ') {
            if !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() {
            let prev = i.checked_sub(1).map(|p| chars[p]);
            let next = chars.get(i + 1).copied();
            let boundary = match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => next.is_some_and(|n| n.is_ascii_lowercase()),
                _ => false,
            };
            if boundary && !result.ends_with('_') {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while", "yield",
];

/// Turn a name into a usable Rust identifier: snake_case, raw-escaped when
/// it collides with a keyword, prefixed when it starts with a digit.
pub fn to_rust_ident(s: &str) -> String {
    let snake = to_snake_case(s);
    let cleaned: String = snake
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        return "_".to_string();
    }
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{cleaned}");
    }
    if matches!(cleaned.as_str(), "self" | "Self" | "super" | "crate") {
        return format!("{cleaned}_");
    }
    if RUST_KEYWORDS.contains(&cleaned.as_str()) {
        return format!("r#{cleaned}");
    }
    cleaned
}

/// Whether `s` is a plain identifier (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
