//! # StyleKit CSS Parser
//!
//! The textual side of a CSS declaration block: the text found in a `style`
//! attribute or assigned to `cssText`.
//!
//! Parsing is best-effort. A declaration that cannot be understood is skipped
//! and the rest of the list is still processed, so [`parse_declaration_list`]
//! never fails. Serialization produces the canonical `name: value;` form with
//! a single space between declarations.

use tracing::trace;

/// The importance marker keyword, as returned by `getPropertyPriority`.
pub const IMPORTANT: &str = "important";

/// A parsed declaration AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationAst {
    pub property: String,
    pub value: String,
    pub important: bool,
}

/// Parse a declaration list (`name: value; name: value !important; ...`).
///
/// Notes:
/// - `;` and `:` inside quoted strings or `()` / `[]` groups do not split.
/// - Comments (`/* ... */`) are dropped.
/// - Declarations without a `:`, with an empty name or with an empty value
///   are skipped.
pub fn parse_declaration_list(text: &str) -> Vec<DeclarationAst> {
    let mut out = Vec::new();

    let mut current_property = String::new();
    let mut current_value = String::new();
    let mut in_value = false;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(open) = quote {
            let buffer = current_buffer(in_value, &mut current_property, &mut current_value);
            buffer.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    buffer.push(escaped);
                }
            } else if c == open {
                quote = None;
            }
            continue;
        }

        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            while let Some(cc) = chars.next() {
                if cc == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    break;
                }
            }
            continue;
        }

        match c {
            ';' if depth == 0 => {
                flush_decl(&mut current_property, &mut current_value, in_value, &mut out);
                in_value = false;
                continue;
            }
            ':' if depth == 0 && !in_value => {
                in_value = true;
                continue;
            }
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }

        current_buffer(in_value, &mut current_property, &mut current_value).push(c);
    }

    // The last declaration does not need a terminating `;`.
    flush_decl(&mut current_property, &mut current_value, in_value, &mut out);

    out
}

fn current_buffer<'a>(
    in_value: bool,
    property: &'a mut String,
    value: &'a mut String,
) -> &'a mut String {
    if in_value {
        value
    } else {
        property
    }
}

fn flush_decl(
    current_property: &mut String,
    current_value: &mut String,
    saw_colon: bool,
    decls: &mut Vec<DeclarationAst>,
) {
    let property = current_property.trim_matches(is_css_whitespace);
    let (value, important) = strip_important(current_value);

    if !saw_colon {
        if !property.is_empty() {
            trace!(declaration = property, "Skipping declaration without ':'");
        }
    } else if property.is_empty() || property.contains(is_css_whitespace) {
        trace!(property, "Skipping declaration with an invalid name");
    } else if value.is_empty() {
        trace!(property, "Skipping declaration with an empty value");
    } else {
        decls.push(DeclarationAst {
            property: property.to_string(),
            value: value.to_string(),
            important,
        });
    }

    current_property.clear();
    current_value.clear();
}

/// Split a trailing `!important` off a value.
///
/// The marker is matched ASCII case-insensitively and may have whitespace
/// between `!` and the keyword. The returned value is trimmed.
pub fn strip_important(value: &str) -> (&str, bool) {
    let trimmed = value.trim_matches(is_css_whitespace);
    let Some(split) = trimmed.len().checked_sub(IMPORTANT.len()) else {
        return (trimmed, false);
    };
    let (Some(head), Some(tail)) = (trimmed.get(..split), trimmed.get(split..)) else {
        return (trimmed, false);
    };
    if !tail.eq_ignore_ascii_case(IMPORTANT) {
        return (trimmed, false);
    }
    match head.trim_end_matches(is_css_whitespace).strip_suffix('!') {
        Some(before) => (before.trim_end_matches(is_css_whitespace), true),
        None => (trimmed, false),
    }
}

/// Split a value into its whitespace-separated components.
///
/// Functions (`rgb(0, 0, 0)`), bracketed groups and quoted strings are kept
/// as single components.
pub fn split_components(value: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start: Option<usize> = None;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (index, c) in value.char_indices() {
        if let Some(open) = quote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == open {
                quote = None;
            }
            continue;
        }

        if depth == 0 && is_css_whitespace(c) {
            if let Some(begin) = start.take() {
                out.push(&value[begin..index]);
            }
            continue;
        }

        if start.is_none() {
            start = Some(index);
        }
        match c {
            '"' | '\'' => quote = Some(c),
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    if let Some(begin) = start {
        out.push(&value[begin..]);
    }
    out
}

/// Append one declaration in canonical form (`name: value;` or
/// `name: value !important;`).
pub fn serialize_declaration(property: &str, value: &str, important: bool, out: &mut String) {
    out.push_str(property);
    out.push_str(": ");
    out.push_str(value);
    if important {
        out.push_str(" !");
        out.push_str(IMPORTANT);
    }
    out.push(';');
}

/// Serialize a sequence of declarations, separated by a single space.
pub fn serialize_declarations<'a, I>(declarations: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str, bool)>,
{
    let mut out = String::new();
    for (property, value, important) in declarations {
        if !out.is_empty() {
            out.push(' ');
        }
        serialize_declaration(property, value, important, &mut out);
    }
    out
}

/// CSS whitespace (TAB, LF, FF, CR, SPACE).
pub const fn is_css_whitespace(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\u{000C}' | '\r' | ' ')
}
