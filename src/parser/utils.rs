//! Parser utility functions - bracket matching, string-aware scanning, etc.
//!
//! どの関数も文字列リテラル ("..." / '...') の内側を無視する。

use crate::ir::AugAssignOp;

/// Walk `s` calling `f(index, char, nesting)` for every char outside string literals.
/// `nesting` counts open `(`, `[` and `{` before the char. Stops when `f` returns true.
fn scan_code<F>(s: &str, mut f: F) -> Option<usize>
where
    F: FnMut(usize, char, usize) -> bool,
{
    let mut nesting = 0usize;
    let mut in_string = false;
    let mut string_quote = '\0';
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == string_quote {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                in_string = true;
                string_quote = c;
            }
            '(' | '[' | '{' => {
                if f(i, c, nesting) {
                    return Some(i);
                }
                nesting += 1;
            }
            ')' | ']' | '}' => {
                nesting = nesting.saturating_sub(1);
                if f(i, c, nesting) {
                    return Some(i);
                }
            }
            _ => {
                if f(i, c, nesting) {
                    return Some(i);
                }
            }
        }
    }
    None
}

/// Find first occurrence of a char at bracket depth 0, outside strings
pub fn find_char_balanced(s: &str, target: char) -> Option<usize> {
    scan_code(s, |_, c, nesting| nesting == 0 && c == target)
}

/// Find the bracket closing the one at byte offset `open`
pub fn find_matching_close(s: &str, open: usize) -> Option<usize> {
    let mut seen_open = false;
    let mut open_nesting = 0usize;
    scan_code(s, |i, c, nesting| {
        if i == open {
            seen_open = true;
            open_nesting = nesting;
            return false;
        }
        seen_open && matches!(c, ')' | ']' | '}') && nesting == open_nesting
    })
}

/// Split string by comma, respecting bracket balance and strings
pub fn split_by_comma_balanced(s: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut last = 0usize;
    scan_code(s, |i, c, nesting| {
        if c == ',' && nesting == 0 {
            parts.push(s[last..i].trim().to_string());
            last = i + 1;
        }
        false
    });
    let tail = s[last..].trim();
    if !tail.is_empty() {
        parts.push(tail.to_string());
    }
    parts
}

/// Net count of opened `(`/`[`/`{` (plus `{` only when `braces` is set) outside strings.
/// Used to join physical lines into one logical line.
pub fn open_bracket_balance(s: &str, braces: bool) -> i64 {
    let mut balance = 0i64;
    scan_code(s, |_, c, _| {
        match c {
            '(' | '[' => balance += 1,
            ')' | ']' => balance -= 1,
            '{' if braces => balance += 1,
            '}' if braces => balance -= 1,
            _ => {}
        }
        false
    });
    balance
}

/// `{` count minus `}` count outside strings
pub fn brace_delta(s: &str) -> i64 {
    let mut delta = 0i64;
    scan_code(s, |_, c, _| {
        match c {
            '{' => delta += 1,
            '}' => delta -= 1,
            _ => {}
        }
        false
    });
    delta
}

/// Split a trailing comment (`marker` outside strings) off a code line.
/// Returns the code (right-trimmed) and the comment text after the marker.
pub fn strip_trailing_comment<'a>(line: &'a str, marker: &str) -> (&'a str, Option<&'a str>) {
    let first = match marker.chars().next() {
        Some(c) => c,
        None => return (line, None),
    };
    let pos = scan_code(line, |i, c, _| c == first && line[i..].starts_with(marker));
    match pos {
        Some(i) => (line[..i].trim_end(), Some(line[i + marker.len()..].trim())),
        None => (line, None),
    }
}

/// Find keyword position at bracket depth 0 (left to right).
/// The keyword must be surrounded by non-identifier characters.
pub fn find_keyword_balanced(s: &str, keyword: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    scan_code(s, |i, _, nesting| {
        if nesting != 0 || !s[i..].starts_with(keyword) {
            return false;
        }
        let end = i + keyword.len();
        let left_ok = i == 0 || !is_ident_byte(bytes[i - 1]);
        let right_ok = end == bytes.len() || !is_ident_byte(bytes[end]);
        left_ok && right_ok
    })
}

/// Find the `=` of a plain assignment: depth 0, outside strings, not part of
/// `==`, `!=`, `<=`, `>=` or an operator-assignment such as `+=`.
pub fn find_assignment_eq(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    scan_code(s, |i, c, nesting| {
        if c != '=' || nesting != 0 {
            return false;
        }
        let prev = if i > 0 { bytes[i - 1] } else { b' ' };
        let next = bytes.get(i + 1).copied().unwrap_or(b' ');
        !b"=!<>+-*/%&|^:".contains(&prev) && next != b'='
    })
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// `name`, `_tmp2`
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Assignable target: identifier, dotted path or subscript (`a.b`, `xs[i]`, `grid[r][c]`)
pub fn is_target(s: &str) -> bool {
    let s = s.trim();
    let head_end = s.find('[').unwrap_or(s.len());
    let head = &s[..head_end];
    if head.is_empty() || !head.split('.').all(is_identifier) {
        return false;
    }
    let mut rest = &s[head_end..];
    while !rest.is_empty() {
        if !rest.starts_with('[') {
            return false;
        }
        match find_matching_close(rest, 0) {
            Some(close) => rest = &rest[close + 1..],
            None => return false,
        }
    }
    true
}

/// If `s` is exactly `name(...)`, return the text between the parentheses
pub fn call_args<'a>(s: &'a str, name: &str) -> Option<&'a str> {
    let rest = s.strip_prefix(name)?;
    let open = name.len() + rest.len() - rest.trim_start().len();
    if !s[open..].starts_with('(') {
        return None;
    }
    let close = find_matching_close(s, open)?;
    if close + 1 != s.len() {
        return None;
    }
    Some(s[open + 1..close].trim())
}

/// Split `name(args)` into its callee and argument text
pub fn split_call(s: &str) -> Option<(&str, &str)> {
    let open = s.find('(')?;
    let callee = s[..open].trim_end();
    if callee.is_empty() || !callee.split('.').all(is_identifier) {
        return None;
    }
    let args = call_args(s, callee)?;
    Some((callee, args))
}

/// First letter upper-cased: `greet` -> `Greet`
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `target <op>= value` → (target, op, value). Stops at the first quote or call.
pub fn split_aug_assign(code: &str) -> Option<(&str, AugAssignOp, &str)> {
    for (i, c) in code.char_indices() {
        if matches!(c, '"' | '\'' | '(') {
            return None;
        }
        if let Some((op, value)) = AugAssignOp::strip_symbol(&code[i..]) {
            let target = code[..i].trim();
            return is_target(target).then_some((target, op, value.trim()));
        }
    }
    None
}

/// `MAX_SIZE`, `PI`, `N`: upper-case identifier with at least one letter
pub fn is_constant_name(s: &str) -> bool {
    is_identifier(s)
        && s.chars().any(|c| c.is_ascii_uppercase())
        && !s.chars().any(|c| c.is_ascii_lowercase())
}

/// Whole text is a single string literal (`"..."` or `'...'`)
pub fn is_string_literal(s: &str) -> bool {
    let s = s.trim();
    if s.len() < 2 {
        return false;
    }
    let quote = match s.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => return false,
    };
    if !s.ends_with(quote) {
        return false;
    }
    // no unescaped quote between the opener and the closer
    let mut escaped = false;
    s[1..s.len() - 1].chars().all(|c| {
        let ok = escaped || c != quote;
        escaped = !escaped && c == '\\';
        ok
    })
}
