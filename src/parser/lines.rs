//! Logical line splitting and structural depth
//!
//! Python はインデント幅 (先頭空白の文字数、タブも 1 文字)、
//! Java は行頭時点の波括弧のネスト数から行頭の `}` の数を引いた値を深さとする。

use super::utils::{brace_delta, open_bracket_balance, strip_trailing_comment};
use super::SourceLanguage;
use crate::ir::SourceLocation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    /// 行全体がコメント (`comment` が None ならブロックコメントの区切りだけ)
    Comment,
    /// 波括弧だけの行。深さには影響するが出力はない
    Brace,
    Code,
}

/// 行末コメントで与えるヒント (`# procedure`, `# repeat`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    Procedure,
    Repeat,
}

/// 1 つの文に相当する論理行
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalLine {
    pub location: SourceLocation,
    /// 最初の物理行の先頭空白
    pub indent: String,
    pub depth: usize,
    pub kind: LineKind,
    /// コメントと (Java では) 行頭の `}`、行末の `{` / `;` を除いたコード
    pub code: String,
    pub comment: Option<String>,
    pub hint: Option<Hint>,
    /// 行頭に `}` があった
    pub closes_brace: bool,
    /// 行末に `{` があった
    pub opens_brace: bool,
    /// 行末に `;` があった
    pub terminated: bool,
}

impl LogicalLine {
    fn new(line: usize, indent: &str, depth: usize, kind: LineKind) -> Self {
        Self {
            location: SourceLocation::new(line, indent.chars().count() + 1),
            indent: indent.to_string(),
            depth,
            kind,
            code: String::new(),
            comment: None,
            hint: None,
            closes_brace: false,
            opens_brace: false,
            terminated: false,
        }
    }

    fn comment_line(line: usize, indent: &str, depth: usize, body: Option<&str>) -> Self {
        let mut l = Self::new(line, indent, depth, LineKind::Comment);
        l.comment = body.map(|b| b.trim().to_string());
        l
    }

    pub fn line_number(&self) -> usize {
        self.location.line
    }

    /// 変換できなかった行として出すソース文 (Java は `;` と `{` を戻す)
    pub fn statement_text(&self) -> String {
        let mut text = self.code.clone();
        if self.terminated {
            text.push(';');
        }
        if self.opens_brace {
            text.push_str(" {");
        }
        text
    }
}

fn leading_whitespace(raw: &str) -> &str {
    &raw[..raw.len() - raw.trim_start().len()]
}

/// ソース全体を論理行に分割する
pub fn split_logical_lines(source: &str, language: SourceLanguage) -> Vec<LogicalLine> {
    let physical: Vec<&str> = source.lines().collect();
    match language {
        SourceLanguage::Python => split_python(&physical),
        SourceLanguage::Java => split_java(&physical),
    }
}

fn parse_hint(comment: &str) -> Option<Hint> {
    match comment.trim().to_ascii_lowercase().as_str() {
        "procedure" => Some(Hint::Procedure),
        "repeat" => Some(Hint::Repeat),
        _ => None,
    }
}

fn split_python(physical: &[&str]) -> Vec<LogicalLine> {
    let mut out = Vec::new();
    let mut docstring: Option<&str> = None;
    let mut i = 0;

    while i < physical.len() {
        let raw = physical[i];
        let line_no = i + 1;
        let indent = leading_whitespace(raw);
        let depth = indent.chars().count();
        let trimmed = raw.trim();
        i += 1;

        if let Some(quote) = docstring {
            let (body, closed) = match trimmed.find(quote) {
                Some(p) => (&trimmed[..p], true),
                None => (trimmed, false),
            };
            if closed {
                docstring = None;
            }
            let body = (!body.is_empty()).then_some(body);
            out.push(LogicalLine::comment_line(line_no, indent, depth, body));
            continue;
        }

        if trimmed.is_empty() {
            out.push(LogicalLine::new(line_no, indent, depth, LineKind::Blank));
            continue;
        }
        if let Some(body) = trimmed.strip_prefix('#') {
            out.push(LogicalLine::comment_line(line_no, indent, depth, Some(body)));
            continue;
        }
        if let Some(quote) = ["\"\"\"", "'''"].into_iter().find(|q| trimmed.starts_with(q)) {
            let rest = &trimmed[3..];
            let body = match rest.find(quote) {
                Some(p) => &rest[..p],
                None => {
                    docstring = Some(quote);
                    rest
                }
            };
            let body = (!body.trim().is_empty()).then_some(body);
            out.push(LogicalLine::comment_line(line_no, indent, depth, body));
            continue;
        }

        // join physical lines while a bracket is open or the line ends with `\`
        let mut parts: Vec<String> = Vec::new();
        let mut comment: Option<String> = None;
        let mut balance = 0i64;
        let mut current = trimmed;
        loop {
            let (code, trailing) = strip_trailing_comment(current, "#");
            if trailing.is_some() {
                comment = trailing.map(str::to_string);
            }
            balance += open_bracket_balance(code, true);
            let explicit = code.ends_with('\\');
            parts.push(code.trim_end_matches('\\').trim().to_string());
            if (explicit || balance > 0) && i < physical.len() {
                current = physical[i].trim();
                i += 1;
                continue;
            }
            break;
        }

        let mut line = LogicalLine::new(line_no, indent, depth, LineKind::Code);
        line.code = join_parts(&parts);
        line.hint = comment.as_deref().and_then(parse_hint);
        line.comment = if line.hint.is_some() { None } else { comment };
        out.push(line);
    }
    out
}

/// 継続行を 1 行に: 括弧の直後・直前には空白を入れない
fn join_parts(parts: &[String]) -> String {
    let mut joined = String::new();
    for part in parts.iter().filter(|p| !p.is_empty()) {
        if !joined.is_empty()
            && !joined.ends_with(['(', '[', '{'])
            && !part.starts_with([')', ']', '}'])
        {
            joined.push(' ');
        }
        joined.push_str(part);
    }
    joined
}

fn split_java(physical: &[&str]) -> Vec<LogicalLine> {
    let mut out = Vec::new();
    let mut nesting = 0usize;
    let mut in_block_comment = false;
    let mut i = 0;

    while i < physical.len() {
        let raw = physical[i];
        let line_no = i + 1;
        let indent = leading_whitespace(raw);
        let trimmed = raw.trim();
        i += 1;

        if in_block_comment {
            let (body, closed) = match trimmed.find("*/") {
                Some(p) => (&trimmed[..p], true),
                None => (trimmed, false),
            };
            if closed {
                in_block_comment = false;
            }
            out.push(LogicalLine::comment_line(line_no, indent, nesting, block_comment_body(body)));
            continue;
        }

        if trimmed.is_empty() {
            out.push(LogicalLine::new(line_no, indent, nesting, LineKind::Blank));
            continue;
        }
        if let Some(body) = trimmed.strip_prefix("//") {
            out.push(LogicalLine::comment_line(line_no, indent, nesting, Some(body)));
            continue;
        }
        if let Some(rest) = trimmed.strip_prefix("/*") {
            let body = match rest.find("*/") {
                Some(p) => &rest[..p],
                None => {
                    in_block_comment = true;
                    rest
                }
            };
            out.push(LogicalLine::comment_line(line_no, indent, nesting, block_comment_body(body)));
            continue;
        }

        // join physical lines while a parenthesis or bracket is open
        let mut parts: Vec<String> = Vec::new();
        let mut comment: Option<String> = None;
        let mut balance = 0i64;
        let mut current = trimmed;
        loop {
            let (code, trailing) = strip_trailing_comment(current, "//");
            if trailing.is_some() {
                comment = trailing.map(str::to_string);
            }
            balance += open_bracket_balance(code, false);
            parts.push(code.trim().to_string());
            if balance > 0 && i < physical.len() {
                current = physical[i].trim();
                i += 1;
                continue;
            }
            break;
        }
        let code = join_parts(&parts);

        let after_closers = code.trim_start_matches(|c: char| c == '}' || c.is_whitespace());
        let closers = code[..code.len() - after_closers.len()].matches('}').count();
        let depth = nesting.saturating_sub(closers);
        nesting = (nesting as i64 + brace_delta(&code)).max(0) as usize;

        let mut body = after_closers.trim_end();
        let opens_brace = body.ends_with('{');
        body = body.trim_end_matches('{').trim_end();
        let terminated = body.ends_with(';');
        body = body.trim_end_matches(';').trim_end();

        let kind = if body.is_empty() {
            LineKind::Brace
        } else {
            LineKind::Code
        };
        let mut line = LogicalLine::new(line_no, indent, depth, kind);
        line.code = body.to_string();
        line.comment = comment;
        line.closes_brace = closers > 0;
        line.opens_brace = opens_brace;
        line.terminated = terminated;
        out.push(line);
    }
    out
}

/// `/** text`, `* text`, `text */` から本文だけを取り出す
fn block_comment_body(body: &str) -> Option<&str> {
    let body = body.trim().trim_start_matches('*').trim();
    (!body.is_empty()).then_some(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_python_depth_is_raw_whitespace_count() {
        let lines = split_logical_lines("if x:\n\ty = 1\n    z = 2", SourceLanguage::Python);
        assert_eq!(lines[1].depth, 1);
        assert_eq!(lines[2].depth, 4);
    }

    #[test]
    fn test_python_hint_and_trailing_comment() {
        let lines = split_logical_lines(
            "while True:  # repeat\nx = 5  # Another comment",
            SourceLanguage::Python,
        );
        assert_eq!(lines[0].hint, Some(Hint::Repeat));
        assert_eq!(lines[0].comment, None);
        assert_eq!(lines[1].code, "x = 5");
        assert_eq!(lines[1].comment.as_deref(), Some("Another comment"));
    }

    #[test]
    fn test_python_joins_open_brackets() {
        let lines = split_logical_lines(
            "total = add(1,\n            2)\nprint(total)",
            SourceLanguage::Python,
        );
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].code, "total = add(1, 2)");
        assert_eq!(lines[1].line_number(), 3);
    }

    #[test]
    fn test_python_docstring_becomes_comment() {
        let lines = split_logical_lines(
            "def f():\n    \"\"\"Say hi.\n    Twice.\n    \"\"\"\n    pass",
            SourceLanguage::Python,
        );
        assert_eq!(lines[1].kind, LineKind::Comment);
        assert_eq!(lines[1].comment.as_deref(), Some("Say hi."));
        assert_eq!(lines[2].comment.as_deref(), Some("Twice."));
        assert_eq!(lines[3].comment, None);
        assert_eq!(lines[4].kind, LineKind::Code);
    }

    #[test]
    fn test_java_brace_depth() {
        let src = "class A {\n  void f() {\n    x = 1;\n  }\n}";
        let depths: Vec<usize> = split_logical_lines(src, SourceLanguage::Java)
            .iter()
            .map(|l| l.depth)
            .collect();
        assert_eq!(depths, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_java_else_line_normalized() {
        let lines = split_logical_lines("if (a) {\n} else {\n}", SourceLanguage::Java);
        assert_eq!(lines[1].depth, 0);
        assert_eq!(lines[1].code, "else");
        assert!(lines[1].closes_brace);
        assert!(lines[1].opens_brace);
        assert_eq!(lines[2].kind, LineKind::Brace);
    }

    #[test]
    fn test_java_do_while_tail() {
        let lines = split_logical_lines("do {\n  i++;\n} while (i < 3);", SourceLanguage::Java);
        assert_eq!(lines[2].code, "while (i < 3)");
        assert!(lines[2].terminated);
        assert!(lines[2].closes_brace);
    }

    #[test]
    fn test_java_braces_in_strings_ignored() {
        let lines = split_logical_lines("String s = \"{\";\nx = 1;", SourceLanguage::Java);
        assert_eq!(lines[1].depth, 0);
    }

    #[test]
    fn test_java_block_comment() {
        let lines = split_logical_lines("/**\n * Adds.\n */\nint x;", SourceLanguage::Java);
        assert_eq!(lines[0].comment, None);
        assert_eq!(lines[1].comment.as_deref(), Some("Adds."));
        assert_eq!(lines[2].kind, LineKind::Comment);
        assert_eq!(lines[3].code, "int x");
    }

    #[test]
    fn test_statement_text_restores_java_punctuation() {
        let lines = split_logical_lines("x.sort();\nsynchronized (lock) {\n}", SourceLanguage::Java);
        assert_eq!(lines[0].statement_text(), "x.sort();");
        assert_eq!(lines[1].statement_text(), "synchronized (lock) {");
    }
}
