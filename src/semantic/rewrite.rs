//! Condition / expression rewrite
//!
//! 式テキストをトークン列に分解し、演算子を方言の表記に置き換える。
//! 文字列リテラルの中身には触れない。置換で生じた空白の連続は 1 つに畳む。

use super::operators::{symbol_op, word_op};
use super::PreScan;
use crate::dialect::KeywordTable;
use crate::ir::PseudoOp;
use crate::lexer::{tokenize, LexKind, Lexeme};
use crate::parser::utils::{capitalize, find_char_balanced, find_matching_close, split_by_comma_balanced};
use crate::parser::SourceLanguage;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// 書き換えに必要な文脈
#[derive(Clone, Copy)]
pub struct RewriteEnv<'a> {
    pub language: SourceLanguage,
    pub table: &'a KeywordTable,
    pub scan: &'a PreScan,
}

/// (方言名, 関数名) → 置換後の名前
static BUILTIN_INDEX: Lazy<HashMap<(&'static str, &'static str), &'static str>> =
    Lazy::new(|| {
        let mut m = HashMap::new();
        for table in [&crate::dialect::IB, &crate::dialect::IGCSE] {
            for (from, to) in table.builtins {
                m.insert((table.name, *from), *to);
            }
        }
        m
    });

/// 組み込み関数の方言での名前
pub fn builtin_name(table: &KeywordTable, name: &str) -> Option<&'static str> {
    BUILTIN_INDEX.get(&(table.name, name)).copied()
}

/// Output builder that collapses whitespace outside string literals
#[derive(Default)]
struct Spaced {
    text: String,
    pending: bool,
}

impl Spaced {
    fn push(&mut self, s: &str) {
        if self.pending
            && !self.text.is_empty()
            && !self.text.ends_with(['(', '['])
            && !s.starts_with([')', ']', ','])
        {
            self.text.push(' ');
        }
        self.text.push_str(s);
        self.pending = false;
    }

    fn space(&mut self) {
        self.pending = true;
    }

    fn padded(&mut self, s: &str) {
        self.pending = true;
        self.push(s);
        self.pending = true;
    }
}

/// 式・条件を方言の表記に書き換える
pub fn rewrite_expr(expr: &str, env: &RewriteEnv<'_>) -> String {
    let expr = if env.language == SourceLanguage::Java {
        rewrite_pow_calls(expr.trim())
    } else {
        expr.trim().to_string()
    };
    let tokens = tokenize(&expr);
    let concat = env.table.op(PseudoOp::Concat) != "+"
        && tokens.iter().any(|t| t.kind == LexKind::Str);

    let mut out = Spaced::default();
    let mut i = 0;
    while i < tokens.len() {
        let tok = tokens[i];
        match tok.kind {
            LexKind::Space => out.space(),
            LexKind::Word => {
                if let Some(op) = word_op(env.language, tok.text) {
                    out.padded(env.table.op(op));
                    i += 1;
                    continue;
                }
                let next = dotted_path_end(&tokens, i);
                let path = &expr[tok.start..tokens[next - 1].end()];
                let is_call = tokens.get(next).map_or(false, |t| t.is_symbol("("));
                match call_rename(path, env).filter(|_| is_call) {
                    Some(renamed) => out.push(&renamed),
                    None => out.push(path),
                }
                i = next;
                continue;
            }
            LexKind::Symbol => {
                if concat && tok.text == "+" {
                    out.padded(env.table.op(PseudoOp::Concat));
                } else if let Some(op) = symbol_op(env.language, tok.text) {
                    out.padded(env.table.op(op));
                } else {
                    out.push(tok.text);
                }
            }
            LexKind::Str | LexKind::Number | LexKind::Other => out.push(tok.text),
        }
        i += 1;
    }
    out.text
}

/// `a.b.c` のように空白なしで続く単語列の終端 (排他的)
fn dotted_path_end(tokens: &[Lexeme<'_>], start: usize) -> usize {
    let mut end = start + 1;
    while end + 1 < tokens.len()
        && tokens[end].is_symbol(".")
        && tokens[end + 1].kind == LexKind::Word
    {
        end += 2;
    }
    end
}

fn call_rename(path: &str, env: &RewriteEnv<'_>) -> Option<String> {
    if let Some(name) = builtin_name(env.table, path) {
        return Some(name.to_string());
    }
    if env.table.capitalize_subroutines && env.scan.is_subroutine(path) {
        return Some(capitalize(path));
    }
    None
}

/// `Math.pow(a, b)` → `a ^ b`
fn rewrite_pow_calls(expr: &str) -> String {
    let mut text = expr.to_string();
    // each pass removes one call, so the loop is bounded by the call count
    while let Some((start, open)) = find_pow_call(&text) {
        let close = match find_matching_close(&text, open) {
            Some(close) => close,
            None => break,
        };
        let args = split_by_comma_balanced(&text[open + 1..close]);
        if args.len() != 2 {
            break;
        }
        let replacement = format!("{} ^ {}", wrap_operand(&args[0]), wrap_operand(&args[1]));
        text.replace_range(start..=close, &replacement);
    }
    text
}

fn find_pow_call(text: &str) -> Option<(usize, usize)> {
    let tokens = tokenize(text);
    tokens.windows(4).find_map(|w| {
        (w[0].is_word("Math") && w[1].is_symbol(".") && w[2].is_word("pow") && w[3].is_symbol("("))
            .then_some((w[0].start, w[3].start))
    })
}

fn wrap_operand(arg: &str) -> String {
    let simple = arg
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
    if simple {
        arg.to_string()
    } else {
        format!("({arg})")
    }
}

/// f-string を連結式に展開する: `f"Hi {name}!"` → `"Hi " + name + "!"`
pub fn render_fstring(literal: &str, env: &RewriteEnv<'_>) -> String {
    let quote_at = match literal.find(['"', '\'']) {
        Some(i) => i,
        None => return literal.to_string(),
    };
    let quote = &literal[quote_at..quote_at + 1];
    let body = literal
        .get(quote_at + 1..literal.len().saturating_sub(1))
        .unwrap_or("");

    let mut parts: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut rest = body;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with("{{") || rest.starts_with("}}") {
            text.push(c);
            rest = &rest[2..];
            continue;
        }
        if c == '{' {
            let close = match find_matching_close(rest, 0) {
                Some(close) => close,
                None => {
                    text.push_str(rest);
                    break;
                }
            };
            if !text.is_empty() {
                parts.push(format!("{quote}{text}{quote}"));
                text.clear();
            }
            let field = strip_format_spec(&rest[1..close]);
            parts.push(rewrite_expr(field, env));
            rest = &rest[close + 1..];
            continue;
        }
        text.push(c);
        rest = &rest[c.len_utf8()..];
    }
    if !text.is_empty() {
        parts.push(format!("{quote}{text}{quote}"));
    }
    if parts.is_empty() {
        return format!("{quote}{quote}");
    }
    parts.join(&format!(" {} ", env.table.op(PseudoOp::Concat)))
}

/// `{value:.2f}` / `{value!r}` / `{value=}` から式部分だけを取り出す
fn strip_format_spec(field: &str) -> &str {
    let mut field = match find_char_balanced(field, ':') {
        Some(i) => &field[..i],
        None => field,
    };
    if let Some(i) = field.rfind('!') {
        if field[i + 1..].len() == 1 && !field[i + 1..].starts_with('=') {
            field = &field[..i];
        }
    }
    field.trim().trim_end_matches('=').trim()
}
