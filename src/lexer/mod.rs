//! Lexer module - pest-based expression tokenizer
//!
//! 行の変換では構文木を作らないが、演算子の置換は文字列リテラルの内側を
//! 壊してはいけない。そのため式テキストをトークン列に分解してから置換する。

mod token;

pub use token::*;

use pest::Parser;
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "lexer/expr.pest"]
pub struct ExprLexer;

/// Tokenize an expression. Never fails: on a grammar error the whole text
/// comes back as a single `Other` lexeme.
pub fn tokenize(text: &str) -> Vec<Lexeme<'_>> {
    let pairs = match ExprLexer::parse(Rule::expr, text) {
        Ok(pairs) => pairs,
        Err(_) => {
            return vec![Lexeme {
                kind: LexKind::Other,
                text,
                start: 0,
            }]
        }
    };

    let mut out = Vec::new();
    for pair in pairs.flatten() {
        let kind = match pair.as_rule() {
            Rule::string => LexKind::Str,
            Rule::space => LexKind::Space,
            Rule::number => LexKind::Number,
            Rule::word => LexKind::Word,
            Rule::symbol => LexKind::Symbol,
            Rule::other => LexKind::Other,
            _ => continue,
        };
        out.push(Lexeme {
            kind,
            text: pair.as_str(),
            start: pair.as_span().start(),
        });
    }
    out
}

/// 文字列リテラルを含むかどうか
pub fn has_string_literal(text: &str) -> bool {
    tokenize(text).iter().any(|t| t.kind == LexKind::Str)
}
