//! Type inference module
//!
//! 表層的なリテラル推論のみを行う。型検査はしない。
//! - `infer_type`: 代入の右辺から型を推論
//! - `infer_call`: 組み込み呼び出しの戻り値型

use super::bounds::minus_one;
use super::types::PseudoType;
use crate::lexer::{tokenize, LexKind};
use crate::parser::utils::{is_string_literal, split_by_comma_balanced, split_call};
use crate::parser::SourceLanguage;

/// 既知の名前 (変数・関数) の型を問い合わせる
pub trait TypeLookup {
    fn type_of(&self, name: &str) -> Option<PseudoType>;
}

impl<F> TypeLookup for F
where
    F: Fn(&str) -> Option<PseudoType>,
{
    fn type_of(&self, name: &str) -> Option<PseudoType> {
        self(name)
    }
}

/// 式の型を推論する。分からなければ None
pub fn infer_type(expr: &str, language: SourceLanguage, known: &dyn TypeLookup) -> Option<PseudoType> {
    let expr = expr.trim();
    if expr.is_empty() {
        return None;
    }

    if is_string_literal(expr) {
        if language == SourceLanguage::Java && expr.starts_with('\'') {
            return Some(PseudoType::Char);
        }
        return Some(PseudoType::String);
    }
    if expr.parse::<i64>().is_ok() {
        return Some(PseudoType::Integer);
    }
    let numeric_start = expr.starts_with(|c: char| c.is_ascii_digit() || c == '-' || c == '.');
    if numeric_start && expr.parse::<f64>().is_ok() {
        return Some(PseudoType::Real);
    }
    match expr {
        "True" | "False" | "true" | "false" => return Some(PseudoType::Boolean),
        _ => {}
    }

    if let Some(array) = infer_array_literal(expr, language, known) {
        return Some(array);
    }
    if let Some(rest) = expr.strip_prefix("new ") {
        return infer_new_array(rest);
    }
    if let Some((callee, args)) = split_call(expr) {
        return infer_call(callee, args, known);
    }
    infer_operands(expr, language, known)
}

/// `[1, 2, 3]` (Python) / `{1, 2, 3}` (Java)
fn infer_array_literal(expr: &str, language: SourceLanguage, known: &dyn TypeLookup) -> Option<PseudoType> {
    let (open, close) = match language {
        SourceLanguage::Python => ('[', ']'),
        SourceLanguage::Java => ('{', '}'),
    };
    let inner = expr.strip_prefix(open)?.strip_suffix(close)?;
    let items = split_by_comma_balanced(inner);
    let of = items
        .first()
        .and_then(|first| infer_type(first, language, known))
        .unwrap_or(PseudoType::Integer);
    let upper = (!items.is_empty()).then(|| (items.len() - 1).to_string());
    Some(PseudoType::array_of(of, upper))
}

/// `int[5]` / `String[n]` (after `new `)
fn infer_new_array(rest: &str) -> Option<PseudoType> {
    let open = rest.find('[')?;
    let elem = PseudoType::from_java_type(&rest[..open])?;
    let size = rest[open + 1..].strip_suffix(']')?;
    let upper = (!size.trim().is_empty()).then(|| minus_one(size));
    Some(PseudoType::array_of(elem, upper))
}

/// 組み込み呼び出し・既知の関数呼び出しの戻り値型
pub fn infer_call(callee: &str, _args: &str, known: &dyn TypeLookup) -> Option<PseudoType> {
    match callee {
        "input" | "str" | "nextLine" => Some(PseudoType::String),
        "int" | "len" | "round" => Some(PseudoType::Integer),
        "float" => Some(PseudoType::Real),
        "bool" => Some(PseudoType::Boolean),
        _ => {
            let method = callee.rsplit('.').next().unwrap_or(callee);
            match method {
                "nextInt" | "nextLong" => Some(PseudoType::Integer),
                "nextDouble" | "nextFloat" => Some(PseudoType::Real),
                "nextLine" | "next" => Some(PseudoType::String),
                "nextBoolean" => Some(PseudoType::Boolean),
                "length" | "size" => Some(PseudoType::Integer),
                _ => known.type_of(callee),
            }
        }
    }
}

/// 演算子を含む式: 構成要素から型を決める
fn infer_operands(expr: &str, language: SourceLanguage, known: &dyn TypeLookup) -> Option<PseudoType> {
    let tokens = tokenize(expr);
    let mut saw_integer = false;
    let mut saw_real = false;

    for tok in &tokens {
        match tok.kind {
            LexKind::Str => return Some(PseudoType::String),
            LexKind::Symbol => match tok.text {
                "==" | "!=" | "<" | ">" | "<=" | ">=" | "&&" | "||" | "!" => {
                    return Some(PseudoType::Boolean)
                }
                "/" if language == SourceLanguage::Python => saw_real = true,
                _ => {}
            },
            LexKind::Word => match tok.text {
                "and" | "or" | "not" => return Some(PseudoType::Boolean),
                name => match known.type_of(name) {
                    Some(PseudoType::Real) => saw_real = true,
                    Some(PseudoType::Integer) => saw_integer = true,
                    Some(PseudoType::String) => return Some(PseudoType::String),
                    Some(PseudoType::Boolean) if tokens.len() == 1 => {
                        return Some(PseudoType::Boolean)
                    }
                    _ => {}
                },
            },
            LexKind::Number => {
                if tok.text.contains('.') {
                    saw_real = true;
                } else {
                    saw_integer = true;
                }
            }
            LexKind::Space | LexKind::Other => {}
        }
    }

    if saw_real {
        Some(PseudoType::Real)
    } else if saw_integer {
        Some(PseudoType::Integer)
    } else {
        None
    }
}
