//! Operator conversion module
//!
//! ソース言語の演算子・キーワードを `PseudoOp` に変換する。
//! - 記号演算子 (`==`, `//`, `&&` など)
//! - 単語演算子 (`and`, `not`, `True` など)

use crate::ir::PseudoOp;
use crate::parser::SourceLanguage;

/// 記号演算子を PseudoOp に変換する
///
/// # Arguments
/// * `language` - ソース言語
/// * `symbol` - トークナイザが切り出した記号 (最長一致済み)
pub fn symbol_op(language: SourceLanguage, symbol: &str) -> Option<PseudoOp> {
    let common = match symbol {
        "==" => Some(PseudoOp::Eq),
        "!=" => Some(PseudoOp::NotEq),
        "<=" => Some(PseudoOp::LtEq),
        ">=" => Some(PseudoOp::GtEq),
        "%" => Some(PseudoOp::Mod),
        _ => None,
    };
    if common.is_some() {
        return common;
    }
    match (language, symbol) {
        (SourceLanguage::Python, "//") => Some(PseudoOp::FloorDiv),
        (SourceLanguage::Python, "**") => Some(PseudoOp::Pow),
        (SourceLanguage::Java, "&&") => Some(PseudoOp::And),
        (SourceLanguage::Java, "||") => Some(PseudoOp::Or),
        (SourceLanguage::Java, "!") => Some(PseudoOp::Not),
        _ => None,
    }
}

/// 単語演算子 (語境界で一致したもののみ渡される) を PseudoOp に変換する
pub fn word_op(language: SourceLanguage, word: &str) -> Option<PseudoOp> {
    match (language, word) {
        (SourceLanguage::Python, "and") => Some(PseudoOp::And),
        (SourceLanguage::Python, "or") => Some(PseudoOp::Or),
        (SourceLanguage::Python, "not") => Some(PseudoOp::Not),
        (SourceLanguage::Python, "True") => Some(PseudoOp::True),
        (SourceLanguage::Python, "False") => Some(PseudoOp::False),
        (SourceLanguage::Java, "true") => Some(PseudoOp::True),
        (SourceLanguage::Java, "false") => Some(PseudoOp::False),
        _ => None,
    }
}
