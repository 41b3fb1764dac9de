//! Dialect module - per-dialect keyword and format tables
//!
//! エンジン (Block Tracker / Line Driver) は方言を知らない。
//! 方言の違いは `KeywordTable` の値と `render` の整形関数だけに閉じ込める。

mod render;
mod tables;

pub use render::SubroutineHeader;
pub use tables::{IB, IGCSE};

use crate::error::PseudocError;
use crate::ir::{BlockKind, PseudoOp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 出力先の擬似コード方言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// IB Computer Science pseudocode
    Ib,
    /// Cambridge IGCSE / A-Level pseudocode
    Igcse,
}

impl Dialect {
    pub fn table(self) -> &'static KeywordTable {
        match self {
            Dialect::Ib => &IB,
            Dialect::Igcse => &IGCSE,
        }
    }
}

impl FromStr for Dialect {
    type Err = PseudocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ib" => Ok(Dialect::Ib),
            "igcse" | "cambridge" | "cie" => Ok(Dialect::Igcse),
            other => Err(PseudocError::UnknownDialect(other.to_string())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table().name)
    }
}

/// 出力行のインデント方針
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentStyle {
    /// ソース行の先頭空白をそのまま使う
    Preserve,
    /// 開いているフレーム 1 つにつき N 個の空白
    Width(usize),
}

/// 閉じ行の書式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Closer {
    /// 固定キーワード (`END IF`)
    Keyword(&'static str),
    /// キーワード + フレームの識別子 (`NEXT i`)
    Next(&'static str),
    /// キーワード + 終了条件 (`UNTIL x > 3`)。条件が無ければ無限ループ扱い
    Until(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeStyle {
    /// `loop i from 0 to 4`
    LoopFromTo,
    /// `FOR i ← 0 TO 4 STEP 1`
    ForTo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionStyle {
    /// `c.resetNext()` / `loop while c.hasNext()` / `v ← c.getNext()`
    CursorExpansion,
    /// `FOR EACH v IN c`
    ForEach,
}

/// 方言ごとのキーワード・書式テーブル
#[derive(Debug, Clone)]
pub struct KeywordTable {
    pub name: &'static str,
    pub comment: &'static str,
    pub ops: &'static [(PseudoOp, &'static str)],
    pub closers: &'static [(BlockKind, Closer)],
    pub default_indent: IndentStyle,

    pub output: &'static str,
    pub output_separator: &'static str,
    pub input: &'static str,
    /// 入力のプロンプトを `OUTPUT` 行として先に出すか
    pub prompt_before_input: bool,

    pub if_kw: &'static str,
    pub then_kw: &'static str,
    pub else_if_kw: &'static str,
    pub else_kw: &'static str,
    pub while_kw: &'static str,
    pub do_kw: Option<&'static str>,
    pub repeat_kw: &'static str,
    pub range_style: RangeStyle,
    /// `STEP` 句を出力するか (出さない方言では step は無視される)
    pub renders_step: bool,
    pub collection_style: CollectionStyle,
    pub exits: &'static [(BlockKind, &'static str)],

    pub case_of: &'static str,
    pub otherwise: &'static str,
    pub try_kw: &'static str,
    pub catch_kw: &'static str,
    pub finally_kw: &'static str,
    pub return_kw: &'static str,

    pub function_kw: &'static str,
    pub procedure_kw: &'static str,
    pub returns_kw: Option<&'static str>,
    /// パラメータに型を付けるか (`p : INTEGER`)
    pub typed_signatures: bool,
    pub capitalize_subroutines: bool,
    pub class_kw: &'static str,
    pub extends_kw: &'static str,
    /// クラス内メソッドの接頭辞 (`PUBLIC`)
    pub member_prefix: Option<&'static str>,
    pub constructor_name: Option<&'static str>,
    pub call_kw: Option<&'static str>,
    /// (`CONSTANT`, `=`)。無い方言では通常の代入になる
    pub constant: Option<(&'static str, &'static str)>,
    pub declare_kw: &'static str,
    /// 事前走査した変数を先頭で宣言する方言か
    pub declares_upfront: bool,
    /// ユーザー定義関数ではない組み込み関数の名前変換
    pub builtins: &'static [(&'static str, &'static str)],
}

impl KeywordTable {
    /// 演算子の表記。テーブルに無い演算子は記号そのまま
    pub fn op(&self, op: PseudoOp) -> &'static str {
        self.ops
            .iter()
            .find(|(o, _)| *o == op)
            .map(|(_, s)| *s)
            .unwrap_or_else(|| fallback_symbol(op))
    }
}

fn fallback_symbol(op: PseudoOp) -> &'static str {
    match op {
        PseudoOp::Assign => "=",
        PseudoOp::Eq => "==",
        PseudoOp::NotEq => "!=",
        PseudoOp::LtEq => "<=",
        PseudoOp::GtEq => ">=",
        PseudoOp::And => "and",
        PseudoOp::Or => "or",
        PseudoOp::Not => "not",
        PseudoOp::FloorDiv => "//",
        PseudoOp::Mod => "%",
        PseudoOp::Pow => "**",
        PseudoOp::True => "true",
        PseudoOp::False => "false",
        PseudoOp::Concat => "+",
    }
}

#[cfg(test)]
mod tests;
