//! Parser module - logical lines, structural depth and construct matchers
//!
//! 構文木は作らない。ソースを論理行に分け、各行の構造的深さを求め、
//! 優先順位付きの Construct Matcher 列で 1 行ずつ変換する。

pub mod java;
pub mod lines;
pub mod python;
pub mod utils;

pub use lines::{split_logical_lines, Hint, LineKind, LogicalLine};

use crate::dialect::KeywordTable;
use crate::error::PseudocError;
use crate::ir::{BlockKind, Converted, Frame};
use crate::semantic::rewrite::{render_fstring, rewrite_expr, RewriteEnv};
use crate::semantic::PreScan;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// 入力のソース言語
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceLanguage {
    /// インデントでブロックを表す
    Python,
    /// 波括弧でブロックを表す
    Java,
}

impl SourceLanguage {
    /// `.py` → Python, `.java` → Java
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "py" | "pyw" => Some(SourceLanguage::Python),
            "java" => Some(SourceLanguage::Java),
            _ => None,
        }
    }

    pub fn comment_marker(self) -> &'static str {
        match self {
            SourceLanguage::Python => "#",
            SourceLanguage::Java => "//",
        }
    }

    /// 優先順位順の Construct Matcher 列
    pub fn matchers(self) -> &'static [Matcher] {
        match self {
            SourceLanguage::Python => python::MATCHERS,
            SourceLanguage::Java => java::MATCHERS,
        }
    }

    /// 直前のブロックを続ける行 (`elif`, `} else {`, `} while (c);` ...) の分類
    pub fn continuation(self, line: &LogicalLine) -> Option<Continuation> {
        match self {
            SourceLanguage::Python => python::continuation(line),
            SourceLanguage::Java => java::continuation(line),
        }
    }
}

impl FromStr for SourceLanguage {
    type Err = PseudocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "python" | "py" => Ok(SourceLanguage::Python),
            "java" => Ok(SourceLanguage::Java),
            other => Err(PseudocError::UnknownLanguage(other.to_string())),
        }
    }
}

impl fmt::Display for SourceLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLanguage::Python => f.write_str("python"),
            SourceLanguage::Java => f.write_str("java"),
        }
    }
}

/// 前のブロックを閉じずに続ける行の種類
#[derive(Debug, Clone, PartialEq)]
pub enum Continuation {
    /// `elif` / `else` / `except` / `finally`: 同じ深さの、これらの種類のフレームを引き継ぐ
    Chain(&'static [BlockKind]),
    /// `} while (cond);`: 同じ深さの REPEAT を条件付きで閉じる
    Until(String),
}

/// マッチャーに渡す読み取り専用の文脈
pub struct MatchContext<'a> {
    pub language: SourceLanguage,
    pub table: &'a KeywordTable,
    pub scan: &'a PreScan,
    /// 現在開いているフレーム (内側が末尾)
    pub frames: &'a [Frame],
    /// この行の出力インデント
    pub indent: String,
    /// 1 段深いインデントの増分
    pub unit: String,
    /// 宣言をヘッダにまとめず、その場で `DECLARE` を出すか
    pub inline_declarations: bool,
}

impl<'a> MatchContext<'a> {
    pub fn env(&self) -> RewriteEnv<'a> {
        RewriteEnv {
            language: self.language,
            table: self.table,
            scan: self.scan,
        }
    }

    /// 式・条件の書き換え
    pub fn expr(&self, text: &str) -> String {
        rewrite_expr(text, &self.env())
    }

    /// 出力用の値: f-string は連結式に展開する
    pub fn value(&self, text: &str) -> String {
        let text = text.trim();
        let is_fstring = crate::lexer::tokenize(text)
            .first()
            .map_or(false, |t| t.is_fstring() && t.text.len() == text.len());
        if is_fstring {
            render_fstring(text, &self.env())
        } else {
            self.expr(text)
        }
    }

    /// インデント付きの 1 行
    pub fn emit(&self, body: impl AsRef<str>) -> String {
        format!("{}{}", self.indent, body.as_ref())
    }

    /// 直近のクラス (メソッド定義の直下にいる場合のみ)
    pub fn enclosing_class(&self) -> Option<&'a Frame> {
        self.frames.last().filter(|f| f.kind == BlockKind::Class)
    }

    /// 最も内側のループまたは CASE
    pub fn innermost_breakable(&self) -> Option<&'a Frame> {
        self.frames
            .iter()
            .rev()
            .find(|f| f.kind.is_loop() || f.kind == BlockKind::Case)
    }
}

pub type MatchFn = fn(&LogicalLine, &MatchContext<'_>) -> Option<Converted>;

/// 1 つの構文を認識して変換する規則
pub struct Matcher {
    /// ログ用の構文名
    pub construct: &'static str,
    pub apply: MatchFn,
}

#[cfg(test)]
mod tests;
