//! Operator Definitions
//!
//! ソース言語の演算子を、方言に依存しない中間の語彙へ写像するための型。
//! 実際の表記 (`≠`, `<>`, `mod`, `MOD` など) は方言テーブル側が持つ。

/// 方言ごとに表記が変わる演算子・キーワード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PseudoOp {
    // 代入
    Assign,

    // 比較演算子
    Eq,
    NotEq,
    LtEq,
    GtEq,

    // 論理演算子
    And,
    Or,
    Not,

    // 算術演算子
    FloorDiv,
    Mod,
    Pow,

    // 真偽値リテラル
    True,
    False,

    // 文字列連結
    Concat,
}

/// 累算代入演算子 (x += 1, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AugAssignOp {
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

/// Longest symbols first, so `//=` and `**=` win over `/=` and `*=`.
pub const AUG_ASSIGN_SYMBOLS: &[(&str, AugAssignOp)] = &[
    ("**=", AugAssignOp::Pow),
    ("//=", AugAssignOp::FloorDiv),
    ("+=", AugAssignOp::Add),
    ("-=", AugAssignOp::Sub),
    ("*=", AugAssignOp::Mul),
    ("/=", AugAssignOp::Div),
    ("%=", AugAssignOp::Mod),
];

impl AugAssignOp {
    /// `rest` の先頭にある累算代入記号を読み取る
    pub fn strip_symbol(rest: &str) -> Option<(AugAssignOp, &str)> {
        AUG_ASSIGN_SYMBOLS
            .iter()
            .find_map(|(sym, op)| rest.strip_prefix(sym).map(|value| (*op, value)))
    }

    /// Operators without a dialect-specific spelling render as plain symbols.
    pub fn plain_symbol(&self) -> Option<&'static str> {
        match self {
            AugAssignOp::Add => Some("+"),
            AugAssignOp::Sub => Some("-"),
            AugAssignOp::Mul => Some("*"),
            AugAssignOp::Div => Some("/"),
            AugAssignOp::FloorDiv | AugAssignOp::Mod | AugAssignOp::Pow => None,
        }
    }

    /// 方言テーブルで引くべき演算子
    pub fn pseudo_op(&self) -> Option<PseudoOp> {
        match self {
            AugAssignOp::FloorDiv => Some(PseudoOp::FloorDiv),
            AugAssignOp::Mod => Some(PseudoOp::Mod),
            AugAssignOp::Pow => Some(PseudoOp::Pow),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_symbol_prefers_longest() {
        assert_eq!(
            AugAssignOp::strip_symbol("//= 2"),
            Some((AugAssignOp::FloorDiv, " 2"))
        );
        assert_eq!(
            AugAssignOp::strip_symbol("**=3"),
            Some((AugAssignOp::Pow, "3"))
        );
        assert_eq!(AugAssignOp::strip_symbol("/= 4"), Some((AugAssignOp::Div, " 4")));
    }

    #[test]
    fn test_strip_symbol_rejects_comparison() {
        assert_eq!(AugAssignOp::strip_symbol("== 5"), None);
        assert_eq!(AugAssignOp::strip_symbol("= 5"), None);
    }
}
