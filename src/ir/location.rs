//! Source Location Definitions
//!
//! 論理行の位置情報。診断メッセージと論理行の両方で共有する。

/// ソース上の位置 (1-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// 行番号 (論理行の場合は最初の物理行)
    pub line: usize,
    /// 列番号 (最初の非空白文字)
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl std::fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
