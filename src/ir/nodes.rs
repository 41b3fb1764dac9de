//! Block frames and matcher results
//!
//! Construct Matcher が返す変換結果と、Block Tracker が保持するフレームを定義する。

/// 開いているブロックの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Function,
    Procedure,
    Class,
    If,
    Elif,
    Else,
    For,
    While,
    Repeat,
    Case,
    Try,
    Catch,
    Finally,
}

impl BlockKind {
    pub fn name(&self) -> &'static str {
        match self {
            BlockKind::Function => "function",
            BlockKind::Procedure => "procedure",
            BlockKind::Class => "class",
            BlockKind::If => "if",
            BlockKind::Elif => "elif",
            BlockKind::Else => "else",
            BlockKind::For => "for",
            BlockKind::While => "while",
            BlockKind::Repeat => "repeat",
            BlockKind::Case => "case",
            BlockKind::Try => "try",
            BlockKind::Catch => "catch",
            BlockKind::Finally => "finally",
        }
    }

    pub fn is_loop(&self) -> bool {
        matches!(self, BlockKind::For | BlockKind::While | BlockKind::Repeat)
    }

    pub fn is_subroutine(&self) -> bool {
        matches!(self, BlockKind::Function | BlockKind::Procedure)
    }
}

/// 開いているブロック 1 つ分
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub kind: BlockKind,
    /// 閉じキーワードに使う識別子 (ループ変数、UNTIL 条件など)
    pub ident: Option<String>,
    /// ヘッダ行の構造的深さ
    pub header_depth: usize,
    /// ヘッダ行を出力したときのインデント。閉じ行も同じインデントで出す
    pub indent: String,
    /// 本体の深さが最初の本体行で確定したかどうか
    pub settled: bool,
}

/// マッチャーが開くよう要求したブロック
#[derive(Debug, Clone, PartialEq)]
pub struct OpenBlock {
    pub kind: BlockKind,
    pub ident: Option<String>,
}

/// Construct Matcher の受理結果。辞退は `None` で表す。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Converted {
    /// 出力行 (インデント込み)。0 行もありうる
    pub lines: Vec<String>,
    pub opens: Option<OpenBlock>,
}

impl Converted {
    pub fn line(line: String) -> Self {
        Self {
            lines: vec![line],
            opens: None,
        }
    }

    pub fn lines(lines: Vec<String>) -> Self {
        Self { lines, opens: None }
    }

    /// Accepted, but produces no output (imports, `pass`, bare braces).
    pub fn nothing() -> Self {
        Self::default()
    }

    pub fn opening(mut self, kind: BlockKind, ident: Option<String>) -> Self {
        self.opens = Some(OpenBlock { kind, ident });
        self
    }
}
