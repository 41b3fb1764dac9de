//! Token definitions

/// 式トークンの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexKind {
    /// 文字列リテラル (接頭辞 f/r/b を含む)
    Str,
    Space,
    Number,
    Word,
    Symbol,
    Other,
}

/// 元テキストを借用するトークン
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'a> {
    pub kind: LexKind,
    pub text: &'a str,
    /// 元テキスト中のバイト位置
    pub start: usize,
}

impl<'a> Lexeme<'a> {
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == LexKind::Word && self.text == word
    }

    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.kind == LexKind::Symbol && self.text == symbol
    }

    pub fn end(&self) -> usize {
        self.start + self.text.len()
    }

    /// f-string かどうか (`f"..."`, `rf'...'` など)
    pub fn is_fstring(&self) -> bool {
        if self.kind != LexKind::Str {
            return false;
        }
        let prefix: String = self
            .text
            .chars()
            .take_while(|c| *c != '"' && *c != '\'')
            .collect();
        prefix.contains(['f', 'F'])
    }
}
