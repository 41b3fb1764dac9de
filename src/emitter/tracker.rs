//! Block Tracker - the stack of open frames and their depth levels

use crate::dialect::KeywordTable;
use crate::ir::{BlockKind, Frame, OpenBlock};
use tracing::debug;

/// 開いているブロックのスタック。
///
/// `levels[0]` はトップレベル (0)、`levels[i + 1]` は `frames[i]` の本体の深さ。
/// 本体の深さはヘッダの深さ + 1 で仮置きし、最初の本体行で確定させる。
pub struct BlockTracker<'t> {
    table: &'t KeywordTable,
    frames: Vec<Frame>,
    levels: Vec<usize>,
    pub opened: usize,
    /// 閉じずに引き継いだ連鎖 (`elif`, `catch`, ...)
    pub continued: usize,
    pub closed: usize,
}

impl<'t> BlockTracker<'t> {
    pub fn new(table: &'t KeywordTable) -> Self {
        Self {
            table,
            frames: Vec::new(),
            levels: vec![0],
            opened: 0,
            continued: 0,
            closed: 0,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn open(&mut self, block: OpenBlock, header_depth: usize, indent: String) {
        debug!(kind = block.kind.name(), header_depth, "open frame");
        self.frames.push(Frame {
            kind: block.kind,
            ident: block.ident,
            header_depth,
            indent,
            settled: false,
        });
        self.levels.push(header_depth + 1);
        self.opened += 1;
    }

    /// 最初の本体行の深さで仮の深さを置き換える
    pub fn settle(&mut self, depth: usize) {
        let Some(frame) = self.frames.last_mut() else {
            return;
        };
        if frame.settled || depth <= frame.header_depth {
            return;
        }
        frame.settled = true;
        if let Some(level) = self.levels.last_mut() {
            *level = depth;
        }
    }

    fn pop(&mut self) -> Option<Frame> {
        let frame = self.frames.pop()?;
        self.levels.pop();
        Some(frame)
    }

    fn close_top(&mut self, out: &mut Vec<String>) {
        if let Some(frame) = self.pop() {
            let closer = self.table.closer(&frame);
            debug!(kind = frame.kind.name(), closer = %closer, "close frame");
            out.push(format!("{}{closer}", frame.indent));
            self.closed += 1;
        }
    }

    /// 本体の深さが `depth` より深いフレームをすべて閉じる
    pub fn close_until(&mut self, depth: usize, out: &mut Vec<String>) {
        while self.levels.len() > 1 && self.levels[self.levels.len() - 1] > depth {
            self.close_top(out);
        }
    }

    fn close_headers_deeper_than(&mut self, depth: usize, out: &mut Vec<String>) {
        while self.frames.last().map_or(false, |f| f.header_depth > depth) {
            self.close_top(out);
        }
    }

    /// `elif` / `else` / `catch` / `finally` の行。
    /// 同じ深さに `kinds` のフレームがあれば閉じ行を出さずに取り除く
    pub fn chain(&mut self, depth: usize, kinds: &[BlockKind], out: &mut Vec<String>) -> bool {
        self.close_headers_deeper_than(depth, out);
        let continues = self
            .frames
            .last()
            .map_or(false, |f| f.header_depth == depth && kinds.contains(&f.kind));
        if !continues {
            self.close_until(depth, out);
            return false;
        }
        if let Some(frame) = self.pop() {
            debug!(kind = frame.kind.name(), "continue chain");
            self.continued += 1;
        }
        true
    }

    /// `} while (cond);`: 同じ深さの REPEAT を `until` で閉じる
    pub fn close_repeat(&mut self, depth: usize, until: String, out: &mut Vec<String>) -> bool {
        self.close_headers_deeper_than(depth, out);
        match self.frames.last_mut() {
            Some(frame) if frame.kind == BlockKind::Repeat && frame.header_depth == depth => {
                frame.ident = Some(until);
                self.close_top(out);
                true
            }
            _ => {
                self.close_until(depth, out);
                false
            }
        }
    }

    /// 入力の終わり: 残りをすべて内側から閉じる
    pub fn flush_all(&mut self, out: &mut Vec<String>) {
        while !self.frames.is_empty() {
            self.close_top(out);
        }
    }
}
